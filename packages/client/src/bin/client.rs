//! Terminal chat client for a Ppurigi chat room.
//!
//! Joins `/ws/chat/{room_id}` on the given origin, prints the room's messages
//! and sends whatever is typed at the prompt. `/spread <amount> <count>`
//! creates a money spread and announces it to the room.
//! Reconnects automatically with capped exponential backoff.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ppurigi-client -- --room-id pt_1 --user-id 42
//! cargo run --bin ppurigi-client -- -o https://gym.example -r pt_1 -u 42
//! ```

use std::time::Duration;

use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use ppurigi_client::{
    ChatSessionClient, ClientConfig, ClientError, SessionEvent,
    domain::ReconnectPolicy,
    formatter::MessageFormatter,
    ui::{InputCommand, parse_input, redisplay_prompt},
};
use ppurigi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "ppurigi-client")]
#[command(about = "Chat-room client with money spreading", long_about = None)]
struct Args {
    /// Origin the chat page is served from (https selects wss)
    #[arg(short = 'o', long, default_value = "http://127.0.0.1:8000")]
    origin: String,

    /// Chat room to join
    #[arg(short = 'r', long)]
    room_id: String,

    /// Participant identity
    #[arg(short = 'u', long)]
    user_id: String,

    /// Delay before the first reconnection attempt, in milliseconds
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
    reconnect_initial_ms: u64,

    /// Upper bound for the reconnection delay, in milliseconds
    #[arg(long, default_value_t = 30000, value_parser = clap::value_parser!(u64).range(1..))]
    reconnect_max_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME")], "info");

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let policy = ReconnectPolicy::new(
        Duration::from_millis(args.reconnect_initial_ms),
        Duration::from_millis(args.reconnect_max_ms),
    );
    let config = ClientConfig::new(&args.origin, args.room_id, args.user_id)?
        .with_reconnect_policy(policy);

    let mut client = ChatSessionClient::new(config)?;
    let user_id = client.identity().user_id().to_string();
    let room_id = client.identity().room_id().to_string();
    let mut events = client.start()?;

    println!(
        "\nYou are '{}' in room '{}'. Type messages and press Enter to send.\n\
         Use /spread <amount> <count> to spread money, /quit or Ctrl+C to exit.\n",
        user_id, room_id
    );

    // Render session events as they arrive
    let printer_user_id = user_id.clone();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let output = match event {
                SessionEvent::Connected => MessageFormatter::format_connected(&room_id),
                SessionEvent::Disconnected { attempt, retry_in } => {
                    MessageFormatter::format_disconnected(attempt, retry_in)
                }
                SessionEvent::Message(message) => {
                    MessageFormatter::format_message(&message, &printer_user_id)
                }
                SessionEvent::FrameDropped(_) => continue,
                SessionEvent::Stopped => break,
            };
            print!("{}", output);
            redisplay_prompt(&printer_user_id);
        }
    });

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    spawn_readline(user_id, input_tx);

    while let Some(line) = input_rx.recv().await {
        match parse_input(&line) {
            InputCommand::Chat(content) => {
                if let Err(e) = client.send_chat_message(&content).await {
                    print!("{}", MessageFormatter::format_error(&e));
                }
            }
            InputCommand::Spread { amount, count } => {
                match client.create_spread(amount, count).await {
                    Ok(token) => print!("{}", MessageFormatter::format_spread_created(&token)),
                    Err(e) => print!("{}", MessageFormatter::format_error(&e)),
                }
            }
            InputCommand::Quit => break,
            InputCommand::Invalid(hint) => println!("{}", hint),
        }
    }

    client.stop().await;
    if let Err(e) = printer.await {
        tracing::warn!("Event printer ended abnormally: {}", e);
    }

    Ok(())
}

/// Read lines on a blocking thread (rustyline is synchronous) and forward them.
fn spawn_readline(user_id: String, input_tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", user_id);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });
}
