//! Terminal input parsing and prompt handling.

use std::io::Write;

/// A line entered at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Plain text to post to the room
    Chat(String),
    /// `/spread <amount> <count>`
    Spread { amount: i64, count: i64 },
    /// `/quit`
    Quit,
    /// Unrecognized or malformed command, with a usage hint
    Invalid(String),
}

pub const SPREAD_USAGE: &str = "usage: /spread <amount> <count>";

/// Parse one input line.
pub fn parse_input(line: &str) -> InputCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return InputCommand::Chat(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("quit") | Some("exit") => InputCommand::Quit,
        Some("spread") => {
            let amount = parts.next().and_then(|s| s.parse::<i64>().ok());
            let count = parts.next().and_then(|s| s.parse::<i64>().ok());
            match (amount, count, parts.next()) {
                (Some(amount), Some(count), None) => InputCommand::Spread { amount, count },
                _ => InputCommand::Invalid(SPREAD_USAGE.to_string()),
            }
        }
        Some(other) => InputCommand::Invalid(format!("unknown command '/{}'", other)),
        None => InputCommand::Invalid("empty command".to_string()),
    }
}

/// Redisplay the prompt after printing output
pub fn redisplay_prompt(user_id: &str) {
    print!("{}> ", user_id);
    std::io::stdout().flush().ok();
}
