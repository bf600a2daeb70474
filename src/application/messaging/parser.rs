//! Chat line parser - Classifies raw chat lines

use crate::domain::entities::{ChatLine, ParseOutcome, ParsedCommand};

/// Prefix the server uses when it refuses a message for spam
pub const DEFAULT_REJECTION_PREFIX: &str = "You cannot say";

/// Turns raw chat lines into commands, rejection notices or nothing
#[derive(Debug, Clone)]
pub struct ChatLineParser {
    scope_prefixes: Vec<String>,
    rejection_prefix: String,
    command: String,
}

impl ChatLineParser {
    pub fn new(scope_prefixes: Vec<String>, command: impl Into<String>) -> Self {
        Self {
            scope_prefixes,
            rejection_prefix: DEFAULT_REJECTION_PREFIX.to_string(),
            command: command.into(),
        }
    }

    pub fn with_rejection_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rejection_prefix = prefix.into();
        self
    }

    /// Classify a line
    pub fn parse(&self, line: &ChatLine) -> ParseOutcome {
        let text = line.text.as_str();

        if text.starts_with(&self.rejection_prefix) {
            return ParseOutcome::Rejection;
        }

        if !self.scope_prefixes.iter().any(|p| text.starts_with(p.as_str())) {
            return ParseOutcome::Ignored;
        }

        match self.parse_command(line) {
            Some(cmd) => ParseOutcome::Command(cmd),
            None => ParseOutcome::Ignored,
        }
    }

    fn parse_command(&self, line: &ChatLine) -> Option<ParsedCommand> {
        let tokens: Vec<&str> = line.tokens().collect();

        // Sender label is the first token ending in ':'
        let label_index = tokens.iter().position(|t| t.ends_with(':'))?;
        let label = tokens[label_index].trim_end_matches(':');

        let name = *tokens.get(label_index + 1)?;
        if name != self.command {
            return None;
        }

        let args: Vec<String> = tokens[label_index + 2..].iter().map(|s| s.to_string()).collect();
        if args.is_empty() {
            tracing::debug!("{} without a player name, ignoring", name);
            return None;
        }

        let cmd = ParsedCommand::new(name, args);
        Some(if label.is_empty() { cmd } else { cmd.with_sender(label) })
    }
}

impl Default for ChatLineParser {
    fn default() -> Self {
        Self::new(vec!["Officer".to_string()], "sc")
    }
}
