/// A recognized command invocation pulled out of a chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Token before the command, without its trailing colon
    pub sender: Option<String>,
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            sender: None,
            name: name.into(),
            args,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// First argument, the player to look up
    pub fn target(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// What a chat line turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Command(ParsedCommand),
    /// The channel refused our previous send
    Rejection,
    Ignored,
}
