use std::fmt;

/// Where an outbound line is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Scope-wide channel, e.g. officer chat via `/oc`
    Channel { command: String },
    /// Private message to one player, e.g. `/msg <name>`
    Direct { command: String, recipient: String },
}

impl Route {
    pub fn channel(command: impl Into<String>) -> Self {
        Route::Channel {
            command: command.into(),
        }
    }

    pub fn direct(command: impl Into<String>, recipient: impl Into<String>) -> Self {
        Route::Direct {
            command: command.into(),
            recipient: recipient.into(),
        }
    }
}

/// A line of chat we intend to send, before the route prefix is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub route: Route,
    pub text: String,
}

impl OutboundMessage {
    pub fn new(route: Route, text: impl Into<String>) -> Self {
        Self {
            route,
            text: text.into(),
        }
    }

    /// The full chat command handed to the transport
    pub fn render(&self) -> String {
        match &self.route {
            Route::Channel { command } => format!("{} {}", command, self.text),
            Route::Direct { command, recipient } => {
                format!("{} {} {}", command, recipient, self.text)
            }
        }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
