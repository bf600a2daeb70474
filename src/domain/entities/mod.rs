//! Domain entities - Core business objects with no external dependencies

pub mod chat_line;
pub mod command;
pub mod outbound;
pub mod player;

pub use chat_line::ChatLine;
pub use command::{ParseOutcome, ParsedCommand};
pub use outbound::{OutboundMessage, Route};
pub use player::{format_reply, BedwarsStats, BedwarsSummary, PlayerIdentity};
