//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Chat lines, parsed commands, players, outbound messages
//! - Traits: Abstractions for infrastructure (OutboundSink, StatsLookup)

pub mod entities;
pub mod traits;
