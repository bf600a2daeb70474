//! Domain traits - Abstractions for infrastructure implementations

pub mod lookup;
pub mod sink;

pub use lookup::StatsLookup;
pub use sink::OutboundSink;
