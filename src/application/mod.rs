//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Line parsing, command dispatch, throttle recovery, relay

pub mod errors;
pub mod messaging;
