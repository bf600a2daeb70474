//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Hypixel: HTTP lookups against the Mojang and Hypixel APIs
//! - Adapters: Chat transports (console)

pub mod config;
pub mod hypixel;
pub mod adapters;
