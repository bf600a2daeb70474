//! Chat transport adapters

pub mod console;
