//! TruthGuard Runtime
//!
//! Wires the agents and the network layer into one pipeline per content
//! kind, and caches finished results by content fingerprint.

pub mod config;
pub mod cache;
pub mod validate;
pub mod pipeline;

pub use config::*;
pub use cache::*;
pub use validate::*;
pub use pipeline::*;
