//! TruthGuard Net Layer
//!
//! Everything in the engine that talks HTTP directly:
//! - Shared client construction with user-agent rotation
//! - HEAD probes for SSL and security-header signals
//! - Page fetching with body text extraction

pub mod client;
pub mod probe;
pub mod fetch;

pub use client::*;
pub use probe::*;
pub use fetch::*;
