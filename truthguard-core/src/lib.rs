//! TruthGuard Core - trust signals, factor model and score blending
//!
//! This crate holds everything in the scoring engine that does no I/O:
//! - Static domain and keyword lists used for domain trust
//! - Domain trust scoring from list membership and probe results
//! - Best-effort JSON extraction from free-text model answers
//! - The factor model and the blend that produces the final truth score
//! - Content fingerprints and the analysis result record

pub mod lists;
pub mod signals;
pub mod trust;
pub mod extract;
pub mod factors;
pub mod verdict;
pub mod blend;
pub mod details;
pub mod media;
pub mod fingerprint;
pub mod result;

pub use lists::*;
pub use signals::*;
pub use trust::*;
pub use extract::*;
pub use factors::*;
pub use verdict::*;
pub use blend::*;
pub use details::*;
pub use media::*;
pub use fingerprint::*;
pub use result::*;

/// Neutral score every heuristic starts from
pub const NEUTRAL_SCORE: i32 = 50;

/// Minimum score
pub const MIN_SCORE: i32 = 0;

/// Maximum score
pub const MAX_SCORE: i32 = 100;

/// Clamp a score into [MIN_SCORE, MAX_SCORE]
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Round a blended value the way the scoring formulas expect (half away from zero)
pub fn round_score(value: f64) -> i32 {
    value.round() as i32
}
