//! TruthGuard Agents
//!
//! Model-facing agents of the scoring engine:
//! - **Analyst**: free-text fact checks, media analysis, reputation and summaries
//! - **Classifier**: keyword scan plus YES/NO misinformation verification
//! - **Synthesizer**: four-factor scoring via structured extraction
//! - **Metadata**: article metadata and media manipulation details
//!
//! ## Modular Personas
//!
//! Every prompt is defined via TOML persona files in `prompts/`.
//! See [`persona::PersonaRegistry`] for loading and managing personas.

pub mod backend;
pub mod persona;
pub mod extractor;
pub mod analyst;
pub mod classifier;
pub mod synthesizer;
pub mod metadata;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::*;
pub use persona::*;
pub use extractor::*;
pub use analyst::*;
pub use classifier::*;
pub use synthesizer::*;
pub use metadata::*;
pub use traits::*;
