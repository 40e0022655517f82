//! Persona management for analysis agents
//!
//! Every model call the pipeline makes is described by a persona: a system
//! role, a user prompt template and an output budget. Definitions live in
//! TOML files under `prompts/` and are embedded at compile time.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::AgentError;

/// A persona definition loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub persona: PersonaMetadata,
    pub prompt: PromptConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaMetadata {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    pub system: String,
    /// User prompt template with `{placeholder}` slots
    #[serde(default)]
    pub user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_format() -> String {
    "text".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

/// Well-known persona ids
pub mod ids {
    pub const URL_FACT_CHECKER: &str = "url_fact_checker";
    pub const TEXT_FACT_CHECKER: &str = "text_fact_checker";
    pub const URL_MEDIA_ANALYST: &str = "url_media_analyst";
    pub const TEXT_MEDIA_ANALYST: &str = "text_media_analyst";
    pub const SOURCE_REPUTATION: &str = "source_reputation";
    pub const URL_METADATA: &str = "url_metadata";
    pub const TEXT_METADATA: &str = "text_metadata";
    pub const MISINFORMATION_VERIFIER: &str = "misinformation_verifier";
    pub const FACTOR_SCORER: &str = "factor_scorer";
    pub const URL_SUMMARY: &str = "url_summary";
    pub const TEXT_SUMMARY: &str = "text_summary";
    pub const IMAGE_SUMMARY: &str = "image_summary";
    pub const VIDEO_SUMMARY: &str = "video_summary";
    pub const IMAGE_VISION: &str = "image_vision";
    pub const IMAGE_DETAILS: &str = "image_details";
    pub const VIDEO_BASIC: &str = "video_basic";
    pub const VIDEO_DETAILS: &str = "video_details";
}

/// Registry of all loaded personas
#[derive(Debug, Default, Clone)]
pub struct PersonaRegistry {
    personas: HashMap<String, Persona>,
}

impl PersonaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all personas from the embedded prompts
    pub fn load_embedded() -> Self {
        let mut registry = Self::new();

        let embedded = [
            include_str!("../prompts/url_fact_checker.toml"),
            include_str!("../prompts/text_fact_checker.toml"),
            include_str!("../prompts/url_media_analyst.toml"),
            include_str!("../prompts/text_media_analyst.toml"),
            include_str!("../prompts/source_reputation.toml"),
            include_str!("../prompts/url_metadata.toml"),
            include_str!("../prompts/text_metadata.toml"),
            include_str!("../prompts/misinformation_verifier.toml"),
            include_str!("../prompts/factor_scorer.toml"),
            include_str!("../prompts/url_summary.toml"),
            include_str!("../prompts/text_summary.toml"),
            include_str!("../prompts/image_summary.toml"),
            include_str!("../prompts/video_summary.toml"),
            include_str!("../prompts/image_vision.toml"),
            include_str!("../prompts/image_details.toml"),
            include_str!("../prompts/video_basic.toml"),
            include_str!("../prompts/video_details.toml"),
        ];

        for toml_str in embedded {
            match toml::from_str::<Persona>(toml_str) {
                Ok(persona) if persona.persona.enabled => registry.register(persona),
                Ok(_) => {}
                Err(e) => warn!("Skipping invalid embedded persona: {}", e),
            }
        }

        registry
    }

    /// Load personas from a directory, overriding embedded ones with the same id
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        let mut registry = Self::load_embedded();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().is_some_and(|ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)?;
                match toml::from_str::<Persona>(&content) {
                    Ok(persona) if persona.persona.enabled => registry.register(persona),
                    Ok(_) => {}
                    Err(e) => warn!("Skipping invalid persona {}: {}", path.display(), e),
                }
            }
        }

        Ok(registry)
    }

    /// Register a persona
    pub fn register(&mut self, persona: Persona) {
        self.personas.insert(persona.persona.id.clone(), persona);
    }

    /// Get a persona by ID
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.get(id)
    }

    /// Get a persona by ID, or fail with [`AgentError::MissingPersona`]
    pub fn require(&self, id: &str) -> Result<&Persona, AgentError> {
        self.get(id)
            .ok_or_else(|| AgentError::MissingPersona(id.to_string()))
    }

    /// Get all personas in a category
    pub fn by_category(&self, category: &str) -> Vec<&Persona> {
        self.personas
            .values()
            .filter(|p| p.persona.category == category)
            .collect()
    }

    /// List all persona IDs
    pub fn list_ids(&self) -> Vec<&str> {
        self.personas.keys().map(|s| s.as_str()).collect()
    }

    /// Count of loaded personas
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Persona {
    /// Get the system prompt
    pub fn system_prompt(&self) -> &str {
        &self.prompt.system
    }

    /// Render the system prompt with the given values
    pub fn render_system(&self, vars: &[(&str, &str)]) -> String {
        render(&self.prompt.system, vars)
    }

    /// Render the user prompt with the given values
    pub fn render_user(&self, vars: &[(&str, &str)]) -> String {
        render(&self.prompt.user, vars)
    }

    pub fn max_tokens(&self) -> u32 {
        self.output.max_tokens
    }

    /// Whether this persona's answer is parsed as JSON
    pub fn expects_json(&self) -> bool {
        self.output.format == "json"
    }
}

/// Fill `{name}` slots in a single pass.
///
/// Substituted values are never rescanned, so content containing braces is
/// inserted verbatim. Unknown slots are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let slot = after
            .find('}')
            .map(|close| (&after[..close], close))
            .filter(|(name, _)| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));

        match slot.and_then(|(name, close)| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| (v, close))) {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_personas() {
        let registry = PersonaRegistry::load_embedded();
        assert_eq!(registry.len(), 17, "every embedded persona should parse");

        assert!(registry.get(ids::URL_FACT_CHECKER).is_some());
        assert!(registry.get(ids::MISINFORMATION_VERIFIER).is_some());
        assert!(registry.get(ids::FACTOR_SCORER).is_some());
        assert!(registry.require("nope").is_err());
    }

    #[test]
    fn test_output_budgets() {
        let registry = PersonaRegistry::load_embedded();
        let budget = |id: &str| registry.get(id).map(|p| p.max_tokens());

        assert_eq!(budget(ids::MISINFORMATION_VERIFIER), Some(10));
        assert_eq!(budget(ids::SOURCE_REPUTATION), Some(250));
        assert_eq!(budget(ids::URL_SUMMARY), Some(300));
        assert_eq!(budget(ids::VIDEO_BASIC), Some(500));
        assert_eq!(budget(ids::URL_FACT_CHECKER), Some(1000));
    }

    #[test]
    fn test_json_personas() {
        let registry = PersonaRegistry::load_embedded();
        let json: Vec<_> = registry
            .by_category("extraction")
            .into_iter()
            .filter(|p| p.expects_json())
            .collect();
        assert_eq!(json.len(), 4);
    }

    #[test]
    fn test_render_fills_known_slots() {
        let out = render("Analyze {url}:\n\n{content}", &[("url", "https://a.in"), ("content", "body")]);
        assert_eq!(out, "Analyze https://a.in:\n\nbody");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render("{content} from {url}", &[("content", "see {url}"), ("url", "x.in")]);
        assert_eq!(out, "see {url} from x.in");
    }

    #[test]
    fn test_render_keeps_unknown_and_literal_braces() {
        let out = render("{\"a\": 1} {missing} {name}", &[("name", "ok")]);
        assert_eq!(out, "{\"a\": 1} {missing} ok");
    }
}
