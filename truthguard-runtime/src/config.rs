//! Engine configuration

use std::time::Duration;

use truthguard_core::{ACCEPTED_IMAGE_TYPES, ACCEPTED_VIDEO_TYPES};
use truthguard_net::{HttpConfig, ProbeConfig};

/// Pipeline and cache configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a cached result stays valid
    pub cache_ttl: Duration,
    /// How often the background sweep drops expired results
    pub cache_purge_interval: Duration,
    /// Upper bound on cached results (None = unbounded)
    pub cache_max_entries: Option<usize>,
    /// Characters of content sent to the analysis prompts
    pub content_excerpt_chars: usize,
    /// Content fetch settings
    pub http: HttpConfig,
    /// Domain probe settings
    pub probe: ProbeConfig,
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
    pub accepted_image_types: Vec<String>,
    pub accepted_video_types: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            cache_purge_interval: Duration::from_secs(120),
            cache_max_entries: None,
            content_excerpt_chars: 4000,
            http: HttpConfig::default(),
            probe: ProbeConfig::default(),
            max_image_bytes: 10 * 1024 * 1024,
            max_video_bytes: 50 * 1024 * 1024,
            accepted_image_types: ACCEPTED_IMAGE_TYPES.iter().map(|s| s.to_string()).collect(),
            accepted_video_types: ACCEPTED_VIDEO_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_max_entries(mut self, max: usize) -> Self {
        self.cache_max_entries = Some(max);
        self
    }

    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.content_excerpt_chars = chars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.content_excerpt_chars, 4000);
        assert_eq!(config.probe.timeout, Duration::from_secs(5));
        assert_eq!(config.probe.max_redirects, 3);
        assert_eq!(config.max_image_bytes, 10_485_760);
        assert!(config.accepted_video_types.iter().any(|t| t == "video/quicktime"));
    }
}
