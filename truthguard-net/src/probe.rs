//! Domain probing
//!
//! A probe sends one HEAD request and reports whether anything answered,
//! along with the response headers. It never fails: timeouts, TLS errors
//! and refused connections all come back as [`ProbeOutcome::failed`].

use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use truthguard_core::{assess_domain, fallback_signals, DomainTarget, ProbeOutcome, TrustLists, TrustSignals};

use crate::{random_user_agent, NetError};

/// Probe settings
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_redirects: 3,
        }
    }
}

/// Something that can probe a URL for SSL and security-header signals
#[async_trait]
pub trait DomainProbe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HEAD-request probe over reqwest
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self, NetError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(random_user_agent())
            .build()
            .map_err(|e| NetError::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DomainProbe for HttpProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        // Any status counts as a response; only transport failures fail the probe.
        match self.client.head(url).send().await {
            Ok(response) => {
                debug!("Probe {} answered {}", url, response.status());
                let headers: HashMap<String, String> = response
                    .headers()
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_string(),
                            value.to_str().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                ProbeOutcome::succeeded(headers)
            }
            Err(e) => {
                warn!("Probe {} failed: {}", url, e);
                ProbeOutcome::failed()
            }
        }
    }
}

/// Evaluate a URL's domain trust, probing it over the network.
///
/// Unparsable URLs are never probed and get the fallback signals.
pub async fn verify_domain_trust(url: &str, lists: &TrustLists, probe: &dyn DomainProbe) -> TrustSignals {
    if let Err(e) = DomainTarget::parse(url) {
        warn!("Cannot verify {}: {}", url, e);
        return fallback_signals();
    }

    let outcome = probe.probe(url).await;
    let signals = assess_domain(url, lists, Some(&outcome));
    debug!("Domain trust for {}: {} ({})", url, signals.score, signals.reason);
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProbe {
        outcome: ProbeOutcome,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn new(outcome: ProbeOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DomainProbe for StubProbe {
        async fn probe(&self, _url: &str) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[test]
    fn test_default_probe_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_redirects, 3);
    }

    #[tokio::test]
    async fn test_verify_with_successful_probe() {
        let mut headers = HashMap::new();
        headers.insert("Strict-Transport-Security".to_string(), "max-age=1".to_string());
        headers.insert("X-Frame-Options".to_string(), "DENY".to_string());
        let probe = StubProbe::new(ProbeOutcome::succeeded(headers));

        let signals = verify_domain_trust("https://example.org/page", TrustLists::builtin(), &probe).await;

        // 50 + https 5 + ssl 5 + headers 5
        assert_eq!(signals.score, 65);
        assert_eq!(signals.valid_ssl, Some(true));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_verify_with_failed_probe() {
        let probe = StubProbe::new(ProbeOutcome::failed());
        let signals = verify_domain_trust("http://example.org", TrustLists::builtin(), &probe).await;

        // 50 - no https 10
        assert_eq!(signals.score, 40);
        assert_eq!(signals.valid_ssl, Some(false));
    }

    #[tokio::test]
    async fn test_unparsable_url_is_not_probed() {
        let probe = StubProbe::new(ProbeOutcome::failed());
        let signals = verify_domain_trust("::not a url::", TrustLists::builtin(), &probe).await;

        assert_eq!(signals.score, truthguard_core::FALLBACK_TRUST_SCORE);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_http_probe_never_errors() {
        let probe = HttpProbe::new(&ProbeConfig {
            timeout: Duration::from_millis(500),
            max_redirects: 3,
        })
        .unwrap();
        // Port 1 on loopback refuses connections.
        let outcome = probe.probe("http://127.0.0.1:1/").await;
        assert!(!outcome.success);
        assert!(outcome.headers.is_empty());
    }
}
