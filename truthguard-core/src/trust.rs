//! Domain trust scoring
//!
//! Scoring starts at a neutral 50 and applies independent additive
//! adjustments, then clamps to [0, 100]:
//!
//! | Signal | Adjustment |
//! |---|---|
//! | known misinformation domain | -40 |
//! | credible news source | +30 |
//! | government / education domain | +40 |
//! | HTTPS / no HTTPS | +5 / -10 |
//! | probe got a response | +5 |
//! | trusted TLD ending in `.in` | +5 |
//! | misinformation keyword in host | -15 |
//! | at least 2 of 3 security headers | +5 |

use thiserror::Error;
use url::Url;

use crate::{clamp_score, ProbeOutcome, SecurityHeaders, TrustLists, TrustSignals, TrustworthyFlags, NEUTRAL_SCORE};

/// Score used when a URL can't be verified at all
pub const FALLBACK_TRUST_SCORE: i32 = 30;

const FALLBACK_REASON: &str = "Failed to verify website due to technical issues";
const NEUTRAL_REASON: &str = "No specific trust signals detected.";

/// Errors parsing a URL for trust evaluation
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// The parts of a URL the trust evaluator looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTarget {
    pub host: String,
    pub tld: String,
    pub https: bool,
}

impl DomainTarget {
    pub fn parse(url: &str) -> Result<Self, TrustError> {
        let parsed = Url::parse(url.trim())?;
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TrustError::MissingHost(url.to_string()))?
            .to_lowercase();
        let tld = host.rsplit('.').next().unwrap_or_default().to_string();

        Ok(Self {
            https: parsed.scheme() == "https",
            host,
            tld,
        })
    }
}

/// Classify a domain against the lists. Leaves `score` neutral and `reason` empty.
pub fn classify_domain(target: &DomainTarget, lists: &TrustLists) -> TrustSignals {
    let host = target.host.as_str();

    TrustSignals {
        https: target.https,
        is_known_misinformation: lists.is_known_misinformation(host),
        is_credible_source: lists.is_credible_source(host),
        is_government_or_edu: lists.is_government_or_edu(host),
        has_trustworthy: TrustworthyFlags {
            tld: lists.is_trusted_tld(&target.tld),
            keywords: false,
            subdomains: host.contains(".gov.") || host.contains(".ac.") || host.contains(".edu."),
        },
        valid_ssl: None,
        security_headers: None,
        score: NEUTRAL_SCORE,
        reason: String::new(),
    }
}

/// Compute `score` and `reason` from already-classified signals
pub fn score_trust(signals: &mut TrustSignals, host: &str, lists: &TrustLists) {
    let mut score = NEUTRAL_SCORE;
    let mut positives: Vec<&str> = Vec::new();
    let mut negatives: Vec<&str> = Vec::new();

    if signals.is_known_misinformation {
        score -= 40;
        negatives.push("Domain appears on list of known misinformation sources in India");
    }

    if signals.is_credible_source {
        score += 30;
        positives.push("Domain is a recognized credible Indian news source");
    }

    if signals.is_government_or_edu {
        score += 40;
        positives.push("Domain is an Indian government or educational institution");
    }

    if signals.https {
        score += 5;
        positives.push("Uses secure HTTPS connection");
    } else {
        score -= 10;
        negatives.push("Does not use secure HTTPS connection");
    }

    if signals.valid_ssl == Some(true) {
        score += 5;
        positives.push("Has valid SSL certificate");
    }

    if signals.has_trustworthy.tld && host.to_lowercase().ends_with(".in") {
        score += 5;
        positives.push("Uses official Indian TLD (.in)");
    }

    if lists.has_misinformation_keyword(host) {
        score -= 15;
        negatives.push("Domain includes keywords often associated with misinformation");
    }

    if signals.security_headers.map(|h| h.count() >= 2).unwrap_or(false) {
        score += 5;
        positives.push("Implements security best practices");
    }

    signals.score = clamp_score(score);
    signals.reason = build_reason(&positives, &negatives);
}

fn build_reason(positives: &[&str], negatives: &[&str]) -> String {
    match (positives.is_empty(), negatives.is_empty()) {
        (false, false) => format!(
            "Positive: {}. Concerns: {}.",
            positives.join(", "),
            negatives.join(", ")
        ),
        (false, true) => format!("Positive factors: {}.", positives.join(", ")),
        (true, false) => format!("Concerns: {}.", negatives.join(", ")),
        (true, true) => NEUTRAL_REASON.to_string(),
    }
}

/// Signals returned when the URL can't be evaluated
pub fn fallback_signals() -> TrustSignals {
    TrustSignals {
        https: false,
        is_known_misinformation: false,
        is_credible_source: false,
        is_government_or_edu: false,
        has_trustworthy: TrustworthyFlags::default(),
        valid_ssl: Some(false),
        security_headers: Some(SecurityHeaders::default()),
        score: FALLBACK_TRUST_SCORE,
        reason: FALLBACK_REASON.to_string(),
    }
}

/// Evaluate a URL's domain trust given an optional probe outcome.
///
/// Never fails: an unparsable URL yields [`fallback_signals`].
pub fn assess_domain(url: &str, lists: &TrustLists, probe: Option<&ProbeOutcome>) -> TrustSignals {
    let target = match DomainTarget::parse(url) {
        Ok(target) => target,
        Err(_) => return fallback_signals(),
    };

    let mut signals = classify_domain(&target, lists);
    if let Some(outcome) = probe {
        signals.record_probe(outcome);
    }
    score_trust(&mut signals, &target.host, lists);
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const STRICT_TRANSPORT: &str = "Strict-Transport-Security";
    const FRAME_OPTIONS: &str = "X-Frame-Options";

    fn lists() -> &'static TrustLists {
        TrustLists::builtin()
    }

    fn probe_with_headers(names: &[&str]) -> ProbeOutcome {
        let headers: HashMap<String, String> = names
            .iter()
            .map(|n| (n.to_string(), "1".to_string()))
            .collect();
        ProbeOutcome::succeeded(headers)
    }

    #[test]
    fn test_parse_target() {
        let target = DomainTarget::parse("https://WWW.TheHindu.com/news/article1").unwrap();
        assert_eq!(target.host, "www.thehindu.com");
        assert_eq!(target.tld, "com");
        assert!(target.https);
    }

    #[test]
    fn test_known_misinformation_over_http() {
        let signals = assess_domain("http://infowars.com/story", lists(), Some(&ProbeOutcome::failed()));
        assert!(signals.is_known_misinformation);
        assert!(!signals.is_credible_source);
        // 50 - 40 (listed) - 10 (no https)
        assert_eq!(signals.score, 0);
        assert!(signals.reason.starts_with("Concerns:"));
    }

    #[test]
    fn test_known_misinformation_over_https_stays_low() {
        let signals = assess_domain("https://infowars.com/", lists(), Some(&ProbeOutcome::failed()));
        // 50 - 40 + 5
        assert_eq!(signals.score, 15);
        assert!(signals.reason.starts_with("Positive:"));
    }

    #[test]
    fn test_government_domain_clamps_to_100() {
        let signals = assess_domain("https://iitb.ac.in/", lists(), Some(&probe_with_headers(&[])));
        assert!(signals.is_government_or_edu);
        assert!(signals.has_trustworthy.tld);
        // 50 + 40 + 5 + 5 + 5 = 105
        assert_eq!(signals.score, 100);
    }

    #[test]
    fn test_credible_source_with_probe() {
        let signals = assess_domain("https://www.thehindu.com/news", lists(), Some(&probe_with_headers(&[])));
        assert!(signals.is_credible_source);
        assert!(!signals.is_government_or_edu);
        // 50 + 30 + 5 + 5
        assert_eq!(signals.score, 90);
    }

    #[test]
    fn test_security_headers_bonus_needs_two() {
        let one = assess_domain(
            "https://example.org/",
            lists(),
            Some(&probe_with_headers(&[STRICT_TRANSPORT])),
        );
        let two = assess_domain(
            "https://example.org/",
            lists(),
            Some(&probe_with_headers(&[STRICT_TRANSPORT, FRAME_OPTIONS])),
        );
        assert_eq!(one.score, 60);
        assert_eq!(two.score, 65);
        assert!(two.reason.contains("security best practices"));
    }

    #[test]
    fn test_keyword_penalty() {
        let signals = assess_domain("http://shocking-health.net/", lists(), None);
        // 50 - 10 - 15
        assert_eq!(signals.score, 25);
        assert_eq!(signals.valid_ssl, None);
    }

    #[test]
    fn test_no_probe_means_no_ssl_bonus() {
        let signals = assess_domain("https://example.net/", lists(), None);
        assert_eq!(signals.score, 55);
        assert_eq!(signals.reason, "Positive factors: Uses secure HTTPS connection.");
    }

    #[test]
    fn test_dot_in_bonus_requires_in_suffix() {
        let dot_in = assess_domain("https://example.in/", lists(), None);
        let dot_com = assess_domain("https://example.com/", lists(), None);
        assert_eq!(dot_in.score - dot_com.score, 5);
    }

    #[test]
    fn test_unparsable_url_falls_back() {
        let signals = assess_domain("not a url", lists(), None);
        assert_eq!(signals.score, FALLBACK_TRUST_SCORE);
        assert_eq!(signals.reason, FALLBACK_REASON);
    }

    #[test]
    fn test_reason_variants() {
        assert_eq!(build_reason(&[], &[]), NEUTRAL_REASON);
        assert_eq!(build_reason(&["a"], &[]), "Positive factors: a.");
        assert_eq!(build_reason(&[], &["b"]), "Concerns: b.");
        assert_eq!(build_reason(&["a", "c"], &["b"]), "Positive: a, c. Concerns: b.");
    }

    #[test]
    fn test_score_bounded_for_every_combination() {
        let empty = TrustLists::from_toml_str("").unwrap();
        let keyword_lists = TrustLists::from_toml_str(r#"misinformation_keywords = ["bad"]"#).unwrap();

        for mask in 0u32..256 {
            let bit = |i: u32| mask & (1 << i) != 0;
            let mut signals = fallback_signals();
            signals.is_known_misinformation = bit(0);
            signals.is_credible_source = bit(1);
            signals.is_government_or_edu = bit(2);
            signals.https = bit(3);
            signals.valid_ssl = Some(bit(4));
            signals.has_trustworthy.tld = bit(5);
            signals.security_headers = Some(SecurityHeaders {
                content_security: bit(7),
                x_frame_options: bit(7),
                strict_transport: false,
            });
            let host = if bit(5) { "site.in" } else { "site.com" };
            let (host, lists) = if bit(6) {
                (format!("bad-{host}"), &keyword_lists)
            } else {
                (host.to_string(), &empty)
            };

            score_trust(&mut signals, &host, lists);
            assert!(
                (0..=100).contains(&signals.score),
                "mask {mask:#010b} produced {}",
                signals.score
            );
            assert!(!signals.reason.is_empty());
        }
    }
}
