//! Domain-level trust signals
//!
//! A [`TrustSignals`] record is built fresh for every URL analysis. The
//! membership and heuristic flags are fixed once classified; only `score`
//! and `reason` are filled in by the scorer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header names inspected by the domain probe
pub const CONTENT_SECURITY_POLICY: &str = "content-security-policy";
pub const X_FRAME_OPTIONS: &str = "x-frame-options";
pub const STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";

/// Heuristic flags derived from the hostname alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustworthyFlags {
    /// TLD is one of the trusted TLDs
    pub tld: bool,
    /// Reserved for keyword-based trust; never set by the classifier
    pub keywords: bool,
    /// Hostname contains a `.gov.`, `.ac.` or `.edu.` label
    pub subdomains: bool,
}

/// Which security headers the probe saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHeaders {
    pub content_security: bool,
    pub x_frame_options: bool,
    pub strict_transport: bool,
}

impl SecurityHeaders {
    /// Read the three headers from a probe's (lower-cased) header map
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        Self {
            content_security: headers.contains_key(CONTENT_SECURITY_POLICY),
            x_frame_options: headers.contains_key(X_FRAME_OPTIONS),
            strict_transport: headers.contains_key(STRICT_TRANSPORT_SECURITY),
        }
    }

    pub fn count(&self) -> usize {
        [self.content_security, self.x_frame_options, self.strict_transport]
            .iter()
            .filter(|&&present| present)
            .count()
    }
}

/// Outcome of a HEAD-style probe against a URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Whether any response came back
    pub success: bool,
    /// Response headers, names lower-cased
    pub headers: HashMap<String, String>,
}

impl ProbeOutcome {
    pub fn failed() -> Self {
        Self::default()
    }

    pub fn succeeded(headers: HashMap<String, String>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self {
            success: true,
            headers,
        }
    }
}

/// Trust signals describing a URL's domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustSignals {
    pub https: bool,
    pub is_known_misinformation: bool,
    pub is_credible_source: bool,
    pub is_government_or_edu: bool,
    pub has_trustworthy: TrustworthyFlags,
    /// `None` when no probe was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_headers: Option<SecurityHeaders>,
    /// Derived score (0-100)
    pub score: i32,
    /// Human-readable summary of the signals that fired
    pub reason: String,
}

impl TrustSignals {
    /// Record the outcome of a network probe
    pub fn record_probe(&mut self, outcome: &ProbeOutcome) {
        self.valid_ssl = Some(outcome.success);
        self.security_headers = Some(if outcome.success {
            SecurityHeaders::from_headers(&outcome.headers)
        } else {
            SecurityHeaders::default()
        });
    }

    /// Pretty-printed JSON, as embedded in prompts
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Compact view embedded in URL analysis results
    pub fn summary(&self) -> TrustSummary {
        TrustSummary {
            score: self.score,
            is_known_misinformation: self.is_known_misinformation,
            is_credible_source: self.is_credible_source,
            is_government_or_edu: self.is_government_or_edu,
            https: self.https,
            valid_ssl: self.valid_ssl.unwrap_or(false),
            reason: self.reason.clone(),
        }
    }
}

/// Trust signal fields surfaced to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustSummary {
    pub score: i32,
    pub is_known_misinformation: bool,
    pub is_credible_source: bool,
    pub is_government_or_edu: bool,
    pub https: bool,
    pub valid_ssl: bool,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_header_count() {
        let mut headers = HashMap::new();
        headers.insert("Content-Security-Policy".to_string(), "default-src 'self'".to_string());
        headers.insert("X-Frame-Options".to_string(), "DENY".to_string());
        let outcome = ProbeOutcome::succeeded(headers);

        let found = SecurityHeaders::from_headers(&outcome.headers);
        assert!(found.content_security);
        assert!(found.x_frame_options);
        assert!(!found.strict_transport);
        assert_eq!(found.count(), 2);
    }

    #[test]
    fn test_failed_probe_records_absent_headers() {
        let mut signals = crate::trust::fallback_signals();
        signals.record_probe(&ProbeOutcome::failed());
        assert_eq!(signals.valid_ssl, Some(false));
        assert_eq!(signals.security_headers, Some(SecurityHeaders::default()));
    }

    #[test]
    fn test_serializes_camel_case() {
        let signals = crate::trust::fallback_signals();
        let json = serde_json::to_value(&signals).unwrap();
        assert!(json.get("isKnownMisinformation").is_some());
        assert_eq!(json["hasTrustworthy"]["subdomains"], false);
    }
}
