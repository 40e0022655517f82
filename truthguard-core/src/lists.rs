//! Static domain and keyword lists used for domain trust
//!
//! The lists are immutable configuration: built once (either from the
//! builtin defaults or from a TOML file) and passed by reference into the
//! trust evaluator. Matching is substring containment against the lower-cased
//! hostname, so an entry also matches any hostname that merely contains it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// Domains with a record of publishing misinformation
pub static DEFAULT_MISINFORMATION_DOMAINS: &[&str] = &[
    // India
    "thenationalistview.com", "postcard.news", "opindia.com", "kreately.in",
    "rightlog.in", "sudarshannews.in", "organiser.org", "jantakareporter.com",
    "navbharattimes.indiatimes.com", "pgurus.com", "sirf-news.com",
    "mynation.net", "tfipost.com", "swarajyamag.com", "hindupost.in",
    "newsbharati.com", "deshgujarat.com", "indiatimes.in", "nationalviews.in",
    "republicworld.com", "janatakaadesh.com", "indiatvnews.in",
    // Global
    "infowars.com", "naturalnews.com", "theepochtimes.com", "breitbart.com",
    "beforeitsnews.com", "worldtruth.tv", "newsmax.com", "dailystormer.su",
    "zerohedge.com",
];

/// Recognized credible news sources
pub static DEFAULT_CREDIBLE_DOMAINS: &[&str] = &[
    "thehindu.com", "indianexpress.com", "ndtv.com", "theprint.in",
    "thewire.in", "news18.com", "hindustantimes.com", "livemint.com",
    "telegraphindia.com", "tribuneindia.com", "economictimes.indiatimes.com",
    "timesofindia.indiatimes.com", "thestatesman.com", "deccanherald.com",
    "theweek.in", "frontline.thehindu.com", "outlookindia.com", "scroll.in",
    "firstpost.com", "cnbctv18.com", "businesstoday.in",
];

/// Government and educational domains
pub static DEFAULT_GOVERNMENT_EDU_DOMAINS: &[&str] = &[
    "gov.in", "nic.in", "edu.in", "ac.in", "ac", "res.in", "india.gov.in",
    "mygov.in", "digitalindia.gov.in", "pib.gov.in", "meity.gov.in",
    "rbi.org.in", "uidai.gov.in", "niti.gov.in", "mea.gov.in",
    "iitb.ac.in", "iisc.ac.in", "iitm.ac.in", "iitd.ac.in", "jnu.ac.in",
    "du.ac.in", "ignou.ac.in", "aiims.edu", "iitkgp.ac.in",
];

/// Hostname keywords often associated with misinformation (English and Hindi)
pub static DEFAULT_MISINFORMATION_KEYWORDS: &[&str] = &[
    "shocking", "exclusive", "conspiracy", "secret", "banned", "censored",
    "miracle", "cure", "ancient secret", "doctors hate", "they don't want you to know",
    "government hiding", "suppressed", "exposed", "revealed", "scandal",
    "विस्फोटक", "चौंकाने वाला", "रहस्य", "षड्यंत्र", "प्रतिबंधित",
    "चमत्कार", "इलाज", "प्राचीन रहस्य", "डॉक्टर नापसंद करते हैं",
];

/// Top-level domains considered trustworthy
pub static DEFAULT_TRUSTED_TLDS: &[&str] = &["in", "org", "com"];

static BUILTIN: LazyLock<TrustLists> = LazyLock::new(TrustLists::from_defaults);

/// Errors loading list configuration
#[derive(Debug, Error)]
pub enum ListsError {
    #[error("Failed to read lists file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid lists file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Domain and keyword lists consulted by the trust evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLists {
    #[serde(default)]
    pub misinformation_domains: Vec<String>,
    #[serde(default)]
    pub credible_domains: Vec<String>,
    #[serde(default)]
    pub government_edu_domains: Vec<String>,
    #[serde(default)]
    pub misinformation_keywords: Vec<String>,
    #[serde(default)]
    pub trusted_tlds: Vec<String>,
}

impl TrustLists {
    /// Shared builtin lists, built on first use
    pub fn builtin() -> &'static TrustLists {
        &BUILTIN
    }

    fn from_defaults() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            misinformation_domains: owned(DEFAULT_MISINFORMATION_DOMAINS),
            credible_domains: owned(DEFAULT_CREDIBLE_DOMAINS),
            government_edu_domains: owned(DEFAULT_GOVERNMENT_EDU_DOMAINS),
            misinformation_keywords: owned(DEFAULT_MISINFORMATION_KEYWORDS),
            trusted_tlds: owned(DEFAULT_TRUSTED_TLDS),
        }
        .normalized()
    }

    /// Parse lists from TOML. Missing tables fall back to empty lists.
    pub fn from_toml_str(input: &str) -> Result<Self, ListsError> {
        let lists: TrustLists = toml::from_str(input)?;
        Ok(lists.normalized())
    }

    /// Load lists from a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ListsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Lower-case every entry so lookups can compare against a lower-cased host
    fn normalized(mut self) -> Self {
        for list in [
            &mut self.misinformation_domains,
            &mut self.credible_domains,
            &mut self.government_edu_domains,
            &mut self.misinformation_keywords,
            &mut self.trusted_tlds,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
            list.retain(|e| !e.is_empty());
        }
        self
    }

    pub fn is_known_misinformation(&self, host: &str) -> bool {
        contains_any(host, &self.misinformation_domains)
    }

    pub fn is_credible_source(&self, host: &str) -> bool {
        contains_any(host, &self.credible_domains)
    }

    pub fn is_government_or_edu(&self, host: &str) -> bool {
        contains_any(host, &self.government_edu_domains)
    }

    pub fn has_misinformation_keyword(&self, host: &str) -> bool {
        contains_any(host, &self.misinformation_keywords)
    }

    pub fn is_trusted_tld(&self, tld: &str) -> bool {
        self.trusted_tlds.iter().any(|t| t == tld)
    }
}

impl Default for TrustLists {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn contains_any(host: &str, entries: &[String]) -> bool {
    let host = host.to_lowercase();
    entries.iter().any(|e| host.contains(e.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lists_loaded() {
        let lists = TrustLists::builtin();
        assert_eq!(lists.misinformation_domains.len(), DEFAULT_MISINFORMATION_DOMAINS.len());
        assert!(lists.credible_domains.iter().any(|d| d == "thehindu.com"));
        assert!(lists.is_trusted_tld("in"));
        assert!(!lists.is_trusted_tld("xyz"));
    }

    #[test]
    fn test_subdomain_containment() {
        let lists = TrustLists::builtin();
        assert!(lists.is_known_misinformation("www.infowars.com"));
        assert!(lists.is_government_or_edu("cse.iitb.ac.in"));
        assert!(lists.is_credible_source("frontline.thehindu.com"));
    }

    #[test]
    fn test_substring_false_positive_is_preserved() {
        // Known limitation: the bare "ac" entry matches any host containing "ac".
        let lists = TrustLists::builtin();
        assert!(lists.is_government_or_edu("facebook.com"));
        // And "indiatimes.in" is a substring of unrelated hosts.
        assert!(lists.is_known_misinformation("notindiatimes.in"));
    }

    #[test]
    fn test_hindi_keyword_match() {
        let lists = TrustLists::builtin();
        assert!(lists.has_misinformation_keyword("रहस्य.भारत"));
        assert!(lists.has_misinformation_keyword("miracle-cure-news.com"));
        assert!(!lists.has_misinformation_keyword("example.org"));
    }

    #[test]
    fn test_from_toml_normalizes_entries() {
        let lists = TrustLists::from_toml_str(
            r#"
            misinformation_domains = ["Fake.Example "]
            trusted_tlds = ["IN", ""]
            "#,
        )
        .unwrap();

        assert_eq!(lists.misinformation_domains, vec!["fake.example".to_string()]);
        assert_eq!(lists.trusted_tlds, vec!["in".to_string()]);
        assert!(lists.credible_domains.is_empty());
        assert!(lists.is_known_misinformation("news.fake.example"));
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let err = TrustLists::from_toml_str("credible_domains = 5").unwrap_err();
        assert!(matches!(err, ListsError::Parse(_)));
    }
}
