//! Content fingerprints used as result cache keys

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{ContentKind, MediaFile};

/// Stable cache key derived from analysed content.
///
/// URLs key on the URL string, text on a SHA-256 digest of the text, and
/// files on name plus byte size. Keys are prefixed with the content kind so
/// the same string submitted as a URL and as text never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub fn for_url(url: &str) -> Self {
        Self(format!("url-{}", url))
    }

    pub fn for_text(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Self(format!("text-{:x}", digest))
    }

    pub fn for_file(kind: ContentKind, name: &str, size: u64) -> Self {
        Self(format!("{}-{}-{}", kind.as_str(), name, size))
    }

    pub fn for_media(kind: ContentKind, file: &MediaFile) -> Self {
        Self::for_file(kind, &file.name, file.size())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_fingerprint() {
        assert_eq!(
            ContentFingerprint::for_url("https://example.com/a"),
            ContentFingerprint::for_url("https://example.com/a")
        );
        assert_eq!(ContentFingerprint::for_text("hello"), ContentFingerprint::for_text("hello"));
    }

    #[test]
    fn test_different_input_different_fingerprint() {
        assert_ne!(ContentFingerprint::for_text("hello"), ContentFingerprint::for_text("hello "));
        assert_ne!(
            ContentFingerprint::for_file(ContentKind::Image, "a.png", 10),
            ContentFingerprint::for_file(ContentKind::Image, "a.png", 11)
        );
        assert_ne!(
            ContentFingerprint::for_file(ContentKind::Image, "a.png", 10),
            ContentFingerprint::for_file(ContentKind::Video, "a.png", 10)
        );
    }

    #[test]
    fn test_text_fingerprint_is_sha256_hex() {
        let fp = ContentFingerprint::for_text("abc");
        assert_eq!(
            fp.as_str(),
            "text-ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
