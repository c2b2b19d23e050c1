//! Compression Artifact Module
//!
//! Cached results of compressing a specific payload under a specific
//! encoding and level.

use serde::Serialize;

use crate::cache::current_timestamp_ms;

// == Encoding ==
/// Supported content encodings, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Gzip,
    Deflate,
}

impl Encoding {
    /// All supported encodings, most preferred first.
    pub const PREFERENCE_ORDER: [Encoding; 2] = [Encoding::Gzip, Encoding::Deflate];

    /// The `Content-Encoding` header token for this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
            Encoding::Deflate => "deflate",
        }
    }
}

// == Artifact Key ==
/// Identity of a compressed artifact: what was compressed, how.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    /// Hex-encoded SHA-256 of the uncompressed payload
    pub content_hash: String,
    /// Algorithm used
    pub encoding: Encoding,
    /// Compression level used
    pub level: u32,
}

// == Compressed Artifact ==
/// A cached compressed payload.
#[derive(Debug, Clone)]
pub struct CompressedArtifact {
    /// Compressed bytes
    pub bytes: Vec<u8>,
    /// Algorithm that produced the bytes
    pub encoding: Encoding,
    /// Production timestamp (Unix ms), drives the artifact's own short TTL
    pub produced_at: u64,
}

impl CompressedArtifact {
    // == Constructor ==
    /// Wraps freshly compressed bytes, stamped with the current time.
    pub fn new(bytes: Vec<u8>, encoding: Encoding) -> Self {
        Self {
            bytes,
            encoding,
            produced_at: current_timestamp_ms(),
        }
    }

    // == Is Expired ==
    /// True once the artifact has outlived `ttl_ms`.
    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        current_timestamp_ms().saturating_sub(self.produced_at) >= ttl_ms
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_encoding_tokens() {
        assert_eq!(Encoding::Gzip.as_str(), "gzip");
        assert_eq!(Encoding::Deflate.as_str(), "deflate");
        assert_eq!(Encoding::PREFERENCE_ORDER[0], Encoding::Gzip);
    }

    #[test]
    fn test_artifact_expiry() {
        let artifact = CompressedArtifact::new(vec![1, 2, 3], Encoding::Gzip);

        assert!(!artifact.is_expired(10_000));
        sleep(Duration::from_millis(30));
        assert!(artifact.is_expired(20));
    }

    #[test]
    fn test_key_equality_includes_level() {
        let a = ArtifactKey {
            content_hash: "abc".to_string(),
            encoding: Encoding::Gzip,
            level: 6,
        };
        let b = ArtifactKey {
            content_hash: "abc".to_string(),
            encoding: Encoding::Gzip,
            level: 9,
        };

        assert_ne!(a, b);
    }
}
