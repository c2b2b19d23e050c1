//! Compression Advisor Module
//!
//! Decides whether a response body is worth compressing, performs the
//! compression, and caches the result by content hash so identical payloads
//! are not recompressed. Compression is always an optimization: every
//! failure path degrades to "send the original bytes".

use std::collections::HashMap;
use std::io::Write;

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::compress::{ArtifactKey, CompressedArtifact, Encoding};

/// Default minimum payload size worth compressing, in bytes.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 1024;

/// Default flate2 compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

// == Compress Options ==
/// Per-call tuning for the advisor.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Payloads below this size are never compressed
    pub threshold: usize,
    /// flate2 compression level
    pub level: u32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COMPRESSION_THRESHOLD,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

// == Compression Stats ==
/// Diagnostic counters for the advisor.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionStats {
    /// Artifacts currently cached (expired-but-unswept included)
    pub cached_artifacts: usize,
    /// Times the encoder actually ran
    pub compressions_performed: u64,
    /// Times a cached artifact was served instead of recompressing
    pub artifact_hits: u64,
}

// == Compression Advisor ==
/// Size-aware compression with a content-hash-keyed artifact cache.
#[derive(Debug)]
pub struct CompressionAdvisor {
    /// Artifact cache keyed by (content hash, encoding, level)
    artifacts: HashMap<ArtifactKey, CompressedArtifact>,
    /// Lifetime of a cached artifact, in milliseconds
    artifact_ttl_ms: u64,
    /// Times the encoder ran
    compressions_performed: u64,
    /// Times a cached artifact was reused
    artifact_hits: u64,
}

impl CompressionAdvisor {
    // == Constructor ==
    /// Creates an advisor whose cached artifacts live for `artifact_ttl_ms`.
    pub fn new(artifact_ttl_ms: u64) -> Self {
        Self {
            artifacts: HashMap::new(),
            artifact_ttl_ms,
            compressions_performed: 0,
            artifact_hits: 0,
        }
    }

    // == Compress ==
    /// Returns a compressed artifact for `payload`, or `None` when sending
    /// the original is the better (or only) option.
    ///
    /// `None` is returned when the payload is below the threshold, the
    /// client accepts no supported encoding, compression fails, or the
    /// compressed form is not smaller than 90% of the original.
    pub fn compress(
        &mut self,
        payload: &[u8],
        accept_encoding: Option<&str>,
        options: &CompressOptions,
    ) -> Option<CompressedArtifact> {
        if payload.len() < options.threshold {
            return None;
        }

        let encoding = choose_encoding(accept_encoding)?;
        let key = ArtifactKey {
            content_hash: content_hash(payload),
            encoding,
            level: options.level,
        };

        if let Some(artifact) = self.artifacts.get(&key) {
            if !artifact.is_expired(self.artifact_ttl_ms) {
                self.artifact_hits += 1;
                return Some(artifact.clone());
            }
        }

        self.compressions_performed += 1;
        let compressed = encode(payload, encoding, options.level)?;

        // Worthwhileness gate: keep only a >=10% size reduction.
        if compressed.len() * 10 >= payload.len() * 9 {
            debug!(
                original = payload.len(),
                compressed = compressed.len(),
                "compression not worthwhile, sending original"
            );
            return None;
        }

        let artifact = CompressedArtifact::new(compressed, encoding);
        self.artifacts.insert(key, artifact.clone());
        Some(artifact)
    }

    // == Cleanup ==
    /// Removes expired artifacts; run on a fixed background interval.
    /// Returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let ttl = self.artifact_ttl_ms;
        let before = self.artifacts.len();
        self.artifacts.retain(|_, artifact| !artifact.is_expired(ttl));
        let removed = before - self.artifacts.len();

        if removed > 0 {
            debug!(removed, "swept expired compression artifacts");
        }
        removed
    }

    // == Clear ==
    /// Drops every cached artifact.
    pub fn clear(&mut self) {
        self.artifacts.clear();
    }

    // == Stats ==
    /// Diagnostic snapshot of cache size and encoder activity.
    pub fn stats(&self) -> CompressionStats {
        CompressionStats {
            cached_artifacts: self.artifacts.len(),
            compressions_performed: self.compressions_performed,
            artifact_hits: self.artifact_hits,
        }
    }
}

// == Encoding Negotiation ==
/// Picks the most preferred supported algorithm among those the client
/// accepts. Quality parameters are ignored; presence is what counts.
fn choose_encoding(accept_encoding: Option<&str>) -> Option<Encoding> {
    let header = accept_encoding?.to_ascii_lowercase();
    let accepted: Vec<&str> = header
        .split(',')
        .map(|token| token.split(';').next().unwrap_or("").trim())
        .collect();

    Encoding::PREFERENCE_ORDER
        .into_iter()
        .find(|encoding| accepted.contains(&encoding.as_str()))
}

// == Compression Primitive ==
/// Runs the flate2 encoder. Any encoder error degrades to `None`.
fn encode(payload: &[u8], encoding: Encoding, level: u32) -> Option<Vec<u8>> {
    let level = Compression::new(level.min(9));
    let capacity = payload.len() / 2;

    let result = match encoding {
        Encoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::with_capacity(capacity), level);
            encoder.write_all(payload).ok()?;
            encoder.finish()
        }
        Encoding::Deflate => {
            let mut encoder = ZlibEncoder::new(Vec::with_capacity(capacity), level);
            encoder.write_all(payload).ok()?;
            encoder.finish()
        }
    };

    match result {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            debug!(error = %err, "compression failed, sending original");
            None
        }
    }
}

// == Content Hash ==
/// Hex-encoded SHA-256 of the payload, the content-derived half of the key.
fn content_hash(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}
