//! Compression Module
//!
//! Size-aware response-compression advice with a content-hash artifact cache.

mod advisor;
mod artifact;

// Re-export public types
pub use advisor::{
    CompressOptions, CompressionAdvisor, CompressionStats, DEFAULT_COMPRESSION_LEVEL,
    DEFAULT_COMPRESSION_THRESHOLD,
};
pub use artifact::{ArtifactKey, CompressedArtifact, Encoding};
