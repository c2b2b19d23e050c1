//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for targeted invalidation (POST /admin/invalidate)
///
/// # Fields
/// - `cache`: which cache instance to act on ("api", "content", "user")
/// - exactly one of `key`, `tag`, `pattern` selects what to remove
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Cache instance name
    pub cache: String,
    /// Remove exactly this key
    #[serde(default)]
    pub key: Option<String>,
    /// Remove every entry carrying this tag
    #[serde(default)]
    pub tag: Option<String>,
    /// Remove every entry whose key matches this regex
    #[serde(default)]
    pub pattern: Option<String>,
}

impl InvalidateRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.cache.is_empty() {
            return Some("Cache name cannot be empty".to_string());
        }

        let selectors = [
            self.key.is_some(),
            self.tag.is_some(),
            self.pattern.is_some(),
        ]
        .iter()
        .filter(|s| **s)
        .count();

        if selectors != 1 {
            return Some("Exactly one of key, tag or pattern is required".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_request_deserialize() {
        let json = r#"{"cache": "api", "tag": "reviews"}"#;
        let req: InvalidateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.cache, "api");
        assert_eq!(req.tag.as_deref(), Some("reviews"));
        assert!(req.key.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_requires_one_selector() {
        let none: InvalidateRequest = serde_json::from_str(r#"{"cache": "api"}"#).unwrap();
        assert!(none.validate().is_some());

        let two: InvalidateRequest =
            serde_json::from_str(r#"{"cache": "api", "key": "a", "tag": "b"}"#).unwrap();
        assert!(two.validate().is_some());
    }

    #[test]
    fn test_validate_empty_cache_name() {
        let req: InvalidateRequest =
            serde_json::from_str(r#"{"cache": "", "key": "a"}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_pattern_selector() {
        let req: InvalidateRequest =
            serde_json::from_str(r#"{"cache": "user", "pattern": "^user:\\d+"}"#).unwrap();
        assert!(req.validate().is_none());
    }
}
