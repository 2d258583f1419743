//! Application configuration document.
//!
//! The configuration is a JSON object; only its `watermark` key matters
//! here. Other keys (upload settings and the like) are ignored.
//!
//! ```json
//! {
//!   "watermark": {
//!     "text": "© example",
//!     "size": 24,
//!     "color": "#FFF",
//!     "position": "RightBottom",
//!     "angle": 0
//!   }
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::engine::WatermarkSpec;
use crate::error::Result;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// The watermark to apply, if any.
    #[serde(default)]
    pub watermark: Option<WatermarkSpec>,
}

impl AppConfig {
    /// Parse a configuration document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed JSON or
    /// an unknown position name.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The watermark spec, when one is present and has text.
    #[must_use]
    pub fn enabled_watermark(&self) -> Option<&WatermarkSpec> {
        self.watermark.as_ref().filter(|spec| spec.is_enabled())
    }
}

/// Read and parse the configuration file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read and
/// [`Error::Config`](crate::Error::Config) if it does not parse.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = AppConfig::from_json(&json)?;
    log::debug!(
        "loaded config from {}: watermark {}",
        path.display(),
        if config.enabled_watermark().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::position::Position;

    #[test]
    fn parses_watermark_and_ignores_other_keys() {
        let json = r##"{
            "token": "secret",
            "repo": "pics",
            "watermark": {"text": "mine", "color": "#0f0", "position": "Full", "angle": 30}
        }"##;
        let config = AppConfig::from_json(json).unwrap();
        let spec = config.enabled_watermark().unwrap();
        assert_eq!(spec.text, "mine");
        assert_eq!(spec.color, "#0f0");
        assert_eq!(spec.position, Some(Position::Full));
    }

    #[test]
    fn missing_or_empty_watermark_is_disabled() {
        assert!(AppConfig::from_json("{}").unwrap().enabled_watermark().is_none());
        assert!(AppConfig::from_json(r#"{"watermark": null}"#)
            .unwrap()
            .enabled_watermark()
            .is_none());
        let config = AppConfig::from_json(r#"{"watermark": {"text": ""}}"#).unwrap();
        assert!(config.watermark.is_some());
        assert!(config.enabled_watermark().is_none());
    }

    #[test]
    fn unknown_position_is_a_config_error() {
        let err = AppConfig::from_json(r#"{"watermark": {"text": "a", "position": "Top"}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"watermark": {"text": "file", "x": 5, "y": 6}}"#).unwrap();

        let config = load_config(&path).unwrap();
        let spec = config.enabled_watermark().unwrap();
        assert_eq!((spec.x, spec.y), (5, 6));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
