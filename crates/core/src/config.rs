use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::annotation::domain::annotation_smoother::MaxAge;
use crate::annotation::domain::annotation_validator::MinFaceSizeValidator;
use crate::selection::domain::frame_selector::FrameSelector;
use crate::shared::constants::{DEFAULT_FAIL_SAFE_MAX_AGE, DEFAULT_MIN_FACE_SIZE};
use crate::shared::error::VideoError;
use crate::storage::domain::container_encoding::ContainerEncoding;

/// Annotation smoothing and fail-safe settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// `null` keeps carrying the last valid annotation forever.
    pub max_age: MaxAge,
    pub fail_safe_max_age: usize,
    pub min_face_size: f64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            max_age: MaxAge::Infinite,
            fail_safe_max_age: DEFAULT_FAIL_SAFE_MAX_AGE,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
        }
    }
}

/// Settings shared by the video adapters and the CLI.
///
/// Every field is optional in the JSON file; missing fields take their
/// default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub frame_selector: FrameSelector,
    pub encoding: ContainerEncoding,
    pub annotation: AnnotationConfig,
}

impl VideoConfig {
    /// Per-user configuration file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vidbio").join("config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self, VideoError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, VideoError> {
        let json = fs::read_to_string(path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_json(&json)
    }

    /// Loads `path` if given, else the per-user file if it exists, else
    /// the defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, VideoError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), VideoError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), VideoError> {
        self.frame_selector.validate()?;
        if self.annotation.fail_safe_max_age == 0 {
            return Err(VideoError::InvalidMaxAge(
                "fail_safe_max_age must be at least 1".to_string(),
            ));
        }
        let min_face_size = self.annotation.min_face_size;
        if min_face_size.is_nan() || min_face_size < 0.0 {
            return Err(VideoError::Precondition(format!(
                "min_face_size must be a non-negative number, got {min_face_size}"
            )));
        }
        Ok(())
    }

    pub fn validator(&self) -> MinFaceSizeValidator {
        MinFaceSizeValidator::new(self.annotation.min_face_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = VideoConfig::from_json("{}").unwrap();
        assert_eq!(config, VideoConfig::default());
        assert_eq!(
            config.frame_selector,
            FrameSelector::Spread { max_frames: 20 }
        );
        assert_eq!(config.annotation.max_age, MaxAge::Infinite);
        assert_eq!(config.annotation.fail_safe_max_age, 20);
        assert_relative_eq!(config.validator().min_face_size(), 32.0);
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let json = r#"{
            "frame_selector": {"style": "step", "step": 5},
            "encoding": "compressed",
            "annotation": {"max_age": 3}
        }"#;
        let config = VideoConfig::from_json(json).unwrap();

        assert_eq!(
            config.frame_selector,
            FrameSelector::Step {
                step: 5,
                max_frames: None
            }
        );
        assert_eq!(config.encoding, ContainerEncoding::Compressed);
        assert_eq!(config.annotation.max_age, MaxAge::Frames(3));
        assert_eq!(config.annotation.fail_safe_max_age, 20);
    }

    #[test]
    fn test_null_max_age_is_infinite() {
        let config = VideoConfig::from_json(r#"{"annotation": {"max_age": null}}"#).unwrap();
        assert_eq!(config.annotation.max_age, MaxAge::Infinite);
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let err = VideoConfig::from_json(r#"{"frame_selector": {"style": "step", "step": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, VideoError::InvalidSelector(_)));
    }

    #[test]
    fn test_zero_fail_safe_age_is_rejected() {
        let err = VideoConfig::from_json(r#"{"annotation": {"fail_safe_max_age": 0}}"#).unwrap_err();
        assert!(matches!(err, VideoError::InvalidMaxAge(_)));
    }

    #[test]
    fn test_negative_face_size_is_rejected() {
        let err = VideoConfig::from_json(r#"{"annotation": {"min_face_size": -1.0}}"#).unwrap_err();
        assert!(matches!(err, VideoError::Precondition(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = VideoConfig::from_json("{").unwrap_err();
        assert!(matches!(err, VideoError::Json(_)));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let config = VideoConfig {
            frame_selector: FrameSelector::TopQuality { count: 4 },
            encoding: ContainerEncoding::Compressed,
            annotation: AnnotationConfig {
                max_age: MaxAge::Frames(7),
                fail_safe_max_age: 2,
                min_face_size: 48.0,
            },
        };

        config.save(&path).unwrap();

        assert_eq!(VideoConfig::load(&path).unwrap(), config);
        assert_eq!(VideoConfig::resolve(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let absent = tmp.path().join("absent.json");
        let err = VideoConfig::resolve(Some(absent.as_path())).unwrap_err();
        assert!(matches!(err, VideoError::Io(_)));
    }
}
