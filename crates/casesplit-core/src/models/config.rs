//! Configuration structures for a split run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SplitError;

/// Main configuration for the casesplit pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Footer sampling and detection settings.
    pub scan: ScanConfig,

    /// Image enhancement applied before recognition.
    pub enhance: EnhanceOptions,

    /// Model configuration.
    pub models: ModelConfig,

    /// Output naming and reporting.
    pub output: OutputConfig,
}

/// Footer sampling and detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// DPI for rasterizing pages.
    pub dpi: u32,

    /// Height of the footer band as a fraction of the page height.
    pub bottom_fraction: f64,

    /// Minimum fuzzy score (0 - 100) for a case-number line.
    pub case_threshold: u8,

    /// Minimum fuzzy score (0 - 100) for a page-counter line.
    pub counter_threshold: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            bottom_fraction: 0.10,
            case_threshold: 70,
            counter_threshold: 70,
        }
    }
}

/// Enhancement options passed to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceOptions {
    /// Resize factor applied before recognition.
    pub upscale: f32,

    /// Sharpen strength; 1.0 disables sharpening.
    pub sharpen: f32,

    /// Contrast factor; 1.0 leaves contrast untouched.
    pub contrast: f32,

    /// Apply a median filter before thresholding.
    pub denoise: bool,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            upscale: 1.5,
            sharpen: 1.5,
            contrast: 1.2,
            denoise: true,
        }
    }
}

impl EnhanceOptions {
    /// Same options with a different upscale factor.
    pub fn with_upscale(mut self, upscale: f32) -> Self {
        self.upscale = upscale;
        self
    }
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Get full path to a model file.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }
}

/// Output naming and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension appended to every chunk label.
    pub extension: String,

    /// File name of the summary table inside the output folder.
    pub summary_file: String,

    /// Write a per-run log file under `<output>/logs`.
    pub write_logs: bool,

    /// Output folder used when none is given on the command line.
    pub default_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: ".pdf".to_string(),
            summary_file: "summary.csv".to_string(),
            write_logs: true,
            default_dir: None,
        }
    }
}

impl SplitConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.scan.dpi == 0 {
            return Err(SplitError::Config("scan.dpi must be positive".to_string()));
        }
        if !(self.scan.bottom_fraction > 0.0 && self.scan.bottom_fraction <= 1.0) {
            return Err(SplitError::Config(format!(
                "scan.bottom_fraction must be in (0, 1], got {}",
                self.scan.bottom_fraction
            )));
        }
        if self.scan.case_threshold > 100 || self.scan.counter_threshold > 100 {
            return Err(SplitError::Config(
                "detection thresholds must be between 0 and 100".to_string(),
            ));
        }
        if !(self.enhance.upscale > 0.0) {
            return Err(SplitError::Config(format!(
                "enhance.upscale must be positive, got {}",
                self.enhance.upscale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = SplitConfig::default();
        assert_eq!(config.scan.dpi, 200);
        assert!((config.scan.bottom_fraction - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.enhance, EnhanceOptions {
            upscale: 1.5,
            sharpen: 1.5,
            contrast: 1.2,
            denoise: true,
        });
        assert_eq!(config.output.extension, ".pdf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SplitConfig =
            serde_json::from_str(r#"{"scan": {"dpi": 300}, "enhance": {"denoise": false}}"#)
                .unwrap();
        assert_eq!(config.scan.dpi, 300);
        assert_eq!(config.scan.case_threshold, 70);
        assert!(!config.enhance.denoise);
        assert!((config.enhance.upscale - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SplitConfig::default();
        config.scan.bottom_fraction = 0.0;
        assert!(config.validate().is_err());

        let mut config = SplitConfig::default();
        config.scan.dpi = 0;
        assert!(config.validate().is_err());

        let mut config = SplitConfig::default();
        config.scan.counter_threshold = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SplitConfig::default();
        config.scan.dpi = 150;
        config.save(&path).unwrap();

        let loaded = SplitConfig::from_file(&path).unwrap();
        assert_eq!(loaded.scan.dpi, 150);
    }
}
