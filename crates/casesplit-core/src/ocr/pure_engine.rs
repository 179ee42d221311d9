//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{EnhanceOptions, ModelConfig};

use super::{ImagePreprocessor, TextRecognizer};

/// Token emitted by the recognizer for characters outside its dictionary.
const UNKNOWN_TOKEN: &str = "[UNK]";

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// One instance is created per run and handed to the scanner.
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    preprocessor: ImagePreprocessor,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in `models`.
    pub fn from_config(models: &ModelConfig) -> Result<Self, OcrError> {
        let det_path = models.path(&models.detection_model);
        let rec_path = models.path(&models.recognition_model);
        let dict_path = models.path(&models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", models.model_dir.display());

        Ok(Self {
            engine,
            preprocessor: ImagePreprocessor::new(),
        })
    }

    fn run(&self, image: &DynamicImage) -> Result<Vec<String>, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        // Reading order: rows top to bottom, then left to right.
        let mut lines: Vec<(f64, f64, String)> = results
            .iter()
            .filter_map(|r| {
                let text = r.text.replace(UNKNOWN_TOKEN, " ").trim().to_string();
                if text.is_empty() {
                    return None;
                }
                let (x, y) = top_left(&r.bounding_box);
                Some((x, y, text))
            })
            .collect();

        lines.sort_by(|a, b| {
            let row_a = (a.1 / 20.0) as i64;
            let row_b = (b.1 / 20.0) as i64;
            row_a
                .cmp(&row_b)
                .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        });

        debug!(
            "Recognized {} lines on {}x{} crop in {}ms",
            lines.len(),
            width,
            height,
            start.elapsed().as_millis()
        );

        Ok(lines.into_iter().map(|(_, _, text)| text).collect())
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(
        &self,
        image: &DynamicImage,
        enhance: Option<&EnhanceOptions>,
    ) -> Result<Vec<String>, OcrError> {
        match enhance {
            Some(options) => {
                let prepared = self.preprocessor.enhance(image, options)?;
                self.run(&prepared)
            }
            None => self.run(image),
        }
    }
}

/// Smallest x and y of the detected polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| (x.min(c.x), y.min(c.y)))
}
