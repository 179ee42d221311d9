//! Text recognition over footer crops.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::EnhanceOptions;

/// Black-box text recognizer: image region in, text lines out.
///
/// Line order carries no meaning for callers. `enhance` selects the
/// preprocessing applied before recognition; `None` recognizes the crop
/// exactly as given. Failures are returned, never retried here; the caller
/// owns the retry policy.
pub trait TextRecognizer {
    fn recognize(
        &self,
        image: &DynamicImage,
        enhance: Option<&EnhanceOptions>,
    ) -> Result<Vec<String>, OcrError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(
        &self,
        image: &DynamicImage,
        enhance: Option<&EnhanceOptions>,
    ) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image, enhance)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(
        &self,
        image: &DynamicImage,
        enhance: Option<&EnhanceOptions>,
    ) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image, enhance)
    }
}
