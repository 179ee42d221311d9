//! Image enhancement applied to footer crops before recognition.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::EnhanceOptions;

/// Image preprocessor for small, printed footer regions.
pub struct ImagePreprocessor {
    /// Side of the square neighbourhood used for adaptive thresholding.
    threshold_block: u32,
    /// Constant subtracted from the local mean.
    threshold_c: i32,
    /// Unsharp-mask blur radius.
    sharpen_radius: f32,
    /// Unsharp-mask minimum difference.
    sharpen_threshold: i32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            threshold_block: 31,
            threshold_c: 10,
            sharpen_radius: 1.0,
            sharpen_threshold: 2,
        }
    }

    /// Upscale, grayscale, contrast, sharpen, denoise and binarize.
    pub fn enhance(
        &self,
        image: &DynamicImage,
        options: &EnhanceOptions,
    ) -> Result<DynamicImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "empty crop {}x{}",
                width, height
            )));
        }
        if !(options.upscale.is_finite() && options.upscale > 0.0) {
            return Err(OcrError::Preprocessing(format!(
                "invalid upscale factor {}",
                options.upscale
            )));
        }

        // 1) Upscale (bicubic)
        let scaled = if (options.upscale - 1.0).abs() > f32::EPSILON {
            let new_width = ((width as f32 * options.upscale) as u32).max(1);
            let new_height = ((height as f32 * options.upscale) as u32).max(1);
            image.resize_exact(new_width, new_height, FilterType::CatmullRom)
        } else {
            image.clone()
        };

        // 2) Grayscale
        let mut gray = scaled.to_luma8();

        // 3) Contrast
        if (options.contrast - 1.0).abs() > f32::EPSILON {
            gray = self.adjust_contrast(&gray, options.contrast);
        }

        // 4) Sharpen
        if options.sharpen > 0.0 && (options.sharpen - 1.0).abs() > f32::EPSILON {
            let percent = ((options.sharpen - 1.0) * 150.0).max(0.0) as i32;
            gray = if percent <= 0 {
                self.sharpen_kernel(&gray)
            } else {
                self.unsharp_mask(&gray, percent)
            };
        }

        // 5) Denoise and binarize
        if options.denoise {
            gray = self.median3(&gray);
        }
        let binary = self.adaptive_threshold(&gray);

        debug!(
            "Enhanced crop {}x{} -> {}x{}",
            width,
            height,
            binary.width(),
            binary.height()
        );

        Ok(DynamicImage::ImageLuma8(binary))
    }

    /// Scale pixel distance from the image mean by `factor`.
    fn adjust_contrast(&self, image: &GrayImage, factor: f32) -> GrayImage {
        let count = (image.width() as u64 * image.height() as u64).max(1);
        let sum: u64 = image.pixels().map(|p| p[0] as u64).sum();
        let mean = (sum as f32 / count as f32).round();

        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            let value = mean + factor * (pixel[0] as f32 - mean);
            pixel[0] = value.round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    fn sharpen_kernel(&self, image: &GrayImage) -> GrayImage {
        let kernel = [
            -0.125, -0.125, -0.125, //
            -0.125, 2.0, -0.125, //
            -0.125, -0.125, -0.125,
        ];
        imageops::filter3x3(image, &kernel)
    }

    fn unsharp_mask(&self, image: &GrayImage, percent: i32) -> GrayImage {
        let blurred = imageops::blur(image, self.sharpen_radius);
        let mut out = image.clone();

        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let original = pixel[0] as i32;
            let diff = original - blurred.get_pixel(x, y)[0] as i32;
            if diff.abs() >= self.sharpen_threshold {
                let value = original + diff * percent / 100;
                pixel[0] = value.clamp(0, 255) as u8;
            }
        }
        out
    }

    /// 3x3 median filter; edges use the clamped neighbourhood.
    fn median3(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut out = GrayImage::new(width, height);
        let mut window = Vec::with_capacity(9);

        for y in 0..height {
            for x in 0..width {
                window.clear();
                for ny in y.saturating_sub(1)..(y + 2).min(height) {
                    for nx in x.saturating_sub(1)..(x + 2).min(width) {
                        window.push(image.get_pixel(nx, ny)[0]);
                    }
                }
                window.sort_unstable();
                out.put_pixel(x, y, Luma([window[window.len() / 2]]));
            }
        }
        out
    }

    /// Local-mean threshold using an integral image.
    fn adaptive_threshold(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let (w, h) = (width as usize, height as usize);

        // (w + 1) x (h + 1) summed-area table
        let mut integral = vec![0u64; (w + 1) * (h + 1)];
        for y in 0..h {
            let mut row_sum = 0u64;
            for x in 0..w {
                row_sum += image.get_pixel(x as u32, y as u32)[0] as u64;
                integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
            }
        }

        let half = (self.threshold_block / 2) as usize;
        let mut result = GrayImage::new(width, height);

        for y in 0..h {
            let y0 = y.saturating_sub(half);
            let y1 = (y + half + 1).min(h);
            for x in 0..w {
                let x0 = x.saturating_sub(half);
                let x1 = (x + half + 1).min(w);

                let sum = integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
                    - integral[y0 * (w + 1) + x1]
                    - integral[y1 * (w + 1) + x0];
                let count = ((y1 - y0) * (x1 - x0)) as u64;

                let mean = (sum / count) as i32;
                let pixel_value = image.get_pixel(x as u32, y as u32)[0] as i32;
                let output = if pixel_value > mean - self.threshold_c { 255 } else { 0 };
                result.put_pixel(x as u32, y as u32, Luma([output]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}
