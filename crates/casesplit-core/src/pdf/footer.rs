//! Footer band geometry.

use image::{DynamicImage, GenericImageView};

/// Rectangle given as fractions of the footer band's width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl ZoneRect {
    fn crop(&self, footer: &DynamicImage) -> DynamicImage {
        let (width, height) = footer.dimensions();
        let x0 = (width as f64 * self.x0) as u32;
        let x1 = (width as f64 * self.x1) as u32;
        let y0 = (height as f64 * self.y0) as u32;
        let y1 = (height as f64 * self.y1) as u32;
        footer.crop_imm(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Where the case number and the page counter are printed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FooterZones {
    /// Left zone holding the case number.
    pub case_zone: ZoneRect,
    /// Right zone holding "Page N of M".
    pub counter_zone: ZoneRect,
}

impl Default for FooterZones {
    fn default() -> Self {
        Self {
            case_zone: ZoneRect {
                x0: 0.10,
                x1: 0.35,
                y0: 0.20,
                y1: 0.60,
            },
            counter_zone: ZoneRect {
                x0: 0.80,
                x1: 0.95,
                y0: 0.05,
                y1: 0.35,
            },
        }
    }
}

/// The two crops read from one page.
#[derive(Debug, Clone)]
pub struct FooterCrop {
    pub case_zone: DynamicImage,
    pub counter_zone: DynamicImage,
}

impl FooterZones {
    /// Cut the bottom `bottom_fraction` of the page, then both zones from it.
    pub fn crop(&self, page: &DynamicImage, bottom_fraction: f64) -> FooterCrop {
        let (width, height) = page.dimensions();
        let top = (height as f64 * (1.0 - bottom_fraction)) as u32;
        let top = top.min(height);
        let footer = page.crop_imm(0, top, width, height - top);

        FooterCrop {
            case_zone: self.case_zone.crop(&footer),
            counter_zone: self.counter_zone.crop(&footer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_zone_sizes_letter_page_at_200_dpi() {
        let page = DynamicImage::ImageLuma8(GrayImage::new(1700, 2200));
        let crop = FooterZones::default().crop(&page, 0.10);

        // Footer band is 1700x220.
        assert_eq!(crop.case_zone.dimensions(), (425, 88));
        assert_eq!(crop.counter_zone.dimensions(), (255, 66));
    }

    #[test]
    fn test_zones_come_from_footer_band() {
        // Top 90% black, footer white.
        let page = GrayImage::from_fn(100, 100, |_, y| if y < 90 { Luma([0]) } else { Luma([255]) });
        let crop = FooterZones::default().crop(&DynamicImage::ImageLuma8(page), 0.10);

        assert!(crop.case_zone.to_luma8().pixels().all(|p| p[0] == 255));
        assert!(crop.counter_zone.to_luma8().pixels().all(|p| p[0] == 255));
    }
}
