//! Scanned PDF access using lopdf.

use std::io::Write;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgb};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{ChunkWriter, FooterCrop, FooterSampler, FooterZones, Result};
use crate::error::{PdfError, SplitError};

/// PDF points per inch.
const POINTS_PER_INCH: f64 = 72.0;

/// A loaded source document.
///
/// Scanned documents carry one raster per page; rendering a page decodes
/// that raster and resamples it to the requested DPI.
pub struct PdfDocument {
    document: Document,
    /// Page object ids in page order.
    pages: Vec<ObjectId>,
    zones: FooterZones,
}

impl PdfDocument {
    /// Open a PDF from disk.
    pub fn open(path: &Path) -> std::result::Result<Self, SplitError> {
        if !path.exists() {
            return Err(SplitError::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        Ok(Self::load_mem(&data)?)
    }

    /// Load a PDF from bytes.
    pub fn load_mem(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", pages.len());
        Ok(Self {
            document,
            pages,
            zones: FooterZones::default(),
        })
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Render a 0-based page at the given DPI.
    pub fn render_page(&self, page: usize, dpi: u32) -> Result<DynamicImage> {
        let page_id = *self.pages.get(page).ok_or(PdfError::InvalidPage(page))?;

        let raster = self.page_raster(page_id).ok_or_else(|| {
            PdfError::ImageExtraction(format!("no decodable image on page {}", page + 1))
        })?;

        let Some((width_pt, height_pt)) = self.media_box(page_id) else {
            trace!("Page {} has no MediaBox, using native raster size", page + 1);
            return Ok(raster);
        };

        let scale = f64::from(dpi) / POINTS_PER_INCH;
        let width = ((width_pt * scale).round() as u32).max(1);
        let height = ((height_pt * scale).round() as u32).max(1);

        if raster.dimensions() == (width, height) {
            return Ok(raster);
        }

        trace!(
            "Resampling page {} raster {:?} -> {}x{}",
            page + 1,
            raster.dimensions(),
            width,
            height
        );
        Ok(raster.resize_exact(width, height, FilterType::Triangle))
    }

    /// Copy of the document holding only pages `start..=end`.
    pub fn extract_range(&self, start: usize, end: usize) -> Result<Document> {
        if start > end {
            return Err(PdfError::Write(format!("empty range {}..={}", start, end)));
        }
        if end >= self.pages.len() {
            return Err(PdfError::InvalidPage(end));
        }

        let mut document = self.document.clone();
        let drop: Vec<u32> = (1..=self.pages.len() as u32)
            .filter(|n| {
                let idx = (*n - 1) as usize;
                idx < start || idx > end
            })
            .collect();

        document.delete_pages(&drop);
        document.prune_objects();
        Ok(document)
    }

    /// Largest decodable image XObject on the page.
    fn page_raster(&self, page_id: ObjectId) -> Option<DynamicImage> {
        let doc = &self.document;
        let resources = self.inherited_entry(page_id, b"Resources")?;
        let resources = match doc.dereference(&resources) {
            Ok((_, Object::Dictionary(dict))) => dict.clone(),
            _ => return None,
        };

        let xobjects = match doc.dereference(resources.get(b"XObject").ok()?) {
            Ok((_, Object::Dictionary(dict))) => dict.clone(),
            _ => return None,
        };

        xobjects
            .iter()
            .filter_map(|(_, obj_ref)| doc.dereference(obj_ref).ok())
            .filter_map(|(_, obj)| self.decode_image(obj))
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height()))
    }

    fn decode_image(&self, obj: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = obj else {
            return None;
        };
        let dict = &stream.dict;

        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

        let filter = dict.get(b"Filter").ok().and_then(|f| match f {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.last().and_then(|o| o.as_name().ok()),
            _ => None,
        });

        match filter {
            Some(b"DCTDecode") => {
                trace!("Decoding JPEG page image {}x{}", width, height);
                return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                    .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported page image filter {:?}", filter.map(String::from_utf8_lossy));
                return None;
            }
            _ => {}
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.clone()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()).map(<[u8]>::to_vec),
                Object::Reference(r) => self
                    .document
                    .get_object(*r)
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(<[u8]>::to_vec),
                _ => None,
            })
            .unwrap_or_else(|| b"DeviceRGB".to_vec());

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);

        raw_to_image(&data, width, height, &color_space, bits)
    }

    /// Page width and height in points.
    fn media_box(&self, page_id: ObjectId) -> Option<(f64, f64)> {
        let media_box = self.inherited_entry(page_id, b"MediaBox")?;
        let values = match self.document.dereference(&media_box) {
            Ok((_, Object::Array(arr))) => arr.clone(),
            _ => return None,
        };

        let nums: Vec<f64> = values.iter().filter_map(number).collect();
        if nums.len() != 4 {
            return None;
        }
        let width = (nums[2] - nums[0]).abs();
        let height = (nums[3] - nums[1]).abs();
        (width > 0.0 && height > 0.0).then_some((width, height))
    }

    /// Look up a page attribute, following the Parent chain.
    fn inherited_entry(&self, node_id: ObjectId, key: &[u8]) -> Option<Object> {
        let dict: &Dictionary = self.document.get_dictionary(node_id).ok()?;

        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.inherited_entry(*parent_id, key),
            _ => None,
        }
    }
}

impl FooterSampler for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn sample(&self, page: usize, dpi: u32, bottom_fraction: f64) -> Result<FooterCrop> {
        let image = self.render_page(page, dpi)?;
        Ok(self.zones.crop(&image, bottom_fraction))
    }
}

impl ChunkWriter for PdfDocument {
    fn write_chunk(&self, start: usize, end: usize, dest: &Path) -> Result<()> {
        let mut document = self.extract_range(start, end)?;

        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Stage next to the destination so the final rename stays on one filesystem.
        let mut staged =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| PdfError::Write(e.to_string()))?;
        document
            .save_to(&mut staged)
            .map_err(|e| PdfError::Write(e.to_string()))?;
        staged.flush().map_err(|e| PdfError::Write(e.to_string()))?;
        staged
            .persist(dest)
            .map_err(|e| PdfError::Write(e.error.to_string()))?;

        debug!(
            "Wrote pages {}-{} to {}",
            start + 1,
            end + 1,
            dest.display()
        );
        Ok(())
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn raw_to_image(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: i64,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let pixels = width as usize * height as usize;

    match color_space {
        b"DeviceRGB" | b"RGB" | b"CalRGB" if data.len() >= pixels * 3 => {
            ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data[..pixels * 3].to_vec())
                .map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" | b"CalGray" if data.len() >= pixels => {
            ImageBuffer::<Luma<u8>, _>::from_raw(width, height, data[..pixels].to_vec())
                .map(DynamicImage::ImageLuma8)
        }
        _ => {
            trace!(
                "Could not decode image: data_len={}, colorspace={:?}",
                data.len(),
                String::from_utf8_lossy(color_space)
            );
            None
        }
    }
}

/// In-memory scanned PDFs for tests: one gray raster per page.
#[cfg(test)]
pub(crate) mod synthetic {
    use lopdf::content::Content;
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF whose page `i` is a 72x72 pt page holding a 10x10
    /// gray image filled with `shade(i)`.
    pub fn scanned_pdf(pages: usize, shade: impl Fn(usize) -> u8) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(pages);
        for i in 0..pages {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 10,
                    "Height" => 10,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![shade(i); 100],
            );
            let image_id = doc.add_object(image);

            let content = Content { operations: vec![] };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap_or_default(),
            ));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
                "MediaBox" => vec![0.into(), 0.into(), 72.into(), 72.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save synthetic pdf");
        out
    }
}
