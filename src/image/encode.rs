//! Raster re-encoding to WebP or AVIF.
//!
//! WebP goes through the `image` crate (lossless), AVIF through `ravif`.
//! Both encoders are deterministic, so the derived bytes hash the same on
//! every run and the content-addressed path is stable.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use ravif::{Encoder, Img, RGBA8};

use crate::asset::{AssetError, ContentHash, Transformer, split_name};
use crate::config::{ImageFormat, ImagesConfig};

/// Re-encode a PNG/JPEG source, optionally resized to a fixed width.
///
/// Output names: `<stem>.<hash>.<fmt>`, or `<stem>_<width>x.<hash>.<fmt>`
/// for width variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTarget {
    pub format: ImageFormat,
    pub quality: u8,
    pub speed: u8,
    pub width: Option<u32>,
}

impl ImageTarget {
    pub fn from_config(config: &ImagesConfig) -> Self {
        Self {
            format: config.format,
            quality: config.quality,
            speed: config.speed,
            width: None,
        }
    }

    /// Same target, resized to `width` pixels wide.
    pub const fn with_width(self, width: u32) -> Self {
        Self {
            width: Some(width),
            ..self
        }
    }
}

impl Transformer for ImageTarget {
    fn name(&self) -> &'static str {
        "images"
    }

    fn apply(&self, source: &Path, bytes: &[u8]) -> Result<Vec<u8>, AssetError> {
        let img = decode(source, bytes)?;
        let img = match self.width {
            Some(width) => resize_to_width(&img, width),
            None => img,
        };
        encode(&img, self.format, self.quality, self.speed)
            .map_err(|reason| AssetError::transform(source, reason))
    }

    fn file_name(&self, source: &Path, hash: &ContentHash) -> String {
        let (stem, _) = split_name(source);
        let ext = self.format.extension();
        match self.width {
            Some(width) => format!("{stem}_{width}x.{}.{ext}", hash.to_hex()),
            None => format!("{stem}.{}.{ext}", hash.to_hex()),
        }
    }
}

/// Decode PNG or JPEG bytes.
pub fn decode(source: &Path, bytes: &[u8]) -> Result<DynamicImage, AssetError> {
    image::load_from_memory(bytes).map_err(|err| AssetError::transform(source, err))
}

/// Resize to `width`, keeping the aspect ratio.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    let ratio = f64::from(img.height()) / f64::from(img.width().max(1));
    let height = (f64::from(width) * ratio).round().max(1.0) as u32;
    img.resize_exact(width, height, FilterType::CatmullRom)
}

/// Encode into the target format.
pub fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    speed: u8,
) -> Result<Vec<u8>, String> {
    match format {
        ImageFormat::Webp => encode_webp(img),
        ImageFormat::Avif => encode_avif(img, quality, speed),
    }
}

fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>, String> {
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let mut buf = Cursor::new(Vec::new());
    rgba.write_to(&mut buf, image::ImageFormat::WebP)
        .map_err(|e| e.to_string())?;
    Ok(buf.into_inner())
}

fn encode_avif(img: &DynamicImage, quality: u8, speed: u8) -> Result<Vec<u8>, String> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels: Vec<RGBA8> = rgba
        .pixels()
        .map(|p| RGBA8::new(p[0], p[1], p[2], p[3]))
        .collect();

    let encoded = Encoder::new()
        .with_quality(f32::from(quality))
        .with_speed(speed)
        .encode_rgba(Img::new(pixels.as_slice(), width as usize, height as usize))
        .map_err(|e| e.to_string())?;
    Ok(encoded.avif_file)
}

/// Encode as baseline JPEG (alpha dropped).
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, String> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

/// Encode as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, String> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(buf.into_inner())
}
