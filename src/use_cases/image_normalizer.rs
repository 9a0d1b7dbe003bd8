// Photo normalization: bound the longest side, re-encode as JPEG, wrap as a data URL.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};
use std::io::Cursor;

use crate::domain::GuestError;

/// Default bounding box side for stored photos.
pub const DEFAULT_MAX_SIDE: u32 = 800;
/// Default JPEG quality (0.7 on a 0..1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// A photo ready to be embedded in a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPhoto {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Resize and encode settings.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    pub max_side: u32,
    pub quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageNormalizer {
    /// Normalizes raw upload bytes on the blocking pool.
    pub async fn normalize(&self, bytes: Vec<u8>) -> Result<NormalizedPhoto, GuestError> {
        let settings = *self;
        tokio::task::spawn_blocking(move || settings.normalize_blocking(&bytes))
            .await
            .map_err(|err| GuestError::Decode(format!("normalizer task failed: {err}")))?
    }

    /// Synchronous decode → resize → encode pipeline.
    pub fn normalize_blocking(&self, bytes: &[u8]) -> Result<NormalizedPhoto, GuestError> {
        let (decoded, orientation) = decode_with_orientation(bytes)?;
        self.normalize_image(decoded, orientation)
    }

    fn normalize_image(
        &self,
        mut decoded: DynamicImage,
        orientation: Orientation,
    ) -> Result<NormalizedPhoto, GuestError> {
        // Camera photos keep sensor pixel order and record the rotation in EXIF;
        // bound the upright image, not the stored one.
        decoded.apply_orientation(orientation);

        let (width, height) = target_dimensions(decoded.width(), decoded.height(), self.max_side);
        let resized = if (width, height) == (decoded.width(), decoded.height()) {
            decoded
        } else {
            decoded.resize_exact(width, height, FilterType::Triangle)
        };

        let jpeg = encode_jpeg(&resized, self.quality)?;
        Ok(NormalizedPhoto {
            data_url: format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)),
            width,
            height,
        })
    }
}

/// Target size for a `width`×`height` image bounded by `max_side`.
///
/// The longest side is scaled down to `max_side` and the other side follows
/// the same ratio, rounded to the nearest pixel. Square images take the same
/// path as landscape ones. Nothing is ever scaled up.
pub fn target_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side {
        return (width, height);
    }

    let scale = f64::from(max_side) / f64::from(longest);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);

    if width >= height {
        (max_side, scaled(height))
    } else {
        (scaled(width), max_side)
    }
}

fn decode_with_orientation(bytes: &[u8]) -> Result<(DynamicImage, Orientation), GuestError> {
    let decode_err = |err: ImageError| GuestError::Decode(err.to_string());

    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| GuestError::Decode(err.to_string()))?
        .into_decoder()
        .map_err(decode_err)?;
    // Unreadable EXIF is not fatal; the pixels are still usable as stored.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    Ok((image, orientation))
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, GuestError> {
    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(|err| GuestError::Decode(format!("jpeg encode failed: {err}")))?;
    Ok(buf)
}
