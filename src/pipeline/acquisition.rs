//! Image acquisition: turns uploaded or captured bytes into an RGB image.
//!
//! Pipeline flow:
//! 1. Pick the source (camera capture replaces an upload when both exist)
//! 2. Validate byte bounds
//! 3. Detect format from magic bytes (JPEG / PNG only)
//! 4. Decode
//! 5. Fix EXIF rotation (phone photos)
//! 6. Convert to RGB (drops alpha)

use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::ImageSource;

/// Maximum accepted image size in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024; // 10 MB

/// Minimum valid image size in bytes (smallest valid PNG is ~67 bytes).
const MIN_IMAGE_BYTES: usize = 67;

/// Longest accepted side in pixels, checked from the header before decoding.
pub const MAX_IMAGE_DIMENSION: u32 = 8192;

/// Decoded pixel budget (a 48 MP phone photo fits).
pub const MAX_IMAGE_PIXELS: u64 = 50_000_000;

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("No image supplied")]
    NoImage,

    #[error("Image data too small to be valid")]
    TooSmall,

    #[error("Image data exceeds {}MB limit", MAX_IMAGE_BYTES / (1024 * 1024))]
    TooLarge,

    #[error("Image dimensions {width}x{height} exceed the {max}px / 50MP limit", max = MAX_IMAGE_DIMENSION)]
    TooLargeDimensions { width: u32, height: u32 },

    #[error("Unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Invalid data URL: {0}")]
    DataUrl(String),
}

/// Leaf photo formats accepted by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafImageFormat {
    Jpeg,
    Png,
}

impl LeafImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Undecoded image bytes plus where they came from.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub source: ImageSource,
    pub bytes: Vec<u8>,
}

impl RawImage {
    pub fn upload(bytes: Vec<u8>) -> Self {
        Self {
            source: ImageSource::Upload,
            bytes,
        }
    }

    pub fn camera(bytes: Vec<u8>) -> Self {
        Self {
            source: ImageSource::Camera,
            bytes,
        }
    }

    /// Camera capture from a `data:image/...;base64,` URL (or bare base64).
    pub fn from_data_url(data_url: &str) -> Result<Self, AcquisitionError> {
        Ok(Self::camera(decode_data_url(data_url)?))
    }
}

/// Decoded, orientation-corrected RGB image ready for classification.
#[derive(Debug)]
pub struct AcquiredImage {
    pub source: ImageSource,
    pub format: LeafImageFormat,
    pub image: RgbImage,
    /// EXIF orientation tag that was applied (1 = none).
    pub orientation: u32,
}

impl AcquiredImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Select the image to analyse. A camera capture takes precedence over an upload.
pub fn choose_source(upload: Option<Vec<u8>>, camera: Option<Vec<u8>>) -> Option<RawImage> {
    let camera = camera.filter(|b| !b.is_empty());
    let upload = upload.filter(|b| !b.is_empty());
    match (camera, upload) {
        (Some(bytes), _) => Some(RawImage::camera(bytes)),
        (None, Some(bytes)) => Some(RawImage::upload(bytes)),
        (None, None) => None,
    }
}

/// Validate, decode and normalize a raw image to RGB.
pub fn acquire(raw: RawImage) -> Result<AcquiredImage, AcquisitionError> {
    validate_image_bytes(&raw.bytes)?;
    let format = detect_format(&raw.bytes).ok_or(AcquisitionError::UnsupportedFormat)?;
    check_dimensions(&raw.bytes, format)?;

    let img = image::load_from_memory(&raw.bytes)
        .map_err(|e| AcquisitionError::Decode(e.to_string()))?;
    let (orig_w, orig_h) = img.dimensions();

    let orientation = read_exif_orientation(&raw.bytes);
    let rgb = apply_orientation(img, orientation).to_rgb8();

    debug!(
        source = raw.source.as_str(),
        format = format.mime_type(),
        original = format!("{orig_w}x{orig_h}"),
        orientation,
        "Leaf image acquired"
    );

    Ok(AcquiredImage {
        source: raw.source,
        format,
        image: rgb,
        orientation,
    })
}

/// Reject empty/truncated or oversized input before decoding.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<(), AcquisitionError> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(AcquisitionError::TooSmall);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AcquisitionError::TooLarge);
    }
    Ok(())
}

/// Read width/height from the header only and reject images whose pixel
/// buffer would be too large to decode.
pub fn check_dimensions(
    bytes: &[u8],
    format: LeafImageFormat,
) -> Result<(u32, u32), AcquisitionError> {
    let image_format = match format {
        LeafImageFormat::Jpeg => ImageFormat::Jpeg,
        LeafImageFormat::Png => ImageFormat::Png,
    };
    let (width, height) = image::io::Reader::with_format(Cursor::new(bytes), image_format)
        .into_dimensions()
        .map_err(|e| AcquisitionError::Decode(e.to_string()))?;

    if width > MAX_IMAGE_DIMENSION
        || height > MAX_IMAGE_DIMENSION
        || width as u64 * height as u64 > MAX_IMAGE_PIXELS
    {
        return Err(AcquisitionError::TooLargeDimensions { width, height });
    }
    Ok((width, height))
}

/// Detect image format from magic bytes. Extensions and MIME headers are ignored.
pub fn detect_format(bytes: &[u8]) -> Option<LeafImageFormat> {
    if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
        Some(LeafImageFormat::Jpeg)
    } else if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
    {
        Some(LeafImageFormat::Png)
    } else {
        None
    }
}

/// Decode a base64 data URL to raw bytes.
///
/// Handles both `data:image/jpeg;base64,...` and raw base64 strings.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, AcquisitionError> {
    let base64_data = match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    };

    base64::engine::general_purpose::STANDARD
        .decode(base64_data.trim())
        .map_err(|e| AcquisitionError::DataUrl(format!("Base64 decode failed: {e}")))
}

/// Read EXIF orientation tag from raw image bytes.
/// Returns 1 (normal) if no EXIF data or tag not present.
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return 1,
    };

    reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

/// Apply EXIF orientation transform to a `DynamicImage`.
///
/// 1 = Normal, 2 = Mirrored, 3 = 180deg, 4 = Flipped V,
/// 5 = Mirrored + 90deg CW, 6 = 90deg CW, 7 = Mirrored + 270deg CW, 8 = 270deg CW
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        1 => img,
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}


#[cfg(test)]
mod tests {
    use super::test_images::*;
    use super::*;

    #[test]
    fn camera_wins_over_upload() {
        let raw = choose_source(Some(vec![1; 10]), Some(vec![2; 10])).unwrap();
        assert_eq!(raw.source, ImageSource::Camera);
        assert_eq!(raw.bytes[0], 2);
    }

    #[test]
    fn upload_used_without_camera() {
        let raw = choose_source(Some(vec![1; 10]), None).unwrap();
        assert_eq!(raw.source, ImageSource::Upload);
    }

    #[test]
    fn empty_parts_count_as_missing() {
        assert!(choose_source(Some(Vec::new()), Some(Vec::new())).is_none());
        let raw = choose_source(Some(vec![1; 10]), Some(Vec::new())).unwrap();
        assert_eq!(raw.source, ImageSource::Upload);
    }

    #[test]
    fn huge_header_rejected_before_decode() {
        let bytes = png_header_only(100_000, 100_000);
        assert!(bytes.len() >= MIN_IMAGE_BYTES && bytes.len() < 200);

        let err = acquire(RawImage::upload(bytes)).unwrap_err();
        assert!(matches!(
            err,
            AcquisitionError::TooLargeDimensions { width: 100_000, height: 100_000 }
        ));
    }

    #[test]
    fn pixel_budget_applies_below_side_limit() {
        let bytes = png_header_only(8000, 8000);
        assert!(matches!(
            check_dimensions(&bytes, LeafImageFormat::Png),
            Err(AcquisitionError::TooLargeDimensions { .. })
        ));
    }

    #[test]
    fn header_dimensions_read_for_normal_photo() {
        assert_eq!(
            check_dimensions(&png_bytes(64, 48), LeafImageFormat::Png).unwrap(),
            (64, 48)
        );
        assert_eq!(
            check_dimensions(&jpeg_bytes(40, 30), LeafImageFormat::Jpeg).unwrap(),
            (40, 30)
        );
    }

    #[test]
    fn detect_format_jpeg() {
        assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(LeafImageFormat::Jpeg));
    }

    #[test]
    fn detect_format_png() {
        assert_eq!(
            detect_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some(LeafImageFormat::Png)
        );
    }

    #[test]
    fn detect_format_rejects_pdf() {
        assert_eq!(detect_format(b"%PDF-1.4"), None);
    }

    #[test]
    fn too_small_rejected() {
        let err = acquire(RawImage::upload(vec![0xFF, 0xD8, 0xFF])).unwrap_err();
        assert!(matches!(err, AcquisitionError::TooSmall));
    }

    #[test]
    fn too_large_rejected() {
        let err = validate_image_bytes(&vec![0u8; MAX_IMAGE_BYTES + 1]).unwrap_err();
        assert!(matches!(err, AcquisitionError::TooLarge));
    }

    #[test]
    fn unknown_magic_rejected() {
        let err = acquire(RawImage::upload(vec![0x42; 200])).unwrap_err();
        assert!(matches!(err, AcquisitionError::UnsupportedFormat));
    }

    #[test]
    fn corrupt_png_fails_decode() {
        let mut bytes = png_bytes(64, 64);
        bytes.truncate(80);
        let err = acquire(RawImage::upload(bytes)).unwrap_err();
        assert!(matches!(err, AcquisitionError::Decode(_)));
    }

    #[test]
    fn acquires_png_upload() {
        let acquired = acquire(RawImage::upload(png_bytes(64, 48))).unwrap();
        assert_eq!(acquired.format, LeafImageFormat::Png);
        assert_eq!((acquired.width(), acquired.height()), (64, 48));
        assert_eq!(acquired.orientation, 1);
    }

    #[test]
    fn acquires_jpeg_capture() {
        let acquired = acquire(RawImage::camera(jpeg_bytes(40, 40))).unwrap();
        assert_eq!(acquired.format, LeafImageFormat::Jpeg);
        assert_eq!(acquired.source, ImageSource::Camera);
    }

    #[test]
    fn alpha_channel_dropped() {
        let acquired = acquire(RawImage::upload(rgba_png_bytes(32, 32))).unwrap();
        assert_eq!(acquired.image.as_raw().len(), 32 * 32 * 3);
    }

    #[test]
    fn orientation_six_rotates_to_portrait() {
        let img = DynamicImage::ImageRgb8(leaf_rgb(8, 4));
        let rotated = apply_orientation(img, 6);
        assert_eq!(rotated.dimensions(), (4, 8));
    }

    #[test]
    fn unknown_orientation_is_noop() {
        let img = DynamicImage::ImageRgb8(leaf_rgb(8, 4));
        assert_eq!(apply_orientation(img, 42).dimensions(), (8, 4));
    }

    #[test]
    fn no_exif_reads_as_normal() {
        assert_eq!(read_exif_orientation(&png_bytes(16, 16)), 1);
    }

    #[test]
    fn data_url_with_prefix() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(32, 32));
        let url = format!("data:image/png;base64,{encoded}");
        let raw = RawImage::from_data_url(&url).unwrap();
        assert_eq!(raw.source, ImageSource::Camera);
        assert_eq!(detect_format(&raw.bytes), Some(LeafImageFormat::Png));
    }

    #[test]
    fn data_url_invalid_base64() {
        let err = decode_data_url("data:image/png;base64,not-valid!!!").unwrap_err();
        assert!(matches!(err, AcquisitionError::DataUrl(_)));
    }
}
