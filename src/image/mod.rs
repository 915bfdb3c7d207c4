//! Image attachment pipeline.
//!
//! Images are stored inline on the entry as a `data:` URL, so they are
//! downscaled and re-encoded as JPEG until they fit the configured byte
//! budget.

use crate::constants::{
    DEFAULT_IMAGE_MAX_BYTES, DEFAULT_IMAGE_MAX_DIMENSION, IMAGE_MIN_QUALITY, IMAGE_QUALITY_STEP,
    IMAGE_START_QUALITY,
};
use crate::errors::{AppResult, ImageError};
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Limits applied to an attached image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// Longest side in pixels after downscaling.
    pub max_dimension: u32,
    /// Upper bound on the encoded JPEG size.
    pub max_bytes: usize,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_IMAGE_MAX_DIMENSION,
            max_bytes: DEFAULT_IMAGE_MAX_BYTES,
        }
    }
}

/// Reads the image at `path` and returns it as a JPEG `data:` URL.
///
/// # Errors
///
/// Returns `ImageError` if the file cannot be read or decoded, if encoding
/// fails, or if the result is over `max_bytes` even at the lowest quality.
pub fn encode_image_file(path: &Path, options: &ImageOptions) -> AppResult<String> {
    let data = fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let jpeg = compress(&data, options)?;
    debug!("Encoded {:?} as {} bytes of JPEG", path, jpeg.len());
    Ok(to_data_url(&jpeg))
}

/// Decodes `data`, downscales it and encodes JPEG within the byte budget.
pub fn compress(data: &[u8], options: &ImageOptions) -> Result<Vec<u8>, ImageError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(e.into()))?
        .decode()
        .map_err(ImageError::Decode)?;

    let rgb = downscale(img, options.max_dimension).to_rgb8();

    let mut quality = IMAGE_START_QUALITY;
    loop {
        let encoded = encode_jpeg(&rgb, quality)?;
        if encoded.len() <= options.max_bytes {
            return Ok(encoded);
        }
        if quality <= IMAGE_MIN_QUALITY {
            return Err(ImageError::TooLarge {
                size: encoded.len(),
                limit: options.max_bytes,
            });
        }
        debug!(
            "JPEG at quality {} is {} bytes, retrying lower",
            quality,
            encoded.len()
        );
        quality = quality.saturating_sub(IMAGE_QUALITY_STEP).max(IMAGE_MIN_QUALITY);
    }
}

fn downscale(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return img;
    }
    img.resize(max_dimension, max_dimension, FilterType::Triangle)
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(rgb)
        .map_err(ImageError::Encode)?;
    Ok(out)
}

fn to_data_url(jpeg: &[u8]) -> String {
    let mut url = String::from(DATA_URL_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(jpeg, &mut url);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use image::{ImageFormat, Rgb};
    use tempfile::TempDir;

    fn write_png(dir: &Path, width: u32, height: u32) -> std::path::PathBuf {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        });
        let path = dir.join("photo.png");
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    fn decode_data_url(url: &str) -> DynamicImage {
        let payload = url.strip_prefix(DATA_URL_PREFIX).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_small_image_keeps_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_png(temp_dir.path(), 64, 48);

        let url = encode_image_file(&path, &ImageOptions::default()).unwrap();
        assert!(url.starts_with(DATA_URL_PREFIX));
        assert_eq!(decode_data_url(&url).dimensions(), (64, 48));
    }

    #[test]
    fn test_large_image_is_downscaled_preserving_aspect() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_png(temp_dir.path(), 400, 200);
        let options = ImageOptions {
            max_dimension: 100,
            ..ImageOptions::default()
        };

        let url = encode_image_file(&path, &options).unwrap();
        assert_eq!(decode_data_url(&url).dimensions(), (100, 50));
    }

    #[test]
    fn test_impossible_budget_is_too_large() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_png(temp_dir.path(), 64, 64);
        let options = ImageOptions {
            max_bytes: 10,
            ..ImageOptions::default()
        };

        let result = encode_image_file(&path, &options);
        assert!(matches!(
            result,
            Err(AppError::Image(ImageError::TooLarge { limit: 10, .. }))
        ));
    }

    #[test]
    fn test_non_image_fails_to_decode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "definitely not pixels").unwrap();

        let result = encode_image_file(&path, &ImageOptions::default());
        assert!(matches!(result, Err(AppError::Image(ImageError::Decode(_)))));
    }

    #[test]
    fn test_missing_file_fails_to_read() {
        let temp_dir = TempDir::new().unwrap();
        let result = encode_image_file(&temp_dir.path().join("gone.png"), &ImageOptions::default());
        assert!(matches!(result, Err(AppError::Image(ImageError::Read { .. }))));
    }
}
