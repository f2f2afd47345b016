//! Geolocation metadata embedding
//!
//! Writes a tagged copy of a source image:
//! - PNG inputs get textual `tEXt` chunks (`Title`, `Latitude`, `Longitude`);
//!   image data is carried over untouched, no EXIF.
//! - JPEG inputs get EXIF GPS tags in degrees-minutes-seconds plus an
//!   `ImageDescription` set to the keyword. Existing EXIF is preserved;
//!   malformed or absent EXIF starts from an empty base.

use crate::services::geocoder::Coordinates;
use img_parts::png::{Png, PngChunk};
use img_parts::Bytes;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metadata writer errors
#[derive(Debug, Error)]
pub enum WriteError {
    /// Input is neither PNG nor JPEG by signature
    #[error("Unsupported image format: {0}")]
    Unsupported(PathBuf),

    /// The underlying codec rejected the payload
    #[error("Codec error for {0}: {1}")]
    Codec(PathBuf, String),

    /// Cannot read the source or write the destination
    #[error("File access error {0}: {1}")]
    FileAccessError(PathBuf, String),
}

impl From<WriteError> for fotodesk_common::Error {
    fn from(err: WriteError) -> Self {
        fotodesk_common::Error::MetadataWrite(err.to_string())
    }
}

/// Image container format, detected by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Detect the container format from leading bytes
    pub fn detect(header: &[u8]) -> Option<ImageKind> {
        if header.starts_with(&Self::PNG_SIGNATURE) {
            Some(ImageKind::Png)
        } else if header.starts_with(&[0xFF, 0xD8]) {
            Some(ImageKind::Jpeg)
        } else {
            None
        }
    }
}

/// Convert decimal degrees to EXIF GPS rationals
///
/// Degrees and minutes are truncated; seconds are rounded to the nearest
/// 1/1,000,000 and stored over a 1,000,000 denominator.
pub fn degrees_to_dms(value: f64) -> [uR64; 3] {
    let abs_value = value.abs();
    let degrees = abs_value.trunc();
    let minutes_float = (abs_value - degrees) * 60.0;
    let minutes = minutes_float.trunc();
    let seconds_micro = ((minutes_float - minutes) * 60.0 * 1_000_000.0).round();

    [
        uR64 {
            nominator: degrees as u32,
            denominator: 1,
        },
        uR64 {
            nominator: minutes as u32,
            denominator: 1,
        },
        uR64 {
            nominator: seconds_micro as u32,
            denominator: 1_000_000,
        },
    ]
}

/// Inverse of [`degrees_to_dms`], without hemisphere sign
pub fn dms_to_degrees(dms: &[uR64; 3]) -> f64 {
    let degrees = dms[0].nominator as f64 / dms[0].denominator as f64;
    let minutes = dms[1].nominator as f64 / dms[1].denominator as f64;
    let seconds = dms[2].nominator as f64 / dms[2].denominator as f64;
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Hemisphere reference for a latitude
pub fn latitude_ref(latitude: f64) -> &'static str {
    if latitude >= 0.0 {
        "N"
    } else {
        "S"
    }
}

/// Hemisphere reference for a longitude
pub fn longitude_ref(longitude: f64) -> &'static str {
    if longitude >= 0.0 {
        "E"
    } else {
        "W"
    }
}

/// Writer of geotagged image copies
pub struct MetadataWriter;

impl MetadataWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a copy of `source` at `dest` with embedded location metadata
    pub fn write_tagged_copy(
        &self,
        source: &Path,
        dest: &Path,
        coordinates: Coordinates,
        keyword: &str,
    ) -> Result<(), WriteError> {
        let bytes = std::fs::read(source)
            .map_err(|e| WriteError::FileAccessError(source.to_path_buf(), e.to_string()))?;

        match ImageKind::detect(&bytes) {
            Some(ImageKind::Png) => self.write_png(source, dest, bytes, coordinates, keyword),
            Some(ImageKind::Jpeg) => self.write_jpeg(source, dest, bytes, coordinates, keyword),
            None => Err(WriteError::Unsupported(source.to_path_buf())),
        }
    }

    fn write_png(
        &self,
        source: &Path,
        dest: &Path,
        bytes: Vec<u8>,
        coordinates: Coordinates,
        keyword: &str,
    ) -> Result<(), WriteError> {
        let mut png = Png::from_bytes(Bytes::from(bytes))
            .map_err(|e| WriteError::Codec(source.to_path_buf(), e.to_string()))?;

        let entries = [
            ("Title", keyword.to_string()),
            ("Latitude", coordinates.latitude.to_string()),
            ("Longitude", coordinates.longitude.to_string()),
        ];

        // tEXt may appear anywhere between IHDR and IEND; slot in after IHDR
        for (index, (key, value)) in entries.iter().enumerate() {
            let mut payload = Vec::with_capacity(key.len() + 1 + value.len());
            payload.extend_from_slice(key.as_bytes());
            payload.push(0);
            payload.extend_from_slice(value.as_bytes());

            let chunk = PngChunk::new(*b"tEXt", Bytes::from(payload));
            png.chunks_mut().insert(1 + index, chunk);
        }

        let file = File::create(dest)
            .map_err(|e| WriteError::FileAccessError(dest.to_path_buf(), e.to_string()))?;
        if let Err(e) = png.encoder().write_to(file) {
            // A failed item must not leave a partial copy in the output folder
            let _ = std::fs::remove_file(dest);
            return Err(WriteError::Codec(dest.to_path_buf(), e.to_string()));
        }

        Ok(())
    }

    fn write_jpeg(
        &self,
        source: &Path,
        dest: &Path,
        bytes: Vec<u8>,
        coordinates: Coordinates,
        keyword: &str,
    ) -> Result<(), WriteError> {
        std::fs::write(dest, bytes)
            .map_err(|e| WriteError::FileAccessError(dest.to_path_buf(), e.to_string()))?;

        // Existing EXIF carries over; a malformed block degrades to empty
        let mut metadata = Metadata::new_from_path(dest).unwrap_or_else(|e| {
            tracing::debug!(
                file = %source.display(),
                error = %e,
                "No usable EXIF in source, starting from empty metadata"
            );
            Metadata::new()
        });

        metadata.set_tag(ExifTag::GPSLatitudeRef(
            latitude_ref(coordinates.latitude).to_string(),
        ));
        metadata.set_tag(ExifTag::GPSLatitude(
            degrees_to_dms(coordinates.latitude).to_vec(),
        ));
        metadata.set_tag(ExifTag::GPSLongitudeRef(
            longitude_ref(coordinates.longitude).to_string(),
        ));
        metadata.set_tag(ExifTag::GPSLongitude(
            degrees_to_dms(coordinates.longitude).to_vec(),
        ));
        metadata.set_tag(ExifTag::ImageDescription(keyword.to_string()));

        if let Err(e) = metadata.write_to_file(dest) {
            // A failed item must not leave an untagged copy in the output folder
            let _ = std::fs::remove_file(dest);
            return Err(WriteError::Codec(dest.to_path_buf(), e.to_string()));
        }

        Ok(())
    }
}

impl Default for MetadataWriter {
    fn default() -> Self {
        Self::new()
    }
}
