use log::{debug, error, info};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::format::SnapshotHeader;
use crate::bitmap::{Bitmap, LayoutError, PalettizedBitmap};
use crate::constants::{MAGIC_HEADER, MAGIC_SIZE};
use crate::palette::Palette;
use crate::pixel::{Color, Pixel, PixelFormat};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid format or header")]
    InvalidHeader,
    #[error("Failed to parse snapshot header")]
    HeaderParsingFailed(#[source] bincode::Error),
    #[error("Failed to parse palette")]
    PaletteParsingFailed(#[source] bincode::Error),
    #[error("Pixel format mismatch: expected {expected:?}, found {found:?}")]
    FormatMismatch {
        expected: PixelFormat,
        found: PixelFormat,
    },
    #[error("Snapshot kind mismatch: expected palettized={expected}, found palettized={found}")]
    KindMismatch { expected: bool, found: bool },
    #[error("Pixel data length mismatch: expected {expected} bytes, got {len}")]
    DataLengthMismatch { expected: u64, len: usize },
    #[error("Empty {width}x{height} bitmap must have pitch 0 and no pixel data, got pitch {pitch}")]
    NonEmptyPayload { width: u32, height: u32, pitch: u64 },
    #[error("Invalid bitmap layout")]
    InvalidLayout(#[from] LayoutError),
}

/// Splits a snapshot into its header and the bytes following it.
fn read_header(encoded: &[u8]) -> Result<(SnapshotHeader, &[u8]), DecodeError> {
    // Check the magic number
    if encoded.len() < MAGIC_SIZE || !encoded.starts_with(&MAGIC_HEADER) {
        error!("Invalid format or missing magic number in header");
        return Err(DecodeError::InvalidHeader);
    }
    debug!("Magic number validated successfully");

    let mut cursor = &encoded[MAGIC_SIZE..];
    let header: SnapshotHeader = bincode::deserialize_from(&mut cursor).map_err(|err| {
        error!("Failed to parse snapshot header: {}", err);
        DecodeError::HeaderParsingFailed(err)
    })?;
    debug!("Header read: {:?}", header);

    Ok((header, cursor))
}

fn check_header(
    header: &SnapshotHeader,
    format: PixelFormat,
    palettized: bool,
) -> Result<(), DecodeError> {
    if header.palettized != palettized {
        error!("Snapshot palettized: {}, expected {}", header.palettized, palettized);
        return Err(DecodeError::KindMismatch {
            expected: palettized,
            found: header.palettized,
        });
    }
    if header.format != format {
        error!("Expected {:?} pixels, snapshot holds {:?}", format, header.format);
        return Err(DecodeError::FormatMismatch {
            expected: format,
            found: header.format,
        });
    }
    Ok(())
}

/// Copies the pixel data following the header into a new bitmap.
fn read_pixels<P: Pixel>(header: &SnapshotHeader, data: &[u8]) -> Result<Bitmap<P>, DecodeError> {
    if (header.width == 0 || header.height == 0) && (header.pitch != 0 || !data.is_empty()) {
        error!(
            "Empty {}x{} bitmap with pitch {} and {} bytes of pixel data",
            header.width,
            header.height,
            header.pitch,
            data.len()
        );
        return Err(DecodeError::NonEmptyPayload {
            width: header.width,
            height: header.height,
            pitch: header.pitch,
        });
    }

    let expected = header.data_len().unwrap_or(u64::MAX);
    if data.len() as u64 != expected {
        error!(
            "Pixel data length mismatch: expected {} bytes, got {}",
            expected,
            data.len()
        );
        return Err(DecodeError::DataLengthMismatch {
            expected,
            len: data.len(),
        });
    }

    let bitmap = header
        .geometry()
        .and_then(|(width, height, pitch)| Bitmap::try_from_bytes(width, height, pitch, data))
        .map_err(|err| {
            error!("Invalid bitmap layout: {}", err);
            err
        })?;
    Ok(bitmap)
}

/// Decodes a snapshot written by [`super::encode`].
pub fn decode<P: Pixel>(encoded: &[u8]) -> Result<Bitmap<P>, DecodeError> {
    let (header, data) = read_header(encoded)?;
    check_header(&header, P::FORMAT, false)?;

    let bitmap = read_pixels(&header, data)?;
    info!("Decoding successful: {:?}", bitmap);
    Ok(bitmap)
}

/// Decodes a snapshot written by [`super::encode_palettized`].
pub fn decode_palettized<C>(encoded: &[u8]) -> Result<PalettizedBitmap<C>, DecodeError>
where
    C: Color + DeserializeOwned,
{
    let (header, mut rest) = read_header(encoded)?;
    check_header(&header, C::FORMAT, true)?;

    let palette: Palette<C> = bincode::deserialize_from(&mut rest).map_err(|err| {
        error!("Failed to parse palette: {}", err);
        DecodeError::PaletteParsingFailed(err)
    })?;
    debug!("Palette read");

    let indices = read_pixels(&header, rest)?;
    info!("Decoding successful: palettized {:?}", indices);
    Ok(PalettizedBitmap::from_parts(indices, palette))
}
