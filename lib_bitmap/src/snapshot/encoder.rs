use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use super::format::SnapshotHeader;
use crate::bitmap::{Bitmap, PalettizedBitmap};
use crate::constants::MAGIC_HEADER;
use crate::pixel::{Color, Pixel};

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to serialize snapshot header")]
    HeaderSerializationFailed(#[source] bincode::Error),
    #[error("Failed to serialize palette")]
    PaletteSerializationFailed(#[source] bincode::Error),
}

fn write_header(encoded: &mut Vec<u8>, header: &SnapshotHeader) -> Result<(), EncodeError> {
    encoded.extend_from_slice(&MAGIC_HEADER);
    bincode::serialize_into(&mut *encoded, header)
        .map_err(EncodeError::HeaderSerializationFailed)?;
    debug!(
        "Header written:\nMagic: {:?}\nHeader: {:?}",
        MAGIC_HEADER, header
    );
    Ok(())
}

/// Encodes a bitmap into a snapshot.
pub fn encode<P: Pixel>(bitmap: &Bitmap<P>) -> Result<Vec<u8>, EncodeError> {
    info!("Starting encoding of {:?}", bitmap);

    let mut encoded = Vec::with_capacity(bitmap.len_bytes() + 32);
    write_header(&mut encoded, &SnapshotHeader::new(P::FORMAT, bitmap, false))?;

    encoded.extend_from_slice(bitmap.as_bytes());
    debug!("{} bytes of pixel data written", bitmap.len_bytes());

    info!("Encoding completed: {} bytes", encoded.len());
    Ok(encoded)
}

/// Encodes a palettized bitmap, palette included, into a snapshot.
pub fn encode_palettized<C>(bitmap: &PalettizedBitmap<C>) -> Result<Vec<u8>, EncodeError>
where
    C: Color + Serialize,
{
    info!("Starting encoding of palettized {:?}", bitmap.indices());

    let indices = bitmap.indices();
    let mut encoded = Vec::with_capacity(indices.len_bytes() + 32);
    write_header(&mut encoded, &SnapshotHeader::new(C::FORMAT, indices, true))?;

    bincode::serialize_into(&mut encoded, bitmap.palette())
        .map_err(EncodeError::PaletteSerializationFailed)?;
    debug!("Palette data written with {:?} entries", C::FORMAT);

    encoded.extend_from_slice(indices.as_bytes());
    debug!("{} bytes of index data written", indices.len_bytes());

    info!("Encoding completed: {} bytes", encoded.len());
    Ok(encoded)
}
