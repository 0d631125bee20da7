use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, LayoutError};
use crate::pixel::{Pixel, PixelFormat};

/// Geometry and pixel format of a snapshot.
///
/// For palettized snapshots `format` is the format of the palette entries, the pixel data is
/// always one index byte per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub pitch: u64,
    pub palettized: bool,
}

impl SnapshotHeader {
    pub fn new<P: Pixel>(format: PixelFormat, bitmap: &Bitmap<P>, palettized: bool) -> Self {
        // Bitmap dimensions never exceed i32::MAX.
        Self {
            format,
            width: bitmap.width() as u32,
            height: bitmap.height() as u32,
            pitch: bitmap.pitch() as u64,
            palettized,
        }
    }

    /// Width, height and pitch as native sizes.
    pub fn geometry(&self) -> Result<(usize, usize, usize), LayoutError> {
        let too_large = || LayoutError::TooLarge {
            width: self.width as usize,
            height: self.height as usize,
            pitch: usize::MAX,
        };
        let width = usize::try_from(self.width).map_err(|_| too_large())?;
        let height = usize::try_from(self.height).map_err(|_| too_large())?;
        let pitch = usize::try_from(self.pitch).map_err(|_| too_large())?;
        Ok((width, height, pitch))
    }

    /// Number of pixel bytes following the header (and palette).
    pub fn data_len(&self) -> Option<u64> {
        self.pitch.checked_mul(u64::from(self.height))
    }
}
