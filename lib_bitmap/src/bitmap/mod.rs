pub mod palettized;
pub mod view;

use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace};
use thiserror::Error;

use crate::pixel::Pixel;
use crate::rect::{Rect, Transfer};

pub use palettized::{PalettizedBitmap, QuantizeError};
pub use view::{BitmapView, BitmapViewMut};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Pitch {pitch} is smaller than a row of {row_len} bytes")]
    PitchTooSmall { pitch: usize, row_len: usize },
    #[error("Pitch {pitch} is not a multiple of the pixel size {pixel_size}")]
    MisalignedPitch { pitch: usize, pixel_size: usize },
    #[error("Bitmap of {width}x{height} pixels with pitch {pitch} does not fit into memory")]
    TooLarge {
        width: usize,
        height: usize,
        pitch: usize,
    },
    #[error("Pixel data too short: expected at least {needed} bytes, got {len}")]
    DataTooShort { needed: usize, len: usize },
}

/// Validates a buffer geometry and returns the effective pitch.
///
/// A pitch of 0 stands for tightly packed rows.
pub(crate) fn resolve_pitch<P: Pixel>(
    width: usize,
    height: usize,
    pitch: usize,
) -> Result<usize, LayoutError> {
    let too_large = LayoutError::TooLarge {
        width,
        height,
        pitch,
    };
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(too_large);
    }
    let row_len = width.checked_mul(P::SIZE).ok_or(too_large.clone())?;

    if pitch != 0 && pitch < row_len {
        return Err(LayoutError::PitchTooSmall { pitch, row_len });
    }
    if pitch % P::SIZE != 0 {
        return Err(LayoutError::MisalignedPitch {
            pitch,
            pixel_size: P::SIZE,
        });
    }

    let pitch = if pitch == 0 { row_len } else { pitch };
    pitch.checked_mul(height).ok_or(too_large)?;
    Ok(pitch)
}

/// Panics unless `pitch` is valid for a bitmap covering the clipped `rect`.
///
/// Must run before the early return for empty rectangles.
pub(crate) fn check_pitch<P: Pixel>(rect: &Rect, pitch: usize) {
    let width = rect.width.max(0) as usize;
    let height = rect.height.max(0) as usize;
    if let Err(err) = resolve_pitch::<P>(width, height, pitch) {
        panic!("{err}");
    }
}

/// Copies the `src_rect` part of `src` into pixel memory of `width`x`height` pixels with rows
/// `pitch` bytes apart, clipped with [`Transfer::clip`].
pub(crate) fn blit<P: Pixel>(
    dst: &mut [u8],
    (width, height, pitch): (usize, usize, usize),
    src: &BitmapView<'_, P>,
    src_rect: Rect,
    dst_x: i32,
    dst_y: i32,
) {
    let Some(transfer) = Transfer::clip(
        src_rect,
        (src.width(), src.height()),
        dst_x,
        dst_y,
        (width, height),
    ) else {
        trace!("Copy of {:?} to ({}, {}) clipped away", src_rect, dst_x, dst_y);
        return;
    };
    trace!("Copy {:?}", transfer);

    let row_len = transfer.width() * P::SIZE;
    let (src_x, src_y) = (transfer.src.x as usize, transfer.src.y as usize);
    let (dst_x, dst_y) = (transfer.dst_x as usize, transfer.dst_y as usize);
    for row in 0..transfer.height() {
        let from = src.offset(src_x, src_y + row);
        let to = (dst_y + row) * pitch + dst_x * P::SIZE;
        dst[to..to + row_len].copy_from_slice(&src.as_bytes()[from..from + row_len]);
    }
}

/// A rectangular grid of pixels in row-major order.
///
/// Rows start `pitch` bytes apart, which may be more than `width * P::SIZE`. The bitmap always
/// owns its memory: cloning copies the pixels, and a bitmap with zero width or height holds no
/// memory at all (width, height and pitch are all 0). Borrowed access to pixel memory owned by
/// someone else goes through [`BitmapView`].
#[derive(Clone, PartialEq)]
pub struct Bitmap<P: Pixel> {
    width: usize,
    height: usize,
    pitch: usize,
    data: Vec<u8>,
    pixel: PhantomData<P>,
}

impl<P: Pixel> Bitmap<P> {
    /// Allocates a zeroed bitmap with tightly packed rows.
    ///
    /// # Panics
    /// When the size can not be represented, see [`Bitmap::try_with_pitch`].
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_pitch(width, height, 0)
    }

    /// Allocates a zeroed bitmap with the given pitch in bytes (0 for tightly packed rows).
    ///
    /// # Panics
    /// When the pitch is smaller than a row or not a multiple of the pixel size, or the size can
    /// not be represented.
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Self {
        Self::try_with_pitch(width, height, pitch).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible version of [`Bitmap::with_pitch`].
    pub fn try_with_pitch(width: usize, height: usize, pitch: usize) -> Result<Self, LayoutError> {
        let pitch = resolve_pitch::<P>(width, height, pitch)?;
        if width == 0 || height == 0 {
            return Ok(Self::default());
        }

        Ok(Self {
            width,
            height,
            pitch,
            data: vec![0; pitch * height],
            pixel: PhantomData,
        })
    }

    /// Allocates a bitmap and copies `pitch * height` bytes of `data` into it.
    ///
    /// The bitmap owns the copy, later changes to `data` are not visible through it.
    ///
    /// # Panics
    /// When the geometry is invalid or `data` is too short.
    pub fn from_bytes(width: usize, height: usize, pitch: usize, data: &[u8]) -> Self {
        Self::try_from_bytes(width, height, pitch, data).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible version of [`Bitmap::from_bytes`].
    pub fn try_from_bytes(
        width: usize,
        height: usize,
        pitch: usize,
        data: &[u8],
    ) -> Result<Self, LayoutError> {
        let mut bitmap = Self::try_with_pitch(width, height, pitch)?;
        let needed = bitmap.data.len();
        if data.len() < needed {
            return Err(LayoutError::DataTooShort {
                needed,
                len: data.len(),
            });
        }
        bitmap.data.copy_from_slice(&data[..needed]);
        Ok(bitmap)
    }

    /// Replaces the content of this bitmap with a copy of `data`.
    ///
    /// # Panics
    /// When `width` or `height` is 0, the geometry is invalid, or `data` is too short.
    pub fn load(&mut self, width: usize, height: usize, pitch: usize, data: &[u8]) {
        assert!(
            width > 0 && height > 0,
            "Cannot load an empty {width}x{height} bitmap"
        );
        *self = Self::from_bytes(width, height, pitch, data);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between the starts of two rows in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size of the pixel memory in bytes, `pitch * height`.
    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.pitch + x * P::SIZE
    }

    /// Returns the pixel at `(x, y)`, or the default pixel if the bitmap is empty.
    ///
    /// Coordinates are only checked in debug builds.
    pub fn pixel(&self, x: usize, y: usize) -> P {
        if self.is_empty() {
            return P::default();
        }
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside of {}x{} bitmap",
            self.width,
            self.height
        );
        P::read(&self.data[self.offset(x, y)..])
    }

    /// Overwrites the pixel at `(x, y)`. Coordinates are only checked in debug builds.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: P) {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside of {}x{} bitmap",
            self.width,
            self.height
        );
        let offset = self.offset(x, y);
        pixel.write(&mut self.data[offset..]);
    }

    fn check_bounds(&self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside of {}x{} bitmap",
            self.width,
            self.height
        );
    }

    /// Returns the pixel memory starting at `(x, y)`, or `None` if the bitmap is empty.
    ///
    /// # Panics
    /// When the bitmap is not empty and `(x, y)` lies outside of it.
    pub fn data(&self, x: usize, y: usize) -> Option<&[u8]> {
        if self.is_empty() {
            return None;
        }
        self.check_bounds(x, y);
        Some(&self.data[self.offset(x, y)..])
    }

    /// Mutable version of [`Bitmap::data`].
    pub fn data_mut(&mut self, x: usize, y: usize) -> Option<&mut [u8]> {
        if self.is_empty() {
            return None;
        }
        self.check_bounds(x, y);
        let offset = self.offset(x, y);
        Some(&mut self.data[offset..])
    }

    /// The pixel bytes of row `y`, without padding.
    pub fn row(&self, y: usize) -> &[u8] {
        self.check_bounds(0, y);
        let start = self.offset(0, y);
        &self.data[start..start + self.width * P::SIZE]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        self.check_bounds(0, y);
        let start = self.offset(0, y);
        let end = start + self.width * P::SIZE;
        &mut self.data[start..end]
    }

    /// All `pitch * height` bytes, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Sets every pixel to `pixel`. Row padding is left alone.
    pub fn fill(&mut self, pixel: P) {
        for y in 0..self.height {
            for chunk in self.row_mut(y).chunks_exact_mut(P::SIZE) {
                pixel.write(chunk);
            }
        }
    }

    /// Borrows the whole bitmap as a view.
    pub fn view(&self) -> BitmapView<'_, P> {
        BitmapView::from_parts(&self.data, self.width, self.height, self.pitch)
    }

    /// Borrows the whole bitmap as a writable view.
    pub fn view_mut(&mut self) -> BitmapViewMut<'_, P> {
        BitmapViewMut::from_parts(&mut self.data, self.width, self.height, self.pitch)
    }

    /// Creates a new bitmap from the part of this one covered by the given rectangle.
    ///
    /// The rectangle is clipped to the bitmap first, so the result may be smaller than requested
    /// or empty. The result owns its pixels and uses `pitch` (0 for tightly packed rows).
    ///
    /// # Panics
    /// When `pitch` is invalid for the clipped size, even if nothing is left of the rectangle.
    pub fn region(&self, x: i32, y: i32, width: i32, height: i32, pitch: usize) -> Bitmap<P> {
        let rect = Rect::new(x, y, width, height).clip(&Rect::from_size(self.width, self.height));
        debug!("Region {:?} of {}x{} bitmap", rect, self.width, self.height);
        check_pitch::<P>(&rect, pitch);
        if rect.is_empty() {
            return Bitmap::default();
        }

        let mut region = Bitmap::with_pitch(rect.width as usize, rect.height as usize, pitch);
        region.copy(self, rect, 0, 0);
        region
    }

    /// Copies the `src_rect` part of `src` to `(dst_x, dst_y)` in this bitmap.
    ///
    /// Both sides are clipped, see [`Transfer::clip`]. Pixels outside of the clipped
    /// rectangle are left untouched and copying nothing is not an error.
    pub fn copy(&mut self, src: &Bitmap<P>, src_rect: Rect, dst_x: i32, dst_y: i32) {
        self.copy_from_view(&src.view(), src_rect, dst_x, dst_y);
    }

    /// Same as [`Bitmap::copy`] for a borrowed source.
    pub fn copy_from_view(&mut self, src: &BitmapView<'_, P>, src_rect: Rect, dst_x: i32, dst_y: i32) {
        let geometry = (self.width, self.height, self.pitch);
        blit(&mut self.data, geometry, src, src_rect, dst_x, dst_y);
    }
}

impl<P: Pixel> Default for Bitmap<P> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            pitch: 0,
            data: Vec::new(),
            pixel: PhantomData,
        }
    }
}

impl<P: Pixel> fmt::Debug for Bitmap<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("format", &P::FORMAT)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .finish_non_exhaustive()
    }
}
