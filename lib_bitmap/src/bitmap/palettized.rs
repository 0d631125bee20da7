use std::collections::HashMap;

use log::{debug, error, trace};
use thiserror::Error;

use crate::bitmap::{check_pitch, Bitmap, BitmapViewMut};
use crate::constants::PALETTE_SIZE;
use crate::palette::Palette;
use crate::pixel::{Color, Pixel, Pixel8};
use crate::rect::{Rect, Transfer};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuantizeError {
    #[error("Palette overflow: maximum 256 colors supported, found color #{0}")]
    PaletteOverflow(usize),
}

/// A bitmap of palette indices together with the palette they refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct PalettizedBitmap<C: Color> {
    indices: Bitmap<Pixel8>,
    palette: Palette<C>,
}

impl<C: Color> PalettizedBitmap<C> {
    /// Allocates a bitmap of zero indices with a default palette.
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_parts(Bitmap::new(width, height), Palette::new())
    }

    pub fn from_parts(indices: Bitmap<Pixel8>, palette: Palette<C>) -> Self {
        Self { indices, palette }
    }

    /// Copies the indices in `data` and the palette into a new bitmap.
    ///
    /// # Panics
    /// When the geometry is invalid or `data` is too short, see [`Bitmap::from_bytes`].
    pub fn from_bytes(
        width: usize,
        height: usize,
        pitch: usize,
        data: &[u8],
        palette: &Palette<C>,
    ) -> Self {
        Self::from_parts(
            Bitmap::from_bytes(width, height, pitch, data),
            palette.clone(),
        )
    }

    /// Replaces indices and palette, see [`Bitmap::load`].
    pub fn load(
        &mut self,
        width: usize,
        height: usize,
        pitch: usize,
        data: &[u8],
        palette: &Palette<C>,
    ) {
        self.indices.load(width, height, pitch, data);
        self.palette = palette.clone();
    }

    /// Builds a palettized bitmap holding the distinct colors of `bitmap`.
    ///
    /// Palette entries are assigned in the order colors are first seen, scanning rows top to
    /// bottom. Unused entries keep the default color.
    ///
    /// # Errors
    /// - Returns `QuantizeError::PaletteOverflow` if more than 256 distinct colors are found
    pub fn quantize(bitmap: &Bitmap<C>) -> Result<Self, QuantizeError> {
        let mut unique_colors: HashMap<u32, u8> = HashMap::new();
        let mut palette = Palette::new();
        let mut indices = Bitmap::new(bitmap.width(), bitmap.height());

        for y in 0..bitmap.height() {
            for x in 0..bitmap.width() {
                let color = bitmap.pixel(x, y);

                // Check if color is already in the palette
                let index = match unique_colors.get(&color.raw()) {
                    Some(&index) => index,
                    None => {
                        let next = unique_colors.len();
                        if next >= PALETTE_SIZE {
                            error!(
                                "Palette overflow at ({}, {}) of {}x{} bitmap",
                                x,
                                y,
                                bitmap.width(),
                                bitmap.height()
                            );
                            return Err(QuantizeError::PaletteOverflow(next + 1));
                        }
                        palette[next] = color;
                        unique_colors.insert(color.raw(), next as u8);
                        next as u8
                    }
                };
                indices.set_pixel(x, y, index);
            }
        }

        debug!(
            "Quantized {}x{} bitmap to {} colors",
            bitmap.width(),
            bitmap.height(),
            unique_colors.len()
        );
        Ok(Self::from_parts(indices, palette))
    }

    pub fn width(&self) -> usize {
        self.indices.width()
    }

    pub fn height(&self) -> usize {
        self.indices.height()
    }

    pub fn pitch(&self) -> usize {
        self.indices.pitch()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn palette(&self) -> &Palette<C> {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette<C> {
        &mut self.palette
    }

    pub fn indices(&self) -> &Bitmap<Pixel8> {
        &self.indices
    }

    pub fn indices_mut(&mut self) -> &mut Bitmap<Pixel8> {
        &mut self.indices
    }

    /// The palette index at `(x, y)`, or 0 if the bitmap is empty.
    pub fn index(&self, x: usize, y: usize) -> u8 {
        self.indices.pixel(x, y)
    }

    pub fn set_index(&mut self, x: usize, y: usize, index: u8) {
        self.indices.set_pixel(x, y, index);
    }

    /// The color at `(x, y)`, resolved through the palette.
    pub fn color(&self, x: usize, y: usize) -> C {
        self.palette.lookup(self.index(x, y))
    }

    /// Creates a new palettized bitmap from part of this one. The palette is copied along.
    pub fn region(&self, x: i32, y: i32, width: i32, height: i32, pitch: usize) -> Self {
        Self::from_parts(
            self.indices.region(x, y, width, height, pitch),
            self.palette.clone(),
        )
    }

    /// Copies indices from another palettized bitmap, clipped like [`Bitmap::copy`].
    ///
    /// The palette of `self` is kept, so indices are reinterpreted rather than converted.
    pub fn copy(&mut self, src: &PalettizedBitmap<C>, src_rect: Rect, dst_x: i32, dst_y: i32) {
        self.indices.copy(&src.indices, src_rect, dst_x, dst_y);
    }

    /// Writes the colors of the `src_rect` part of this bitmap to `(dst_x, dst_y)` in `dst`.
    ///
    /// Clipping follows [`Bitmap::copy`]; pixels of `dst` outside of the clipped rectangle are
    /// left untouched.
    pub fn draw(&self, src_rect: Rect, dst: &mut Bitmap<C>, dst_x: i32, dst_y: i32) {
        self.draw_to_view(src_rect, &mut dst.view_mut(), dst_x, dst_y);
    }

    /// Same as [`PalettizedBitmap::draw`] for pixel memory owned elsewhere.
    pub fn draw_to_view(
        &self,
        src_rect: Rect,
        dst: &mut BitmapViewMut<'_, C>,
        dst_x: i32,
        dst_y: i32,
    ) {
        let Some(transfer) = Transfer::clip(
            src_rect,
            (self.width(), self.height()),
            dst_x,
            dst_y,
            (dst.width(), dst.height()),
        ) else {
            trace!("Draw of {:?} to ({}, {}) clipped away", src_rect, dst_x, dst_y);
            return;
        };
        trace!("Draw {:?}", transfer);

        let (src_x, src_y) = (transfer.src.x as usize, transfer.src.y as usize);
        let (dst_x, dst_y) = (transfer.dst_x as usize, transfer.dst_y as usize);
        for row in 0..transfer.height() {
            let indices = &self.indices.row(src_y + row)[src_x..src_x + transfer.width()];
            let out = &mut dst.row_mut(dst_y + row)[dst_x * C::SIZE..];
            for (&index, chunk) in indices.iter().zip(out.chunks_exact_mut(C::SIZE)) {
                self.palette.lookup(index).write(chunk);
            }
        }
    }

    /// Resolves part of this bitmap into a new true-color bitmap.
    ///
    /// The rectangle is clipped exactly like [`Bitmap::region`]; the result owns its pixels and
    /// uses `pitch` (0 for tightly packed rows).
    ///
    /// # Panics
    /// When `pitch` is invalid for the clipped size, even if nothing is left of the rectangle.
    pub fn decompressed_region(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        pitch: usize,
    ) -> Bitmap<C> {
        let rect = Rect::new(x, y, width, height).clip(&Rect::from_size(self.width(), self.height()));
        debug!(
            "Decompressing {:?} of {}x{} palettized bitmap",
            rect,
            self.width(),
            self.height()
        );
        check_pitch::<C>(&rect, pitch);
        if rect.is_empty() {
            return Bitmap::default();
        }

        let mut color = Bitmap::with_pitch(rect.width as usize, rect.height as usize, pitch);
        self.draw(rect, &mut color, 0, 0);
        color
    }

    /// Resolves the whole bitmap into a tightly packed true-color bitmap.
    pub fn decompress(&self) -> Bitmap<C> {
        self.decompressed_region(0, 0, i32::MAX, i32::MAX, 0)
    }
}

impl<C: Color> Default for PalettizedBitmap<C> {
    fn default() -> Self {
        Self::from_parts(Bitmap::default(), Palette::new())
    }
}
