use std::fmt;
use std::marker::PhantomData;

use crate::bitmap::{blit, resolve_pitch, Bitmap, LayoutError};
use crate::pixel::Pixel;
use crate::rect::Rect;

/// Checks that `len` bytes cover `height` rows, the last one without padding.
fn check_len<P: Pixel>(
    width: usize,
    height: usize,
    pitch: usize,
    len: usize,
) -> Result<(), LayoutError> {
    let needed = pitch * (height - 1) + width * P::SIZE;
    if len < needed {
        return Err(LayoutError::DataTooShort { needed, len });
    }
    Ok(())
}

/// A borrowed, read-only window onto pixel memory owned elsewhere.
///
/// Same addressing as [`Bitmap`]: `height` rows of `width` pixels each, rows starting `pitch`
/// bytes apart. The last row does not need to be padded.
#[derive(Clone, Copy)]
pub struct BitmapView<'a, P: Pixel> {
    bytes: &'a [u8],
    width: usize,
    height: usize,
    pitch: usize,
    pixel: PhantomData<P>,
}

impl<'a, P: Pixel> BitmapView<'a, P> {
    /// Wraps `bytes` without copying them. A pitch of 0 stands for tightly packed rows.
    pub fn new(
        width: usize,
        height: usize,
        pitch: usize,
        bytes: &'a [u8],
    ) -> Result<Self, LayoutError> {
        let pitch = resolve_pitch::<P>(width, height, pitch)?;
        if width == 0 || height == 0 {
            return Ok(Self::empty());
        }

        check_len::<P>(width, height, pitch, bytes.len())?;
        Ok(Self::from_parts(bytes, width, height, pitch))
    }

    pub fn empty() -> Self {
        Self::from_parts(&[], 0, 0, 0)
    }

    pub(crate) fn from_parts(bytes: &'a [u8], width: usize, height: usize, pitch: usize) -> Self {
        Self {
            bytes,
            width,
            height,
            pitch,
            pixel: PhantomData,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub(crate) fn offset(&self, x: usize, y: usize) -> usize {
        y * self.pitch + x * P::SIZE
    }

    /// Returns the pixel at `(x, y)`, or the default pixel if the view is empty.
    pub fn pixel(&self, x: usize, y: usize) -> P {
        if self.is_empty() {
            return P::default();
        }
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside of {}x{} view",
            self.width,
            self.height
        );
        P::read(&self.bytes[self.offset(x, y)..])
    }

    /// The pixel bytes of row `y`, without padding.
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(
            y < self.height,
            "row {y} outside of {}x{} view",
            self.width,
            self.height
        );
        let start = self.offset(0, y);
        &self.bytes[start..start + self.width * P::SIZE]
    }

    /// Narrows the view to the given rectangle, clipped to the view. No pixels are copied.
    pub fn region(&self, x: i32, y: i32, width: i32, height: i32) -> BitmapView<'a, P> {
        let rect = Rect::new(x, y, width, height).clip(&Rect::from_size(self.width, self.height));
        if rect.is_empty() {
            return Self::empty();
        }

        let start = self.offset(rect.x as usize, rect.y as usize);
        Self::from_parts(
            &self.bytes[start..],
            rect.width as usize,
            rect.height as usize,
            self.pitch,
        )
    }

    /// Copies the viewed pixels into a new bitmap with the given pitch (0 for tightly packed).
    pub fn to_bitmap(&self, pitch: usize) -> Bitmap<P> {
        if self.is_empty() {
            return Bitmap::default();
        }
        let mut bitmap = Bitmap::with_pitch(self.width, self.height, pitch);
        bitmap.copy_from_view(self, Rect::from_size(self.width, self.height), 0, 0);
        bitmap
    }
}

impl<P: Pixel> fmt::Debug for BitmapView<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapView")
            .field("format", &P::FORMAT)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .finish_non_exhaustive()
    }
}

/// A borrowed, writable window onto pixel memory owned elsewhere, such as a frame buffer.
///
/// Addressing matches [`BitmapView`].
pub struct BitmapViewMut<'a, P: Pixel> {
    bytes: &'a mut [u8],
    width: usize,
    height: usize,
    pitch: usize,
    pixel: PhantomData<P>,
}

impl<'a, P: Pixel> BitmapViewMut<'a, P> {
    /// Wraps `bytes` without copying them. A pitch of 0 stands for tightly packed rows.
    pub fn new(
        width: usize,
        height: usize,
        pitch: usize,
        bytes: &'a mut [u8],
    ) -> Result<Self, LayoutError> {
        let pitch = resolve_pitch::<P>(width, height, pitch)?;
        if width == 0 || height == 0 {
            return Ok(Self::from_parts(&mut [], 0, 0, 0));
        }

        check_len::<P>(width, height, pitch, bytes.len())?;
        Ok(Self::from_parts(bytes, width, height, pitch))
    }

    pub(crate) fn from_parts(
        bytes: &'a mut [u8],
        width: usize,
        height: usize,
        pitch: usize,
    ) -> Self {
        Self {
            bytes,
            width,
            height,
            pitch,
            pixel: PhantomData,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reborrows the view as read-only.
    pub fn as_view(&self) -> BitmapView<'_, P> {
        BitmapView::from_parts(&*self.bytes, self.width, self.height, self.pitch)
    }

    /// Returns the pixel at `(x, y)`, or the default pixel if the view is empty.
    pub fn pixel(&self, x: usize, y: usize) -> P {
        self.as_view().pixel(x, y)
    }

    /// Overwrites the pixel at `(x, y)`. Coordinates are only checked in debug builds.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: P) {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside of {}x{} view",
            self.width,
            self.height
        );
        let offset = y * self.pitch + x * P::SIZE;
        pixel.write(&mut self.bytes[offset..]);
    }

    /// The pixel bytes of row `y`, without padding.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {y} outside of {}x{} view",
            self.width,
            self.height
        );
        let start = y * self.pitch;
        &mut self.bytes[start..start + self.width * P::SIZE]
    }

    /// Sets every pixel to `pixel`. Row padding is left alone.
    pub fn fill(&mut self, pixel: P) {
        for y in 0..self.height {
            for chunk in self.row_mut(y).chunks_exact_mut(P::SIZE) {
                pixel.write(chunk);
            }
        }
    }

    /// Copies the `src_rect` part of `src` to `(dst_x, dst_y)`, clipped like [`Bitmap::copy`].
    pub fn copy(&mut self, src: &Bitmap<P>, src_rect: Rect, dst_x: i32, dst_y: i32) {
        self.copy_from_view(&src.view(), src_rect, dst_x, dst_y);
    }

    pub fn copy_from_view(&mut self, src: &BitmapView<'_, P>, src_rect: Rect, dst_x: i32, dst_y: i32) {
        let geometry = (self.width, self.height, self.pitch);
        blit(&mut *self.bytes, geometry, src, src_rect, dst_x, dst_y);
    }
}

impl<P: Pixel> fmt::Debug for BitmapViewMut<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapViewMut")
            .field("format", &P::FORMAT)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Pixel565, PixelRGB};

    fn ramp(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn test_view_unpadded_last_row() {
        // Three rows of two RGB pixels with an 8 byte pitch, the last row is not padded.
        let bytes = ramp(8 * 2 + 6);
        let view = BitmapView::<PixelRGB>::new(2, 3, 8, &bytes).unwrap();
        assert_eq!(view.pixel(1, 2).raw(), 0x131415);
        assert_eq!(view.row(1), &bytes[8..14]);
    }

    #[test]
    fn test_view_too_short() {
        let bytes = ramp(21);
        let result = BitmapView::<PixelRGB>::new(2, 3, 8, &bytes);
        assert_eq!(
            result.unwrap_err(),
            LayoutError::DataTooShort { needed: 22, len: 21 }
        );
    }

    #[test]
    fn test_view_region_borrows() {
        let bytes = ramp(64);
        let view = BitmapView::<Pixel565>::new(8, 4, 0, &bytes).unwrap();
        let region = view.region(2, 1, 3, 2);

        assert_eq!(region.width(), 3);
        assert_eq!(region.height(), 2);
        assert_eq!(region.pitch(), 16);
        assert_eq!(region.as_bytes().as_ptr(), bytes[16 + 4..].as_ptr());
        assert_eq!(region.pixel(0, 1), view.pixel(2, 2));
    }

    #[test]
    fn test_view_region_clips() {
        let bytes = ramp(64);
        let view = BitmapView::<Pixel565>::new(8, 4, 0, &bytes).unwrap();

        let clipped = view.region(-2, 2, 4, 10);
        assert_eq!((clipped.width(), clipped.height()), (2, 2));
        assert_eq!(clipped.pixel(1, 1), view.pixel(1, 3));

        assert!(view.region(8, 0, 4, 4).is_empty());
    }

    #[test]
    fn test_view_to_bitmap() {
        let bytes = ramp(8 * 2 + 6);
        let view = BitmapView::<PixelRGB>::new(2, 3, 8, &bytes).unwrap();
        let bitmap = view.to_bitmap(0);

        assert_eq!(bitmap.pitch(), 6);
        for y in 0..3 {
            assert_eq!(bitmap.row(y), view.row(y));
        }
        assert!(BitmapView::<PixelRGB>::empty().to_bitmap(0).is_empty());
    }

    #[test]
    fn test_view_mut_set_pixel_unpadded_last_row() {
        let mut bytes = ramp(8 * 2 + 6);
        let mut view = BitmapViewMut::<PixelRGB>::new(2, 3, 8, &mut bytes).unwrap();
        view.set_pixel(1, 2, PixelRGB::from_raw(0xa1b2c3));
        assert_eq!(view.pixel(1, 2).raw(), 0xa1b2c3);
        assert_eq!(view.pixel(0, 2).raw(), 0x101112);

        assert_eq!(&bytes[19..22], &[0xa1, 0xb2, 0xc3]);
        // Padding of the first row is untouched.
        assert_eq!(&bytes[6..8], &[6, 7]);
    }

    #[test]
    fn test_view_mut_layout_errors() {
        let mut bytes = ramp(21);
        assert_eq!(
            BitmapViewMut::<PixelRGB>::new(2, 3, 8, &mut bytes).unwrap_err(),
            LayoutError::DataTooShort { needed: 22, len: 21 }
        );
        assert!(matches!(
            BitmapViewMut::<Pixel565>::new(2, 3, 5, &mut bytes),
            Err(LayoutError::MisalignedPitch { .. })
        ));
        assert!(BitmapViewMut::<Pixel565>::new(0, 3, 0, &mut bytes)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_view_mut_fill_skips_padding() {
        let mut bytes = vec![0u8; 2 * 6 + 4];
        let mut view = BitmapViewMut::<Pixel565>::new(2, 3, 6, &mut bytes).unwrap();
        view.fill(Pixel565::from_raw(0xffff));
        assert_eq!(view.row_mut(2), &[0xff; 4]);
        assert_eq!(&bytes[4..6], &[0, 0]);
        assert_eq!(&bytes[10..12], &[0, 0]);
    }
}
