#![allow(dead_code)]

use lib_bitmap::{Bitmap, BitmapView, Color, Pixel, Pixel565, PixelRGB, Rect};

/// A 565 bitmap whose pixel memory, padding included, counts up from `start`.
pub fn iota_565(width: usize, height: usize, pitch: usize, start: u16) -> Bitmap<Pixel565> {
    let pitch_pixels = if pitch == 0 { width } else { pitch / 2 };
    let data: Vec<u8> = (0..pitch_pixels * height)
        .flat_map(|i| start.wrapping_add(i as u16).to_ne_bytes())
        .collect();
    Bitmap::from_bytes(width, height, pitch, &data)
}

/// A 16x16 bitmap holding 256 distinct shades of gray.
pub fn gradient() -> Bitmap<PixelRGB> {
    let mut bitmap = Bitmap::new(16, 16);
    for i in 0..256 {
        let level = i as f32 / 255.0;
        bitmap.set_pixel(i % 16, i / 16, PixelRGB::from_rgb(level, level, level));
    }
    bitmap
}

/// Compares the pixels of two views of equal size, ignoring padding.
pub fn image_is_same<P: Pixel>(a: &BitmapView<'_, P>, b: &BitmapView<'_, P>) -> bool {
    a.width() == b.width()
        && a.height() == b.height()
        && (0..a.height()).all(|y| a.row(y) == b.row(y))
}

/// Computes the expected result of a clipped copy one pixel at a time.
pub fn reference_copy<P: Pixel>(
    dst: &Bitmap<P>,
    src: &Bitmap<P>,
    src_rect: Rect,
    dst_x: i32,
    dst_y: i32,
) -> Vec<P> {
    let mut expected: Vec<P> = (0..dst.height())
        .flat_map(|y| (0..dst.width()).map(move |x| (x, y)))
        .map(|(x, y)| dst.pixel(x, y))
        .collect();

    for sy in src_rect.y..src_rect.y + src_rect.height {
        for sx in src_rect.x..src_rect.x + src_rect.width {
            let dx = dst_x + (sx - src_rect.x);
            let dy = dst_y + (sy - src_rect.y);
            let inside_src =
                sx >= 0 && sy >= 0 && (sx as usize) < src.width() && (sy as usize) < src.height();
            let inside_dst =
                dx >= 0 && dy >= 0 && (dx as usize) < dst.width() && (dy as usize) < dst.height();
            if inside_src && inside_dst {
                expected[dy as usize * dst.width() + dx as usize] =
                    src.pixel(sx as usize, sy as usize);
            }
        }
    }
    expected
}

/// All pixels of a bitmap in row-major order.
pub fn pixels<P: Pixel>(bitmap: &Bitmap<P>) -> Vec<P> {
    (0..bitmap.height())
        .flat_map(|y| (0..bitmap.width()).map(move |x| (x, y)))
        .map(|(x, y)| bitmap.pixel(x, y))
        .collect()
}
