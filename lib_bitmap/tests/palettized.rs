mod common;

use common::{gradient, image_is_same, pixels};
use lib_bitmap::{
    Bitmap, Palette, PalettizedBitmap, Pixel, Pixel565, PixelRGB, QuantizeError, Rect,
};

fn thousands_palette() -> Palette<Pixel565> {
    let mut palette = Palette::new();
    for k in 0..4 {
        palette[k] = Pixel565::from_raw(k as u32 * 1000);
    }
    palette
}

#[test]
fn test_decompressed_region_lookup() {
    let bitmap = PalettizedBitmap::from_bytes(2, 2, 0, &[0, 1, 2, 3], &thousands_palette());
    let color = bitmap.decompressed_region(0, 0, 2, 2, 0);

    assert_eq!(color.width(), 2);
    assert_eq!(color.height(), 2);
    assert_eq!(color.pitch(), 4);
    let raw: Vec<u32> = pixels(&color).iter().map(|pixel| pixel.raw()).collect();
    assert_eq!(raw, vec![0, 1000, 2000, 3000]);
}

#[test]
fn test_decompressed_region_clipped_with_pitch() {
    let indices: Vec<u8> = (0..16).map(|i| (i % 4) as u8).collect();
    let bitmap = PalettizedBitmap::from_bytes(4, 4, 0, &indices, &thousands_palette());

    let color = bitmap.decompressed_region(2, -1, 10, 3, 16);
    assert_eq!((color.width(), color.height()), (2, 2));
    assert_eq!(color.pitch(), 16);
    for y in 0..2 {
        assert_eq!(color.pixel(0, y).raw(), 2000);
        assert_eq!(color.pixel(1, y).raw(), 3000);
    }

    assert!(bitmap.decompressed_region(4, 0, 2, 2, 0).is_empty());
    assert!(bitmap.decompressed_region(0, 0, -1, 2, 0).is_empty());
}

#[test]
fn test_decompress_matches_color_lookup() {
    let mut bitmap = PalettizedBitmap::<PixelRGB>::new(7, 5);
    for i in 0..256 {
        bitmap.palette_mut()[i] = PixelRGB::from_raw(((i as u32) << 8) | 0x0f);
    }
    for y in 0..5 {
        for x in 0..7 {
            bitmap.set_index(x, y, (x * 31 + y * 7) as u8);
        }
    }

    let color = bitmap.decompress();
    for y in 0..5 {
        for x in 0..7 {
            assert_eq!(color.pixel(x, y), bitmap.color(x, y));
        }
    }
}

#[test]
fn test_draw_leaves_outside_untouched() {
    let bitmap = PalettizedBitmap::from_bytes(2, 2, 0, &[0, 1, 2, 3], &thousands_palette());
    let background = Pixel565::from_raw(0xffff);
    let mut target = Bitmap::<Pixel565>::new(3, 3);
    target.fill(background);

    bitmap.draw(Rect::new(0, 0, 2, 2), &mut target, 2, -1);

    for y in 0..3 {
        for x in 0..3 {
            let expected = match (x, y) {
                (2, 0) => 2000,
                _ => 0xffff,
            };
            assert_eq!(target.pixel(x, y).raw(), expected, "pixel ({x}, {y})");
        }
    }

    bitmap.draw(Rect::new(0, 0, 2, 2), &mut target, 5, 5);
    assert_eq!(target.pixel(2, 2), background);
}

#[test]
fn test_quantize_gradient() {
    let source = gradient();
    let palettized = PalettizedBitmap::quantize(&source).unwrap();

    assert_eq!(palettized.width(), 16);
    assert_eq!(palettized.height(), 16);
    for i in 0..256 {
        assert_eq!(palettized.index(i % 16, i / 16), i as u8);
    }
    assert!(image_is_same(
        &palettized.decompress().view(),
        &source.view()
    ));
}

#[test]
fn test_quantize_overflow() {
    // 256 grays plus one extra color in the last column.
    let mut wide = Bitmap::<PixelRGB>::new(17, 16);
    wide.copy(&gradient(), Rect::new(0, 0, 16, 16), 0, 0);
    wide.set_pixel(16, 15, PixelRGB::from_raw(0x123456));

    assert!(matches!(
        PalettizedBitmap::quantize(&wide),
        Err(QuantizeError::PaletteOverflow(257))
    ));
}

#[test]
fn test_copy_reinterprets_indices() {
    let source = PalettizedBitmap::from_bytes(2, 2, 0, &[0, 1, 2, 3], &thousands_palette());
    let mut target = PalettizedBitmap::<Pixel565>::new(4, 4);
    for k in 0..4 {
        target.palette_mut()[k] = Pixel565::from_raw(k as u32 + 1);
    }

    target.copy(&source, Rect::new(0, 0, 2, 2), 3, 3);

    assert_eq!(target.index(3, 3), 0);
    assert_eq!(target.color(3, 3).raw(), 1);
    assert_eq!(target.index(2, 2), 0);
    assert_eq!(target.palette()[3].raw(), 4);
}

#[test]
fn test_load_replaces_indices_and_palette() {
    let mut bitmap = PalettizedBitmap::<Pixel565>::new(8, 8);
    let palette = thousands_palette();

    bitmap.load(2, 1, 4, &[3, 2, 0xaa, 0xbb], &palette);

    assert_eq!((bitmap.width(), bitmap.height(), bitmap.pitch()), (2, 1, 4));
    assert_eq!(bitmap.color(0, 0).raw(), 3000);
    assert_eq!(bitmap.color(1, 0).raw(), 2000);
    assert_eq!(bitmap.palette(), &palette);
}
