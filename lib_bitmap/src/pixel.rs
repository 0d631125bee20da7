//! Packed pixel codecs.
//!
//! Every pixel type has a fixed size and a fixed channel layout. The layouts form a closed set,
//! each tagged by a [`PixelFormat`]:
//!
//! | type          | format     | bytes | layout                               |
//! |---------------|------------|-------|--------------------------------------|
//! | [`Pixel8`]    | `Index8`   | 1     | palette index                        |
//! | [`Pixel565`]  | `Rgb565`   | 2     | `RRRRRGGG GGGBBBBB`                  |
//! | [`Pixel1555`] | `Argb1555` | 2     | `ARRRRRGG GGGBBBBB`                  |
//! | [`PixelRGB`]  | `Rgb`      | 3     | bytes `R, G, B`                      |
//! | [`PixelBGR`]  | `Bgr`      | 3     | bytes `B, G, R`                      |
//! | [`PixelARGB`] | `Argb`     | 4     | bytes `A, R, G, B`                   |
//! | [`PixelRGBA`] | `Rgba`     | 4     | bytes `R, G, B, A`                   |
//! | [`PixelBGRA`] | `Bgra`     | 4     | bytes `B, G, R, A`                   |
//! | [`PixelABGR`] | `Abgr`     | 4     | bytes `A, B, G, R`                   |
//!
//! 16-bit pixels are stored in native byte order. For 24 and 32-bit pixels the raw value is the
//! big-endian assembly of the stored bytes, so `PixelRGB` with raw value `0xFF8000` is stored as
//! `[0xFF, 0x80, 0x00]`.
//!
//! Channel values are normalized to `[0, 1]`. Writing a channel quantizes with
//! `(level * max + 0.5)` truncated toward zero, reading divides the stored value by `max`.
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Tag naming each supported pixel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Index8,
    Rgb565,
    Argb1555,
    Rgb,
    Bgr,
    Argb,
    Rgba,
    Bgra,
    Abgr,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Index8 => 1,
            PixelFormat::Rgb565 | PixelFormat::Argb1555 => 2,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Argb | PixelFormat::Rgba | PixelFormat::Bgra | PixelFormat::Abgr => 4,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Argb1555
                | PixelFormat::Argb
                | PixelFormat::Rgba
                | PixelFormat::Bgra
                | PixelFormat::Abgr
        )
    }
}

/// A fixed-size value stored in a pixel buffer.
pub trait Pixel: Copy + Default + PartialEq + fmt::Debug + 'static {
    const FORMAT: PixelFormat;

    /// Size of a pixel in bytes.
    const SIZE: usize = Self::FORMAT.bytes_per_pixel();

    /// Returns the raw pixel value.
    fn raw(&self) -> u32;

    /// Creates a pixel from its raw value. Bits above the pixel's width are dropped.
    fn from_raw(raw: u32) -> Self;

    /// Reads a pixel from the first `SIZE` bytes of `bytes`.
    fn read(bytes: &[u8]) -> Self;

    /// Writes the pixel into the first `SIZE` bytes of `bytes`.
    fn write(&self, bytes: &mut [u8]);
}

/// A pixel carrying color channels.
pub trait Color: Pixel {
    /// Creates a pixel from normalized channels. `alpha` is ignored if the layout has none.
    fn from_channels(red: f32, green: f32, blue: f32, alpha: f32) -> Self;

    /// Creates an opaque pixel.
    fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::from_channels(red, green, blue, 1.0)
    }

    fn red(&self) -> f32;
    fn green(&self) -> f32;
    fn blue(&self) -> f32;

    /// Returns the alpha value, or 0 if the layout has no alpha channel.
    fn alpha(&self) -> f32;

    fn set_red(&mut self, red: f32);
    fn set_green(&mut self, green: f32);
    fn set_blue(&mut self, blue: f32);

    /// Sets the alpha value. Does nothing if the layout has no alpha channel.
    fn set_alpha(&mut self, alpha: f32);
}

/// An 8-bit palette index.
pub type Pixel8 = u8;

impl Pixel for u8 {
    const FORMAT: PixelFormat = PixelFormat::Index8;

    fn raw(&self) -> u32 {
        u32::from(*self)
    }

    fn from_raw(raw: u32) -> Self {
        raw as u8
    }

    fn read(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn write(&self, bytes: &mut [u8]) {
        bytes[0] = *self;
    }
}

fn quantize(level: f32, max: u32) -> u32 {
    debug_assert!(
        (0.0..=1.0).contains(&level),
        "channel value {level} outside of [0, 1]"
    );
    ((level * max as f32 + 0.5) as u32) & max
}

fn byte_level(value: u8) -> f32 {
    f32::from(value) / 255.0
}

fn byte_quantize(level: f32) -> u8 {
    quantize(level, 0xff) as u8
}

/// A bit field inside a 16-bit pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Mask of the channel after shifting it down, i.e. its maximum level.
    pub mask: u16,
    pub offset: u32,
}

impl Channel {
    pub const fn new(mask: u16, offset: u32) -> Self {
        Self { mask, offset }
    }

    fn get(self, value: u16) -> f32 {
        f32::from((value >> self.offset) & self.mask) / f32::from(self.mask)
    }

    fn set(self, value: u16, level: f32) -> u16 {
        let bits = quantize(level, u32::from(self.mask)) as u16;
        (value & !(self.mask << self.offset)) | (bits << self.offset)
    }
}

/// Channel layouts of the supported pixel types.
pub mod layouts {
    use super::{Channel, PixelFormat};
    use std::fmt::Debug;
    use std::hash::Hash;

    /// Bit layout of a 16-bit pixel.
    pub trait Layout16: Copy + Default + Eq + Hash + Debug + 'static {
        const FORMAT: PixelFormat;
        const RED: Channel;
        const GREEN: Channel;
        const BLUE: Channel;
        const ALPHA: Option<Channel>;
    }

    /// Byte positions of the channels of a 24-bit pixel.
    pub trait Layout24: Copy + Default + Eq + Hash + Debug + 'static {
        const FORMAT: PixelFormat;
        const RED: usize;
        const GREEN: usize;
        const BLUE: usize;
    }

    /// Byte positions of the channels of a 32-bit pixel.
    pub trait Layout32: Copy + Default + Eq + Hash + Debug + 'static {
        const FORMAT: PixelFormat;
        const ALPHA: usize;
        const RED: usize;
        const GREEN: usize;
        const BLUE: usize;
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Rgb565;

    impl Layout16 for Rgb565 {
        const FORMAT: PixelFormat = PixelFormat::Rgb565;
        const RED: Channel = Channel::new(0x1f, 11);
        const GREEN: Channel = Channel::new(0x3f, 5);
        const BLUE: Channel = Channel::new(0x1f, 0);
        const ALPHA: Option<Channel> = None;
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Argb1555;

    impl Layout16 for Argb1555 {
        const FORMAT: PixelFormat = PixelFormat::Argb1555;
        const RED: Channel = Channel::new(0x1f, 10);
        const GREEN: Channel = Channel::new(0x1f, 5);
        const BLUE: Channel = Channel::new(0x1f, 0);
        const ALPHA: Option<Channel> = Some(Channel::new(0x01, 15));
    }

    macro_rules! layout24 {
        ($name:ident, $format:ident, $r:expr, $g:expr, $b:expr) => {
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Layout24 for $name {
                const FORMAT: PixelFormat = PixelFormat::$format;
                const RED: usize = $r;
                const GREEN: usize = $g;
                const BLUE: usize = $b;
            }
        };
    }

    macro_rules! layout32 {
        ($name:ident, $format:ident, $a:expr, $r:expr, $g:expr, $b:expr) => {
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Layout32 for $name {
                const FORMAT: PixelFormat = PixelFormat::$format;
                const ALPHA: usize = $a;
                const RED: usize = $r;
                const GREEN: usize = $g;
                const BLUE: usize = $b;
            }
        };
    }

    layout24!(Rgb, Rgb, 0, 1, 2);
    layout24!(Bgr, Bgr, 2, 1, 0);

    layout32!(Argb, Argb, 0, 1, 2, 3);
    layout32!(Rgba, Rgba, 3, 0, 1, 2);
    layout32!(Bgra, Bgra, 3, 2, 1, 0);
    layout32!(Abgr, Abgr, 0, 3, 2, 1);
}

use layouts::{Layout16, Layout24, Layout32};

/// A 16-bit pixel with the bit layout `L`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Pixel16<L> {
    value: u16,
    #[serde(skip)]
    layout: PhantomData<L>,
}

impl<L> Pixel16<L> {
    pub const fn new(value: u16) -> Self {
        Self {
            value,
            layout: PhantomData,
        }
    }

    pub const fn value(self) -> u16 {
        self.value
    }
}

impl<L: Layout16> fmt::Debug for Pixel16<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#06x})", L::FORMAT, self.value)
    }
}

impl<L: Layout16> Pixel for Pixel16<L> {
    const FORMAT: PixelFormat = L::FORMAT;

    fn raw(&self) -> u32 {
        u32::from(self.value)
    }

    fn from_raw(raw: u32) -> Self {
        Self::new(raw as u16)
    }

    fn read(bytes: &[u8]) -> Self {
        Self::new(u16::from_ne_bytes([bytes[0], bytes[1]]))
    }

    fn write(&self, bytes: &mut [u8]) {
        bytes[..2].copy_from_slice(&self.value.to_ne_bytes());
    }
}

impl<L: Layout16> Color for Pixel16<L> {
    fn from_channels(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        let mut pixel = Self::new(0);
        pixel.set_red(red);
        pixel.set_green(green);
        pixel.set_blue(blue);
        pixel.set_alpha(alpha);
        pixel
    }

    fn red(&self) -> f32 {
        L::RED.get(self.value)
    }

    fn green(&self) -> f32 {
        L::GREEN.get(self.value)
    }

    fn blue(&self) -> f32 {
        L::BLUE.get(self.value)
    }

    fn alpha(&self) -> f32 {
        L::ALPHA.map_or(0.0, |channel| channel.get(self.value))
    }

    fn set_red(&mut self, red: f32) {
        self.value = L::RED.set(self.value, red);
    }

    fn set_green(&mut self, green: f32) {
        self.value = L::GREEN.set(self.value, green);
    }

    fn set_blue(&mut self, blue: f32) {
        self.value = L::BLUE.set(self.value, blue);
    }

    fn set_alpha(&mut self, alpha: f32) {
        if let Some(channel) = L::ALPHA {
            self.value = channel.set(self.value, alpha);
        }
    }
}

/// A 24-bit pixel with the byte order `L`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Pixel24<L> {
    bytes: [u8; 3],
    #[serde(skip)]
    layout: PhantomData<L>,
}

impl<L> Pixel24<L> {
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            bytes,
            layout: PhantomData,
        }
    }

    pub const fn bytes(self) -> [u8; 3] {
        self.bytes
    }
}

impl<L: Layout24> fmt::Debug for Pixel24<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#08x})", L::FORMAT, self.raw())
    }
}

impl<L: Layout24> Pixel for Pixel24<L> {
    const FORMAT: PixelFormat = L::FORMAT;

    fn raw(&self) -> u32 {
        let [b0, b1, b2] = self.bytes;
        u32::from_be_bytes([0, b0, b1, b2])
    }

    fn from_raw(raw: u32) -> Self {
        let [_, b0, b1, b2] = raw.to_be_bytes();
        Self::from_bytes([b0, b1, b2])
    }

    fn read(bytes: &[u8]) -> Self {
        Self::from_bytes([bytes[0], bytes[1], bytes[2]])
    }

    fn write(&self, bytes: &mut [u8]) {
        bytes[..3].copy_from_slice(&self.bytes);
    }
}

impl<L: Layout24> Color for Pixel24<L> {
    fn from_channels(red: f32, green: f32, blue: f32, _alpha: f32) -> Self {
        let mut pixel = Self::default();
        pixel.set_red(red);
        pixel.set_green(green);
        pixel.set_blue(blue);
        pixel
    }

    fn red(&self) -> f32 {
        byte_level(self.bytes[L::RED])
    }

    fn green(&self) -> f32 {
        byte_level(self.bytes[L::GREEN])
    }

    fn blue(&self) -> f32 {
        byte_level(self.bytes[L::BLUE])
    }

    fn alpha(&self) -> f32 {
        0.0
    }

    fn set_red(&mut self, red: f32) {
        self.bytes[L::RED] = byte_quantize(red);
    }

    fn set_green(&mut self, green: f32) {
        self.bytes[L::GREEN] = byte_quantize(green);
    }

    fn set_blue(&mut self, blue: f32) {
        self.bytes[L::BLUE] = byte_quantize(blue);
    }

    fn set_alpha(&mut self, _alpha: f32) {}
}

/// A 32-bit pixel with the byte order `L`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Pixel32<L> {
    bytes: [u8; 4],
    #[serde(skip)]
    layout: PhantomData<L>,
}

impl<L> Pixel32<L> {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            bytes,
            layout: PhantomData,
        }
    }

    pub const fn bytes(self) -> [u8; 4] {
        self.bytes
    }
}

impl<L: Layout32> fmt::Debug for Pixel32<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#010x})", L::FORMAT, self.raw())
    }
}

impl<L: Layout32> Pixel for Pixel32<L> {
    const FORMAT: PixelFormat = L::FORMAT;

    fn raw(&self) -> u32 {
        u32::from_be_bytes(self.bytes)
    }

    fn from_raw(raw: u32) -> Self {
        Self::from_bytes(raw.to_be_bytes())
    }

    fn read(bytes: &[u8]) -> Self {
        Self::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn write(&self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.bytes);
    }
}

impl<L: Layout32> Color for Pixel32<L> {
    fn from_channels(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        let mut pixel = Self::default();
        pixel.set_red(red);
        pixel.set_green(green);
        pixel.set_blue(blue);
        pixel.set_alpha(alpha);
        pixel
    }

    fn red(&self) -> f32 {
        byte_level(self.bytes[L::RED])
    }

    fn green(&self) -> f32 {
        byte_level(self.bytes[L::GREEN])
    }

    fn blue(&self) -> f32 {
        byte_level(self.bytes[L::BLUE])
    }

    fn alpha(&self) -> f32 {
        byte_level(self.bytes[L::ALPHA])
    }

    fn set_red(&mut self, red: f32) {
        self.bytes[L::RED] = byte_quantize(red);
    }

    fn set_green(&mut self, green: f32) {
        self.bytes[L::GREEN] = byte_quantize(green);
    }

    fn set_blue(&mut self, blue: f32) {
        self.bytes[L::BLUE] = byte_quantize(blue);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.bytes[L::ALPHA] = byte_quantize(alpha);
    }
}

/// 16-bit R5G6B5 pixel.
pub type Pixel565 = Pixel16<layouts::Rgb565>;
/// 16-bit A1R5G5B5 pixel.
pub type Pixel1555 = Pixel16<layouts::Argb1555>;
/// 24-bit R8G8B8 pixel.
pub type PixelRGB = Pixel24<layouts::Rgb>;
/// 24-bit B8G8R8 pixel.
pub type PixelBGR = Pixel24<layouts::Bgr>;
/// 32-bit A8R8G8B8 pixel.
pub type PixelARGB = Pixel32<layouts::Argb>;
/// 32-bit R8G8B8A8 pixel.
pub type PixelRGBA = Pixel32<layouts::Rgba>;
/// 32-bit B8G8R8A8 pixel.
pub type PixelBGRA = Pixel32<layouts::Bgra>;
/// 32-bit A8B8G8R8 pixel.
pub type PixelABGR = Pixel32<layouts::Abgr>;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_size<P: Pixel>() {
        assert_eq!(P::SIZE, std::mem::size_of::<P>(), "{:?}", P::FORMAT);
    }

    #[test]
    fn test_sizes_match_formats() {
        assert_size::<Pixel8>();
        assert_size::<Pixel565>();
        assert_size::<Pixel1555>();
        assert_size::<PixelRGB>();
        assert_size::<PixelBGR>();
        assert_size::<PixelARGB>();
        assert_size::<PixelRGBA>();
        assert_size::<PixelBGRA>();
        assert_size::<PixelABGR>();
    }

    #[test]
    fn test_565_packing() {
        assert_eq!(Pixel565::from_rgb(1.0, 0.0, 0.0).raw(), 0xf800);
        assert_eq!(Pixel565::from_rgb(0.0, 1.0, 0.0).raw(), 0x07e0);
        assert_eq!(Pixel565::from_rgb(0.0, 0.0, 1.0).raw(), 0x001f);
        assert_eq!(Pixel565::from_rgb(1.0, 1.0, 1.0).raw(), 0xffff);
    }

    #[test]
    fn test_565_has_no_alpha() {
        let mut pixel = Pixel565::from_channels(1.0, 1.0, 1.0, 1.0);
        assert_eq!(pixel.alpha(), 0.0);
        pixel.set_alpha(0.0);
        assert_eq!(pixel.raw(), 0xffff);
    }

    #[test]
    fn test_1555_packing() {
        assert_eq!(Pixel1555::from_channels(0.0, 0.0, 0.0, 1.0).raw(), 0x8000);
        assert_eq!(Pixel1555::from_channels(1.0, 0.0, 0.0, 0.0).raw(), 0x7c00);
        assert_eq!(Pixel1555::from_channels(0.0, 1.0, 0.0, 0.0).raw(), 0x03e0);
        assert_eq!(Pixel1555::from_raw(0x8000).alpha(), 1.0);
    }

    #[test]
    fn test_set_channel_keeps_others() {
        let mut pixel = Pixel565::from_raw(0xffff);
        pixel.set_red(0.0);
        assert_eq!(pixel.raw(), 0x07ff);
        pixel.set_blue(0.0);
        assert_eq!(pixel.raw(), 0x07e0);
    }

    #[test]
    fn test_5_bit_round_trip_tolerance() {
        for step in 0..=1000 {
            let level = step as f32 / 1000.0;
            let mut pixel = Pixel565::default();
            pixel.set_red(level);
            assert!(
                (pixel.red() - level).abs() <= 1.0 / 31.0,
                "{level} read back as {}",
                pixel.red()
            );
        }
    }

    #[test]
    fn test_quantization_rounds_half_up() {
        let mut pixel = Pixel565::default();
        // 0.5 * 31 + 0.5 = 16
        pixel.set_red(0.5);
        assert_eq!(pixel.raw() >> 11, 16);
        // 0.48 * 31 + 0.5 = 15.38
        pixel.set_red(0.48);
        assert_eq!(pixel.raw() >> 11, 15);
        pixel.set_red(16.0 / 31.0);
        assert_eq!(pixel.red(), 16.0 / 31.0);
    }

    #[test]
    fn test_24_bit_byte_order() {
        let rgb = PixelRGB::from_rgb(1.0, 0.5, 0.0);
        assert_eq!(rgb.bytes(), [0xff, 0x80, 0x00]);
        assert_eq!(rgb.raw(), 0xff8000);

        let bgr = PixelBGR::from_rgb(1.0, 0.5, 0.0);
        assert_eq!(bgr.bytes(), [0x00, 0x80, 0xff]);
        assert_eq!(bgr.raw(), 0x0080ff);
        assert_eq!(bgr.alpha(), 0.0);

        assert_eq!(PixelRGB::from_raw(0x123456).bytes(), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_32_bit_byte_order() {
        assert_eq!(PixelARGB::from_rgb(1.0, 0.0, 0.0).raw(), 0xffff0000);
        assert_eq!(PixelRGBA::from_rgb(1.0, 0.0, 0.0).raw(), 0xff0000ff);
        assert_eq!(PixelBGRA::from_rgb(1.0, 0.0, 0.0).raw(), 0x0000ffff);
        assert_eq!(PixelABGR::from_rgb(1.0, 0.0, 0.0).raw(), 0xff0000ff);

        let pixel = PixelARGB::from_raw(0x80ff4000);
        assert_eq!(pixel.alpha(), 128.0 / 255.0);
        assert_eq!(pixel.red(), 1.0);
        assert_eq!(pixel.green(), 64.0 / 255.0);
        assert_eq!(pixel.blue(), 0.0);
    }

    #[test]
    fn test_read_write_bytes() {
        let mut bytes = [0u8; 6];
        Pixel565::from_raw(0xabcd).write(&mut bytes[2..]);
        assert_eq!(Pixel565::read(&bytes[2..]).raw(), 0xabcd);
        assert_eq!(&bytes[2..4], &0xabcdu16.to_ne_bytes());

        PixelBGRA::from_raw(0x01020304).write(&mut bytes);
        assert_eq!(&bytes[..4], &[1, 2, 3, 4]);
        assert_eq!(PixelBGRA::read(&bytes).raw(), 0x01020304);
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(PixelFormat::Index8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Bgr.bytes_per_pixel(), 3);
        assert!(PixelFormat::Argb1555.has_alpha());
        assert!(!PixelFormat::Rgb565.has_alpha());
        assert!(!PixelFormat::Rgb.has_alpha());
    }

    #[test]
    #[should_panic(expected = "outside of [0, 1]")]
    fn test_channel_above_one_panics() {
        let mut pixel = Pixel565::default();
        pixel.set_red(1.5);
    }

    #[test]
    #[should_panic(expected = "outside of [0, 1]")]
    fn test_channel_below_zero_panics() {
        let _ = PixelARGB::from_channels(0.0, -0.25, 0.0, 1.0);
    }
}
