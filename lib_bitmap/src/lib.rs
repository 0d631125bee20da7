pub mod bitmap;
pub mod constants;
pub mod palette;
pub mod pixel;
pub mod rect;
pub mod snapshot;

use log::*;
use std::io::Write;

pub use crate::bitmap::{
    Bitmap, BitmapView, BitmapViewMut, LayoutError, PalettizedBitmap, QuantizeError,
};
pub use crate::palette::{Palette, PaletteError};
pub use crate::pixel::{
    Color, Pixel, Pixel1555, Pixel16, Pixel24, Pixel32, Pixel565, Pixel8, PixelABGR, PixelARGB,
    PixelBGR, PixelBGRA, PixelFormat, PixelRGB, PixelRGBA,
};
pub use crate::rect::{Rect, Transfer};
pub use crate::snapshot::{decode, decode_palettized, encode, encode_palettized};

/// Routes this crate's log records to stderr at `level`.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once, or after another logger
/// was installed, has no effect.
pub fn init_logging(level: LevelFilter) {
    let result = env_logger::Builder::new()
        .filter(Some(constants::LOG_TARGET), level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init();

    if result.is_ok() {
        debug!("Logging initialized at {}", level);
    }
}
