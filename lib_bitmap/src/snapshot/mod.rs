//! Self-describing in-memory snapshots of bitmaps.
//!
//! A snapshot is the magic number, a bincode-encoded [`SnapshotHeader`], the palette for
//! palettized bitmaps, and finally all `pitch * height` bytes of pixel memory, padding included.
pub mod decoder;
pub mod encoder;
pub mod format;

pub use decoder::{decode, decode_palettized, DecodeError};
pub use encoder::{encode, encode_palettized, EncodeError};
pub use format::SnapshotHeader;
