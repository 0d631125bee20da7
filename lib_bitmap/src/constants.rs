/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// Magic number at the start of every snapshot.
pub const MAGIC_HEADER: [u8; 4] = *b"PXB1";
pub const MAGIC_SIZE: usize = MAGIC_HEADER.len();

/// Log target used by [`crate::init_logging`].
pub const LOG_TARGET: &str = "lib_bitmap";
