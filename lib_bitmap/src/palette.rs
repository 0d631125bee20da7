use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::PALETTE_SIZE;
use crate::pixel::Pixel;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("Palette must have exactly 256 entries, got {0}")]
    WrongLength(usize),
}

/// A 256-entry color lookup table.
///
/// Indexing outside `0..256` panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<C>",
    into = "Vec<C>",
    bound(serialize = "C: Pixel + Serialize", deserialize = "C: Pixel + Deserialize<'de>")
)]
pub struct Palette<C: Pixel> {
    entries: [C; PALETTE_SIZE],
}

impl<C: Pixel> Palette<C> {
    /// Creates a palette with every entry set to the default pixel.
    pub fn new() -> Self {
        Self {
            entries: [C::default(); PALETTE_SIZE],
        }
    }

    /// Creates a palette from exactly 256 entries.
    ///
    /// # Panics
    /// If `entries` does not hold exactly 256 values.
    pub fn from_entries(entries: &[C]) -> Self {
        match Self::try_from(entries.to_vec()) {
            Ok(palette) => palette,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn entries(&self) -> &[C; PALETTE_SIZE] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [C; PALETTE_SIZE] {
        &mut self.entries
    }

    pub fn get(&self, index: usize) -> C {
        self[index]
    }

    pub fn set(&mut self, index: usize, color: C) {
        self[index] = color;
    }

    /// Resolves a palette index pixel.
    pub fn lookup(&self, index: u8) -> C {
        self.entries[usize::from(index)]
    }
}

impl<C: Pixel> Default for Palette<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_index(index: usize) {
    assert!(
        index < PALETTE_SIZE,
        "palette index {index} out of range 0..{PALETTE_SIZE}"
    );
}

impl<C: Pixel> Index<usize> for Palette<C> {
    type Output = C;

    fn index(&self, index: usize) -> &C {
        check_index(index);
        &self.entries[index]
    }
}

impl<C: Pixel> IndexMut<usize> for Palette<C> {
    fn index_mut(&mut self, index: usize) -> &mut C {
        check_index(index);
        &mut self.entries[index]
    }
}

impl<C: Pixel> TryFrom<Vec<C>> for Palette<C> {
    type Error = PaletteError;

    fn try_from(entries: Vec<C>) -> Result<Self, Self::Error> {
        let len = entries.len();
        let entries: [C; PALETTE_SIZE] = entries
            .try_into()
            .map_err(|_| PaletteError::WrongLength(len))?;
        Ok(Self { entries })
    }
}

impl<C: Pixel> From<Palette<C>> for Vec<C> {
    fn from(palette: Palette<C>) -> Self {
        palette.entries.to_vec()
    }
}
