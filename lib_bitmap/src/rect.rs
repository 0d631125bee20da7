/// An axis-aligned integer rectangle.
///
/// A rectangle with a non-positive width or height is empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle `{0, 0, width, height}` covering a buffer of the given size.
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, saturate(width as i64), saturate(height as i64))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// One past the right-most column.
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Returns the intersection of `self` and `other`.
    ///
    /// Disjoint rectangles produce a rectangle with zero width and/or height, never a negative
    /// one. The origin of such a rectangle is the corner the intersection would start at.
    pub fn clip(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Rect {
            x: left,
            y: top,
            width: saturate(right - i64::from(left)),
            height: saturate(bottom - i64::from(top)),
        }
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(0, i64::from(i32::MAX)) as i32
}

/// A block transfer between two buffers after clipping against both of them.
///
/// `src` lies fully inside the source buffer and the rectangle of the same size at
/// `(dst_x, dst_y)` lies fully inside the destination buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub src: Rect,
    pub dst_x: i32,
    pub dst_y: i32,
}

impl Transfer {
    /// Clips `src_rect` against the source extent and then against the destination extent.
    ///
    /// Whenever one side's origin is trimmed, the other side's origin moves by the same amount,
    /// so each source pixel still lands on the destination pixel it was aimed at. Returns `None`
    /// when nothing remains to be copied.
    pub fn clip(
        src_rect: Rect,
        (src_width, src_height): (usize, usize),
        dst_x: i32,
        dst_y: i32,
        (dst_width, dst_height): (usize, usize),
    ) -> Option<Transfer> {
        // Source side.
        let src = src_rect.clip(&Rect::from_size(src_width, src_height));
        if src.is_empty() {
            return None;
        }

        // Trimming only ever moves the origin forward, so an overflow means the destination
        // position is past any buffer.
        let dst_x = i32::try_from(i64::from(dst_x) + i64::from(src.x) - i64::from(src_rect.x)).ok()?;
        let dst_y = i32::try_from(i64::from(dst_y) + i64::from(src.y) - i64::from(src_rect.y)).ok()?;

        // Destination side.
        let dst = Rect::new(dst_x, dst_y, src.width, src.height)
            .clip(&Rect::from_size(dst_width, dst_height));
        if dst.is_empty() {
            return None;
        }

        Some(Transfer {
            src: Rect::new(
                src.x + (dst.x - dst_x),
                src.y + (dst.y - dst_y),
                dst.width,
                dst.height,
            ),
            dst_x: dst.x,
            dst_y: dst.y,
        })
    }

    pub fn width(&self) -> usize {
        self.src.width as usize
    }

    pub fn height(&self) -> usize {
        self.src.height as usize
    }
}
