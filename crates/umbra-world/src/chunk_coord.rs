use serde::{Deserialize, Serialize};

use crate::chunk::CHUNK_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Chunk owning global tile (x, y). Negative coordinates round toward -inf.
    #[inline]
    pub fn containing(x: i32, y: i32) -> Self {
        let s = CHUNK_SIZE as i32;
        Self::new(x.div_euclid(s), y.div_euclid(s))
    }

    #[inline]
    pub fn containing_point(x: f32, y: f32) -> Self {
        Self::containing(x.floor() as i32, y.floor() as i32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            cx: self.cx.wrapping_add(dx),
            cy: self.cy.wrapping_add(dy),
        }
    }

    /// Global tile coordinate of local cell (0, 0).
    ///
    /// Tile space is `i32`, so chunks past `i32::MAX / CHUNK_SIZE` wrap around
    /// instead of overflowing; `containing` never yields such a chunk.
    #[inline]
    pub fn origin(self) -> (i32, i32) {
        let s = CHUNK_SIZE as i32;
        (self.cx.wrapping_mul(s), self.cy.wrapping_mul(s))
    }

    /// Chebyshev distance in chunks; a radius-r neighbourhood is a square.
    #[inline]
    pub fn ring_distance(self, other: ChunkCoord) -> i32 {
        let d = self.cx.abs_diff(other.cx).max(self.cy.abs_diff(other.cy));
        i32::try_from(d).unwrap_or(i32::MAX)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy)
    }
}
