use umbra_tiles::Tile;

use crate::chunk_coord::ChunkCoord;

pub const CHUNK_SIZE: usize = 16;

/// One generated square of tiles. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    tiles: Vec<Tile>,
}

impl Chunk {
    #[inline]
    pub fn idx(x: usize, y: usize) -> usize {
        y * CHUNK_SIZE + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize) -> Tile {
        self.tiles[Self::idx(x, y)]
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32) -> bool {
        let (bx, by) = self.coord.origin();
        let s = CHUNK_SIZE as i32;
        (0..s).contains(&wx.wrapping_sub(bx)) && (0..s).contains(&wy.wrapping_sub(by))
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32) -> Option<Tile> {
        if !self.contains_world(wx, wy) {
            return None;
        }
        let (bx, by) = self.coord.origin();
        Some(self.get_local(wx.wrapping_sub(bx) as usize, wy.wrapping_sub(by) as usize))
    }

    /// Builds a chunk from row-major tiles, padding or truncating to the fixed size.
    pub fn from_tiles_local(coord: ChunkCoord, tiles: Vec<Tile>) -> Self {
        let mut t = tiles;
        let expect = CHUNK_SIZE * CHUNK_SIZE;
        if t.len() != expect {
            t.resize(expect, Tile::Open);
        }
        Chunk { coord, tiles: t }
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Stable per-tile encoding, suitable for byte-level comparison.
    pub fn codes(&self) -> Vec<u16> {
        self.tiles.iter().map(|t| t.code()).collect()
    }

    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_wall()).count()
    }

    pub fn exit_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_exit()).count()
    }
}
