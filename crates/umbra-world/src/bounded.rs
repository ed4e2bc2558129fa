use umbra_geom::Cell;
use umbra_tiles::{MaterialCatalog, MaterialId, Tile};

use crate::map::TileMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Finite, hand-built map. Everything outside it reads as a wall.
#[derive(Clone, Debug)]
pub struct BoundedMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    fallback: Tile,
}

impl BoundedMap {
    /// Map of open floor surrounded by nothing (bounds act as walls).
    pub fn open(width: usize, height: usize, fallback: MaterialId) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Open; width * height],
            fallback: Tile::Wall(fallback),
        }
    }

    /// Rows of level codes: 0 open, 9 exit, anything else a wall variant.
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R], catalog: &MaterialCatalog) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }
        let mut tiles = Vec::with_capacity(width * height);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MapError::Ragged {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            tiles.extend(row.iter().map(|&c| catalog.tile_for_code(c)));
        }
        Ok(Self {
            width,
            height,
            tiles,
            fallback: Tile::Wall(catalog.default_wall()),
        })
    }

    /// The 16x16 walled test room with mixed wall materials.
    pub fn demo(catalog: &MaterialCatalog) -> Self {
        const ROWS: [[u8; 16]; 16] = [
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 2, 2, 2, 0, 0, 0, 0, 3, 3, 3, 0, 0, 1],
            [1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 1],
            [1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 3, 3, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 1],
            [1, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 1],
            [1, 0, 0, 3, 3, 3, 0, 0, 0, 0, 2, 2, 2, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9, 1],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ];
        match Self::from_codes(&ROWS, catalog) {
            Ok(map) => map,
            Err(_) => Self::open(16, 16, catalog.default_wall()),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Overwrites one cell; ignored outside the map.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let i = y as usize * self.width + x as usize;
            self.tiles[i] = tile;
        }
    }

    pub fn find_open_near(&self, x: i32, y: i32, radius: i32) -> Option<Cell> {
        crate::grid::find_open_near(self, x, y, radius)
    }
}

impl TileMap for BoundedMap {
    fn tile_at(&self, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return self.fallback;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    fn bounds(&self) -> Option<(usize, usize)> {
        Some((self.width, self.height))
    }
}
