use std::sync::Arc;

use hashbrown::HashMap;
use umbra_geom::Cell;
use umbra_tiles::Tile;

use crate::chunk::Chunk;
use crate::chunk_coord::ChunkCoord;
use crate::map::TileMap;
use crate::noise::NoiseGenerator;
use crate::worldgen::WorldGenParams;

/// Lazily generated, unbounded tile world.
///
/// Chunks are only ever added by `ensure_loaded`/`ensure_chunk`; eviction is
/// left to the caller via `unload_outside`.
pub struct WorldGrid {
    generator: NoiseGenerator,
    chunks: HashMap<ChunkCoord, Chunk>,
    load_radius: i32,
    fallback: Tile,
}

impl WorldGrid {
    pub fn new(seed: i32, params: Arc<WorldGenParams>) -> Self {
        let load_radius = params.load_radius;
        let fallback = Tile::Wall(params.fallback_wall());
        Self {
            generator: NoiseGenerator::new(seed, params),
            chunks: HashMap::new(),
            load_radius,
            fallback,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.generator.seed()
    }

    #[inline]
    pub fn load_radius(&self) -> i32 {
        self.load_radius
    }

    #[inline]
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Generates `coord` if missing. Returns true when it was generated now.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        let chunk = self.generator.generate_chunk(coord);
        log::debug!(
            target: "world",
            "generated chunk ({}, {}) walls={} exits={}",
            coord.cx,
            coord.cy,
            chunk.wall_count(),
            chunk.exit_count()
        );
        self.chunks.insert(coord, chunk);
        true
    }

    /// Makes sure the square neighbourhood around the viewer's chunk exists.
    /// Returns how many chunks were generated by this call.
    pub fn ensure_loaded(&mut self, viewer_x: f32, viewer_y: f32) -> usize {
        let center = ChunkCoord::containing_point(viewer_x, viewer_y);
        let r = self.load_radius;
        let mut generated = 0;
        for dy in -r..=r {
            for dx in -r..=r {
                if self.ensure_chunk(center.offset(dx, dy)) {
                    generated += 1;
                }
            }
        }
        if generated > 0 {
            log::info!(
                target: "world",
                "loaded {} chunk(s) around ({}, {}); {} resident",
                generated,
                center.cx,
                center.cy,
                self.chunks.len()
            );
        }
        generated
    }

    /// Drops chunks farther than `radius` (Chebyshev, in chunks) from `center`.
    pub fn unload_outside(&mut self, center: ChunkCoord, radius: i32) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|c, _| c.ring_distance(center) <= radius);
        let dropped = before - self.chunks.len();
        if dropped > 0 {
            log::debug!(target: "world", "evicted {} chunk(s)", dropped);
        }
        dropped
    }

    /// Nearest loaded open cell to (x, y), searching rings out to `radius`.
    pub fn find_open_near(&self, x: i32, y: i32, radius: i32) -> Option<Cell> {
        find_open_near(self, x, y, radius)
    }
}

impl TileMap for WorldGrid {
    fn tile_at(&self, x: i32, y: i32) -> Tile {
        let coord = ChunkCoord::containing(x, y);
        match self.chunks.get(&coord).and_then(|c| c.get_world(x, y)) {
            Some(t) => t,
            None => self.fallback,
        }
    }
}

pub(crate) fn find_open_near<M: TileMap + ?Sized>(map: &M, x: i32, y: i32, radius: i32) -> Option<Cell> {
    for r in 0..=radius.max(0) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx.abs() != r && dy.abs() != r {
                    continue;
                }
                let (cx, cy) = (x + dx, y + dy);
                if matches!(map.tile_at(cx, cy), Tile::Open) {
                    return Some(Cell::new(cx, cy));
                }
            }
        }
    }
    None
}
