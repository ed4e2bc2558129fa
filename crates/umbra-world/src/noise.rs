use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use umbra_tiles::Tile;

use crate::chunk::{CHUNK_SIZE, Chunk};
use crate::chunk_coord::ChunkCoord;
use crate::worldgen::{NoiseKind, WorldGenParams};

/// Coherent-noise tile classifier. Output depends only on seed, params and the
/// global coordinate.
pub struct NoiseGenerator {
    seed: i32,
    params: Arc<WorldGenParams>,
    solid: FastNoiseLite,
    variant: FastNoiseLite,
    exit: FastNoiseLite,
}

impl NoiseGenerator {
    pub fn new(seed: i32, params: Arc<WorldGenParams>) -> Self {
        let mut solid = FastNoiseLite::with_seed(seed);
        solid.set_noise_type(Some(match params.noise {
            NoiseKind::Perlin => NoiseType::Perlin,
            NoiseKind::OpenSimplex2 => NoiseType::OpenSimplex2,
            NoiseKind::Value => NoiseType::Value,
        }));
        solid.set_frequency(Some(params.frequency));
        solid.set_fractal_type(Some(FractalType::FBm));
        solid.set_fractal_octaves(Some(params.octaves));
        solid.set_fractal_lacunarity(Some(params.lacunarity));
        solid.set_fractal_gain(Some(params.gain));

        let mut variant = FastNoiseLite::with_seed(seed ^ 0x5A17_3C1D);
        variant.set_noise_type(Some(NoiseType::OpenSimplex2));
        variant.set_frequency(Some(params.variant_frequency));

        // Value noise sampled on lattice points is an uncorrelated hash per cell.
        let mut exit = FastNoiseLite::with_seed(seed ^ 0x0E71_7000);
        exit.set_noise_type(Some(NoiseType::Value));
        exit.set_frequency(Some(1.0));

        Self {
            seed,
            params,
            solid,
            variant,
            exit,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn params(&self) -> &Arc<WorldGenParams> {
        &self.params
    }

    /// Multi-octave density at a global tile, remapped to [0, 1].
    #[inline]
    pub fn density(&self, gx: i32, gy: i32) -> f32 {
        to_unit(self.solid.get_noise_2d(gx as f32, gy as f32))
    }

    pub fn classify(&self, gx: i32, gy: i32) -> Tile {
        if self.density(gx, gy) > self.params.threshold {
            let palette = &self.params.wall_palette;
            if palette.len() <= 1 {
                return Tile::Wall(self.params.fallback_wall());
            }
            let v = to_unit(self.variant.get_noise_2d(gx as f32, gy as f32));
            let i = ((v * palette.len() as f32) as usize).min(palette.len() - 1);
            return Tile::Wall(palette[i]);
        }
        if self.params.exit_threshold <= 1.0 {
            let e = to_unit(self.exit.get_noise_2d(gx as f32, gy as f32));
            if e > self.params.exit_threshold {
                return Tile::Exit;
            }
        }
        Tile::Open
    }

    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let (bx, by) = coord.origin();
        let mut tiles = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                tiles.push(self.classify(bx.wrapping_add(x as i32), by.wrapping_add(y as i32)));
            }
        }
        Chunk::from_tiles_local(coord, tiles)
    }
}

/// One-shot generation for callers that do not keep a generator around.
pub fn generate_chunk(seed: i32, cx: i32, cy: i32, params: Arc<WorldGenParams>) -> Chunk {
    NoiseGenerator::new(seed, params).generate_chunk(ChunkCoord::new(cx, cy))
}

#[inline]
fn to_unit(v: f32) -> f32 {
    (v * 0.5 + 0.5).clamp(0.0, 1.0)
}
