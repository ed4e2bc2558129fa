//! Chunked tile storage, noise-driven generation, and tile-map queries.
#![forbid(unsafe_code)]

mod bounded;
mod chunk;
mod chunk_coord;
mod grid;
mod map;
pub mod noise;
pub mod worldgen;

pub use bounded::{BoundedMap, MapError};
pub use chunk::{CHUNK_SIZE, Chunk};
pub use chunk_coord::ChunkCoord;
pub use grid::WorldGrid;
pub use map::TileMap;
pub use noise::{NoiseGenerator, generate_chunk};
pub use worldgen::{NoiseKind, WorldGenConfig, WorldGenParams};
