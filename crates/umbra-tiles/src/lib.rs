//! Tile, material, and catalog crate.
#![forbid(unsafe_code)]

pub mod material;
pub mod types;

pub use material::{CatalogError, Material, MaterialCatalog, Pattern};
pub use types::{MaterialId, Tile};
