//! Per-material pixel buffers: decoded from disk or synthesized on demand.
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use image::ImageReader;
use image::imageops::{self, FilterType};
use umbra_tiles::{MaterialCatalog, MaterialId, Pattern};

pub mod pattern;

pub use pattern::synthesize;

pub const DEFAULT_TEXTURE_SIZE: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to open texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {0} has zero size")]
    Empty(PathBuf),
}

#[inline]
pub fn argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Owned square-or-rectangular ARGB buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Texture {
    #[inline]
    pub fn view(&self) -> TextureView<'_> {
        TextureView {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TextureView<'a> {
    pub pixels: &'a [u32],
    pub width: usize,
    pub height: usize,
}

impl TextureView<'_> {
    /// Texel at integer coordinates, wrapping in both axes.
    #[inline]
    pub fn texel(&self, tx: i64, ty: i64) -> u32 {
        let x = tx.rem_euclid(self.width as i64) as usize;
        let y = ty.rem_euclid(self.height as i64) as usize;
        self.pixels[y * self.width + x]
    }

    /// Nearest-texel lookup for normalized coordinates; repeats outside [0, 1).
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let tx = (u * self.width as f32).floor() as i64;
        let ty = (v * self.height as f32).floor() as i64;
        self.texel(tx, ty)
    }
}

/// Decodes one image and resamples it to `size` x `size`.
pub fn load_file(path: impl AsRef<Path>, size: usize) -> Result<Texture, TextureError> {
    let path = path.as_ref();
    let reader = ImageReader::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TextureError::Empty(path.to_path_buf()));
    }
    let size = size.max(1) as u32;
    if rgba.width() != size || rgba.height() != size {
        rgba = imageops::resize(&rgba, size, size, FilterType::Nearest);
    }
    let pixels = rgba.pixels().map(|p| argb(p[0], p[1], p[2])).collect();
    Ok(Texture {
        width: size as usize,
        height: size as usize,
        pixels,
    })
}

/// Textures indexed by `MaterialId`. Every catalog material has an entry once loaded.
pub struct TextureCache {
    size: usize,
    seed: i32,
    textures: Vec<Texture>,
    placeholder: Texture,
}

impl TextureCache {
    /// Loads each material's first readable candidate under `asset_root`,
    /// falling back to its procedural pattern.
    pub fn load(catalog: &MaterialCatalog, asset_root: &Path, size: usize, seed: i32) -> Self {
        let mut cache = Self::empty(size, seed);
        let mut loaded = 0usize;
        for m in &catalog.materials {
            let tex = match first_readable(&m.texture_candidates, asset_root, cache.size) {
                Some(t) => {
                    loaded += 1;
                    t
                }
                None => synthesize(m.pattern, m.minimap, cache.size, grain_seed(seed, m.id)),
            };
            cache.insert(m.id, tex);
        }
        log::info!(
            target: "textures",
            "texture cache ready: {} material(s), {} from disk, {} synthesized",
            catalog.len(),
            loaded,
            catalog.len() - loaded
        );
        cache
    }

    /// Procedural textures only; never touches the filesystem.
    pub fn synthesized(catalog: &MaterialCatalog, size: usize, seed: i32) -> Self {
        let mut cache = Self::empty(size, seed);
        for m in &catalog.materials {
            let tex = synthesize(m.pattern, m.minimap, cache.size, grain_seed(seed, m.id));
            cache.insert(m.id, tex);
        }
        cache
    }

    fn empty(size: usize, seed: i32) -> Self {
        let size = size.max(1);
        Self {
            size,
            seed,
            textures: Vec::new(),
            placeholder: synthesize(Pattern::Flat, [200, 200, 200], size, seed),
        }
    }

    fn insert(&mut self, id: MaterialId, tex: Texture) {
        let i = id.0 as usize;
        if self.textures.len() <= i {
            self.textures.resize(i + 1, self.placeholder.clone());
        }
        self.textures[i] = tex;
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    #[inline]
    pub fn get(&self, id: MaterialId) -> Option<TextureView<'_>> {
        self.textures.get(id.0 as usize).map(Texture::view)
    }

    /// Pixels for `id`, or a flat grey placeholder for ids outside the catalog.
    #[inline]
    pub fn pixels(&self, id: MaterialId) -> TextureView<'_> {
        match self.get(id) {
            Some(v) => v,
            None => self.placeholder.view(),
        }
    }

    /// Re-reads one material after its file changed on disk.
    pub fn reload(&mut self, catalog: &MaterialCatalog, asset_root: &Path, id: MaterialId) -> bool {
        let Some(m) = catalog.get(id) else {
            return false;
        };
        match first_readable(&m.texture_candidates, asset_root, self.size) {
            Some(t) => {
                self.insert(id, t);
                log::debug!(target: "textures", "reloaded texture for `{}`", m.key);
                true
            }
            None => {
                let t = synthesize(m.pattern, m.minimap, self.size, grain_seed(self.seed, id));
                self.insert(id, t);
                false
            }
        }
    }

    /// Materials with a candidate file named like `path`.
    pub fn materials_using(catalog: &MaterialCatalog, path: &Path) -> Vec<MaterialId> {
        let Some(name) = path.file_name() else {
            return Vec::new();
        };
        catalog
            .materials
            .iter()
            .filter(|m| m.texture_candidates.iter().any(|c| c.file_name() == Some(name)))
            .map(|m| m.id)
            .collect()
    }
}

fn first_readable(candidates: &[PathBuf], root: &Path, size: usize) -> Option<Texture> {
    for c in candidates {
        let path = if c.is_absolute() { c.clone() } else { root.join(c) };
        match load_file(&path, size) {
            Ok(t) => return Some(t),
            Err(e) => log::warn!(target: "textures", "{e}; using procedural fallback"),
        }
    }
    None
}

#[inline]
fn grain_seed(seed: i32, id: MaterialId) -> i32 {
    seed.wrapping_add((id.0 as i32).wrapping_mul(7919))
}
