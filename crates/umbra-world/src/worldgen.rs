use serde::Deserialize;
use umbra_tiles::{MaterialCatalog, MaterialId};

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    /// Chunks generated around the viewer in each direction (1 = 3x3).
    #[serde(default = "default_load_radius")]
    pub load_radius: i32,
    #[serde(default)]
    pub noise: NoiseKind,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_octaves")]
    pub octaves: i32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_gain")]
    pub gain: f32,
    /// Material keys assigned to wall cells, picked by a low-frequency field.
    #[serde(default = "default_walls")]
    pub walls: Vec<String>,
    #[serde(default = "default_variant_frequency")]
    pub variant_frequency: f32,
    /// Open cells whose exit field exceeds this become exits. Above 1.0 disables exits.
    #[serde(default = "default_exit_threshold")]
    pub exit_threshold: f32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            load_radius: default_load_radius(),
            noise: NoiseKind::default(),
            frequency: default_frequency(),
            threshold: default_threshold(),
            octaves: default_octaves(),
            lacunarity: default_lacunarity(),
            gain: default_gain(),
            walls: default_walls(),
            variant_frequency: default_variant_frequency(),
            exit_threshold: default_exit_threshold(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    #[default]
    Perlin,
    OpenSimplex2,
    Value,
}

fn default_seed() -> i32 {
    42
}
fn default_load_radius() -> i32 {
    1
}
fn default_frequency() -> f32 {
    0.05
}
fn default_threshold() -> f32 {
    0.5
}
fn default_octaves() -> i32 {
    4
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_gain() -> f32 {
    0.5
}
fn default_walls() -> Vec<String> {
    vec!["brick".into(), "stone".into(), "metal".into()]
}
fn default_variant_frequency() -> f32 {
    0.03
}
fn default_exit_threshold() -> f32 {
    0.995
}

/// Generation parameters with material names resolved against a catalog.
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub noise: NoiseKind,
    pub frequency: f32,
    pub threshold: f32,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
    pub wall_palette: Vec<MaterialId>,
    pub variant_frequency: f32,
    pub exit_threshold: f32,
    pub load_radius: i32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default(), &MaterialCatalog::builtin())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig, catalog: &MaterialCatalog) -> Self {
        let mut wall_palette: Vec<MaterialId> = Vec::with_capacity(cfg.walls.len());
        for name in &cfg.walls {
            match catalog.get_id(name) {
                Some(id) => wall_palette.push(id),
                None => log::warn!(target: "world", "unknown wall material `{}` in worldgen palette", name),
            }
        }
        if wall_palette.is_empty() {
            wall_palette.push(catalog.default_wall());
        }
        Self {
            noise: cfg.noise,
            frequency: cfg.frequency,
            threshold: cfg.threshold,
            octaves: cfg.octaves.clamp(1, 12),
            lacunarity: cfg.lacunarity,
            gain: cfg.gain,
            wall_palette,
            variant_frequency: cfg.variant_frequency,
            exit_threshold: cfg.exit_threshold,
            load_radius: cfg.load_radius.max(0),
        }
    }

    /// Material used for fail-closed space.
    #[inline]
    pub fn fallback_wall(&self) -> MaterialId {
        self.wall_palette.first().copied().unwrap_or_default()
    }
}
