use std::path::{Path, PathBuf};

use serde::Deserialize;
use umbra_lighting::LightingConfig;
use umbra_nav::AgentConfig;
use umbra_render::{MinimapConfig, RenderConfig};
use umbra_world::WorldGenConfig;

use crate::cli::{Cli, Toggle};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct TextureConfig {
    /// Texture directory, relative to the assets root unless absolute.
    #[serde(default = "default_texture_dir")]
    pub dir: PathBuf,
    /// Materials table, relative to the assets root unless absolute.
    #[serde(default = "default_materials")]
    pub materials: PathBuf,
    #[serde(default = "default_texture_size")]
    pub size: usize,
    /// Seed for procedural grain on synthesized textures.
    #[serde(default = "default_grain_seed")]
    pub seed: i32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            dir: default_texture_dir(),
            materials: default_materials(),
            size: default_texture_size(),
            seed: default_grain_seed(),
        }
    }
}

fn default_texture_dir() -> PathBuf {
    PathBuf::from("textures")
}
fn default_materials() -> PathBuf {
    PathBuf::from("materials.toml")
}
fn default_texture_size() -> usize {
    umbra_texture::DEFAULT_TEXTURE_SIZE
}
fn default_grain_seed() -> i32 {
    1337
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UmbraConfig {
    #[serde(default)]
    pub world: WorldGenConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub textures: TextureConfig,
    #[serde(default)]
    pub minimap: MinimapConfig,
}

impl UmbraConfig {
    pub fn from_toml_str(s: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s, path)
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.world.seed = seed;
        }
        if let Some(w) = cli.width {
            self.render.width = w;
        }
        if let Some(h) = cli.height {
            self.render.height = h;
        }
        if let Some(t) = cli.flashlight {
            self.lighting.flashlight = t == Toggle::On;
        }
        if cli.sequential {
            self.render.parallel = false;
        }
        self.minimap.screen_width = self.render.width as i32;
    }

    /// Resolves a config-relative path against the assets root.
    pub fn asset_path(root: &Path, p: &Path) -> PathBuf {
        if p.is_absolute() { p.to_path_buf() } else { root.join(p) }
    }
}
