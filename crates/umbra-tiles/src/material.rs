use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::{MaterialId, Tile};

pub const FLOOR_KEY: &str = "floor";
pub const CEILING_KEY: &str = "ceiling";
pub const EXIT_KEY: &str = "exit";

/// Procedural pattern used when no texture file can be loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Brick,
    Stone,
    Metal,
    Checker,
    Grid,
    Portal,
    #[default]
    Flat,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub id: MaterialId,
    pub key: String,
    pub texture_candidates: Vec<PathBuf>,
    pub pattern: Pattern,
    /// RGB used by the minimap and as the base tone of flat placeholders.
    pub minimap: [u8; 3],
    /// Level code (1..=8) when this material is a wall variant.
    pub code: Option<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read materials file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse materials TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("wall code {code} used by both `{first}` and `{second}`")]
    DuplicateCode {
        code: u8,
        first: String,
        second: String,
    },
    #[error("wall code {0} is reserved (0 = open, 9 = exit)")]
    ReservedCode(u8),
    #[error("{0} materials declared; at most {max} fit in a tile code", max = MaterialId::MAX.0 as usize + 1)]
    TooManyMaterials(usize),
}

#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<Material>,
    pub by_key: HashMap<String, MaterialId>,
    by_code: HashMap<u8, MaterialId>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            by_key: HashMap::new(),
            by_code: HashMap::new(),
        }
    }

    /// Three wall variants plus floor, ceiling and exit surfaces, all synthesized.
    pub fn builtin() -> Self {
        let src = r#"
            [materials.brick]
            paths = ["wall_brick.png"]
            pattern = "brick"
            minimap = [139, 69, 19]
            code = 1

            [materials.stone]
            paths = ["wall_stone.png"]
            pattern = "stone"
            minimap = [105, 105, 105]
            code = 2

            [materials.metal]
            paths = ["wall_metal.png"]
            pattern = "metal"
            minimap = [70, 70, 80]
            code = 3

            [materials.floor]
            paths = ["floor.png"]
            pattern = "checker"
            minimap = [50, 50, 50]

            [materials.ceiling]
            paths = ["ceiling.png"]
            pattern = "grid"
            minimap = [40, 40, 50]

            [materials.exit]
            paths = ["exit.png"]
            pattern = "portal"
            minimap = [255, 0, 255]
        "#;
        match Self::from_toml_str(src) {
            Ok(cat) => cat,
            Err(e) => {
                log::error!("builtin material table rejected: {e}");
                Self::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn wall_for_code(&self, code: u8) -> Option<MaterialId> {
        self.by_code.get(&code).copied()
    }

    /// Wall materials ordered by their level code.
    pub fn wall_palette(&self) -> Vec<MaterialId> {
        let mut codes: Vec<(u8, MaterialId)> = self.by_code.iter().map(|(c, id)| (*c, *id)).collect();
        codes.sort_unstable();
        codes.into_iter().map(|(_, id)| id).collect()
    }

    /// Material used for fail-closed solid space.
    pub fn default_wall(&self) -> MaterialId {
        self.wall_palette().first().copied().unwrap_or_default()
    }

    /// Level code to tile. Unknown codes fall back to the default wall.
    pub fn tile_for_code(&self, code: u8) -> Tile {
        match code {
            0 => Tile::Open,
            Tile::EXIT_LEVEL_CODE => Tile::Exit,
            c => Tile::Wall(self.wall_for_code(c).unwrap_or_else(|| self.default_wall())),
        }
    }

    pub fn floor(&self) -> Option<MaterialId> {
        self.get_id(FLOOR_KEY)
    }

    pub fn ceiling(&self) -> Option<MaterialId> {
        self.get_id(CEILING_KEY)
    }

    pub fn exit(&self) -> Option<MaterialId> {
        self.get_id(EXIT_KEY)
    }

    /// Minimap colour for a tile.
    pub fn minimap_color(&self, tile: Tile) -> [u8; 3] {
        match tile {
            Tile::Open => [50, 50, 50],
            Tile::Exit => [255, 0, 255],
            Tile::Wall(id) => self.get(id).map(|m| m.minimap).unwrap_or([255, 255, 255]),
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, CatalogError> {
        let cfg: MaterialsConfig = toml::from_str(toml_str)?;
        let mut catalog = MaterialCatalog::new();
        if cfg.materials.len() > MaterialId::MAX.0 as usize + 1 {
            return Err(CatalogError::TooManyMaterials(cfg.materials.len()));
        }
        let mut entries: Vec<(String, MaterialEntry)> = cfg.materials.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort keys so MaterialId assignment is stable.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, entry) in entries {
            let (paths, pattern, minimap, code) = match entry {
                MaterialEntry::Paths(v) => (v, Pattern::Flat, [128, 128, 128], None),
                MaterialEntry::Detail {
                    paths,
                    pattern,
                    minimap,
                    code,
                } => (paths, pattern, minimap, code),
            };
            let id = MaterialId(catalog.materials.len() as u16);
            if let Some(c) = code {
                if c == 0 || c == Tile::EXIT_LEVEL_CODE {
                    return Err(CatalogError::ReservedCode(c));
                }
                if let Some(prev) = catalog.by_code.get(&c) {
                    let first = catalog.materials[prev.0 as usize].key.clone();
                    return Err(CatalogError::DuplicateCode {
                        code: c,
                        first,
                        second: key,
                    });
                }
                catalog.by_code.insert(c, id);
            }
            catalog.by_key.insert(key.clone(), id);
            catalog.materials.push(Material {
                id,
                key,
                texture_candidates: paths.into_iter().map(PathBuf::from).collect(),
                pattern,
                minimap,
                code,
            });
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
pub struct MaterialsConfig {
    pub materials: HashMap<String, MaterialEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum MaterialEntry {
    // Simple: brick = ["textures/brick.png", ...]
    Paths(Vec<String>),
    // Detailed: brick = { paths = ["..."], pattern = "brick", minimap = [r, g, b], code = 1 }
    Detail {
        #[serde(default)]
        paths: Vec<String>,
        #[serde(default)]
        pattern: Pattern,
        #[serde(default = "default_minimap")]
        minimap: [u8; 3],
        #[serde(default)]
        code: Option<u8>,
    },
}

fn default_minimap() -> [u8; 3] {
    [128, 128, 128]
}
