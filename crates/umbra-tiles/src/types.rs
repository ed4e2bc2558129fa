use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Largest id that still has its own tile code; catalogs stop here.
    pub const MAX: MaterialId = MaterialId(u16::MAX - 2);
}

/// Contents of one grid cell.
///
/// Every site that picks a texture or checks collision matches on this
/// exhaustively, so a new kind of cell has to be handled everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Open,
    Wall(MaterialId),
    Exit,
}

impl Tile {
    /// Level/legacy integer code for the exit cell.
    pub const EXIT_LEVEL_CODE: u8 = 9;

    /// Blocks movement and pathfinding.
    #[inline]
    pub fn is_wall(self) -> bool {
        match self {
            Tile::Wall(_) => true,
            Tile::Open | Tile::Exit => false,
        }
    }

    #[inline]
    pub fn is_exit(self) -> bool {
        matches!(self, Tile::Exit)
    }

    /// Stops a view ray. Exits are drawn as portal faces but stay walkable.
    #[inline]
    pub fn is_opaque(self) -> bool {
        match self {
            Tile::Wall(_) | Tile::Exit => true,
            Tile::Open => false,
        }
    }

    /// Stable 16-bit encoding: Open = 0, Wall(id) = id + 1, Exit = u16::MAX.
    /// Lossless for ids up to `MaterialId::MAX`.
    #[inline]
    pub fn code(self) -> u16 {
        match self {
            Tile::Open => 0,
            Tile::Wall(MaterialId(id)) => id.min(MaterialId::MAX.0) + 1,
            Tile::Exit => u16::MAX,
        }
    }

    #[inline]
    pub fn from_code(code: u16) -> Tile {
        match code {
            0 => Tile::Open,
            u16::MAX => Tile::Exit,
            n => Tile::Wall(MaterialId(n - 1)),
        }
    }
}
