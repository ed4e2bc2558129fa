use umbra_geom::{Cell, Vec2};
use umbra_tiles::Tile;

/// Read-only tile queries shared by the renderer, pathfinder and agents.
///
/// Anything outside known space must answer with a wall.
pub trait TileMap {
    fn tile_at(&self, x: i32, y: i32) -> Tile;

    /// `Some((width, height))` for finite maps.
    fn bounds(&self) -> Option<(usize, usize)> {
        None
    }

    #[inline]
    fn is_wall_at(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_wall()
    }

    #[inline]
    fn is_exit_at(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_exit()
    }

    #[inline]
    fn tile_at_cell(&self, c: Cell) -> Tile {
        self.tile_at(c.x, c.y)
    }

    #[inline]
    fn is_wall_at_point(&self, p: Vec2) -> bool {
        let c = p.cell();
        self.is_wall_at(c.x, c.y)
    }
}

impl<T: TileMap + ?Sized> TileMap for &T {
    #[inline]
    fn tile_at(&self, x: i32, y: i32) -> Tile {
        (**self).tile_at(x, y)
    }

    #[inline]
    fn bounds(&self) -> Option<(usize, usize)> {
        (**self).bounds()
    }
}
