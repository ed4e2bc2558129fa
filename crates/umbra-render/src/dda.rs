use umbra_geom::{Cell, Pose, Vec2};
use umbra_tiles::Tile;
use umbra_world::TileMap;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A vertical line (constant x).
    X,
    /// A horizontal line (constant y).
    Y,
}

#[derive(Clone, Copy, Debug)]
pub struct RaycastHit {
    pub cell: Cell,
    pub tile: Tile,
    pub side: Side,
    /// Distance along the ray.
    pub distance: f32,
    /// Distance projected onto the view direction.
    pub corrected: f32,
    pub point: Vec2,
    /// Horizontal texture coordinate in [0, 1).
    pub tex_u: f32,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

/// Steps cell by cell from `origin` along `dir` until `is_opaque` accepts a
/// cell or the ray runs past `max_dist`. Returns the cell, the crossed side and
/// the ray parameter at the crossing.
pub fn raycast_first_hit<F>(origin: Vec2, dir: Vec2, max_dist: f32, mut is_opaque: F) -> Option<(Cell, Side, f32)>
where
    F: FnMut(i32, i32) -> bool,
{
    let len = dir.length();
    if len < 1e-6 || !max_dist.is_finite() {
        return None;
    }
    let d = dir / len;

    let mut cx = origin.x.floor() as i32;
    let mut cy = origin.y.floor() as i32;
    if is_opaque(cx, cy) {
        return Some((Cell::new(cx, cy), Side::X, 0.0));
    }

    let step_x = if d.x > 0.0 { 1 } else { -1 };
    let step_y = if d.y > 0.0 { 1 } else { -1 };
    let inv_x = inv_or_max(d.x);
    let inv_y = inv_or_max(d.y);
    let fx = origin.x - origin.x.floor();
    let fy = origin.y - origin.y.floor();
    let mut t_max_x = if d.x == 0.0 {
        f32::MAX
    } else if d.x > 0.0 {
        (1.0 - fx) * inv_x
    } else {
        fx * inv_x
    };
    let mut t_max_y = if d.y == 0.0 {
        f32::MAX
    } else if d.y > 0.0 {
        (1.0 - fy) * inv_y
    } else {
        fy * inv_y
    };

    // A ray of length L crosses at most 2L + 2 grid lines.
    let limit = (max_dist.max(0.0) as usize).saturating_add(2).saturating_mul(2);
    for _ in 0..limit {
        let (t, side) = if t_max_x < t_max_y {
            cx += step_x;
            let t = t_max_x;
            t_max_x += inv_x;
            (t, Side::X)
        } else {
            cy += step_y;
            let t = t_max_y;
            t_max_y += inv_y;
            (t, Side::Y)
        };
        if t > max_dist {
            return None;
        }
        if is_opaque(cx, cy) {
            return Some((Cell::new(cx, cy), side, t));
        }
    }
    None
}

/// Casts one ray at `angle` and fills in fisheye-corrected distance and texture U.
///
/// A viewer standing on a walkable exit sees out of it; only the exit faces of
/// other cells stop the ray.
pub fn cast_ray<M: TileMap + ?Sized>(map: &M, pose: &Pose, angle: f32, max_dist: f32) -> Option<RaycastHit> {
    let dir = Vec2::from_angle(angle);
    let home = pose.pos.cell();
    let (cell, side, t) = raycast_first_hit(pose.pos, dir, max_dist, |x, y| match map.tile_at(x, y) {
        Tile::Wall(_) => true,
        Tile::Exit => (x, y) != (home.x, home.y),
        Tile::Open => false,
    })?;
    let point = pose.pos + dir * t;
    let u = match side {
        Side::X => {
            let f = point.y - point.y.floor();
            if dir.x > 0.0 { 1.0 - f } else { f }
        }
        Side::Y => {
            let f = point.x - point.x.floor();
            if dir.y < 0.0 { 1.0 - f } else { f }
        }
    };
    Some(RaycastHit {
        cell,
        tile: map.tile_at(cell.x, cell.y),
        side,
        distance: t,
        corrected: t * (angle - pose.angle).cos(),
        point,
        tex_u: u.rem_euclid(1.0),
    })
}
