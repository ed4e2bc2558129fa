use serde::Deserialize;
use umbra_geom::Pose;
use umbra_tiles::{MaterialCatalog, Tile};
use umbra_world::TileMap;

/// Backend-neutral 2D drawing instruction. Colours are RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect { x: i32, y: i32, w: i32, h: i32, color: [u8; 4] },
    StrokeRect { x: i32, y: i32, w: i32, h: i32, color: [u8; 4] },
    Line { x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 4] },
}

#[derive(Clone, Debug, Deserialize)]
pub struct MinimapConfig {
    /// Side of the square minimap in pixels.
    #[serde(default = "default_size")]
    pub size: i32,
    #[serde(default = "default_margin")]
    pub margin: i32,
    /// Screen width the minimap is anchored to (top-right corner).
    #[serde(default = "default_screen_width")]
    pub screen_width: i32,
    /// Tiles shown around the viewer on unbounded maps.
    #[serde(default = "default_radius")]
    pub radius: i32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            margin: default_margin(),
            screen_width: default_screen_width(),
            radius: default_radius(),
        }
    }
}

fn default_size() -> i32 {
    150
}
fn default_margin() -> i32 {
    10
}
fn default_screen_width() -> i32 {
    640
}
fn default_radius() -> i32 {
    8
}

const BACKGROUND: [u8; 4] = [0, 0, 0, 200];
const OUTLINE: [u8; 4] = [0, 0, 0, 100];
const VIEWER: [u8; 4] = [255, 0, 0, 255];
const HEADING: [u8; 4] = [255, 255, 0, 255];

#[inline]
fn rgba([r, g, b]: [u8; 3]) -> [u8; 4] {
    [r, g, b, 255]
}

/// Top-down overview. Finite maps are drawn whole; unbounded maps show a
/// `radius` window centred on the viewer's cell.
pub fn render_minimap<M: TileMap + ?Sized>(
    pose: &Pose,
    map: &M,
    catalog: &MaterialCatalog,
    cfg: &MinimapConfig,
) -> Vec<DrawCommand> {
    let (x0, y0, cols, rows) = match map.bounds() {
        Some((w, h)) => (0, 0, w as i32, h as i32),
        None => {
            let c = pose.pos.cell();
            let r = cfg.radius.max(0);
            (c.x - r, c.y - r, 2 * r + 1, 2 * r + 1)
        }
    };
    let tile = (cfg.size / cols.max(rows).max(1)).max(1);
    let ox = cfg.screen_width - cfg.size - cfg.margin;
    let oy = cfg.margin;

    let mut out = Vec::with_capacity((cols * rows) as usize * 2 + 3);
    out.push(DrawCommand::FillRect {
        x: ox - 2,
        y: oy - 2,
        w: cfg.size + 4,
        h: cfg.size + 4,
        color: BACKGROUND,
    });
    for ty in 0..rows {
        for tx in 0..cols {
            let t = map.tile_at(x0 + tx, y0 + ty);
            let (x, y) = (ox + tx * tile, oy + ty * tile);
            out.push(DrawCommand::FillRect {
                x,
                y,
                w: tile,
                h: tile,
                color: rgba(catalog.minimap_color(t)),
            });
            if !matches!(t, Tile::Open) {
                out.push(DrawCommand::StrokeRect {
                    x,
                    y,
                    w: tile,
                    h: tile,
                    color: OUTLINE,
                });
            }
        }
    }

    let px = ox + ((pose.pos.x - x0 as f32) * tile as f32) as i32;
    let py = oy + ((pose.pos.y - y0 as f32) * tile as f32) as i32;
    out.push(DrawCommand::FillRect {
        x: px - 2,
        y: py - 2,
        w: 4,
        h: 4,
        color: VIEWER,
    });
    let f = pose.forward() * (tile as f32 * 0.5);
    out.push(DrawCommand::Line {
        x0: px,
        y0: py,
        x1: px + f.x as i32,
        y1: py + f.y as i32,
        color: HEADING,
    });
    out
}
