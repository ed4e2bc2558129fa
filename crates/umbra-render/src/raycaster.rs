use rayon::prelude::*;
use umbra_geom::{Pose, Vec2};
use umbra_lighting::LightingModel;
use umbra_texture::{TextureCache, TextureView};
use umbra_tiles::{MaterialCatalog, MaterialId, Tile};
use umbra_world::TileMap;

use crate::config::RenderConfig;
use crate::dda::{RaycastHit, cast_ray};
use crate::frame::{BLACK, Frame, modulate};

const MIN_DEPTH: f32 = 1e-4;

/// Materials used for the non-wall surfaces.
#[derive(Clone, Copy, Debug)]
pub struct Surfaces {
    pub floor: MaterialId,
    pub ceiling: MaterialId,
    pub exit: MaterialId,
}

impl Surfaces {
    pub fn from_catalog(catalog: &MaterialCatalog) -> Self {
        let fallback = catalog.default_wall();
        Self {
            floor: catalog.floor().unwrap_or(fallback),
            ceiling: catalog.ceiling().unwrap_or(fallback),
            exit: catalog.exit().unwrap_or(fallback),
        }
    }
}

/// Wall slice for one screen column.
#[derive(Clone, Copy)]
struct Column {
    hit: Option<RaycastHit>,
    /// Unclipped top row and slice height in pixels.
    top: f32,
    height: f32,
    light: f32,
}

impl Column {
    const EMPTY: Column = Column {
        hit: None,
        top: 0.0,
        height: 0.0,
        light: 0.0,
    };

    #[inline]
    fn covers(&self, y: usize) -> bool {
        let yc = y as f32 + 0.5;
        self.hit.is_some() && yc >= self.top && yc < self.top + self.height
    }
}

/// Per-frame values shared by every row.
struct View {
    pose: Pose,
    dir: Vec2,
    plane: Vec2,
    half_fov: f32,
    angle_step: f32,
}

pub struct Raycaster {
    cfg: RenderConfig,
    surfaces: Surfaces,
}

impl Raycaster {
    pub fn new(cfg: RenderConfig, catalog: &MaterialCatalog) -> Self {
        Self {
            cfg,
            surfaces: Surfaces::from_catalog(catalog),
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    pub fn set_config(&mut self, cfg: RenderConfig) {
        self.cfg = cfg;
    }

    #[inline]
    pub fn surfaces(&self) -> Surfaces {
        self.surfaces
    }

    /// Angle of screen column `x` relative to the world.
    #[inline]
    pub fn column_angle(&self, pose: &Pose, x: usize) -> f32 {
        let w = self.cfg.width.max(1);
        pose.angle - self.cfg.half_fov() + x as f32 * (self.cfg.fov() / w as f32)
    }

    pub fn render_frame<M>(&self, pose: &Pose, map: &M, lighting: &LightingModel, textures: &TextureCache) -> Frame
    where
        M: TileMap + Sync + ?Sized,
    {
        let (w, h) = (self.cfg.width, self.cfg.height);
        let mut frame = Frame::new(w, h);
        if w == 0 || h == 0 {
            return frame;
        }
        let half_fov = self.cfg.half_fov();
        let dir = Vec2::from_angle(pose.angle);
        let view = View {
            pose: *pose,
            dir,
            plane: dir.perp() * half_fov.tan(),
            half_fov,
            angle_step: self.cfg.fov() / w as f32,
        };

        let cast = |x: usize| self.cast_column(&view, x, map, lighting);
        let columns: Vec<Column> = if self.cfg.parallel {
            (0..w).into_par_iter().map(cast).collect()
        } else {
            (0..w).map(cast).collect()
        };
        for (d, c) in frame.depth.iter_mut().zip(&columns) {
            *d = c.hit.map_or(f32::INFINITY, |h| h.corrected.max(MIN_DEPTH));
        }

        let shade_row = |(y, (px, sh)): (usize, (&mut [u32], &mut [f32]))| {
            self.shade_row(&view, y, px, sh, &columns, map, lighting, textures);
        };
        if self.cfg.parallel {
            frame
                .pixels
                .par_chunks_mut(w)
                .zip(frame.shade.par_chunks_mut(w))
                .enumerate()
                .for_each(shade_row);
        } else {
            frame
                .pixels
                .chunks_mut(w)
                .zip(frame.shade.chunks_mut(w))
                .enumerate()
                .for_each(shade_row);
        }
        frame
    }

    fn cast_column<M: TileMap + ?Sized>(&self, view: &View, x: usize, map: &M, lighting: &LightingModel) -> Column {
        let angle = view.pose.angle - view.half_fov + x as f32 * view.angle_step;
        let Some(hit) = cast_ray(map, &view.pose, angle, self.cfg.max_distance) else {
            return Column::EMPTY;
        };
        let h = self.cfg.height as f32;
        let corrected = hit.corrected.max(MIN_DEPTH);
        let height = h / corrected * self.cfg.height_scale;
        Column {
            hit: Some(hit),
            top: (h - height) * 0.5,
            height,
            light: lighting.intensity_at(&view.pose, hit.point, corrected),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn shade_row<M: TileMap + ?Sized>(
        &self,
        view: &View,
        y: usize,
        px: &mut [u32],
        sh: &mut [f32],
        columns: &[Column],
        map: &M,
        lighting: &LightingModel,
        textures: &TextureCache,
    ) {
        let w = self.cfg.width;
        let h = self.cfg.height;
        let below = y >= h / 2;
        // Ceiling rows mirror the floor row at the same distance from the horizon.
        let floor_row = if below { y } else { h - 1 - y };
        let p = (floor_row as f32 + 0.5 - h as f32 * 0.5).max(0.5);
        let row_distance = 0.5 * h as f32 * self.cfg.height_scale / p;

        let left = view.dir - view.plane;
        let step = view.plane * (2.0 / w as f32);
        let floor_tex = textures.pixels(self.surfaces.floor);
        let ceil_tex = textures.pixels(self.surfaces.ceiling);
        let exit_tex = textures.pixels(self.surfaces.exit);

        for x in 0..w {
            let col = &columns[x];
            if col.covers(y) {
                let (color, light) = self.wall_texel(col, y, textures);
                px[x] = modulate(color, light);
                sh[x] = light;
                continue;
            }
            if !self.cfg.floor_ceiling {
                px[x] = BLACK;
                sh[x] = 0.0;
                continue;
            }
            let ray = left + step * (x as f32 + 0.5);
            let world = view.pose.pos + ray * row_distance;
            let tex = if below {
                match map.tile_at(world.x.floor() as i32, world.y.floor() as i32) {
                    Tile::Exit => exit_tex,
                    Tile::Open | Tile::Wall(_) => floor_tex,
                }
            } else {
                ceil_tex
            };
            let off_axis = -view.half_fov + x as f32 * view.angle_step;
            let light = lighting.intensity_for(off_axis, row_distance);
            px[x] = modulate(surface_texel(&tex, world), light);
            sh[x] = light;
        }
    }

    fn wall_texel(&self, col: &Column, y: usize, textures: &TextureCache) -> (u32, f32) {
        let Some(hit) = col.hit else {
            return (BLACK, 0.0);
        };
        let material = match hit.tile {
            Tile::Wall(id) => id,
            Tile::Exit => self.surfaces.exit,
            // DDA only stops on opaque tiles
            Tile::Open => self.surfaces.floor,
        };
        let tex = textures.pixels(material);
        let v = ((y as f32 + 0.5 - col.top) / col.height).clamp(0.0, 0.999_999);
        (tex.sample(hit.tex_u, v), col.light)
    }
}

#[inline]
fn surface_texel(tex: &TextureView<'_>, world: Vec2) -> u32 {
    let tx = (world.x * tex.width as f32).floor() as i64;
    let ty = (world.y * tex.height as f32).floor() as i64;
    tex.texel(tx, ty)
}
