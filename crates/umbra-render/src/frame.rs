use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::sprite::SpriteProjection;

pub(crate) const BLACK: u32 = 0xFF00_0000;

/// One rendered image: ARGB pixels, the light applied to each pixel, and the
/// per-column wall depth (`f32::INFINITY` where no wall was hit).
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
    pub shade: Vec<f32>,
    pub depth: Vec<f32>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width * height],
            shade: vec![0.0; width * height],
            depth: vec![f32::INFINITY; width],
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn shade_at(&self, x: usize, y: usize) -> f32 {
        self.shade[y * self.width + x]
    }

    #[inline]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// Columns where some wall was hit within range.
    pub fn wall_columns(&self) -> usize {
        self.depth.iter().filter(|d| d.is_finite()).count()
    }

    /// Screen columns covered by the sprite where it is nearer than the wall.
    pub fn visible_columns(&self, sprite: &SpriteProjection) -> Vec<usize> {
        let half = sprite.size / 2;
        let x0 = (sprite.screen_x - half).max(0);
        let x1 = (sprite.screen_x + half).min(self.width as i32);
        (x0..x1)
            .map(|x| x as usize)
            .filter(|&x| sprite.distance < self.depth[x])
            .collect()
    }

    /// Fills a rectangle, skipping columns where a wall is closer than `distance`.
    pub(crate) fn fill_rect_behind(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, light: f32, distance: f32) -> usize {
        let x0 = x.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y0 = y.max(0);
        let y1 = (y + h).min(self.height as i32);
        let mut drawn = 0;
        for cx in x0..x1 {
            if distance >= self.depth[cx as usize] {
                continue;
            }
            drawn += 1;
            for cy in y0..y1 {
                let i = cy as usize * self.width + cx as usize;
                self.pixels[i] = color;
                self.shade[i] = light;
            }
        }
        drawn
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let p = self.pixel(x as usize, y as usize);
            Rgba([(p >> 16) as u8, (p >> 8) as u8, p as u8, 0xFF])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_rgba_image().save_with_format(path, image::ImageFormat::Png)
    }
}

/// Multiplies each colour channel by `light`.
#[inline]
pub(crate) fn modulate(argb: u32, light: f32) -> u32 {
    let l = light.clamp(0.0, 1.0);
    let r = (((argb >> 16) & 0xFF) as f32 * l) as u32;
    let g = (((argb >> 8) & 0xFF) as f32 * l) as u32;
    let b = ((argb & 0xFF) as f32 * l) as u32;
    BLACK | r << 16 | g << 8 | b
}
