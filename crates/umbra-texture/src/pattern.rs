use fastnoise_lite::{FastNoiseLite, NoiseType};
use umbra_tiles::Pattern;

use crate::{Texture, argb};

/// Patterns are authored on a 64x64 canvas and resampled to the cache size.
const BASE: usize = 64;

struct Canvas {
    px: Vec<[u8; 3]>,
}

impl Canvas {
    fn new(color: [u8; 3]) -> Self {
        Self {
            px: vec![color; BASE * BASE],
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 3]) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = ((x + w).max(0) as usize).min(BASE);
        let y1 = ((y + h).max(0) as usize).min(BASE);
        for yy in y0..y1 {
            for xx in x0..x1 {
                self.px[yy * BASE + xx] = color;
            }
        }
    }

    fn hline(&mut self, y: i32, color: [u8; 3]) {
        self.fill_rect(0, y, BASE as i32, 1, color);
    }

    fn vline(&mut self, x: i32, y0: i32, y1: i32, color: [u8; 3]) {
        self.fill_rect(x, y0, 1, y1 - y0 + 1, color);
    }

    fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.px[y * BASE + x]
    }
}

fn brick() -> Canvas {
    let mut c = Canvas::new([139, 69, 19]);
    let face = [160, 82, 45];
    let mortar = [101, 67, 33];
    for y in (0..BASE as i32).step_by(16) {
        let offset = if (y / 16) % 2 == 1 { 16 } else { 0 };
        for x in (0..BASE as i32).step_by(32) {
            c.fill_rect(x + offset, y, 30, 14, face);
            // wrap the staggered row so the texture tiles
            c.fill_rect(x + offset - BASE as i32, y, 30, 14, face);
        }
    }
    for y in (0..BASE as i32).step_by(16) {
        c.hline(y, mortar);
    }
    for y in (0..BASE as i32).step_by(32) {
        for x in (16..BASE as i32).step_by(32) {
            let offset = if (y / 16) % 2 == 1 { 0 } else { 16 };
            c.vline((x + offset) % BASE as i32, y, y + 16, mortar);
        }
    }
    c
}

fn stone() -> Canvas {
    let mut c = Canvas::new([105, 105, 105]);
    for i in 0..100i32 {
        let x = (i * 17) % BASE as i32;
        let y = (i * 23) % BASE as i32;
        let size = 3 + i % 5;
        let b = (80 + i % 50) as u8;
        c.fill_rect(x, y, size, size, [b, b, b]);
    }
    c
}

fn metal() -> Canvas {
    let mut c = Canvas::new([70, 70, 80]);
    for x in (8..BASE as i32).step_by(16) {
        c.vline(x, 0, BASE as i32 - 1, [90, 90, 100]);
    }
    for y in (8..BASE as i32).step_by(24) {
        for x in (4..BASE as i32).step_by(16) {
            c.fill_rect(x, y, 2, 2, [110, 110, 120]);
        }
    }
    c
}

fn checker() -> Canvas {
    let mut c = Canvas::new([64, 64, 64]);
    for ty in 0..BASE as i32 / 16 {
        for tx in 0..BASE as i32 / 16 {
            if (tx + ty) % 2 == 1 {
                c.fill_rect(tx * 16, ty * 16, 16, 16, [96, 96, 96]);
            }
        }
    }
    c
}

fn grid() -> Canvas {
    let mut c = Canvas::new([40, 40, 50]);
    for i in (0..BASE as i32).step_by(16) {
        c.vline(i, 0, BASE as i32 - 1, [60, 60, 70]);
        c.hline(i, [60, 60, 70]);
    }
    for y in (0..BASE as i32).step_by(16) {
        for x in (0..BASE as i32).step_by(16) {
            c.fill_rect(x, y, 1, 1, [80, 80, 90]);
        }
    }
    c
}

fn portal() -> Canvas {
    let mut c = Canvas::new([40, 0, 40]);
    let mid = (BASE as f32 - 1.0) * 0.5;
    for y in 0..BASE {
        for x in 0..BASE {
            let d = ((x as f32 - mid).powi(2) + (y as f32 - mid).powi(2)).sqrt();
            let ring = (d / 4.0) as usize;
            c.px[y * BASE + x] = if ring % 2 == 0 { [255, 0, 255] } else { [120, 0, 160] };
        }
    }
    c
}

/// Procedural stand-in for a material whose texture file is missing.
///
/// `seed` drives a faint per-texel grain so repeated walls are not perfectly flat.
pub fn synthesize(pattern: Pattern, base: [u8; 3], size: usize, seed: i32) -> Texture {
    let size = size.max(1);
    let canvas = match pattern {
        Pattern::Brick => brick(),
        Pattern::Stone => stone(),
        Pattern::Metal => metal(),
        Pattern::Checker => checker(),
        Pattern::Grid => grid(),
        Pattern::Portal => portal(),
        Pattern::Flat => Canvas::new(base),
    };
    let mut grain = FastNoiseLite::with_seed(seed);
    grain.set_noise_type(Some(NoiseType::OpenSimplex2));
    grain.set_frequency(Some(0.35));

    let mut pixels = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let [r, g, b] = canvas.get(x * BASE / size, y * BASE / size);
            let k = 1.0 + 0.06 * grain.get_noise_2d(x as f32, y as f32);
            pixels.push(argb(scale(r, k), scale(g, k), scale(b, k)));
        }
    }
    Texture {
        width: size,
        height: size,
        pixels,
    }
}

#[inline]
fn scale(c: u8, k: f32) -> u8 {
    (c as f32 * k).round().clamp(0.0, 255.0) as u8
}
