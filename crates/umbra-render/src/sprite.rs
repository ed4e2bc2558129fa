use fastnoise_lite::{FastNoiseLite, NoiseType};
use umbra_geom::{Pose, Vec2};
use umbra_texture::argb;

use crate::config::RenderConfig;
use crate::frame::{Frame, modulate};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Screen column of the sprite centre.
    pub screen_x: i32,
    /// Screen row of the sprite centre.
    pub screen_y: i32,
    /// Square size in pixels.
    pub size: i32,
    pub distance: f32,
    /// Signed bearing from the view direction.
    pub angle_diff: f32,
}

/// Projects a world-space billboard onto the screen.
///
/// Returns `None` when it is behind the viewer, outside the field of view, too
/// far, or exactly at the viewer's position.
pub fn project_sprite(pose: &Pose, position: Vec2, cfg: &RenderConfig) -> Option<SpriteProjection> {
    let distance = pose.pos.distance(position);
    if distance > cfg.sprite_max_distance || distance < 1e-3 {
        return None;
    }
    let half_fov = cfg.half_fov();
    let angle_diff = pose.bearing_to(position);
    if angle_diff.abs() > half_fov {
        return None;
    }
    let (w, h) = (cfg.width as f32, cfg.height as f32);
    let screen_x = (w * 0.5 + angle_diff / half_fov * w * 0.5) as i32;
    let size = ((h / distance * 0.8) as i32).clamp(10, 350);
    let screen_y = (h * 0.5) as i32 + (size as f32 * 0.25) as i32;
    Some(SpriteProjection {
        screen_x,
        screen_y,
        size,
        distance,
        angle_diff,
    })
}

/// Vertical bob for animated sprites plus a small seeded wobble.
pub struct SpriteBob {
    noise: FastNoiseLite,
}

impl SpriteBob {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(0.8));
        Self { noise }
    }

    pub fn offset(&self, anim_time: f32, size: i32) -> i32 {
        let s = size as f32;
        let bob = (anim_time * 2.0).sin() * s * 0.05;
        let jitter = self.noise.get_noise_2d(anim_time, 0.0) * s * 0.01;
        (bob + jitter) as i32
    }
}

const BODY: (u8, u8, u8) = (50, 50, 60);
const WING: (u8, u8, u8) = (80, 80, 90);
const CORE: (u8, u8, u8) = (255, 50, 50);

/// Draws the chasing agent's billboard (body, flapping wings, glowing core)
/// behind any nearer wall. Returns how many column writes survived occlusion.
pub fn draw_agent_sprite(frame: &mut Frame, sprite: &SpriteProjection, light: f32, anim_time: f32, bob: &SpriteBob) -> usize {
    if light < 0.1 {
        return 0;
    }
    let size = sprite.size;
    let x = sprite.screen_x;
    let y = sprite.screen_y + bob.offset(anim_time, size);
    let d = sprite.distance;
    let flap = ((anim_time * 4.0).sin() * size as f32 * 0.1) as i32;
    let glow = ((anim_time * 3.0).sin() + 1.0) * 0.5;

    let body = modulate(argb(BODY.0, BODY.1, BODY.2), light);
    let wing = modulate(argb(WING.0, WING.1, WING.2), light);
    let core = argb(
        (CORE.0 as f32 * light) as u8,
        (CORE.1 as f32 * light * glow) as u8,
        (CORE.2 as f32 * light * glow) as u8,
    );

    let mut drawn = frame.fill_rect_behind(x - size / 4, y - size / 2, size / 2, size, body, light, d);
    drawn += frame.fill_rect_behind(x - size / 2, y - size / 3 + flap, size / 4, size / 2, wing, light, d);
    drawn += frame.fill_rect_behind(x + size / 4, y - size / 3 - flap, size / 4, size / 2, wing, light, d);
    drawn += frame.fill_rect_behind(x - size / 8, y - size / 8, size / 4, size / 4, core, light, d);
    drawn
}
