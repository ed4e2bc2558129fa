use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Horizontal field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_true")]
    pub floor_ceiling: bool,
    /// Sprites farther than this are not projected.
    #[serde(default = "default_sprite_distance")]
    pub sprite_max_distance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fov_degrees: default_fov(),
            max_distance: default_max_distance(),
            height_scale: default_height_scale(),
            parallel: true,
            floor_ceiling: true,
            sprite_max_distance: default_sprite_distance(),
        }
    }
}

impl RenderConfig {
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.clamp(1.0, 179.0).to_radians()
    }

    #[inline]
    pub fn half_fov(&self) -> f32 {
        self.fov() * 0.5
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_fov() -> f32 {
    60.0
}
fn default_max_distance() -> f32 {
    20.0
}
fn default_height_scale() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_sprite_distance() -> f32 {
    15.0
}
