//! Flashlight cone, distance falloff and ambient light for the renderer.
#![forbid(unsafe_code)]

use std::f32::consts::{FRAC_PI_2, PI};

use serde::Deserialize;
use umbra_geom::{Pose, Vec2};

mod lut;

pub use lut::DistanceLut;

#[derive(Clone, Debug, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_flashlight")]
    pub flashlight: bool,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_range")]
    pub range: f32,
    /// Half-angle of the flashlight cone in degrees.
    #[serde(default = "default_cone_degrees")]
    pub cone_degrees: f32,
    #[serde(default = "default_ambient")]
    pub ambient: f32,
    #[serde(default = "default_sharpness")]
    pub sharpness: f32,
    #[serde(default = "default_linear")]
    pub linear: f32,
    #[serde(default = "default_quadratic")]
    pub quadratic: f32,
    #[serde(default = "default_fade_band")]
    pub fade_band: f32,
    #[serde(default = "default_lut_size")]
    pub lut_size: usize,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            flashlight: default_flashlight(),
            intensity: default_intensity(),
            range: default_range(),
            cone_degrees: default_cone_degrees(),
            ambient: default_ambient(),
            sharpness: default_sharpness(),
            linear: default_linear(),
            quadratic: default_quadratic(),
            fade_band: default_fade_band(),
            lut_size: default_lut_size(),
        }
    }
}

fn default_flashlight() -> bool {
    true
}
fn default_intensity() -> f32 {
    0.8
}
fn default_range() -> f32 {
    10.0
}
fn default_cone_degrees() -> f32 {
    30.0
}
fn default_ambient() -> f32 {
    0.1
}
fn default_sharpness() -> f32 {
    2.0
}
fn default_linear() -> f32 {
    0.1
}
fn default_quadratic() -> f32 {
    0.01
}
fn default_fade_band() -> f32 {
    2.0
}
fn default_lut_size() -> usize {
    DistanceLut::DEFAULT_SIZE
}

/// Current light parameters. Only changed through `LightingModel` setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingState {
    pub flashlight: bool,
    pub intensity: f32,
    pub range: f32,
    pub cone_half_angle: f32,
    pub ambient: f32,
    pub sharpness: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub fade_band: f32,
}

impl LightingState {
    fn from_config(cfg: &LightingConfig) -> Self {
        Self {
            flashlight: cfg.flashlight,
            intensity: cfg.intensity.clamp(0.0, 1.0),
            range: cfg.range.max(1.0),
            cone_half_angle: clamp_cone(cfg.cone_degrees.to_radians()),
            ambient: cfg.ambient.clamp(0.0, 1.0),
            sharpness: cfg.sharpness.max(1.0),
            linear: cfg.linear.max(0.0),
            quadratic: cfg.quadratic.max(0.0),
            fade_band: cfg.fade_band.max(0.0),
        }
    }
}

fn clamp_cone(a: f32) -> f32 {
    a.clamp(1e-3, PI - 1e-3)
}

/// Read-only view handed to HUD and audio code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingSnapshot {
    pub flashlight: bool,
    pub intensity: f32,
    pub range: f32,
    pub cone_half_angle: f32,
    pub ambient: f32,
}

pub struct LightingModel {
    state: LightingState,
    lut_size: usize,
    lut: DistanceLut,
}

impl Default for LightingModel {
    fn default() -> Self {
        Self::new(&LightingConfig::default())
    }
}

impl LightingModel {
    pub fn new(cfg: &LightingConfig) -> Self {
        let state = LightingState::from_config(cfg);
        let lut_size = cfg.lut_size.max(2);
        let lut = build_lut(&state, lut_size);
        Self {
            state,
            lut_size,
            lut,
        }
    }

    #[inline]
    pub fn state(&self) -> &LightingState {
        &self.state
    }

    #[inline]
    pub fn lut(&self) -> &DistanceLut {
        &self.lut
    }

    #[inline]
    pub fn ambient(&self) -> f32 {
        self.state.ambient
    }

    #[inline]
    pub fn flashlight_enabled(&self) -> bool {
        self.state.flashlight
    }

    pub fn snapshot(&self) -> LightingSnapshot {
        LightingSnapshot {
            flashlight: self.state.flashlight,
            intensity: self.state.intensity,
            range: self.state.range,
            cone_half_angle: self.state.cone_half_angle,
            ambient: self.state.ambient,
        }
    }

    /// `1 / (1 + a d + b d²)` faded to zero across the last `fade_band` units of range.
    pub fn attenuation(&self, d: f32) -> f32 {
        attenuation(&self.state, d)
    }

    /// Cone weight for an absolute angle off the view direction.
    #[inline]
    pub fn cone_factor(&self, angle_diff: f32) -> f32 {
        let s = &self.state;
        let a = angle_diff.abs();
        if a > s.cone_half_angle {
            return 0.0;
        }
        (a / s.cone_half_angle * FRAC_PI_2).cos().max(0.0).powf(s.sharpness)
    }

    /// `intensity × attenuation(d)` through the lookup table.
    #[inline]
    pub fn falloff(&self, d: f32) -> f32 {
        self.lut.sample(d)
    }

    /// Light reaching `target` at `distance` from a viewer holding the flashlight.
    pub fn intensity_at(&self, viewer: &Pose, target: Vec2, distance: f32) -> f32 {
        self.shade(viewer, target, distance, |d| self.lut.sample(d))
    }

    /// Same as `intensity_at` but evaluates the falloff formula directly.
    pub fn intensity_at_direct(&self, viewer: &Pose, target: Vec2, distance: f32) -> f32 {
        self.shade(viewer, target, distance, |d| {
            self.state.intensity * attenuation(&self.state, d)
        })
    }

    /// Light for a precomputed angle off-axis, used by the floor caster.
    #[inline]
    pub fn intensity_for(&self, angle_diff: f32, distance: f32) -> f32 {
        if !self.state.flashlight {
            return self.state.ambient;
        }
        if distance <= 0.0 {
            return 1.0;
        }
        let lit = self.cone_factor(angle_diff) * self.lut.sample(distance);
        (self.state.ambient + lit).clamp(0.0, 1.0)
    }

    fn shade(&self, viewer: &Pose, target: Vec2, distance: f32, falloff: impl Fn(f32) -> f32) -> f32 {
        let s = &self.state;
        if !s.flashlight {
            return s.ambient;
        }
        if distance <= 0.0 {
            return 1.0;
        }
        let cone = self.cone_factor(viewer.bearing_to(target));
        if cone <= 0.0 {
            return s.ambient;
        }
        (s.ambient + cone * falloff(distance)).clamp(0.0, 1.0)
    }

    pub fn toggle_flashlight(&mut self) -> bool {
        self.set_flashlight_enabled(!self.state.flashlight);
        self.state.flashlight
    }

    pub fn set_flashlight_enabled(&mut self, on: bool) {
        if self.state.flashlight != on {
            log::debug!(target: "lighting", "flashlight {}", if on { "on" } else { "off" });
        }
        self.state.flashlight = on;
    }

    pub fn set_intensity(&mut self, v: f32) {
        self.state.intensity = v.clamp(0.0, 1.0);
        self.rebuild();
    }

    pub fn set_range(&mut self, v: f32) {
        self.state.range = v.max(1.0);
        self.rebuild();
    }

    pub fn set_ambient(&mut self, v: f32) {
        self.state.ambient = v.clamp(0.0, 1.0);
    }

    pub fn set_cone_half_angle(&mut self, radians: f32) {
        self.state.cone_half_angle = clamp_cone(radians);
    }

    pub fn set_sharpness(&mut self, k: f32) {
        self.state.sharpness = k.max(1.0);
    }

    pub fn set_attenuation(&mut self, linear: f32, quadratic: f32) {
        self.state.linear = linear.max(0.0);
        self.state.quadratic = quadratic.max(0.0);
        self.rebuild();
    }

    pub fn set_fade_band(&mut self, band: f32) {
        self.state.fade_band = band.max(0.0);
        self.rebuild();
    }

    /// Replaces every parameter from `cfg` and rebuilds the table once.
    pub fn apply_config(&mut self, cfg: &LightingConfig) {
        self.state = LightingState::from_config(cfg);
        self.lut_size = cfg.lut_size.max(2);
        self.rebuild();
        log::info!(
            target: "lighting",
            "applied lighting config: flashlight={} intensity={:.2} range={:.1} ambient={:.2}",
            self.state.flashlight,
            self.state.intensity,
            self.state.range,
            self.state.ambient
        );
    }

    fn rebuild(&mut self) {
        self.lut = build_lut(&self.state, self.lut_size);
        log::debug!(
            target: "lighting",
            "rebuilt distance LUT: {} samples over [0, {:.1}]",
            self.lut.len(),
            self.state.range
        );
    }
}

fn attenuation(s: &LightingState, d: f32) -> f32 {
    if d >= s.range {
        return 0.0;
    }
    let d = d.max(0.0);
    let base = 1.0 / (1.0 + s.linear * d + s.quadratic * d * d);
    let fade_start = s.range - s.fade_band;
    if s.fade_band > 0.0 && d > fade_start {
        base * (s.range - d) / s.fade_band
    } else {
        base
    }
}

fn build_lut(s: &LightingState, size: usize) -> DistanceLut {
    DistanceLut::build(size, s.range, |d| s.intensity * attenuation(s, d))
}
