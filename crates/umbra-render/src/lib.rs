//! Column raycaster, floor/ceiling caster, minimap commands and sprite projection.
#![forbid(unsafe_code)]

mod config;
mod dda;
mod frame;
pub mod minimap;
mod raycaster;
pub mod sprite;

pub use config::RenderConfig;
pub use dda::{RaycastHit, Side, cast_ray, raycast_first_hit};
pub use frame::Frame;
pub use minimap::{DrawCommand, MinimapConfig, render_minimap};
pub use raycaster::{Raycaster, Surfaces};
pub use sprite::{SpriteBob, SpriteProjection, draw_agent_sprite, project_sprite};
