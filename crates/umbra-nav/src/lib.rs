//! Grid A* and the chase agent that follows its routes.
#![forbid(unsafe_code)]

mod agent;
mod astar;

pub use agent::{AgentConfig, AgentSnapshot, AgentState, NavigatingAgent};
pub use astar::{DEFAULT_MAX_EXPANDED, Pathfinder, path_cost};
