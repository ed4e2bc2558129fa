use std::collections::VecDeque;

use serde::Deserialize;
use umbra_geom::{Cell, Vec2};
use umbra_world::TileMap;

use crate::astar::Pathfinder;

#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    /// Tiles per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,
    /// Seconds between route refreshes while chasing.
    #[serde(default = "default_path_interval")]
    pub path_interval: f32,
    /// No new route is requested once the target is this close.
    #[serde(default = "default_min_chase_distance")]
    pub min_chase_distance: f32,
    #[serde(default = "default_waypoint_epsilon")]
    pub waypoint_epsilon: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            detection_radius: default_detection_radius(),
            path_interval: default_path_interval(),
            min_chase_distance: default_min_chase_distance(),
            waypoint_epsilon: default_waypoint_epsilon(),
        }
    }
}

fn default_speed() -> f32 {
    1.8
}
fn default_detection_radius() -> f32 {
    10.0
}
fn default_path_interval() -> f32 {
    0.5
}
fn default_min_chase_distance() -> f32 {
    1.0
}
fn default_waypoint_epsilon() -> f32 {
    0.1
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AgentState {
    #[default]
    Idle,
    Chasing,
    /// Reserved; no transition enters it yet.
    Attacking,
}

/// What HUD and positional-audio code may read about an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub position: Vec2,
    pub state: AgentState,
    pub distance_to_target: f32,
    pub waypoints_remaining: usize,
    pub anim_time: f32,
}

pub struct NavigatingAgent {
    cfg: AgentConfig,
    position: Vec2,
    state: AgentState,
    waypoints: VecDeque<Cell>,
    refresh_timer: f32,
    anim_time: f32,
    last_distance: f32,
}

impl NavigatingAgent {
    pub fn new(position: Vec2, cfg: AgentConfig) -> Self {
        Self {
            cfg,
            position,
            state: AgentState::Idle,
            waypoints: VecDeque::new(),
            refresh_timer: 0.0,
            anim_time: 0.0,
            last_distance: f32::INFINITY,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    #[inline]
    pub fn anim_time(&self) -> f32 {
        self.anim_time
    }

    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.cfg
    }

    /// Remaining route, next waypoint first.
    pub fn waypoints(&self) -> impl Iterator<Item = Cell> + '_ {
        self.waypoints.iter().copied()
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            state: self.state,
            distance_to_target: self.last_distance,
            waypoints_remaining: self.waypoints.len(),
            anim_time: self.anim_time,
        }
    }

    /// Advances one tick toward `target`.
    pub fn update<M: TileMap + ?Sized>(&mut self, target: Vec2, map: &M, pathfinder: &Pathfinder, dt: f32) {
        let dt = dt.max(0.0);
        self.refresh_timer += dt;
        self.anim_time += dt;

        let distance = self.position.distance(target);
        self.last_distance = distance;
        let next = if distance < self.cfg.detection_radius {
            AgentState::Chasing
        } else {
            AgentState::Idle
        };
        if next != self.state {
            log::debug!(target: "nav", "agent {:?} -> {:?} at distance {:.2}", self.state, next, distance);
            if next == AgentState::Idle {
                self.waypoints.clear();
            }
            self.state = next;
        }
        if self.state != AgentState::Chasing {
            return;
        }

        if distance > self.cfg.min_chase_distance && self.refresh_timer >= self.cfg.path_interval {
            self.refresh_timer = 0.0;
            self.replan(target, map, pathfinder);
        }
        self.steer(target, dt);
    }

    fn replan<M: TileMap + ?Sized>(&mut self, target: Vec2, map: &M, pathfinder: &Pathfinder) {
        let route = pathfinder.find_path_on(map, self.position.cell(), target.cell());
        self.waypoints.clear();
        // The first cell is the one the agent stands in.
        self.waypoints.extend(route.into_iter().skip(1));
        if self.waypoints.is_empty() {
            log::trace!(target: "nav", "no route to target; steering directly");
        }
    }

    fn steer(&mut self, target: Vec2, dt: f32) {
        let (goal, following) = match self.waypoints.front() {
            Some(c) => (c.center(), true),
            None => (target, false),
        };
        let to = goal - self.position;
        let d = to.length();
        if following && d < self.cfg.waypoint_epsilon {
            self.waypoints.pop_front();
            return;
        }
        if d > 0.01 {
            let step = (self.cfg.speed * dt).min(d);
            self.position += to * (step / d);
        }
    }
}
