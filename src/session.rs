use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use umbra_geom::{Cell, Pose, Vec2};
use umbra_lighting::LightingModel;
use umbra_nav::{AgentState, NavigatingAgent, Pathfinder};
use umbra_render::{Frame, Raycaster, SpriteBob, draw_agent_sprite, project_sprite, render_minimap};
use umbra_texture::TextureCache;
use umbra_tiles::{MaterialCatalog, Tile};
use umbra_world::{BoundedMap, TileMap, WorldGenParams, WorldGrid};

use crate::cli::MapKind;
use crate::config::UmbraConfig;
use crate::watch::WatchEvent;

/// The two kinds of world the driver can walk through.
pub enum SessionMap {
    Bounded(BoundedMap),
    Procedural(WorldGrid),
}

impl TileMap for SessionMap {
    fn tile_at(&self, x: i32, y: i32) -> Tile {
        match self {
            SessionMap::Bounded(m) => m.tile_at(x, y),
            SessionMap::Procedural(g) => g.tile_at(x, y),
        }
    }

    fn bounds(&self) -> Option<(usize, usize)> {
        match self {
            SessionMap::Bounded(m) => m.bounds(),
            SessionMap::Procedural(g) => g.bounds(),
        }
    }
}

impl SessionMap {
    fn ensure_loaded(&mut self, p: Vec2) -> usize {
        match self {
            SessionMap::Bounded(_) => 0,
            SessionMap::Procedural(g) => g.ensure_loaded(p.x, p.y),
        }
    }

    fn resident_chunks(&self) -> usize {
        match self {
            SessionMap::Bounded(_) => 0,
            SessionMap::Procedural(g) => g.loaded_count(),
        }
    }

    fn find_open_near(&self, c: Cell, radius: i32) -> Option<Cell> {
        match self {
            SessionMap::Bounded(m) => m.find_open_near(c.x, c.y, radius),
            SessionMap::Procedural(g) => g.find_open_near(c.x, c.y, radius),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    pub index: u32,
    pub wall_columns: usize,
    pub mean_shade: f32,
    pub generated: usize,
    pub resident: usize,
    pub agent_state: AgentState,
    pub waypoints: usize,
    pub sprite_columns: usize,
    pub minimap_commands: usize,
}

const TURN_RATE: f32 = 0.6;
const WALK_SPEED: f32 = 1.2;
const DT: f32 = 1.0 / 30.0;

pub struct Session {
    cfg: UmbraConfig,
    assets: PathBuf,
    catalog: MaterialCatalog,
    textures: TextureCache,
    lighting: LightingModel,
    raycaster: Raycaster,
    pathfinder: Pathfinder,
    map: SessionMap,
    pose: Pose,
    agent: NavigatingAgent,
    bob: SpriteBob,
    wander: FastNoiseLite,
    frame_index: u32,
    last_frame: Option<Frame>,
}

impl Session {
    pub fn new(cfg: UmbraConfig, assets: &Path, map_kind: MapKind) -> Result<Self, Box<dyn Error>> {
        let materials = UmbraConfig::asset_path(assets, &cfg.textures.materials);
        let catalog = if materials.exists() {
            MaterialCatalog::from_path(&materials)?
        } else {
            log::info!("no materials file at {}; using built-in materials", materials.display());
            MaterialCatalog::builtin()
        };
        let tex_dir = UmbraConfig::asset_path(assets, &cfg.textures.dir);
        let textures = TextureCache::load(&catalog, &tex_dir, cfg.textures.size, cfg.textures.seed);
        let lighting = LightingModel::new(&cfg.lighting);
        let raycaster = Raycaster::new(cfg.render.clone(), &catalog);

        let mut map = match map_kind {
            MapKind::Demo => SessionMap::Bounded(BoundedMap::demo(&catalog)),
            MapKind::Procedural => {
                let params = Arc::new(WorldGenParams::from_config(&cfg.world, &catalog));
                SessionMap::Procedural(WorldGrid::new(cfg.world.seed, params))
            }
        };
        let origin = match map_kind {
            MapKind::Demo => Cell::new(2, 2),
            MapKind::Procedural => Cell::new(0, 0),
        };
        map.ensure_loaded(origin.center());
        let spawn = map
            .find_open_near(origin, 24)
            .ok_or("no open cell near the spawn point")?;
        map.ensure_loaded(spawn.center());
        let pose = Pose::new(spawn.x as f32 + 0.5, spawn.y as f32 + 0.5, 0.0);

        let agent_cell = map.find_open_near(spawn.offset(5, 4), 8).unwrap_or(spawn);
        let agent = NavigatingAgent::new(agent_cell.center(), cfg.agent.clone());
        log::info!(
            target: "session",
            "spawned viewer at ({}, {}), agent at ({}, {})",
            spawn.x,
            spawn.y,
            agent_cell.x,
            agent_cell.y
        );

        let mut wander = FastNoiseLite::with_seed(cfg.world.seed);
        wander.set_noise_type(Some(NoiseType::OpenSimplex2));
        wander.set_frequency(Some(0.05));

        Ok(Self {
            bob: SpriteBob::new(cfg.world.seed),
            cfg,
            assets: assets.to_path_buf(),
            catalog,
            textures,
            lighting,
            raycaster,
            pathfinder: Pathfinder::default(),
            map,
            pose,
            agent,
            wander,
            frame_index: 0,
            last_frame: None,
        })
    }

    #[inline]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    #[inline]
    pub fn lighting(&self) -> &LightingModel {
        &self.lighting
    }

    #[inline]
    pub fn agent(&self) -> &NavigatingAgent {
        &self.agent
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Advances the viewer and agent one tick and renders a frame.
    pub fn step(&mut self) -> FrameStats {
        self.move_viewer(DT);
        let generated = self.map.ensure_loaded(self.pose.pos);
        self.agent.update(self.pose.pos, &self.map, &self.pathfinder, DT);

        let mut frame = self
            .raycaster
            .render_frame(&self.pose, &self.map, &self.lighting, &self.textures);

        let mut sprite_columns = 0;
        if let Some(proj) = project_sprite(&self.pose, self.agent.position(), self.raycaster.config()) {
            let light = self.lighting.intensity_at(&self.pose, self.agent.position(), proj.distance);
            sprite_columns = draw_agent_sprite(&mut frame, &proj, light, self.agent.anim_time(), &self.bob);
        }
        let minimap = render_minimap(&self.pose, &self.map, &self.catalog, &self.cfg.minimap);

        let mean_shade = if frame.shade.is_empty() {
            0.0
        } else {
            frame.shade.iter().sum::<f32>() / frame.shade.len() as f32
        };
        let snap = self.agent.snapshot();
        let stats = FrameStats {
            index: self.frame_index,
            wall_columns: frame.wall_columns(),
            mean_shade,
            generated,
            resident: self.map.resident_chunks(),
            agent_state: snap.state,
            waypoints: snap.waypoints_remaining,
            sprite_columns,
            minimap_commands: minimap.len(),
        };
        log::debug!(
            target: "frame",
            "[frame {}] walls={} shade={:.3} chunks+={} agent={:?} waypoints={} sprite_cols={}",
            stats.index,
            stats.wall_columns,
            stats.mean_shade,
            stats.generated,
            stats.agent_state,
            stats.waypoints,
            stats.sprite_columns
        );
        self.frame_index += 1;
        self.last_frame = Some(frame);
        stats
    }

    /// Slow wander: turn by a smooth noise signal and walk forward when clear.
    fn move_viewer(&mut self, dt: f32) {
        let t = self.frame_index as f32;
        let turn = TURN_RATE + self.wander.get_noise_2d(t, 0.0) * TURN_RATE;
        self.pose.angle = umbra_geom::normalize_angle(self.pose.angle + turn * dt);
        let next = self.pose.pos + self.pose.forward() * (WALK_SPEED * dt);
        if self.map.is_wall_at_point(next) {
            self.pose.angle = umbra_geom::normalize_angle(self.pose.angle + std::f32::consts::FRAC_PI_2);
        } else {
            self.pose.pos = next;
        }
    }

    /// Applies pending file-change notifications.
    pub fn drain_watch_events(&mut self, rx: &Receiver<WatchEvent>, config_path: Option<&Path>) {
        for ev in rx.try_iter() {
            match ev {
                WatchEvent::Config => {
                    let Some(path) = config_path else {
                        continue;
                    };
                    match UmbraConfig::from_path(path) {
                        Ok(cfg) => {
                            self.lighting.apply_config(&cfg.lighting);
                            log::info!(target: "session", "reloaded lighting from {}", path.display());
                        }
                        Err(e) => log::warn!(target: "session", "ignoring config change: {e}"),
                    }
                }
                WatchEvent::Texture(path) => {
                    let tex_dir = UmbraConfig::asset_path(&self.assets, &self.cfg.textures.dir);
                    for id in TextureCache::materials_using(&self.catalog, &path) {
                        self.textures.reload(&self.catalog, &tex_dir, id);
                    }
                }
            }
        }
    }
}
