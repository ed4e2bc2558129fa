use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MapKind {
    /// The built-in 16x16 test room.
    Demo,
    /// Endless noise-generated world.
    Procedural,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Parser)]
#[command(name = "umbra", version, about = "Headless tile-grid raycaster driver")]
pub struct Cli {
    /// TOML config; missing sections fall back to defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Assets directory (overrides UMBRA_ASSETS and the search).
    #[arg(long)]
    pub assets: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<i32>,

    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// Where the last frame is written as PNG.
    #[arg(long, default_value = "umbra.png")]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = MapKind::Procedural)]
    pub map: MapKind,

    #[arg(long, value_enum)]
    pub flashlight: Option<Toggle>,

    /// Re-apply config and textures when their files change.
    #[arg(long)]
    pub watch: bool,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Render without the rayon pool.
    #[arg(long)]
    pub sequential: bool,
}
