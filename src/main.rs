mod assets;
mod cli;
mod config;
mod logging;
mod session;
mod watch;

use std::error::Error;

use clap::Parser;

use crate::cli::Cli;
use crate::config::UmbraConfig;
use crate::session::Session;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let assets_root = assets::resolve_assets_root(cli.assets.clone());
    let config_path = match &cli.config {
        Some(p) => Some(p.clone()),
        None => Some(assets::config_path(&assets_root)).filter(|p| p.exists()),
    };
    let mut cfg = match &config_path {
        Some(p) => UmbraConfig::from_path(p)?,
        None => UmbraConfig::default(),
    };
    cfg.apply_cli(&cli);
    log::info!(
        "umbra: map={:?} seed={} {}x{} frames={} assets={}",
        cli.map,
        cfg.world.seed,
        cfg.render.width,
        cfg.render.height,
        cli.frames,
        assets_root.display()
    );

    let tex_dir = UmbraConfig::asset_path(&assets_root, &cfg.textures.dir);
    let watch_rx = cli
        .watch
        .then(|| watch::spawn(config_path.clone(), Some(tex_dir).filter(|d| d.exists())));

    let mut session = Session::new(cfg, &assets_root, cli.map)?;
    let mut last = None;
    for _ in 0..cli.frames {
        if let Some(rx) = &watch_rx {
            session.drain_watch_events(rx, config_path.as_deref());
        }
        let stats = session.step();
        if stats.index % 30 == 0 {
            log::info!(
                target: "frame",
                "[frame {}] walls={} shade={:.3} chunks={} agent={:?} minimap_cmds={}",
                stats.index,
                stats.wall_columns,
                stats.mean_shade,
                stats.resident,
                stats.agent_state,
                stats.minimap_commands
            );
        }
        last = Some(stats);
    }

    if let Some(frame) = session.last_frame() {
        frame.save_png(&cli.out)?;
        log::info!("wrote {}", cli.out.display());
    }
    if let Some(stats) = last {
        let light = session.lighting().snapshot();
        log::info!(
            "done after {} frame(s): flashlight={} agent={:?} at {:?}, viewer at ({:.2}, {:.2})",
            stats.index + 1,
            light.flashlight,
            session.agent().state(),
            session.agent().position(),
            session.pose().pos.x,
            session.pose().pos.y
        );
    }
    Ok(())
}
