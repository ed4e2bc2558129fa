use std::error::Error;
use std::fs::File;
use std::path::Path;

use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Installs the global logger.
///
/// Without a log file, `env_logger` honours `RUST_LOG` (default `info`). With one,
/// terminal and file output are combined through simplelog at `info`, or at
/// `RUST_LOG` when it names a plain level.
pub fn init(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        return Ok(());
    };
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    let config = ConfigBuilder::new().set_target_level(LevelFilter::Error).build();
    CombinedLogger::init(vec![
        TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, config, File::create(path)?),
    ])?;
    Ok(())
}
