use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use notify::{EventKind, RecursiveMode, Watcher};

/// File changes the session reacts to between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchEvent {
    Config,
    Texture(PathBuf),
}

fn is_image(p: &std::path::Path) -> bool {
    match p.extension().and_then(|e| e.to_str()) {
        Some(e) => matches!(e.to_lowercase().as_str(), "png" | "jpg" | "jpeg"),
        None => false,
    }
}

/// Spawns background watchers for the config file and the texture directory.
/// Either path may be absent; the receiver then simply never fires for it.
pub fn spawn(config: Option<PathBuf>, textures: Option<PathBuf>) -> Receiver<WatchEvent> {
    let (tx, rx) = unbounded::<WatchEvent>();
    if let Some(path) = config {
        spawn_one(path, RecursiveMode::NonRecursive, tx.clone(), |p| {
            (!is_image(p)).then_some(WatchEvent::Config)
        });
    }
    if let Some(dir) = textures {
        spawn_one(dir, RecursiveMode::Recursive, tx, |p| {
            is_image(p).then(|| WatchEvent::Texture(p.to_path_buf()))
        });
    }
    rx
}

/// Sends one `WatchEvent` per relevant path of `event`; returns how many were delivered.
fn forward<F>(event: &notify::Event, classify: &F, tx: &Sender<WatchEvent>) -> usize
where
    F: Fn(&std::path::Path) -> Option<WatchEvent>,
{
    match event.kind {
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => {}
        _ => return 0,
    }
    let mut sent = 0;
    for p in &event.paths {
        let Some(ev) = classify(p) else {
            continue;
        };
        if tx.send(ev).is_err() {
            log::trace!("watch receiver gone; dropping change to {}", p.display());
            break;
        }
        sent += 1;
    }
    sent
}

fn spawn_one<F>(path: PathBuf, mode: RecursiveMode, tx: Sender<WatchEvent>, classify: F)
where
    F: Fn(&std::path::Path) -> Option<WatchEvent> + Send + 'static,
{
    std::thread::spawn(move || {
        let watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                forward(&event, &classify, &tx);
            }
        });
        let mut watcher = match watcher {
            Ok(w) => w,
            Err(e) => {
                log::warn!("file watcher unavailable: {e}");
                return;
            }
        };
        if let Err(e) = watcher.watch(path.as_path(), mode) {
            log::warn!("cannot watch {}: {e}", path.display());
            return;
        }
        log::info!("watching {}", path.display());
        loop {
            std::thread::sleep(Duration::from_secs(3600));
        }
    });
}
