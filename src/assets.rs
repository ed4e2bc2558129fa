use std::path::{Path, PathBuf};

pub fn resolve_assets_root(cli: Option<PathBuf>) -> PathBuf {
    // Precedence: CLI flag -> UMBRA_ASSETS env -> search nearby dirs -> CWD
    if let Some(p) = cli {
        if p.exists() {
            return p;
        }
        log::warn!("assets dir {} does not exist; searching", p.display());
    }
    if let Ok(p) = std::env::var("UMBRA_ASSETS") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return pb;
        }
    }
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.to_path_buf());
        }
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    for base in candidates {
        let mut cur = base;
        for _ in 0..5 {
            if materials_path(&cur.join("assets")).exists() {
                return cur.join("assets");
            }
            match cur.parent() {
                Some(parent) => cur = parent.to_path_buf(),
                None => break,
            }
        }
    }
    PathBuf::from("assets")
}

pub fn materials_path(root: &Path) -> PathBuf {
    root.join("materials.toml")
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join("umbra.toml")
}
