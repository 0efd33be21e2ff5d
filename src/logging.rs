use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Default log location; the terminal belongs to the UI so logs go to a file.
pub fn default_log_path() -> PathBuf {
    let mut path = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir);
    path.push("newsdigest");
    path.push("newsdigest.log");
    path
}

/// Installs the global subscriber once. `RUST_LOG` overrides the `info` default.
pub fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
    Ok(())
}
