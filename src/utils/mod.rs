use std::{env, fs, io, path::Path, path::PathBuf, sync::Once};

use dirs::home_dir;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIR_NAME: &str = ".installment_core";
const CONFIG_FILE: &str = "config.json";

const DEFAULT_LOG_DIRECTIVE: &str = "installment_core=info";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` wins when set; otherwise
/// the crate logs at `info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::fmt;

        let filter = log_filter(env::var("RUST_LOG").ok().as_deref());

        // Another subscriber may already be installed by an embedding application.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    });
}

fn log_filter(spec: Option<&str>) -> EnvFilter {
    match spec.map(str::trim).filter(|spec| !spec.is_empty()) {
        Some(spec) => {
            EnvFilter::try_new(spec).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
        }
        None => EnvFilter::new(DEFAULT_LOG_DIRECTIVE),
    }
}

/// Application data directory, defaulting to `~/.installment_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("INSTALLMENT_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
