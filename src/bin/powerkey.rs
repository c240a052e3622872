// Powerkey
// Shut the system down when the power button is pressed

use anyhow::Result;

use powerkey_core::{watch, WatcherConfig};

/// Logging stays quiet unless something goes wrong; RUST_LOG overrides.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
}

/// Device path, command and trigger are fixed; there is nothing to parse.
fn watcher_config() -> WatcherConfig {
    WatcherConfig::default()
}

// An open failure comes back as an error: printed to stderr, exit status 1.
fn main() -> Result<()> {
    init_logging();

    let config = watcher_config();
    log::debug!("Starting powerkey with {:?}", config);

    watch(&config)?;
    Ok(())
}
