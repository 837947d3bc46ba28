mod bindings;
mod config_store;
mod loop_runner;
mod renderer;
mod visibility;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config_store::{ConfigStore, OverlayConfig};
use crate::visibility::AlwaysPresent;

fn main() {
    init_tracing();
    info!("=== Reticle Overlay Startup ===");

    let mut store = ConfigStore::at_default_location();
    let config = match store.load_or_init() {
        Ok(config) => config,
        Err(error) => {
            warn!(error = %error, "config_load_failed; falling back to defaults");
            OverlayConfig::default()
        }
    };

    if let Err(err) = loop_runner::run(config, store, Box::new(AlwaysPresent)) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
