use std::path::Path;
use std::time::Duration;

use bb84_core::{CoordinatorConfig, FileStore, SessionCoordinator};

use crate::config::{self, Config};
use crate::seed::rng_from_env;

pub fn load_config(store: &Path) -> Result<Config, String> {
    if !store.exists() {
        return Err(format!(
            "store not found: {} (run: qkd init --store <path>)",
            store.display()
        ));
    }
    let cfg_path = store.join(config::CONFIG_FILE_NAME);
    config::read_config(&cfg_path).map_err(|_| {
        format!(
            "config missing or invalid: {} (run: qkd init --store <path>)",
            cfg_path.display()
        )
    })
}

/// Builds this actor's coordinator from its store config. `max_wait_ms`
/// overrides the configured polling bound for a single invocation.
pub fn open_coordinator(
    store: &Path,
    max_wait_ms: Option<u64>,
) -> Result<(Config, SessionCoordinator<FileStore>), String> {
    let cfg = load_config(store)?;
    let rng = rng_from_env(&cfg.actor);
    let coordinator = SessionCoordinator::new(
        FileStore::new(&cfg.session_path),
        cfg.role,
        cfg.actor.clone(),
        rng,
    )
    .with_config(CoordinatorConfig {
        poll_interval: Duration::from_millis(cfg.poll_interval_ms),
        max_wait: Duration::from_millis(max_wait_ms.unwrap_or(cfg.max_wait_ms)),
        retry_limit: 3,
    });
    Ok((cfg, coordinator))
}
