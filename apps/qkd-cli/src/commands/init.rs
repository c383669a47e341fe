use std::fs;
use std::path::Path;

use bb84_core::Role;

use crate::config::{self, Config};

#[allow(clippy::too_many_arguments)]
pub fn run(
    store: &Path,
    session: &Path,
    role: &str,
    actor: &str,
    qubits: usize,
    eavesdropper: bool,
    poll_interval_ms: u64,
    max_wait_ms: u64,
) -> Result<(), String> {
    let role: Role = role.parse()?;
    let actor = actor.trim().to_ascii_lowercase();
    if actor.is_empty() {
        return Err("actor name must not be empty".to_string());
    }
    if qubits < 1 {
        return Err("qubit count must be at least 1".to_string());
    }
    if poll_interval_ms == 0 {
        return Err("poll interval must be at least 1 ms".to_string());
    }

    fs::create_dir_all(store).map_err(|e| format!("create store dir: {e}"))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(store, fs::Permissions::from_mode(0o700))
            .map_err(|e| format!("set store permissions: {e}"))?;
    }

    let cfg_path = store.join(config::CONFIG_FILE_NAME);
    if cfg_path.exists() {
        return Err("config already exists; delete it or choose a new --store".to_string());
    }

    if let Some(parent) = session.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| format!("create session dir: {e}"))?;
        }
    }

    let cfg = Config {
        session_path: session.to_path_buf(),
        role,
        actor,
        default_qubits: qubits,
        eavesdropper,
        poll_interval_ms,
        max_wait_ms,
    };
    config::write_config(&cfg_path, &cfg)?;

    println!("Initialized actor store at {}", store.display());
    println!("Wrote config: {}", cfg_path.display());
    Ok(())
}
