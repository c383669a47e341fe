use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bb84_core::Role;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

pub const CONFIG_FILE_NAME: &str = "config.json";

fn default_qubits() -> usize {
    20
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_wait_ms() -> u64 {
    30_000
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Shared session document location, reachable by every actor.
    pub session_path: PathBuf,
    pub role: Role,
    pub actor: String,
    #[serde(default = "default_qubits")]
    pub default_qubits: usize,
    #[serde(default)]
    pub eavesdropper: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

/// Owner-only write-then-rename, so a concurrent reader never observes a
/// half-written config.
pub fn write_config(path: &Path, cfg: &Config) -> Result<(), String> {
    let data = serde_json::to_vec_pretty(cfg).map_err(|e| format!("serialize config: {e}"))?;
    let tmp = path.with_extension("tmp");
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        opts.mode(0o600);
    }
    let mut f = opts.open(&tmp).map_err(|e| format!("open config tmp: {e}"))?;
    f.write_all(&data).map_err(|e| format!("write config: {e}"))?;
    f.sync_all().map_err(|e| format!("sync config: {e}"))?;
    fs::rename(&tmp, path).map_err(|e| format!("replace config: {e}"))?;
    Ok(())
}

pub fn read_config(path: &Path) -> Result<Config, String> {
    let data = fs::read(path).map_err(|e| format!("read config: {e}"))?;
    serde_json::from_slice(&data).map_err(|e| format!("parse config: {e}"))
}
