use std::path::Path;

use bb84_core::Method;

use crate::util::open_coordinator;

pub fn run(store: &Path, qubits: Option<usize>, method: &str) -> Result<(), String> {
    let method: Method = method.parse()?;
    let (cfg, mut coordinator) = open_coordinator(store, None)?;
    let n = qubits.unwrap_or(cfg.default_qubits);
    let summary = coordinator.prepare(n, method).map_err(|e| e.to_string())?;
    println!(
        "event=prepared qubits={} phase={}",
        summary.qubits, summary.phase
    );
    Ok(())
}
