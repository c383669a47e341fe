use std::path::Path;

use bb84_core::Method;

use crate::util::open_coordinator;

pub fn run(store: &Path, method: &str) -> Result<(), String> {
    let method: Method = method.parse()?;
    let (_cfg, mut coordinator) = open_coordinator(store, None)?;
    let summary = coordinator.measure(method).map_err(|e| e.to_string())?;
    println!(
        "event=measured qubits={} phase={}",
        summary.qubits, summary.phase
    );
    Ok(())
}
