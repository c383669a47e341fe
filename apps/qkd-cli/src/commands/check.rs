use std::path::Path;

use bb84_core::Phase;

use crate::util::open_coordinator;

pub fn run(store: &Path) -> Result<(), String> {
    let (_cfg, mut coordinator) = open_coordinator(store, None)?;
    let summary = coordinator.check_errors().map_err(|e| e.to_string())?;
    println!(
        "event=error_check error_rate={:.3} sifted={} phase={}",
        summary.error_rate, summary.sifted, summary.phase
    );
    if summary.phase == Phase::Failed {
        eprintln!(
            "not enough bits survived the public comparison; restart with more qubits or disable the eavesdropper"
        );
    }
    Ok(())
}
