use std::path::Path;

use bb84_core::Phase;

use crate::util::open_coordinator;

pub fn run(store: &Path) -> Result<(), String> {
    let (_cfg, mut coordinator) = open_coordinator(store, None)?;
    let summary = coordinator.distill_key().map_err(|e| e.to_string())?;
    println!(
        "event=key_distilled key_len={} phase={}",
        summary.key_len, summary.phase
    );
    match summary.phase {
        Phase::Complete => {
            let doc = coordinator.snapshot().map_err(|e| e.to_string())?;
            if let Some(key) = doc.final_key {
                println!("final_key={key}");
            }
        }
        Phase::Failed => {
            eprintln!(
                "too few bits to distill a key; restart with more qubits or disable the eavesdropper"
            );
        }
        _ => {}
    }
    Ok(())
}
