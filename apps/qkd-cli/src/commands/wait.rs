use std::path::Path;

use bb84_core::{AwaitOutcome, Phase};

use crate::util::open_coordinator;

pub fn run(store: &Path, phases: &[String], max_wait_ms: Option<u64>) -> Result<(), String> {
    if phases.is_empty() {
        return Err("at least one --phase is required".to_string());
    }
    let mut targets = Vec::with_capacity(phases.len());
    for raw in phases {
        targets.push(raw.parse::<Phase>()?);
    }
    let (_cfg, coordinator) = open_coordinator(store, max_wait_ms)?;
    match coordinator
        .await_phase(&targets)
        .map_err(|e| e.to_string())?
    {
        AwaitOutcome::Reached(phase) => {
            println!("event=wait_reached phase={phase}");
        }
        AwaitOutcome::PeerReset => {
            println!("event=wait_peer_reset phase={}", Phase::Greeting);
        }
    }
    Ok(())
}
