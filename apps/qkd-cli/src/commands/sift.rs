use std::path::Path;

use crate::util::open_coordinator;

pub fn run(store: &Path) -> Result<(), String> {
    let (_cfg, mut coordinator) = open_coordinator(store, None)?;
    let summary = coordinator.sift().map_err(|e| e.to_string())?;
    println!(
        "event=sifted matching={} sifted={} phase={}",
        summary.matching, summary.sifted, summary.phase
    );
    Ok(())
}
