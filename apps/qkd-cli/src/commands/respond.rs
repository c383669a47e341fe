use std::path::Path;

use crate::util::open_coordinator;

pub fn run(store: &Path, ready: bool, message: Option<String>) -> Result<(), String> {
    let (_cfg, mut coordinator) = open_coordinator(store, None)?;
    let message = message.unwrap_or_else(|| {
        if ready {
            "Ready for the quantum protocol!".to_string()
        } else {
            "Not ready yet.".to_string()
        }
    });
    let summary = coordinator
        .receiver_respond(ready, &message)
        .map_err(|e| e.to_string())?;
    println!("event=respond ready={ready} phase={}", summary.phase);
    Ok(())
}
