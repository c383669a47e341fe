use std::path::Path;

use crate::util::open_coordinator;

pub fn run(store: &Path, partner: &str, message: Option<String>) -> Result<(), String> {
    let (cfg, mut coordinator) = open_coordinator(store, None)?;
    let partner = partner.trim().to_ascii_lowercase();
    let message = message.unwrap_or_else(|| {
        format!("Hello {partner}! Ready for quantum key exchange?")
    });
    let summary = coordinator
        .sender_greet(&partner, &message, cfg.eavesdropper)
        .map_err(|e| e.to_string())?;
    println!(
        "event=greet_sent partner={partner} eavesdropper={} phase={}",
        cfg.eavesdropper, summary.phase
    );
    Ok(())
}
