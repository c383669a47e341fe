use std::path::Path;

use bb84_core::{FileStore, SessionError, SessionStore};

use crate::util::load_config;

/// QBER above this is worth investigating before trusting the key.
const QBER_MODERATE: f64 = 0.05;
/// QBER above this suggests an eavesdropper or a hopeless channel.
const QBER_ALARM: f64 = 0.15;

fn security_assessment(rate: f64) -> &'static str {
    if rate > QBER_ALARM {
        "high error rate; channel may be compromised"
    } else if rate > QBER_MODERATE {
        "moderate error rate; investigate before trusting the key"
    } else {
        "low error rate; channel appears secure"
    }
}

pub fn run(store_dir: &Path) -> Result<(), String> {
    let cfg = load_config(store_dir)?;
    let store = FileStore::new(&cfg.session_path);

    match store.load_strict() {
        Ok(_) => {}
        Err(SessionError::MalformedDocument(_)) => {
            println!("session: corrupt (reinitialized as default on next action)");
        }
        Err(e) => return Err(e.to_string()),
    }
    let doc = store.load().map_err(|e| e.to_string())?;

    println!("store: {}", store_dir.display());
    println!("session: {}", cfg.session_path.display());
    println!("actor: {} ({})", cfg.actor, cfg.role);
    println!("phase: {}", doc.phase);
    if !doc.partner.is_empty() {
        println!("partner: {}", doc.partner);
    }
    for (name, participant) in &doc.participants {
        match &participant.message {
            Some(message) => println!(
                "participant: {name} ready={} message={message:?}",
                participant.ready
            ),
            None => println!("participant: {name} ready={}", participant.ready),
        }
    }
    println!("eavesdropper: {}", doc.eavesdropper);
    println!("qubits: {}", doc.qubits);
    println!("matching: {}", doc.matching_indices.len());
    println!("sifted: {}", doc.sifted_bits.len());
    println!("error_rate: {:.3}", doc.error_rate);
    if let Some(key) = &doc.final_key {
        println!("final_key: {key}");
        println!("security: {}", security_assessment(doc.error_rate));
    }
    Ok(())
}
