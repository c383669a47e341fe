use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::phase::Phase;

/// Per-participant handshake state, keyed by the participant's chosen name in
/// [`SessionDocument::participants`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The single shared entity both actors poll and mutate.
///
/// `version` is the compare-and-swap guard: it increases by exactly one on
/// every committed write, so a writer holding a stale version is rejected
/// instead of silently discarding its peer's update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub phase: Phase,
    /// Name of the sending actor; set at greet time.
    #[serde(default)]
    pub sender: String,
    /// Name of the designated receiving partner; set at greet time.
    #[serde(default)]
    pub partner: String,
    #[serde(default)]
    pub participants: BTreeMap<String, Participant>,
    #[serde(default)]
    pub qubits: usize,
    /// Fixed for the session's duration once the greeting commits.
    #[serde(default)]
    pub eavesdropper: bool,
    #[serde(default)]
    pub sender_bits: Vec<bool>,
    #[serde(default)]
    pub sender_bases: Vec<bool>,
    /// The sender-side channel output the receiver measures.
    #[serde(default)]
    pub transmitted_bits: Vec<bool>,
    #[serde(default)]
    pub receiver_bases: Vec<bool>,
    #[serde(default)]
    pub receiver_results: Vec<bool>,
    #[serde(default)]
    pub matching_indices: Vec<usize>,
    /// Shrinks monotonically as the error estimate spends bits.
    #[serde(default)]
    pub sifted_bits: Vec<bool>,
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub error_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_key: Option<String>,
}

impl SessionDocument {
    /// Returns the document to its initial shape, keeping only the version
    /// counter so the reset itself still commits through compare-and-swap.
    pub fn reset(&mut self) {
        *self = SessionDocument {
            version: self.version,
            ..SessionDocument::default()
        };
    }

    pub fn participant_mut(&mut self, name: &str) -> &mut Participant {
        self.participants.entry(name.to_string()).or_default()
    }

    /// Structural invariants, checked before every commit. Violations are
    /// rejected at the call boundary; the stored document is never mutated.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.sender_bits.len() != self.sender_bases.len() {
            return Err(SessionError::LengthMismatch(format!(
                "sender bits {} vs bases {}",
                self.sender_bits.len(),
                self.sender_bases.len()
            )));
        }
        if !self.sender_bits.is_empty() && self.sender_bits.len() != self.qubits {
            return Err(SessionError::LengthMismatch(format!(
                "sender sequences {} vs declared qubit count {}",
                self.sender_bits.len(),
                self.qubits
            )));
        }
        if !self.transmitted_bits.is_empty()
            && self.transmitted_bits.len() != self.sender_bits.len()
        {
            return Err(SessionError::LengthMismatch(format!(
                "transmitted {} vs sender {}",
                self.transmitted_bits.len(),
                self.sender_bits.len()
            )));
        }
        if self.receiver_bases.len() != self.receiver_results.len() {
            return Err(SessionError::LengthMismatch(format!(
                "receiver bases {} vs results {}",
                self.receiver_bases.len(),
                self.receiver_results.len()
            )));
        }
        if !self.sender_bits.is_empty() && self.receiver_bases.len() > self.sender_bits.len() {
            return Err(SessionError::LengthMismatch(format!(
                "receiver sequences {} exceed qubit count {}",
                self.receiver_bases.len(),
                self.sender_bits.len()
            )));
        }
        let index_bound = self.qubits.min(self.receiver_bases.len());
        let mut prev: Option<usize> = None;
        for &idx in &self.matching_indices {
            if idx >= index_bound {
                return Err(SessionError::MalformedDocument(format!(
                    "matching index {idx} out of bounds {index_bound}"
                )));
            }
            if let Some(p) = prev {
                if idx <= p {
                    return Err(SessionError::MalformedDocument(
                        "matching indices not strictly increasing".to_string(),
                    ));
                }
            }
            prev = Some(idx);
        }
        if self.sifted_bits.len() > self.matching_indices.len() {
            return Err(SessionError::MalformedDocument(format!(
                "sifted bits {} exceed matching indices {}",
                self.sifted_bits.len(),
                self.matching_indices.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(SessionError::MalformedDocument(format!(
                "error rate {} outside [0, 1]",
                self.error_rate
            )));
        }
        match (&self.final_key, self.phase) {
            (Some(key), Phase::Complete) => {
                if key.len() != 64 || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(SessionError::MalformedDocument(
                        "final key is not a 64-character hex digest".to_string(),
                    ));
                }
            }
            (Some(_), phase) => {
                return Err(SessionError::MalformedDocument(format!(
                    "final key present in phase {phase}"
                )));
            }
            (None, Phase::Complete) => {
                return Err(SessionError::MalformedDocument(
                    "complete phase without a final key".to_string(),
                ));
            }
            (None, _) => {}
        }
        Ok(())
    }
}
