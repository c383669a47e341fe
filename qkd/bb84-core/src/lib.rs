//! BB84 session coordination engine (pedagogical, non-production).
//!
//! The "quantum" channel here is a classical probability substitute; the part
//! this crate actually owns is keeping two unsynchronized actors' views of a
//! single shared session document consistent through phase-gated
//! compare-and-swap writes.

pub mod coordinator;
pub mod document;
pub mod engine;
pub mod error;
pub mod otp;
pub mod phase;
pub mod store;

pub use coordinator::{AwaitOutcome, CoordinatorConfig, SessionCoordinator, StepSummary};
pub use document::{Participant, SessionDocument};
pub use engine::Method;
pub use error::SessionError;
pub use otp::OtpError;
pub use phase::{Action, Phase, Role};
pub use store::{FileStore, MemoryStore, SessionStore};
