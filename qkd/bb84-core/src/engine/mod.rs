//! The protocol engine: pure sequence transforms plus the classical
//! probability substitutes standing in for quantum effects.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};

pub mod channel;
pub mod distill;
pub mod estimate;
pub mod measure;
pub mod sift;
pub mod source;

/// Advisory preparation/measurement strategy. Only the random path generates
/// values in the engine; manual selections are substituted by the
/// presentation layer before they are committed to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Random,
    Manual,
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Method::Random),
            "manual" => Ok(Method::Manual),
            other => Err(format!("unknown method: {other} (expected random or manual)")),
        }
    }
}

pub(crate) fn random_bit(rng: &mut dyn RngCore) -> bool {
    rng.next_u32() & 1 == 1
}

pub(crate) fn roll_percent(rng: &mut dyn RngCore, pct: u32) -> bool {
    rng.next_u32() % 100 < pct
}
