use std::thread;
use std::time::{Duration, Instant};

use rand_core::RngCore;

use crate::document::SessionDocument;
use crate::engine::{channel, distill, estimate, measure, sift, source, Method};
use crate::error::SessionError;
use crate::phase::{gate, Action, Phase, Role};
use crate::store::SessionStore;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Interval between polls while awaiting a peer action.
    pub poll_interval: Duration,
    /// Operator-visible bound on how long to await a stalled peer.
    pub max_wait: Duration,
    /// How many times a conflicted compare-and-swap is re-read and retried.
    pub retry_limit: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            max_wait: Duration::from_millis(30_000),
            retry_limit: 3,
        }
    }
}

/// Public summary of a committed step: the resulting phase plus counts and
/// rates the protocol has already declared public. Never carries raw bit
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub phase: Phase,
    pub qubits: usize,
    pub matching: usize,
    pub sifted: usize,
    pub error_rate: f64,
    pub key_len: usize,
}

impl StepSummary {
    fn of(doc: &SessionDocument) -> Self {
        Self {
            phase: doc.phase,
            qubits: doc.qubits,
            matching: doc.matching_indices.len(),
            sifted: doc.sifted_bits.len(),
            error_rate: doc.error_rate,
            key_len: doc.final_key.as_ref().map(|k| k.len()).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwaitOutcome {
    /// The session reached one of the requested phases.
    Reached(Phase),
    /// The phase regressed to `Greeting`: the peer reset the session, and any
    /// locally cached sequences must be discarded.
    PeerReset,
}

/// Drives the protocol engine against a shared session document on behalf of
/// one actor. Every operation is a single read-validate-mutate-CAS cycle;
/// a conflicted write is re-read and retried with the role gate re-checked
/// against the fresh document.
pub struct SessionCoordinator<S> {
    store: S,
    role: Role,
    actor: String,
    config: CoordinatorConfig,
    rng: Box<dyn RngCore + Send>,
}

impl<S: SessionStore> SessionCoordinator<S> {
    pub fn new(store: S, role: Role, actor: impl Into<String>, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            store,
            role,
            actor: actor.into(),
            config: CoordinatorConfig::default(),
            rng,
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Current document contents, for the actor's own diagnostics.
    pub fn snapshot(&self) -> Result<SessionDocument, SessionError> {
        self.store.load()
    }

    fn apply<F>(&mut self, action: Action, mut mutate: F) -> Result<StepSummary, SessionError>
    where
        F: FnMut(&mut SessionDocument, &mut dyn RngCore) -> Result<(), SessionError>,
    {
        let mut attempt = 0u32;
        loop {
            let mut doc = self.store.load()?;
            gate(doc.phase, self.role, action)?;
            mutate(&mut doc, self.rng.as_mut())?;
            doc.validate()?;
            let expected = doc.version;
            match self.store.compare_and_swap(expected, doc) {
                Ok(committed) => return Ok(StepSummary::of(&committed)),
                Err(SessionError::StaleWriteConflict { .. })
                    if attempt < self.config.retry_limit =>
                {
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Sender opens the session: records the handshake message, designates
    /// the partner, and fixes the eavesdropper flag for the session.
    pub fn sender_greet(
        &mut self,
        partner: &str,
        message: &str,
        eavesdropper: bool,
    ) -> Result<StepSummary, SessionError> {
        let partner = partner.trim().to_ascii_lowercase();
        if partner.is_empty() {
            return Err(SessionError::InvalidParameter(
                "partner name must not be empty".to_string(),
            ));
        }
        if partner == self.actor {
            return Err(SessionError::InvalidParameter(
                "partner must be a different actor".to_string(),
            ));
        }
        let actor = self.actor.clone();
        let message = message.to_string();
        self.apply(Action::Greet, move |doc, _| {
            doc.sender = actor.clone();
            doc.partner = partner.clone();
            doc.eavesdropper = eavesdropper;
            let entry = doc.participant_mut(&actor);
            entry.ready = true;
            entry.message = Some(message.clone());
            doc.phase = Phase::AwaitingPeerReply;
            Ok(())
        })
    }

    /// Designated receiver answers the greeting. Ready advances to
    /// `Preparing`; not-ready hands control back to `Greeting` so the sender
    /// may resend.
    pub fn receiver_respond(
        &mut self,
        ready: bool,
        message: &str,
    ) -> Result<StepSummary, SessionError> {
        let actor = self.actor.clone();
        let role = self.role;
        let message = message.to_string();
        self.apply(Action::Respond, move |doc, _| {
            if doc.partner != actor {
                return Err(SessionError::RoleNotPermitted {
                    role,
                    action: Action::Respond,
                    phase: doc.phase,
                });
            }
            let entry = doc.participant_mut(&actor);
            entry.ready = ready;
            entry.message = Some(message.clone());
            doc.phase = if ready {
                Phase::Preparing
            } else {
                Phase::Greeting
            };
            Ok(())
        })
    }

    /// Sender generates the bit/basis sequences. Clears every downstream
    /// field so a re-preparation after a not-ready round starts clean.
    pub fn prepare(&mut self, n: usize, method: Method) -> Result<StepSummary, SessionError> {
        self.apply(Action::Prepare, move |doc, rng| {
            let (bits, bases) = source::generate(n, method, rng)?;
            doc.qubits = n;
            doc.sender_bits = bits;
            doc.sender_bases = bases;
            doc.transmitted_bits = Vec::new();
            doc.receiver_bases = Vec::new();
            doc.receiver_results = Vec::new();
            doc.matching_indices = Vec::new();
            doc.sifted_bits = Vec::new();
            doc.error_rate = 0.0;
            doc.error_count = 0;
            doc.final_key = None;
            doc.phase = Phase::Transmitting;
            Ok(())
        })
    }

    /// Sender pushes the prepared sequence through the (possibly tapped)
    /// channel and hands the session to the receiver.
    pub fn transmit(&mut self) -> Result<StepSummary, SessionError> {
        self.apply(Action::Transmit, |doc, rng| {
            doc.transmitted_bits = channel::transmit(&doc.sender_bits, doc.eavesdropper, rng);
            doc.phase = Phase::AwaitingMeasurement;
            Ok(())
        })
    }

    /// Designated receiver measures the transmitted sequence.
    pub fn measure(&mut self, method: Method) -> Result<StepSummary, SessionError> {
        let actor = self.actor.clone();
        let role = self.role;
        self.apply(Action::Measure, move |doc, rng| {
            if doc.partner != actor {
                return Err(SessionError::RoleNotPermitted {
                    role,
                    action: Action::Measure,
                    phase: doc.phase,
                });
            }
            let (bases, results) =
                measure::measure(&doc.sender_bases, &doc.transmitted_bits, method, rng);
            doc.receiver_bases = bases;
            doc.receiver_results = results;
            doc.phase = Phase::Sifting;
            Ok(())
        })
    }

    /// Either party reduces the sequences to the agreeing-basis subset.
    pub fn sift(&mut self) -> Result<StepSummary, SessionError> {
        self.apply(Action::Sift, |doc, _| {
            let (sifted, matching) = sift::sift(
                &doc.sender_bases,
                &doc.receiver_bases,
                &doc.receiver_results,
            );
            doc.sifted_bits = sifted;
            doc.matching_indices = matching;
            doc.phase = Phase::ErrorChecking;
            Ok(())
        })
    }

    /// Either party estimates the error rate and spends comparison bits.
    /// Moves straight to `Failed` when the survivors provably cannot be
    /// distilled.
    pub fn check_errors(&mut self) -> Result<StepSummary, SessionError> {
        self.apply(Action::CheckErrors, |doc, rng| {
            let est = estimate::check_errors(
                &doc.sender_bits,
                &doc.sifted_bits,
                &doc.matching_indices,
                doc.eavesdropper,
                rng,
            );
            doc.error_rate = est.error_rate;
            doc.error_count = est.error_count;
            doc.sifted_bits = est.remaining;
            doc.phase = if doc.sifted_bits.len() < distill::MIN_DISTILL_BITS {
                Phase::Failed
            } else {
                Phase::KeyGeneration
            };
            Ok(())
        })
    }

    /// Either party compresses the surviving bits into the final key.
    /// `InsufficientBits` commits the `Failed` phase instead of erroring, so
    /// the outcome is visible to the peer.
    pub fn distill_key(&mut self) -> Result<StepSummary, SessionError> {
        self.apply(Action::DistillKey, |doc, _| {
            match distill::distill(&doc.sifted_bits) {
                Ok(key) => {
                    doc.final_key = Some(key);
                    doc.phase = Phase::Complete;
                }
                Err(SessionError::InsufficientBits { .. }) => {
                    doc.phase = Phase::Failed;
                }
                Err(e) => return Err(e),
            }
            Ok(())
        })
    }

    /// Returns the session to its initial phase, invalidating every field.
    pub fn reset(&mut self) -> Result<StepSummary, SessionError> {
        self.apply(Action::Reset, |doc, _| {
            doc.reset();
            Ok(())
        })
    }

    /// Polls the shared document at the configured interval until its phase
    /// enters `targets`. Each poll is one atomic read with no side effects.
    /// A regression to `Greeting` is reported as a peer reset; a peer that
    /// never moves surfaces `PeerUnresponsive` after the configured bound.
    pub fn await_phase(&self, targets: &[Phase]) -> Result<AwaitOutcome, SessionError> {
        let started = Instant::now();
        let baseline = self.store.load()?.phase;
        if targets.contains(&baseline) {
            return Ok(AwaitOutcome::Reached(baseline));
        }
        loop {
            if started.elapsed() >= self.config.max_wait {
                return Err(SessionError::PeerUnresponsive {
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            thread::sleep(self.config.poll_interval);
            let phase = self.store.load()?.phase;
            if targets.contains(&phase) {
                return Ok(AwaitOutcome::Reached(phase));
            }
            if phase == Phase::Greeting && baseline != Phase::Greeting {
                return Ok(AwaitOutcome::PeerReset);
            }
        }
    }
}
