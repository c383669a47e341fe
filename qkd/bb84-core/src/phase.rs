use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Protocol phase. The single source of truth for what each actor may do
/// next; waiting phases are keyed by role, never by a partner name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Greeting,
    AwaitingPeerReply,
    Preparing,
    Transmitting,
    AwaitingMeasurement,
    Sifting,
    ErrorChecking,
    KeyGeneration,
    Complete,
    Failed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Greeting => "greeting",
            Phase::AwaitingPeerReply => "awaiting_peer_reply",
            Phase::Preparing => "preparing",
            Phase::Transmitting => "transmitting",
            Phase::AwaitingMeasurement => "awaiting_measurement",
            Phase::Sifting => "sifting",
            Phase::ErrorChecking => "error_checking",
            Phase::KeyGeneration => "key_generation",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greeting" => Ok(Phase::Greeting),
            "awaiting_peer_reply" => Ok(Phase::AwaitingPeerReply),
            "preparing" => Ok(Phase::Preparing),
            "transmitting" => Ok(Phase::Transmitting),
            "awaiting_measurement" => Ok(Phase::AwaitingMeasurement),
            "sifting" => Ok(Phase::Sifting),
            "error_checking" => Ok(Phase::ErrorChecking),
            "key_generation" => Ok(Phase::KeyGeneration),
            "complete" => Ok(Phase::Complete),
            "failed" => Ok(Phase::Failed),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sender,
    Receiver,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Sender => "sender",
            Role::Receiver => "receiver",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sender" => Ok(Role::Sender),
            "receiver" => Ok(Role::Receiver),
            other => Err(format!("unknown role: {other} (expected sender or receiver)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Greet,
    Respond,
    Prepare,
    Transmit,
    Measure,
    Sift,
    CheckErrors,
    DistillKey,
    Reset,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Greet => "greet",
            Action::Respond => "respond",
            Action::Prepare => "prepare",
            Action::Transmit => "transmit",
            Action::Measure => "measure",
            Action::Sift => "sift",
            Action::CheckErrors => "check_errors",
            Action::DistillKey => "distill_key",
            Action::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that `role` may perform `action` in `phase`.
///
/// Sift, error checking, and key distillation are open to either party: they
/// are deterministic given the document contents, so a duplicate computation
/// by both sides commits an identical result.
pub fn gate(phase: Phase, role: Role, action: Action) -> Result<(), SessionError> {
    use Action::*;
    use Phase::*;
    use Role::*;

    let ok = match (action, role) {
        (Reset, _) => true,
        (Greet, Sender) => phase == Greeting,
        (Respond, Receiver) => phase == AwaitingPeerReply,
        (Prepare, Sender) => phase == Preparing,
        (Transmit, Sender) => phase == Transmitting,
        (Measure, Receiver) => phase == AwaitingMeasurement,
        (Sift, _) => phase == Sifting,
        (CheckErrors, _) => phase == ErrorChecking,
        (DistillKey, _) => phase == KeyGeneration,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(SessionError::RoleNotPermitted {
            role,
            action,
            phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_advances_sender_phases() {
        assert!(gate(Phase::Greeting, Role::Sender, Action::Greet).is_ok());
        assert!(gate(Phase::Preparing, Role::Sender, Action::Prepare).is_ok());
        assert!(gate(Phase::Transmitting, Role::Sender, Action::Transmit).is_ok());
    }

    #[test]
    fn receiver_advances_receiver_phases() {
        assert!(gate(Phase::AwaitingPeerReply, Role::Receiver, Action::Respond).is_ok());
        assert!(gate(Phase::AwaitingMeasurement, Role::Receiver, Action::Measure).is_ok());
    }

    #[test]
    fn cross_role_actions_are_rejected() {
        let err = gate(Phase::Greeting, Role::Receiver, Action::Greet).unwrap_err();
        assert!(matches!(err, SessionError::RoleNotPermitted { .. }));
        assert!(gate(Phase::AwaitingPeerReply, Role::Sender, Action::Respond).is_err());
        assert!(gate(Phase::AwaitingMeasurement, Role::Sender, Action::Measure).is_err());
        assert!(gate(Phase::Preparing, Role::Receiver, Action::Prepare).is_err());
    }

    #[test]
    fn shared_actions_are_open_to_both_roles_in_their_phase_only() {
        for role in [Role::Sender, Role::Receiver] {
            assert!(gate(Phase::Sifting, role, Action::Sift).is_ok());
            assert!(gate(Phase::ErrorChecking, role, Action::CheckErrors).is_ok());
            assert!(gate(Phase::KeyGeneration, role, Action::DistillKey).is_ok());
            assert!(gate(Phase::Greeting, role, Action::Sift).is_err());
            assert!(gate(Phase::Sifting, role, Action::DistillKey).is_err());
        }
    }

    #[test]
    fn reset_is_legal_from_every_phase() {
        for phase in [
            Phase::Greeting,
            Phase::AwaitingPeerReply,
            Phase::Preparing,
            Phase::Transmitting,
            Phase::AwaitingMeasurement,
            Phase::Sifting,
            Phase::ErrorChecking,
            Phase::KeyGeneration,
            Phase::Complete,
            Phase::Failed,
        ] {
            for role in [Role::Sender, Role::Receiver] {
                assert!(gate(phase, role, Action::Reset).is_ok());
            }
        }
    }

    #[test]
    fn failed_admits_nothing_but_reset() {
        for role in [Role::Sender, Role::Receiver] {
            for action in [
                Action::Greet,
                Action::Respond,
                Action::Prepare,
                Action::Transmit,
                Action::Measure,
                Action::Sift,
                Action::CheckErrors,
                Action::DistillKey,
            ] {
                assert!(gate(Phase::Failed, role, action).is_err());
            }
        }
    }

    #[test]
    fn phase_strings_round_trip() {
        for phase in [
            Phase::Greeting,
            Phase::AwaitingPeerReply,
            Phase::AwaitingMeasurement,
            Phase::Complete,
            Phase::Failed,
        ] {
            let parsed: Phase = phase.as_str().parse().unwrap();
            assert_eq!(parsed, phase);
        }
        assert!("not_a_phase".parse::<Phase>().is_err());
    }
}
