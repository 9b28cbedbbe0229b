//! Intake lifecycle states

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a visitor intake conversation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntakeState {
    /// Gathering field values
    #[default]
    Collecting,
    /// A resident directory lookup is outstanding
    AwaitingValidation,
    /// Visit confirmed and notification sent
    Confirmed,
    /// Resident not found; the visit will not be registered
    Rejected,
}

static INTAKE_TRANSITIONS: Lazy<HashMap<IntakeState, &'static [IntakeState]>> = Lazy::new(|| {
    use IntakeState::*;
    let mut map = HashMap::new();
    map.insert(Collecting, &[AwaitingValidation, Confirmed] as &[_]);
    map.insert(AwaitingValidation, &[Collecting, Rejected] as &[_]);
    map.insert(Confirmed, &[] as &[_]);
    map.insert(Rejected, &[] as &[_]);
    map
});

impl IntakeState {
    /// States reachable from this one
    pub fn allowed_transitions(&self) -> &'static [IntakeState] {
        INTAKE_TRANSITIONS.get(self).copied().unwrap_or(&[])
    }

    /// Check if a transition to `target` is allowed
    pub fn can_transition_to(&self, target: IntakeState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Confirmed and Rejected accept no further field changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::AwaitingValidation => "awaiting_validation",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for IntakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(IntakeState::Confirmed.is_terminal());
        assert!(IntakeState::Rejected.is_terminal());
        assert!(!IntakeState::Collecting.is_terminal());
        assert!(!IntakeState::AwaitingValidation.is_terminal());
    }

    #[test]
    fn test_transitions() {
        use IntakeState::*;
        assert!(Collecting.can_transition_to(AwaitingValidation));
        assert!(Collecting.can_transition_to(Confirmed));
        assert!(!Collecting.can_transition_to(Rejected));
        assert!(AwaitingValidation.can_transition_to(Rejected));
        assert!(AwaitingValidation.can_transition_to(Collecting));
        assert!(Confirmed.allowed_transitions().is_empty());
        assert!(Rejected.allowed_transitions().is_empty());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&IntakeState::AwaitingValidation).unwrap();
        assert_eq!(json, "\"awaiting_validation\"");
        assert_eq!(IntakeState::Rejected.to_string(), "rejected");
    }
}
