use serde::{Deserialize, Serialize};

/// Acquisition session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcquisitionState {
    #[default]
    Idle,
    Recording,
    Finalizing,
}

impl AcquisitionState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &AcquisitionState) -> bool {
        use AcquisitionState::*;

        matches!(
            (self, target),
            (Idle, Recording) | (Recording, Finalizing) | (Finalizing, Idle)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Recording => "Recording",
            Self::Finalizing => "Finalizing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cycle() {
        use AcquisitionState::*;

        assert!(Idle.can_transition_to(&Recording));
        assert!(Recording.can_transition_to(&Finalizing));
        assert!(Finalizing.can_transition_to(&Idle));
    }

    #[test]
    fn test_no_shortcuts() {
        use AcquisitionState::*;

        assert!(!Idle.can_transition_to(&Finalizing));
        assert!(!Recording.can_transition_to(&Idle));
        assert!(!Finalizing.can_transition_to(&Recording));
        assert!(!Recording.can_transition_to(&Recording));
    }
}
