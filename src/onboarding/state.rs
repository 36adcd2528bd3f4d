//! Onboarding state machine — tracks which wizard step is active.

use serde::{Deserialize, Serialize};

/// The steps of the client onboarding wizard.
///
/// Progresses linearly: Profile → Address → Plan → Locations → Review.
/// Forward moves are gated by validation; backward moves never are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Profile,
    Address,
    Plan,
    Locations,
    Review,
}

impl OnboardingStep {
    /// Number of steps in the wizard.
    pub const COUNT: u8 = 5;

    /// 1-based position of the step.
    pub fn index(&self) -> u8 {
        match self {
            Self::Profile => 1,
            Self::Address => 2,
            Self::Plan => 3,
            Self::Locations => 4,
            Self::Review => 5,
        }
    }

    /// Step at a 1-based position.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Profile),
            2 => Some(Self::Address),
            3 => Some(Self::Plan),
            4 => Some(Self::Locations),
            5 => Some(Self::Review),
            _ => None,
        }
    }

    /// The following step, or `None` at Review.
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, or `None` at Profile.
    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Check if moving from `self` to `target` is a single step either way.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        self.next() == Some(target) || self.prev() == Some(target)
    }

    /// Whether this is the read-only review step.
    pub fn is_review(&self) -> bool {
        matches!(self, Self::Review)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Profile => "Client profile",
            Self::Address => "Headquarters address",
            Self::Plan => "Plan",
            Self::Locations => "Locations",
            Self::Review => "Review",
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Profile => "profile",
            Self::Address => "address",
            Self::Plan => "plan",
            Self::Locations => "locations",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OnboardingStep; 5] = [
        OnboardingStep::Profile,
        OnboardingStep::Address,
        OnboardingStep::Plan,
        OnboardingStep::Locations,
        OnboardingStep::Review,
    ];

    #[test]
    fn index_roundtrip() {
        for (i, step) in ALL.iter().enumerate() {
            let index = i as u8 + 1;
            assert_eq!(step.index(), index);
            assert_eq!(OnboardingStep::from_index(index), Some(*step));
        }
        assert_eq!(OnboardingStep::from_index(0), None);
        assert_eq!(OnboardingStep::from_index(6), None);
    }

    #[test]
    fn next_walks_all_steps() {
        let mut current = OnboardingStep::default();
        for expected in &ALL[1..] {
            current = current.next().unwrap();
            assert_eq!(current, *expected);
        }
        assert!(current.next().is_none());
        assert!(current.is_review());
    }

    #[test]
    fn prev_stops_at_profile() {
        assert_eq!(OnboardingStep::Address.prev(), Some(OnboardingStep::Profile));
        assert!(OnboardingStep::Profile.prev().is_none());
    }

    #[test]
    fn transitions_are_single_steps() {
        use OnboardingStep::*;
        assert!(Profile.can_transition_to(Address));
        assert!(Review.can_transition_to(Locations));
        assert!(!Profile.can_transition_to(Plan));
        assert!(!Plan.can_transition_to(Plan));
        assert!(!Review.can_transition_to(Profile));
    }

    #[test]
    fn display_matches_serde() {
        for step in ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }
}
