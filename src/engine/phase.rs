//! Learning-arc phases and the validated phase sequence

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One stage of the fixed learning activity arc
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Opening hook - grab attention
    Hook,
    /// Learner commits to a prediction
    Predict,
    /// Free interaction with the toy
    Play,
    /// Compare outcome against the prediction
    Review,
    /// Prediction for the twist variant
    TwistPredict,
    /// Interaction with the twist variant
    TwistPlay,
    /// Review of the twist outcome
    TwistReview,
    /// Real-world applications of the concept
    Transfer,
    /// Scored quiz
    Test,
    /// Completion / results
    Mastery,
}

impl Phase {
    /// The canonical ten-phase arc, in order
    pub const ARC: [Phase; 10] = [
        Phase::Hook,
        Phase::Predict,
        Phase::Play,
        Phase::Review,
        Phase::TwistPredict,
        Phase::TwistPlay,
        Phase::TwistReview,
        Phase::Transfer,
        Phase::Test,
        Phase::Mastery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Hook => "hook",
            Phase::Predict => "predict",
            Phase::Play => "play",
            Phase::Review => "review",
            Phase::TwistPredict => "twist_predict",
            Phase::TwistPlay => "twist_play",
            Phase::TwistReview => "twist_review",
            Phase::Transfer => "transfer",
            Phase::Test => "test",
            Phase::Mastery => "mastery",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hook" => Some(Phase::Hook),
            "predict" => Some(Phase::Predict),
            "play" => Some(Phase::Play),
            "review" => Some(Phase::Review),
            "twist_predict" => Some(Phase::TwistPredict),
            "twist_play" => Some(Phase::TwistPlay),
            "twist_review" => Some(Phase::TwistReview),
            "transfer" => Some(Phase::Transfer),
            "test" => Some(Phase::Test),
            "mastery" => Some(Phase::Mastery),
            _ => None,
        }
    }

    /// Default display label, overridable per activity in `ActivityConfig`
    pub fn default_label(&self) -> &'static str {
        match self {
            Phase::Hook => "Hook",
            Phase::Predict => "Predict",
            Phase::Play => "Play",
            Phase::Review => "Review",
            Phase::TwistPredict => "Twist Predict",
            Phase::TwistPlay => "Twist Play",
            Phase::TwistReview => "Twist Review",
            Phase::Transfer => "Transfer",
            Phase::Test => "Test",
            Phase::Mastery => "Mastery",
        }
    }
}

/// Ordered, duplicate-free list of phases for one activity
///
/// Fixed at construction; the controller never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Phase>", into = "Vec<Phase>")]
pub struct PhaseSequence {
    phases: Vec<Phase>,
}

impl PhaseSequence {
    /// Build a sequence, rejecting empty or duplicated input
    pub fn new(phases: Vec<Phase>) -> Result<Self, ConfigError> {
        if phases.is_empty() {
            return Err(ConfigError::EmptyPhaseList);
        }
        for (i, phase) in phases.iter().enumerate() {
            if phases[..i].contains(phase) {
                return Err(ConfigError::DuplicatePhase(*phase));
            }
        }
        Ok(Self { phases })
    }

    /// The full ten-phase arc
    pub fn full_arc() -> Self {
        Self {
            phases: Phase::ARC.to_vec(),
        }
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    /// Position of a phase within the sequence
    pub fn position(&self, phase: Phase) -> Option<usize> {
        self.phases.iter().position(|p| *p == phase)
    }

    /// The phase after `phase`, or None at the end (or if unknown)
    pub fn next_after(&self, phase: Phase) -> Option<Phase> {
        let idx = self.position(phase)?;
        self.phases.get(idx + 1).copied()
    }

    /// The phase before `phase`, or None at the start (or if unknown)
    pub fn prev_before(&self, phase: Phase) -> Option<Phase> {
        let idx = self.position(phase)?;
        idx.checked_sub(1).map(|i| self.phases[i])
    }

    pub fn first(&self) -> Phase {
        // Non-empty by construction
        self.phases[0]
    }

    pub fn last(&self) -> Phase {
        self.phases[self.phases.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Phase> + '_ {
        self.phases.iter().copied()
    }
}

impl TryFrom<Vec<Phase>> for PhaseSequence {
    type Error = ConfigError;

    fn try_from(phases: Vec<Phase>) -> Result<Self, Self::Error> {
        Self::new(phases)
    }
}

impl From<PhaseSequence> for Vec<Phase> {
    fn from(seq: PhaseSequence) -> Self {
        seq.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_arc_order() {
        let seq = PhaseSequence::full_arc();
        assert_eq!(seq.len(), 10);
        assert_eq!(seq.first(), Phase::Hook);
        assert_eq!(seq.last(), Phase::Mastery);
        assert_eq!(seq.next_after(Phase::Test), Some(Phase::Mastery));
        assert_eq!(seq.next_after(Phase::Mastery), None);
        assert_eq!(seq.prev_before(Phase::Hook), None);
        assert_eq!(seq.prev_before(Phase::Predict), Some(Phase::Hook));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            PhaseSequence::new(vec![]),
            Err(ConfigError::EmptyPhaseList)
        ));
        assert!(matches!(
            PhaseSequence::new(vec![Phase::Hook, Phase::Play, Phase::Hook]),
            Err(ConfigError::DuplicatePhase(Phase::Hook))
        ));
    }

    #[test]
    fn test_str_round_trip() {
        for phase in Phase::ARC {
            assert_eq!(Phase::from_str(phase.as_str()), Some(phase));
        }
        assert_eq!(Phase::from_str("warmup"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Phase::TwistPredict).unwrap();
        assert_eq!(json, "\"twist_predict\"");
        let seq: PhaseSequence =
            serde_json::from_str("[\"hook\",\"play\",\"mastery\"]").unwrap();
        assert_eq!(seq.len(), 3);
        assert!(serde_json::from_str::<PhaseSequence>("[]").is_err());
    }
}
