//! Activity configuration
//!
//! One configuration object per activity: the ordered phase list, display
//! labels, the navigation cooldown, and the quiz pass threshold. Injected
//! into the controller and session instead of being re-declared per topic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{NAV_COOLDOWN_MAX_MS, NAV_COOLDOWN_MIN_MS, NAV_COOLDOWN_MS, PASS_THRESHOLD};
use crate::engine::phase::{Phase, PhaseSequence};

/// Malformed setup input. Fatal: abort initialization, never substitute a
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("phase list is empty")]
    EmptyPhaseList,
    #[error("phase {0:?} appears more than once")]
    DuplicatePhase(Phase),
    #[error("start phase {0:?} is not in the configured sequence")]
    StartPhaseNotInSequence(Phase),
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("question {question} has no options")]
    NoOptions { question: usize },
    #[error("question {question} has duplicate option id {id:?}")]
    DuplicateOptionId { question: usize, id: String },
    #[error("question {question} has {count} correct options, expected exactly 1")]
    BadCorrectCount { question: usize, count: usize },
}

/// Per-activity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Ordered phase list for this activity
    pub phases: PhaseSequence,
    /// Display label overrides; phases not listed fall back to the default
    #[serde(default)]
    pub labels: BTreeMap<Phase, String>,
    /// Navigation cooldown window (ms)
    #[serde(default = "default_cooldown")]
    pub nav_cooldown_ms: f64,
    /// Fraction of quiz answers that must be correct to pass
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
}

fn default_cooldown() -> f64 {
    NAV_COOLDOWN_MS
}

fn default_pass_threshold() -> f64 {
    PASS_THRESHOLD
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            phases: PhaseSequence::full_arc(),
            labels: BTreeMap::new(),
            nav_cooldown_ms: NAV_COOLDOWN_MS,
            pass_threshold: PASS_THRESHOLD,
        }
    }
}

impl ActivityConfig {
    /// Config over a custom phase list, default tuning
    pub fn with_phases(phases: Vec<Phase>) -> Result<Self, ConfigError> {
        Ok(Self {
            phases: PhaseSequence::new(phases)?,
            ..Self::default()
        })
    }

    /// Display label for a phase
    pub fn label(&self, phase: Phase) -> &str {
        self.labels
            .get(&phase)
            .map(String::as_str)
            .unwrap_or_else(|| phase.default_label())
    }

    /// Cooldown clamped into the supported band
    pub fn effective_cooldown_ms(&self) -> f64 {
        self.nav_cooldown_ms
            .clamp(NAV_COOLDOWN_MIN_MS, NAV_COOLDOWN_MAX_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_arc() {
        let config = ActivityConfig::default();
        assert_eq!(config.phases.len(), 10);
        assert_eq!(config.label(Phase::TwistPredict), "Twist Predict");
        assert_eq!(config.effective_cooldown_ms(), NAV_COOLDOWN_MS);
    }

    #[test]
    fn test_label_override() {
        let mut config = ActivityConfig::default();
        config
            .labels
            .insert(Phase::Hook, "Watch This!".to_string());
        assert_eq!(config.label(Phase::Hook), "Watch This!");
        assert_eq!(config.label(Phase::Play), "Play");
    }

    #[test]
    fn test_cooldown_clamp() {
        let mut config = ActivityConfig::default();
        config.nav_cooldown_ms = 50.0;
        assert_eq!(config.effective_cooldown_ms(), NAV_COOLDOWN_MIN_MS);
        config.nav_cooldown_ms = 10_000.0;
        assert_eq!(config.effective_cooldown_ms(), NAV_COOLDOWN_MAX_MS);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ActivityConfig::with_phases(vec![
            Phase::Hook,
            Phase::Play,
            Phase::Test,
            Phase::Mastery,
        ])
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: ActivityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phases, config.phases);
        assert_eq!(back.pass_threshold, config.pass_threshold);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ActivityConfig =
            serde_json::from_str(r#"{"phases": ["hook", "play"]}"#).unwrap();
        assert_eq!(config.phases.len(), 2);
        assert_eq!(config.nav_cooldown_ms, NAV_COOLDOWN_MS);
        assert_eq!(config.pass_threshold, PASS_THRESHOLD);
    }
}
