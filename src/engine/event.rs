//! Lifecycle events emitted toward the host
//!
//! Events are fire-and-forget: the engine never blocks on, retries, or
//! inspects what the sink does with them. Emission order matches acceptance
//! order exactly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::phase::Phase;

/// Closed set of event types the engine can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An accepted phase transition
    PhaseChange,
    /// Learner committed to a prediction
    PredictionMade,
    /// Learner selected a quiz answer
    AnswerSelected,
    /// Learner explored a transfer-phase application
    ApplicationExplored,
    /// Quiz submitted and scored
    QuizSubmitted,
}

/// Immutable record of one notable action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    /// Phase at the time of emission
    pub phase: Phase,
    /// Opaque payload for the host's analytics
    pub data: Map<String, Value>,
    /// Unix timestamp (ms)
    pub timestamp_ms: f64,
}

impl GameEvent {
    pub fn new(kind: EventKind, phase: Phase, timestamp_ms: f64) -> Self {
        Self {
            kind,
            phase,
            data: Map::new(),
            timestamp_ms,
        }
    }

    /// Attach a payload entry
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    /// Event for an accepted transition, with `from`/`to` in the payload
    pub fn phase_change(from: Phase, to: Phase, timestamp_ms: f64) -> Self {
        Self::new(EventKind::PhaseChange, to, timestamp_ms)
            .with("from", from.as_str())
            .with("to", to.as_str())
    }
}

/// Host callback for the outbound event stream
///
/// Implemented for any `FnMut(&GameEvent)` so hosts can pass a closure.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventSink for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}
