//! Phase transition serialization and navigation debouncing
//!
//! All phase mutation funnels through `request_transition`. Time is injected
//! by the caller as a millisecond timestamp so the controller stays
//! deterministic and platform-free; the debounce window is a timestamp
//! comparison, so there is no unlock timer to schedule or cancel.

use log::{debug, trace};
use thiserror::Error;

use super::event::{EventSink, GameEvent};
use super::phase::{Phase, PhaseSequence};
use crate::config::ConfigError;

/// Why a navigation request was refused
///
/// All variants are local no-ops for the caller. `Debounced` in particular is
/// an expected high-frequency outcome (absorbed duplicate input), not a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("phase {0:?} is not in the configured sequence")]
    UnknownPhase(Phase),
    #[error("transition dropped inside the cooldown window")]
    Debounced,
    #[error("already at the last phase")]
    AtTerminalPhase,
    #[error("already at the first phase")]
    AtInitialPhase,
}

/// Serializes phase transitions for one activity session
///
/// Owns the current phase, drops requests that arrive inside the cooldown
/// window after an accepted transition, and reports every accepted
/// transition to the registered event sink.
pub struct PhaseController {
    sequence: PhaseSequence,
    current: Phase,
    /// Debounce window after an accepted transition (ms)
    cooldown_ms: f64,
    /// Timestamp of the last accepted transition, None until the first
    last_transition_ms: Option<f64>,
    sink: Option<Box<dyn EventSink>>,
}

impl PhaseController {
    /// Create a controller over `sequence`, starting at `start` if given
    /// (e.g. resuming a session) or at the first phase otherwise.
    pub fn new(
        sequence: PhaseSequence,
        start: Option<Phase>,
        cooldown_ms: f64,
    ) -> Result<Self, ConfigError> {
        let current = match start {
            Some(phase) => {
                if !sequence.contains(phase) {
                    return Err(ConfigError::StartPhaseNotInSequence(phase));
                }
                phase
            }
            None => sequence.first(),
        };
        Ok(Self {
            sequence,
            current,
            cooldown_ms,
            last_transition_ms: None,
            sink: None,
        })
    }

    /// Register the host callback for the outbound event stream
    ///
    /// Without a sink, accepted transitions still happen; their events are
    /// dropped, never buffered.
    pub fn set_event_sink(&mut self, sink: impl EventSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn sequence(&self) -> &PhaseSequence {
        &self.sequence
    }

    /// Whether navigation is inside the cooldown window at `now_ms`
    pub fn is_locked(&self, now_ms: f64) -> bool {
        match self.last_transition_ms {
            Some(last) => now_ms - last < self.cooldown_ms,
            None => false,
        }
    }

    /// Request a transition to `target` at time `now_ms`
    ///
    /// Refused requests leave state untouched and emit nothing. On success,
    /// returns the new current phase after emitting one `phase_change` event.
    pub fn request_transition(
        &mut self,
        target: Phase,
        now_ms: f64,
    ) -> Result<Phase, NavigationError> {
        if !self.sequence.contains(target) {
            return Err(NavigationError::UnknownPhase(target));
        }
        if self.is_locked(now_ms) {
            trace!("transition to {} debounced", target.as_str());
            return Err(NavigationError::Debounced);
        }

        let from = self.current;
        self.current = target;
        self.last_transition_ms = Some(now_ms);
        debug!("phase {} -> {}", from.as_str(), target.as_str());

        let event = GameEvent::phase_change(from, target, now_ms);
        if let Some(sink) = self.sink.as_mut() {
            sink.on_event(&event);
        }
        Ok(target)
    }

    /// Move to the next phase in sequence order
    pub fn advance(&mut self, now_ms: f64) -> Result<Phase, NavigationError> {
        let next = self
            .sequence
            .next_after(self.current)
            .ok_or(NavigationError::AtTerminalPhase)?;
        self.request_transition(next, now_ms)
    }

    /// Move to the previous phase in sequence order
    pub fn retreat(&mut self, now_ms: f64) -> Result<Phase, NavigationError> {
        let prev = self
            .sequence
            .prev_before(self.current)
            .ok_or(NavigationError::AtInitialPhase)?;
        self.request_transition(prev, now_ms)
    }
}
