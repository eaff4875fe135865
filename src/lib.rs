//! Tenphase - phase-progression engine for stepped learning activities
//!
//! Core modules:
//! - `engine`: Deterministic core (phase controller, quiz, events)
//! - `config`: Per-activity configuration (phase list, labels, tuning)
//! - `session`: Per-learner wiring of controller + quiz + event sink
//! - `platform`: Browser/native wall-clock abstraction
//!
//! Each micro-game walks a learner through a fixed ten-phase arc (hook
//! through mastery). This crate owns that progression: it serializes phase
//! transitions, absorbs duplicate rapid-fire navigation input, scores the
//! test-phase quiz, and reports every notable action to the host as an
//! event stream. Rendering, styling, question copy, and the per-topic toy
//! simulations are host concerns and live outside this crate.

pub mod config;
pub mod engine;
pub mod platform;
pub mod session;

pub use config::{ActivityConfig, ConfigError};
pub use engine::{
    ChoiceOption, EventKind, EventSink, GameEvent, NavigationError, Phase, PhaseController,
    PhaseSequence, Question, QuizError, ScoreReport, ScoredQuiz,
};
pub use session::{ActivitySession, SessionError, SessionSnapshot};

/// Engine tuning constants
pub mod consts {
    /// Navigation debounce window after an accepted transition (ms)
    pub const NAV_COOLDOWN_MS: f64 = 300.0;
    /// Smallest supported cooldown window (ms)
    pub const NAV_COOLDOWN_MIN_MS: f64 = 200.0;
    /// Largest supported cooldown window (ms)
    pub const NAV_COOLDOWN_MAX_MS: f64 = 400.0;
    /// Fraction of quiz answers that must be correct to pass
    pub const PASS_THRESHOLD: f64 = 0.70;
}
