//! Deterministic activity engine
//!
//! All phase and quiz logic lives here. This module must stay pure and
//! deterministic:
//! - Timestamps are injected by the caller (milliseconds), never read from
//!   a clock
//! - RNG is seeded only
//! - No rendering or platform dependencies

pub mod controller;
pub mod event;
pub mod phase;
pub mod quiz;

pub use controller::{NavigationError, PhaseController};
pub use event::{EventKind, EventSink, GameEvent};
pub use phase::{Phase, PhaseSequence};
pub use quiz::{ChoiceOption, Question, QuizError, ScoreReport, ScoredQuiz};
