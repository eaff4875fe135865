//! Per-learner activity session
//!
//! Wires one `PhaseController`, at most one live `ScoredQuiz`, and one event
//! sink together for a single learner session. Adds the host-side behaviors
//! the engine deliberately leaves out: wall-clock timestamps, quiz-gated
//! advancement into the final phase, and a serializable snapshot the host
//! may persist and later resume from. The session itself never touches
//! storage.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ActivityConfig, ConfigError};
use crate::engine::controller::{NavigationError, PhaseController};
use crate::engine::event::{EventKind, EventSink, GameEvent};
use crate::engine::phase::Phase;
use crate::engine::quiz::{Question, QuizError, ScoreReport, ScoredQuiz};
use crate::platform;

/// Session-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    /// The final phase is reachable only after passing the installed quiz
    #[error("final phase is locked until the quiz is passed")]
    MasteryLocked,
    /// A quiz operation was requested before a quiz was installed
    #[error("no quiz installed for this session")]
    NoQuiz,
}

/// Host-persistable view of session progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    /// Present once a quiz has been submitted this session
    pub quiz_report: Option<ScoreReport>,
}

type SharedSink = Rc<RefCell<Box<dyn EventSink>>>;

/// One learner's run through one activity
pub struct ActivitySession {
    config: ActivityConfig,
    controller: PhaseController,
    quiz: Option<ScoredQuiz>,
    sink: Option<SharedSink>,
}

impl ActivitySession {
    /// Start a fresh session at the first configured phase
    pub fn new(config: ActivityConfig) -> Result<Self, ConfigError> {
        Self::with_start(config, None)
    }

    /// Resume a session at the phase recorded in a host snapshot
    pub fn resume(config: ActivityConfig, snapshot: &SessionSnapshot) -> Result<Self, ConfigError> {
        Self::with_start(config, Some(snapshot.phase))
    }

    fn with_start(config: ActivityConfig, start: Option<Phase>) -> Result<Self, ConfigError> {
        let controller = PhaseController::new(
            config.phases.clone(),
            start,
            config.effective_cooldown_ms(),
        )?;
        Ok(Self {
            config,
            controller,
            quiz: None,
            sink: None,
        })
    }

    /// Register the host callback; both navigation and quiz events flow
    /// through it, in emission order.
    pub fn set_event_sink(&mut self, sink: impl EventSink + 'static) {
        let shared: SharedSink = Rc::new(RefCell::new(Box::new(sink)));
        let controller_sink = Rc::clone(&shared);
        self.controller
            .set_event_sink(move |e: &GameEvent| controller_sink.borrow_mut().on_event(e));
        self.sink = Some(shared);
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.controller.current()
    }

    /// Display label for the current phase
    pub fn phase_label(&self) -> &str {
        self.config.label(self.phase())
    }

    pub fn quiz(&self) -> Option<&ScoredQuiz> {
        self.quiz.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            quiz_report: self.quiz.as_ref().and_then(|q| q.report()),
        }
    }

    // === Navigation ===

    pub fn request_transition(&mut self, target: Phase) -> Result<Phase, SessionError> {
        self.request_transition_at(target, platform::now_ms())
    }

    pub fn request_transition_at(
        &mut self,
        target: Phase,
        now_ms: f64,
    ) -> Result<Phase, SessionError> {
        if self.mastery_locked(target) {
            return Err(SessionError::MasteryLocked);
        }
        Ok(self.controller.request_transition(target, now_ms)?)
    }

    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        self.advance_at(platform::now_ms())
    }

    pub fn advance_at(&mut self, now_ms: f64) -> Result<Phase, SessionError> {
        let next = self
            .config
            .phases
            .next_after(self.phase())
            .ok_or(NavigationError::AtTerminalPhase)?;
        self.request_transition_at(next, now_ms)
    }

    pub fn retreat(&mut self) -> Result<Phase, SessionError> {
        self.retreat_at(platform::now_ms())
    }

    pub fn retreat_at(&mut self, now_ms: f64) -> Result<Phase, SessionError> {
        Ok(self.controller.retreat(now_ms)?)
    }

    /// Whether `target` is the final phase and still gated behind the quiz
    fn mastery_locked(&self, target: Phase) -> bool {
        if target != self.config.phases.last() || self.config.phases.len() < 2 {
            return false;
        }
        match &self.quiz {
            Some(quiz) => !quiz.report().map(|r| r.passed).unwrap_or(false),
            None => false,
        }
    }

    // === Quiz ===

    /// Install a fresh quiz for the test phase, using the configured pass
    /// threshold. Installing again replaces the old quiz wholesale; that is
    /// the retry path, a submitted quiz is never reopened.
    pub fn install_quiz(&mut self, questions: Vec<Question>) -> Result<(), ConfigError> {
        let quiz = ScoredQuiz::new(questions)?.with_pass_threshold(self.config.pass_threshold);
        self.quiz = Some(quiz);
        Ok(())
    }

    /// Record an answer and emit an `answer_selected` event
    pub fn select_answer(&mut self, index: usize, option_id: &str) -> Result<(), SessionError> {
        let quiz = self.quiz.as_mut().ok_or(SessionError::NoQuiz)?;
        quiz.select_answer(index, option_id)?;
        let event = GameEvent::new(EventKind::AnswerSelected, self.controller.current(), platform::now_ms())
            .with("question", index as u64)
            .with("option", option_id);
        self.emit(event);
        Ok(())
    }

    /// Submit the quiz and emit a `quiz_submitted` event with the report
    pub fn submit_quiz(&mut self) -> Result<ScoreReport, SessionError> {
        let quiz = self.quiz.as_mut().ok_or(SessionError::NoQuiz)?;
        let report = quiz.submit()?;
        let event = GameEvent::new(EventKind::QuizSubmitted, self.controller.current(), platform::now_ms())
            .with("score", report.score as u64)
            .with("total", report.total as u64)
            .with("passed", report.passed);
        self.emit(event);
        Ok(report)
    }

    // === Activity notifications ===

    /// Learner committed to a prediction (predict / twist_predict phases)
    pub fn record_prediction(&mut self, choice: &str) {
        let event = GameEvent::new(EventKind::PredictionMade, self.phase(), platform::now_ms())
            .with("choice", choice);
        self.emit(event);
    }

    /// Learner opened a transfer-phase application
    pub fn record_exploration(&mut self, application: &str) {
        let event = GameEvent::new(EventKind::ApplicationExplored, self.phase(), platform::now_ms())
            .with("application", application);
        self.emit(event);
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(sink) = &self.sink {
            sink.borrow_mut().on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::quiz::ChoiceOption;

    fn two_question_quiz() -> Vec<Question> {
        vec![
            Question::new(
                "Q0",
                vec![
                    ChoiceOption::new("a", "A", false),
                    ChoiceOption::new("b", "B", true),
                ],
            ),
            Question::new(
                "Q1",
                vec![
                    ChoiceOption::new("a", "A", true),
                    ChoiceOption::new("b", "B", false),
                ],
            ),
        ]
    }

    fn five_phase_config() -> ActivityConfig {
        ActivityConfig::with_phases(vec![
            Phase::Hook,
            Phase::Predict,
            Phase::Play,
            Phase::Review,
            Phase::Mastery,
        ])
        .unwrap()
    }

    #[test]
    fn test_end_to_end_arc_and_quiz() {
        let events: Rc<RefCell<Vec<GameEvent>>> = Rc::default();
        let seen = Rc::clone(&events);

        let mut session = ActivitySession::new(five_phase_config()).unwrap();
        session.set_event_sink(move |e: &GameEvent| seen.borrow_mut().push(e.clone()));

        let cooldown = session.config().effective_cooldown_ms();
        let mut now = 1_000.0;
        for expected in [Phase::Predict, Phase::Play, Phase::Review, Phase::Mastery] {
            now += cooldown;
            assert_eq!(session.advance_at(now).unwrap(), expected);
        }
        assert_eq!(session.phase(), Phase::Mastery);

        {
            let events = events.borrow();
            assert_eq!(events.len(), 4);
            assert!(events.iter().all(|e| e.kind == EventKind::PhaseChange));
        }

        // Fresh quiz, answered correctly
        session.install_quiz(two_question_quiz()).unwrap();
        session.select_answer(0, "b").unwrap();
        session.select_answer(1, "a").unwrap();
        let report = session.submit_quiz().unwrap();
        assert_eq!(
            report,
            ScoreReport {
                score: 2,
                total: 2,
                passed: true
            }
        );

        let events = events.borrow();
        assert_eq!(events.len(), 7);
        assert_eq!(events[6].kind, EventKind::QuizSubmitted);
        assert_eq!(events[6].data["passed"], true);
    }

    #[test]
    fn test_mastery_gated_on_installed_quiz() {
        let mut session = ActivitySession::new(five_phase_config()).unwrap();
        session.install_quiz(two_question_quiz()).unwrap();

        let cooldown = session.config().effective_cooldown_ms();
        let mut now = 1_000.0;
        for _ in 0..3 {
            now += cooldown;
            session.advance_at(now).unwrap();
        }
        assert_eq!(session.phase(), Phase::Review);

        // Quiz not yet passed: the final phase is locked
        now += cooldown;
        assert_eq!(session.advance_at(now), Err(SessionError::MasteryLocked));
        assert_eq!(session.phase(), Phase::Review);

        // Fail the quiz: still locked
        session.select_answer(0, "a").unwrap();
        session.select_answer(1, "b").unwrap();
        assert!(!session.submit_quiz().unwrap().passed);
        now += cooldown;
        assert_eq!(session.advance_at(now), Err(SessionError::MasteryLocked));

        // Retry with a fresh quiz and pass: unlocked
        session.install_quiz(two_question_quiz()).unwrap();
        session.select_answer(0, "b").unwrap();
        session.select_answer(1, "a").unwrap();
        assert!(session.submit_quiz().unwrap().passed);
        now += cooldown;
        assert_eq!(session.advance_at(now).unwrap(), Phase::Mastery);
    }

    #[test]
    fn test_quiz_ops_require_installed_quiz() {
        let mut session = ActivitySession::new(five_phase_config()).unwrap();
        assert_eq!(session.select_answer(0, "a"), Err(SessionError::NoQuiz));
        assert!(matches!(session.submit_quiz(), Err(SessionError::NoQuiz)));
    }

    #[test]
    fn test_snapshot_resume() {
        let mut session = ActivitySession::new(five_phase_config()).unwrap();
        session.advance_at(1_000.0).unwrap();
        session.advance_at(2_000.0).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Play);
        assert_eq!(snapshot.quiz_report, None);

        // Snapshot survives a JSON round trip through the host
        let json = serde_json::to_string(&snapshot).unwrap();
        let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();

        let resumed = ActivitySession::resume(five_phase_config(), &snapshot).unwrap();
        assert_eq!(resumed.phase(), Phase::Play);
        assert_eq!(resumed.phase_label(), "Play");
    }

    #[test]
    fn test_resume_rejects_foreign_phase() {
        let snapshot = SessionSnapshot {
            phase: Phase::TwistPlay,
            quiz_report: None,
        };
        assert!(matches!(
            ActivitySession::resume(five_phase_config(), &snapshot),
            Err(ConfigError::StartPhaseNotInSequence(Phase::TwistPlay))
        ));
    }

    #[test]
    fn test_debounce_flows_through_session() {
        let mut session = ActivitySession::new(five_phase_config()).unwrap();
        session.advance_at(1_000.0).unwrap();
        assert_eq!(
            session.advance_at(1_000.0),
            Err(SessionError::Navigation(NavigationError::Debounced))
        );
        assert_eq!(session.phase(), Phase::Predict);
    }

    #[test]
    fn test_prediction_and_exploration_events() {
        let events: Rc<RefCell<Vec<GameEvent>>> = Rc::default();
        let seen = Rc::clone(&events);

        let mut session = ActivitySession::new(five_phase_config()).unwrap();
        session.set_event_sink(move |e: &GameEvent| seen.borrow_mut().push(e.clone()));

        session.record_prediction("faster");
        session.record_exploration("mri_scanner");

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::PredictionMade);
        assert_eq!(events[0].data["choice"], "faster");
        assert_eq!(events[1].kind, EventKind::ApplicationExplored);
        assert_eq!(events[1].data["application"], "mri_scanner");
    }
}
