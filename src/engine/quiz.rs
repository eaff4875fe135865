//! Scored multiple-choice quiz
//!
//! A fixed ordered question set, one recorded answer per question, and a
//! one-shot submission that computes the score. The answer key ships inside
//! the question data (client-resident); see DESIGN.md for the integrity
//! trade-off.

use log::debug;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::consts::PASS_THRESHOLD;

/// One selectable answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    /// Answer-key flag, resident alongside the option text
    #[serde(default)]
    pub correct: bool,
}

impl ChoiceOption {
    pub fn new(id: &str, text: &str, correct: bool) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            correct,
        }
    }
}

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
}

impl Question {
    pub fn new(prompt: &str, options: Vec<ChoiceOption>) -> Self {
        Self {
            prompt: prompt.to_string(),
            options,
        }
    }

    /// Id of the designated correct option
    ///
    /// Valid only after construction-time validation (exactly one flag set).
    pub fn correct_option_id(&self) -> &str {
        self.options
            .iter()
            .find(|o| o.correct)
            .map(|o| o.id.as_str())
            .unwrap_or("")
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.options.is_empty() {
            return Err(ConfigError::NoOptions { question: index });
        }
        for (i, opt) in self.options.iter().enumerate() {
            if self.options[..i].iter().any(|o| o.id == opt.id) {
                return Err(ConfigError::DuplicateOptionId {
                    question: index,
                    id: opt.id.clone(),
                });
            }
        }
        let correct = self.options.iter().filter(|o| o.correct).count();
        if correct != 1 {
            return Err(ConfigError::BadCorrectCount {
                question: index,
                count: correct,
            });
        }
        Ok(())
    }
}

/// Why a quiz operation was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("quiz already submitted")]
    AlreadySubmitted,
    #[error("question {question} has no recorded answer")]
    IncompleteQuiz { question: usize },
    #[error("no question at index {0}")]
    UnknownQuestion(usize),
    #[error("question {question} has no option {id:?}")]
    UnknownOption { question: usize, id: String },
}

/// Result of a completed submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: usize,
    pub total: usize,
    pub passed: bool,
}

/// A quiz session: answers accumulate in any order, then one submission
/// freezes them and computes the score. Retrying means building a fresh
/// `ScoredQuiz`, never reopening a submitted one.
#[derive(Debug, Clone)]
pub struct ScoredQuiz {
    questions: Vec<Question>,
    /// One slot per question, unset until answered
    answers: Vec<Option<String>>,
    pass_threshold: f64,
    /// Display order per question when built with a shuffle seed
    option_order: Option<Vec<Vec<usize>>>,
    report: Option<ScoreReport>,
}

impl ScoredQuiz {
    /// Build a quiz over `questions`, validating every question
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        for (i, q) in questions.iter().enumerate() {
            q.validate(i)?;
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            questions,
            answers,
            pass_threshold: PASS_THRESHOLD,
            option_order: None,
            report: None,
        })
    }

    /// Like `new`, with a deterministic per-session shuffle of each
    /// question's option display order. Scoring is id-based and unaffected.
    pub fn with_shuffled_options(
        questions: Vec<Question>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut quiz = Self::new(questions)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let order = quiz
            .questions
            .iter()
            .map(|q| {
                let mut indices: Vec<usize> = (0..q.options.len()).collect();
                indices.shuffle(&mut rng);
                indices
            })
            .collect();
        quiz.option_order = Some(order);
        Ok(quiz)
    }

    /// Override the pass threshold (fraction of correct answers)
    pub fn with_pass_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = threshold;
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn submitted(&self) -> bool {
        self.report.is_some()
    }

    /// The frozen report, present only after submission
    pub fn report(&self) -> Option<ScoreReport> {
        self.report
    }

    /// Recorded answer for a question, if any
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index)?.as_deref()
    }

    /// Options of a question in display order (shuffled if so built)
    pub fn display_options(&self, index: usize) -> Option<Vec<&ChoiceOption>> {
        let question = self.questions.get(index)?;
        match &self.option_order {
            Some(order) => Some(order[index].iter().map(|&i| &question.options[i]).collect()),
            None => Some(question.options.iter().collect()),
        }
    }

    /// Record (or overwrite) the answer for one question
    pub fn select_answer(&mut self, index: usize, option_id: &str) -> Result<(), QuizError> {
        if self.submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::UnknownQuestion(index))?;
        if !question.options.iter().any(|o| o.id == option_id) {
            return Err(QuizError::UnknownOption {
                question: index,
                id: option_id.to_string(),
            });
        }
        self.answers[index] = Some(option_id.to_string());
        Ok(())
    }

    /// Score the quiz, once
    ///
    /// Every question must be answered; partial credit is never computed.
    pub fn submit(&mut self) -> Result<ScoreReport, QuizError> {
        if self.submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        if let Some(question) = self.answers.iter().position(|a| a.is_none()) {
            return Err(QuizError::IncompleteQuiz { question });
        }

        let score = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.as_deref() == Some(q.correct_option_id()))
            .count();
        let total = self.questions.len();
        let report = ScoreReport {
            score,
            total,
            passed: score as f64 / total as f64 >= self.pass_threshold,
        };
        debug!(
            "quiz submitted: {}/{} ({})",
            score,
            total,
            if report.passed { "pass" } else { "fail" }
        );
        self.report = Some(report);
        Ok(report)
    }
}
