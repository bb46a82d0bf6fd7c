//! Current-question state for a presentation layer
//!
//! Holds at most one question. A question accepts exactly one submission;
//! anything submitted afterwards, or with no question presented, is ignored.

use tracing::debug;

use crate::question::{check_answer, AnswerCheck, Question, QuizQuestion};
use crate::score::ScoreManager;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    current: Option<Question>,
    submitted: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current question, discarding any previous one
    pub fn present(&mut self, question: impl Into<Question>) -> &Question {
        self.submitted = false;
        self.current.insert(question.into())
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// True while a question is shown and not yet answered
    pub fn is_awaiting_answer(&self) -> bool {
        self.current.is_some() && !self.submitted
    }

    /// Check `raw_input` against the current question and record the outcome.
    ///
    /// Returns `None` without touching the scores when there is no question
    /// or it has already been answered.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        raw_input: &str,
        scores: &mut ScoreManager<S>,
    ) -> Option<AnswerCheck> {
        if self.submitted {
            debug!("Ignoring repeat submission");
            return None;
        }
        let question = self.current.as_ref()?;

        let check = check_answer(question, raw_input);
        scores.record_score(check.is_correct, question.category().as_str());
        self.submitted = true;
        Some(check)
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.submitted = false;
    }
}
