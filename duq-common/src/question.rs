//! Question sum type and answer checking
//!
//! Every engine produces its own question struct; [`Question`] wraps them so
//! a presentation layer can hold "the current question" without caring which
//! engine made it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engines::capacity::CapacityQuestion;
use crate::engines::conversion::ConversionQuestion;
use crate::engines::file_size::FileSizeQuestion;
use crate::format::format_number;

/// Score category a question counts towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionCategory {
    ConvertUnit,
    CalculateFileSize,
    CalculateCapacity,
}

impl QuestionCategory {
    /// Key used in the persisted per-category map
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::ConvertUnit => "ConvertUnit",
            QuestionCategory::CalculateFileSize => "CalculateFileSize",
            QuestionCategory::CalculateCapacity => "CalculateCapacity",
        }
    }

    /// Heading shown in stats output
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionCategory::ConvertUnit => "Converting Units",
            QuestionCategory::CalculateFileSize => "File Size Calculator",
            QuestionCategory::CalculateCapacity => "Capacity Calculator",
        }
    }

    pub fn all_variants() -> &'static [QuestionCategory] {
        &[
            QuestionCategory::ConvertUnit,
            QuestionCategory::CalculateFileSize,
            QuestionCategory::CalculateCapacity,
        ]
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One titled block of a worked explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationSection {
    pub title: String,
    pub details: Vec<String>,
}

impl ExplanationSection {
    pub fn new(title: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            title: title.into(),
            details,
        }
    }
}

/// Behaviour shared by every engine's question type
pub trait QuizQuestion {
    fn category(&self) -> QuestionCategory;

    /// Prompt shown to the learner
    fn text(&self) -> String;

    /// One-line formula reminder
    fn hint(&self) -> &'static str;

    /// Exact answer used for checking
    fn answer(&self) -> f64;

    fn explanation(&self) -> &[ExplanationSection];

    /// Strict upper bound on |user - answer| for a correct answer
    fn tolerance(&self) -> f64;

    fn is_correct(&self, user_answer: f64) -> bool {
        (user_answer - self.answer()).abs() < self.tolerance()
    }
}

/// A question from any engine
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Conversion(ConversionQuestion),
    FileSize(FileSizeQuestion),
    Capacity(CapacityQuestion),
}

impl Question {
    fn inner(&self) -> &dyn QuizQuestion {
        match self {
            Question::Conversion(q) => q,
            Question::FileSize(q) => q,
            Question::Capacity(q) => q,
        }
    }
}

impl QuizQuestion for Question {
    fn category(&self) -> QuestionCategory {
        self.inner().category()
    }

    fn text(&self) -> String {
        self.inner().text()
    }

    fn hint(&self) -> &'static str {
        self.inner().hint()
    }

    fn answer(&self) -> f64 {
        self.inner().answer()
    }

    fn explanation(&self) -> &[ExplanationSection] {
        self.inner().explanation()
    }

    fn tolerance(&self) -> f64 {
        self.inner().tolerance()
    }
}

impl From<ConversionQuestion> for Question {
    fn from(q: ConversionQuestion) -> Self {
        Question::Conversion(q)
    }
}

impl From<FileSizeQuestion> for Question {
    fn from(q: FileSizeQuestion) -> Self {
        Question::FileSize(q)
    }
}

impl From<CapacityQuestion> for Question {
    fn from(q: CapacityQuestion) -> Self {
        Question::Capacity(q)
    }
}

/// Outcome of checking one submission
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub correct_answer: f64,
    pub message: String,
    pub explanation: Vec<ExplanationSection>,
}

/// Parse raw learner input into a number.
///
/// Surrounding whitespace and comma thousands separators are accepted.
/// Returns `None` for empty, non-numeric or non-finite input.
pub fn parse_answer(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check a raw submission against a question.
///
/// Unparseable input is simply an incorrect answer.
pub fn check_answer<Q: QuizQuestion + ?Sized>(question: &Q, raw_input: &str) -> AnswerCheck {
    let is_correct = parse_answer(raw_input)
        .map(|value| question.is_correct(value))
        .unwrap_or(false);

    let correct_answer = question.answer();
    let message = if is_correct {
        "Correct! Well done!".to_string()
    } else {
        format!(
            "Incorrect. The correct answer is {}",
            format_number(correct_answer)
        )
    };

    AnswerCheck {
        is_correct,
        correct_answer,
        message,
        explanation: question.explanation().to_vec(),
    }
}
