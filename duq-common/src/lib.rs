//! # Data Units Quiz Common Library
//!
//! Shared code for the data units quiz including:
//! - The storage unit ladder and conversion arithmetic
//! - Question generators (unit conversion, file size, capacity)
//! - Answer checking and explanations
//! - Score tracking, streaks and level tiers
//! - Site configuration loading
//! - Key-value storage used for score persistence

pub mod config;
pub mod engines;
pub mod error;
pub mod format;
pub mod question;
pub mod score;
pub mod session;
pub mod storage;
pub mod units;

pub use error::{Error, Result};
pub use question::{AnswerCheck, ExplanationSection, Question, QuestionCategory};
pub use score::{LevelTier, OverallStats, ScoreManager, ScoreRecord};
pub use session::QuizSession;
pub use units::Unit;
