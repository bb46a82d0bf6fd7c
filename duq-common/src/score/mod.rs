//! Score tracking
//!
//! Right/wrong counts per category and overall, the current streak, and the
//! level tier those totals unlock. [`ScoreManager`] is the only writer.

mod levels;
mod manager;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use levels::{default_levels, LevelTable, LevelTier, NextLevel};
pub use manager::{OverallStats, ScoreManager};

/// Correct/total pair for one category (or overall)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub correct: u32,
    pub total: u32,
}

impl CategoryStats {
    pub fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    /// correct / total, 0 when nothing attempted
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }

    /// Accuracy as a percentage (0-100)
    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) * 100.0 / f64::from(self.total)
        }
    }
}

/// Persisted score state for one site
///
/// Serialized as
/// `{"perCategory": {..}, "overall": {..}, "streak": n, "bestStreak": n, "updatedAt": ..}`.
/// Every field defaults so older or partial records still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    #[serde(default)]
    pub per_category: BTreeMap<String, CategoryStats>,

    #[serde(default)]
    pub overall: CategoryStats,

    /// Consecutive correct answers since the last wrong one
    #[serde(default)]
    pub streak: u32,

    #[serde(default)]
    pub best_streak: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    /// Apply one answer outcome
    pub fn apply(&mut self, is_correct: bool, category: &str) {
        self.per_category
            .entry(category.to_string())
            .or_default()
            .record(is_correct);
        self.overall.record(is_correct);

        if is_correct {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.updated_at = Some(Utc::now());
    }

    pub fn category(&self, category: &str) -> CategoryStats {
        self.per_category.get(category).copied().unwrap_or_default()
    }
}
