//! Level tiers
//!
//! A tier unlocks once both its points and accuracy thresholds are met. The
//! table is kept sorted from least to most demanding, so the current tier is
//! the last one whose thresholds are satisfied.

use serde::{Deserialize, Serialize};

/// One rung of the level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTier {
    pub emoji: String,
    pub title: String,
    pub description: String,

    #[serde(alias = "minPoints")]
    pub min_points: u32,

    /// Percentage, 0-100
    #[serde(alias = "minAccuracy")]
    pub min_accuracy: f64,
}

impl LevelTier {
    pub fn new(
        emoji: &str,
        title: &str,
        description: &str,
        min_points: u32,
        min_accuracy: f64,
    ) -> Self {
        Self {
            emoji: emoji.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            min_points,
            min_accuracy,
        }
    }

    pub fn is_unlocked(&self, points: u32, accuracy_percent: f64) -> bool {
        points >= self.min_points && accuracy_percent >= self.min_accuracy
    }

    /// "🦆 Mallard" style badge text
    pub fn badge(&self) -> String {
        format!("{} {}", self.emoji, self.title)
    }
}

/// Built-in tiers used when a site supplies none
pub fn default_levels() -> Vec<LevelTier> {
    vec![
        LevelTier::new("🥚", "Duck Egg", "Every great duck starts somewhere!", 0, 0.0),
        LevelTier::new("🐣", "Duckling Logic", "Hatched and ready to learn!", 5, 0.0),
        LevelTier::new("🐤", "Paddling Duckling", "Finding your feet in the pond!", 15, 60.0),
        LevelTier::new("🦆", "Mallard Mind", "Gliding through the questions!", 30, 70.0),
        LevelTier::new("🦆✨", "Soaring Duck", "Flying high above the pond!", 50, 80.0),
        LevelTier::new("🪿👑", "Duck Royalty", "Ruler of the pond - nothing ruffles your feathers!", 100, 90.0),
    ]
}

/// Next tier still to unlock and the points it needs
#[derive(Debug, Clone, PartialEq)]
pub struct NextLevel {
    pub tier: LevelTier,
    /// Points still missing (0 when only accuracy is holding it back)
    pub points_needed: u32,
}

/// Non-empty, sorted level table
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    tiers: Vec<LevelTier>,
}

impl LevelTable {
    /// Build from custom tiers, falling back to [`default_levels`] when
    /// none are given
    pub fn new(custom: Option<Vec<LevelTier>>) -> Self {
        let mut tiers = match custom {
            Some(tiers) if !tiers.is_empty() => tiers,
            _ => default_levels(),
        };
        tiers.sort_by(|a, b| {
            a.min_points
                .cmp(&b.min_points)
                .then(a.min_accuracy.total_cmp(&b.min_accuracy))
        });
        Self { tiers }
    }

    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }

    pub fn lowest(&self) -> &LevelTier {
        &self.tiers[0]
    }

    /// Most demanding tier whose thresholds are both met, else the lowest
    pub fn current(&self, points: u32, accuracy_percent: f64) -> &LevelTier {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.is_unlocked(points, accuracy_percent))
            .unwrap_or_else(|| self.lowest())
    }

    /// First tier above the current one that is still locked
    pub fn next(&self, points: u32, accuracy_percent: f64) -> Option<NextLevel> {
        let current = self.current(points, accuracy_percent);
        let position = self.tiers.iter().position(|t| t == current)?;
        self.tiers[position + 1..]
            .iter()
            .find(|tier| !tier.is_unlocked(points, accuracy_percent))
            .map(|tier| NextLevel {
                tier: tier.clone(),
                points_needed: tier.min_points.saturating_sub(points),
            })
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new(None)
    }
}
