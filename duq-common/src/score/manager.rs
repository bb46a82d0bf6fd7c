//! Persistent score manager
//!
//! Reads the site's record once at construction and writes it back after
//! every change. If the storage medium cannot be read or written the manager
//! keeps going with an in-memory record for the rest of the session; the quiz
//! itself never sees a storage error.

use tracing::{info, warn};

use super::levels::{LevelTable, LevelTier, NextLevel};
use super::{CategoryStats, ScoreRecord};
use crate::config::SiteConfig;
use crate::storage::KeyValueStore;
use crate::Result;

/// Summary shown on the level badge
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub total_points: u32,
    /// correct / total, 0 when nothing attempted
    pub accuracy: f64,
    pub correct: u32,
    pub total: u32,
    pub streak: u32,
    pub level: LevelTier,
}

impl OverallStats {
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }
}

/// Owns and persists the [`ScoreRecord`] for one site
pub struct ScoreManager<S: KeyValueStore> {
    site_key: String,
    store: S,
    record: ScoreRecord,
    levels: LevelTable,
    points_per_correct: u32,
    persistent: bool,
}

impl<S: KeyValueStore> ScoreManager<S> {
    /// Load (or start) the record stored under `site_key`
    pub fn new(site_key: impl Into<String>, store: S, custom_levels: Option<Vec<LevelTier>>) -> Self {
        let site_key = site_key.into();
        let mut manager = Self {
            site_key,
            store,
            record: ScoreRecord::default(),
            levels: LevelTable::new(custom_levels),
            points_per_correct: 1,
            persistent: true,
        };
        manager.load();
        manager
    }

    /// Manager for a site configuration's key, level table and weighting
    pub fn from_config(config: &SiteConfig, store: S) -> Self {
        Self::new(
            config.site_key.clone(),
            store,
            config.scoring.custom_levels.clone(),
        )
        .with_points_per_correct(config.scoring.points_per_correct)
    }

    pub fn with_points_per_correct(mut self, points: u32) -> Self {
        self.points_per_correct = points;
        self
    }

    fn load(&mut self) {
        match self.store.get(&self.site_key) {
            Ok(Some(text)) => match serde_json::from_str::<ScoreRecord>(&text) {
                Ok(record) => {
                    info!(
                        "Loaded scores for '{}': {}/{} correct, streak {}",
                        self.site_key, record.overall.correct, record.overall.total, record.streak
                    );
                    self.record = record;
                }
                Err(e) => {
                    warn!(
                        "Stored scores for '{}' are unreadable ({}), starting fresh",
                        self.site_key, e
                    );
                }
            },
            Ok(None) => {
                info!("No stored scores for '{}', starting fresh", self.site_key);
            }
            Err(e) => {
                warn!(
                    "Score storage unavailable for '{}' ({}), scores will not be saved this session",
                    self.site_key, e
                );
                self.persistent = false;
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        let text = serde_json::to_string(&self.record)?;
        self.store.set(&self.site_key, &text)
    }

    /// Write the record back unless the session has already degraded
    fn persist(&mut self) {
        if !self.persistent {
            return;
        }
        if let Err(e) = self.save() {
            warn!(
                "Failed to save scores for '{}' ({}), keeping them in memory only",
                self.site_key, e
            );
            self.persistent = false;
        }
    }

    /// Record one answer and persist before returning
    pub fn record_score(&mut self, is_correct: bool, category: &str) {
        self.record.apply(is_correct, category);
        self.persist();
    }

    /// Points, accuracy and the level they unlock
    pub fn overall_stats(&self) -> OverallStats {
        let overall = self.record.overall;
        let total_points = overall.correct.saturating_mul(self.points_per_correct);
        let level = self
            .levels
            .current(total_points, overall.accuracy_percent())
            .clone();

        OverallStats {
            total_points,
            accuracy: overall.accuracy(),
            correct: overall.correct,
            total: overall.total,
            streak: self.record.streak,
            level,
        }
    }

    /// Next tier to unlock, `None` at the top
    pub fn next_level(&self) -> Option<NextLevel> {
        let stats = self.overall_stats();
        self.levels.next(stats.total_points, stats.accuracy_percent())
    }

    pub fn streak(&self) -> u32 {
        self.record.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.record.best_streak
    }

    pub fn category_stats(&self, category: &str) -> CategoryStats {
        self.record.category(category)
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    /// False once storage has failed this session
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Zero every counter and persist
    pub fn reset(&mut self) {
        info!("Resetting scores for '{}'", self.site_key);
        self.record = ScoreRecord::default();
        self.persist();
    }

    /// Hand back the storage medium
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::Error;

    /// Storage that refuses everything
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("unavailable".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("unavailable".to_string()))
        }
    }

    /// Readable storage whose writes fail
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
        write_attempts: usize,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            self.write_attempts += 1;
            Err(Error::Storage("read-only".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("read-only".to_string()))
        }
    }

    #[test]
    fn test_right_then_wrong() {
        let mut manager = ScoreManager::new("site", MemoryStore::new(), None);
        manager.record_score(true, "X");
        manager.record_score(false, "X");
        assert_eq!(manager.streak(), 0);
        assert_eq!(manager.category_stats("X"), CategoryStats { correct: 1, total: 2 });
    }

    #[test]
    fn test_every_record_is_written() {
        let mut manager = ScoreManager::new("site", MemoryStore::new(), None);
        manager.record_score(true, "X");
        let store = manager.into_store();
        let saved: ScoreRecord = serde_json::from_str(&store.get("site").unwrap().unwrap()).unwrap();
        assert_eq!(saved.overall, CategoryStats { correct: 1, total: 1 });
        assert_eq!(saved.streak, 1);
    }

    #[test]
    fn test_state_survives_new_manager() {
        let mut manager = ScoreManager::new("site", MemoryStore::new(), None);
        manager.record_score(true, "A");
        manager.record_score(true, "B");
        let store = manager.into_store();

        let reloaded = ScoreManager::new("site", store, None);
        assert_eq!(reloaded.streak(), 2);
        assert_eq!(reloaded.overall_stats().total_points, 2);
    }

    #[test]
    fn test_sites_do_not_collide() {
        let mut first = ScoreManager::new("site-a", MemoryStore::new(), None);
        first.record_score(true, "X");
        let second = ScoreManager::new("site-b", first.into_store(), None);
        assert_eq!(second.overall_stats().total, 0);
    }

    #[test]
    fn test_zero_activity_stats() {
        let manager = ScoreManager::new("site", MemoryStore::new(), None);
        let stats = manager.overall_stats();
        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.level, manager.levels().lowest().clone());
    }

    #[test]
    fn test_points_weighting() {
        let mut manager =
            ScoreManager::new("site", MemoryStore::new(), None).with_points_per_correct(3);
        manager.record_score(true, "X");
        manager.record_score(false, "X");
        let stats = manager.overall_stats();
        assert_eq!(stats.total_points, 3);
        assert_eq!(stats.accuracy, 0.5);
    }

    #[test]
    fn test_unavailable_storage_degrades() {
        let mut manager = ScoreManager::new("site", BrokenStore, None);
        assert!(!manager.is_persistent());
        manager.record_score(true, "X");
        manager.record_score(true, "X");
        assert_eq!(manager.streak(), 2);
        assert_eq!(manager.overall_stats().total, 2);
    }

    #[test]
    fn test_failed_write_stops_further_writes() {
        let mut manager = ScoreManager::new("site", ReadOnlyStore::default(), None);
        assert!(manager.is_persistent());
        manager.record_score(true, "X");
        assert!(!manager.is_persistent());
        manager.record_score(true, "X");
        assert_eq!(manager.streak(), 2);
        assert_eq!(manager.into_store().write_attempts, 1);
    }

    #[test]
    fn test_corrupt_record_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set("site", "not json").unwrap();
        let mut manager = ScoreManager::new("site", store, None);
        assert!(manager.is_persistent());
        assert_eq!(manager.overall_stats().total, 0);
        manager.record_score(true, "X");
        let store = manager.into_store();
        assert!(serde_json::from_str::<ScoreRecord>(&store.get("site").unwrap().unwrap()).is_ok());
    }

    #[test]
    fn test_reset_persists() {
        let mut manager = ScoreManager::new("site", MemoryStore::new(), None);
        manager.record_score(true, "X");
        manager.reset();
        assert_eq!(manager.overall_stats().total, 0);
        let reloaded = ScoreManager::new("site", manager.into_store(), None);
        assert_eq!(reloaded.overall_stats().total, 0);
        assert_eq!(reloaded.best_streak(), 0);
    }

    #[test]
    fn test_next_level_progress() {
        let mut manager = ScoreManager::new("site", MemoryStore::new(), None);
        for _ in 0..3 {
            manager.record_score(true, "X");
        }
        let next = manager.next_level().unwrap();
        assert_eq!(next.points_needed, 2);
    }
}
