use std::collections::BTreeMap;

use serde_json::Value;
use truehue_engine::store::{SharedStore, load_json, save_json};

use crate::mode::GameMode;

pub const HIGH_SCORES_KEY: &str = "highScores";

/// Best finished score per mode, persisted under `highScores`.
pub struct HighScores {
    best: BTreeMap<GameMode, u32>,
    store: SharedStore,
}

impl HighScores {
    /// Each mode decodes on its own, so one bad value only costs that mode.
    pub fn load(store: SharedStore) -> Self {
        let raw: BTreeMap<String, Value> =
            load_json(store.as_ref(), HIGH_SCORES_KEY).unwrap_or_default();

        let mut best = BTreeMap::new();
        for (tag, value) in raw {
            let Some(mode) = GameMode::from_tag(&tag) else {
                log::warn!("dropping high score for unknown mode `{tag}`");
                continue;
            };
            match serde_json::from_value::<u32>(value) {
                Ok(score) => {
                    best.insert(mode, score);
                }
                Err(err) => log::warn!("dropping corrupt `{tag}` high score: {err}"),
            }
        }
        Self { best, store }
    }

    pub fn get(&self, mode: GameMode) -> Option<u32> {
        self.best.get(&mode).copied()
    }

    pub fn all(&self) -> &BTreeMap<GameMode, u32> {
        &self.best
    }

    /// Would `score` replace the stored best? Also true when nothing is stored.
    pub fn beats(&self, mode: GameMode, score: u32) -> bool {
        self.get(mode).is_none_or(|best| score > best)
    }

    /// Store `score` if it beats the current best. Returns whether it did.
    pub fn submit(&mut self, mode: GameMode, score: u32) -> bool {
        if !self.beats(mode, score) {
            return false;
        }
        self.best.insert(mode, score);
        self.persist();
        true
    }

    fn persist(&self) {
        let raw: BTreeMap<&str, u32> = self.best.iter().map(|(m, s)| (m.tag(), *s)).collect();
        save_json(self.store.as_ref(), HIGH_SCORES_KEY, &raw);
    }
}

impl std::fmt::Debug for HighScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScores").field("best", &self.best).finish()
    }
}

#[cfg(test)]
mod tests {
    use truehue_engine::store::MemoryStore;

    use super::*;

    #[test]
    fn first_score_is_stored_even_when_zero() {
        let store = MemoryStore::new();
        let mut scores = HighScores::load(store.shared());
        assert!(scores.submit(GameMode::Classic, 0));
        assert_eq!(scores.get(GameMode::Classic), Some(0));
    }

    #[test]
    fn only_strictly_greater_scores_overwrite() {
        let store = MemoryStore::new();
        let mut scores = HighScores::load(store.shared());
        assert!(scores.submit(GameMode::Chrono, 12));
        assert!(!scores.submit(GameMode::Chrono, 12));
        assert!(!scores.submit(GameMode::Chrono, 3));
        assert!(scores.submit(GameMode::Chrono, 13));
        assert_eq!(scores.get(GameMode::Chrono), Some(13));
        assert_eq!(scores.get(GameMode::Classic), None);
    }

    #[test]
    fn survives_reload_and_skips_unknown_modes() {
        let store = MemoryStore::new();
        store.insert_raw(HIGH_SCORES_KEY, r#"{"classic": 4, "arcade": 99}"#);
        let mut scores = HighScores::load(store.shared());
        assert_eq!(scores.get(GameMode::Classic), Some(4));
        assert_eq!(scores.all().len(), 1);

        scores.submit(GameMode::FindColor, 8);
        let reloaded = HighScores::load(store.shared());
        assert_eq!(reloaded.get(GameMode::FindColor), Some(8));
        assert_eq!(reloaded.get(GameMode::Classic), Some(4));
    }

    #[test]
    fn one_bad_value_keeps_the_other_modes() {
        let store = MemoryStore::new();
        store.insert_raw(HIGH_SCORES_KEY, r#"{"classic": 40, "chrono": -1, "findColor": "x"}"#);
        let mut scores = HighScores::load(store.shared());
        assert_eq!(scores.get(GameMode::Classic), Some(40));
        assert_eq!(scores.get(GameMode::Chrono), None);
        assert_eq!(scores.get(GameMode::FindColor), None);

        // A later write keeps the surviving best on disk.
        assert!(scores.submit(GameMode::Chrono, 2));
        let reloaded = HighScores::load(store.shared());
        assert_eq!(reloaded.get(GameMode::Classic), Some(40));
        assert_eq!(reloaded.get(GameMode::Chrono), Some(2));
    }

    #[test]
    fn corrupt_payload_loads_as_empty() {
        let store = MemoryStore::new();
        store.insert_raw(HIGH_SCORES_KEY, "[1, 2");
        let scores = HighScores::load(store.shared());
        assert!(scores.all().is_empty());
    }

    #[test]
    fn write_failure_keeps_in_memory_value() {
        let store = MemoryStore::new();
        store.set_read_only(true);
        let mut scores = HighScores::load(store.shared());
        assert!(scores.submit(GameMode::Classic, 9));
        assert_eq!(scores.get(GameMode::Classic), Some(9));
        assert!(store.raw(HIGH_SCORES_KEY).is_none());
    }
}
