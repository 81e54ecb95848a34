use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use truehue_engine::store::{SharedStore, load_json, save_json};

use crate::mode::GameMode;

pub const ACHIEVEMENTS_KEY: &str = "achievements";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementType {
    Score10,
    Score25,
    Score50,
    ClassicMaster,
    ChronoMaster,
    FindColorMaster,
}

/// Unlock condition for one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    AnyMode { score: u32 },
    InMode { mode: GameMode, score: u32 },
}

impl Requirement {
    pub fn is_met(self, mode: GameMode, score: u32) -> bool {
        match self {
            Requirement::AnyMode { score: need } => score >= need,
            Requirement::InMode {
                mode: want,
                score: need,
            } => mode == want && score >= need,
        }
    }
}

impl AchievementType {
    /// Declaration order, which is also evaluation and display order: global
    /// thresholds ascending, then the per-mode ones.
    pub const ALL: [AchievementType; 6] = [
        AchievementType::Score10,
        AchievementType::Score25,
        AchievementType::Score50,
        AchievementType::ClassicMaster,
        AchievementType::ChronoMaster,
        AchievementType::FindColorMaster,
    ];

    pub fn requirement(self) -> Requirement {
        match self {
            AchievementType::Score10 => Requirement::AnyMode { score: 10 },
            AchievementType::Score25 => Requirement::AnyMode { score: 25 },
            AchievementType::Score50 => Requirement::AnyMode { score: 50 },
            AchievementType::ClassicMaster => Requirement::InMode {
                mode: GameMode::Classic,
                score: 5,
            },
            AchievementType::ChronoMaster => Requirement::InMode {
                mode: GameMode::Chrono,
                score: 15,
            },
            AchievementType::FindColorMaster => Requirement::InMode {
                mode: GameMode::FindColor,
                score: 20,
            },
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AchievementType::Score10 => "Getting Started",
            AchievementType::Score25 => "Color Enthusiast",
            AchievementType::Score50 => "Color Master",
            AchievementType::ClassicMaster => "Classic Master",
            AchievementType::ChronoMaster => "Speed Demon",
            AchievementType::FindColorMaster => "Find Color Expert",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AchievementType::Score10 => "Score 10 points in any mode",
            AchievementType::Score25 => "Score 25 points in any mode",
            AchievementType::Score50 => "Score 50 points in any mode",
            AchievementType::ClassicMaster => "Score 5 points in Classic mode",
            AchievementType::ChronoMaster => "Score 15 points in Chrono mode",
            AchievementType::FindColorMaster => "Score 20 points in Find Color mode",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AchievementType::Score10 => "star.fill",
            AchievementType::Score25 => "star.circle.fill",
            AchievementType::Score50 => "crown.fill",
            AchievementType::ClassicMaster => "gamecontroller.fill",
            AchievementType::ChronoMaster => "timer",
            AchievementType::FindColorMaster => "eye.fill",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    #[serde(rename = "type")]
    pub kind: AchievementType,
    pub is_unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_date: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn locked(kind: AchievementType) -> Self {
        Self {
            kind,
            is_unlocked: false,
            unlocked_date: None,
        }
    }
}

/// One achievement per type; unlocking is one-way.
pub struct AchievementBook {
    achievements: Vec<Achievement>,
    store: SharedStore,
}

impl AchievementBook {
    /// Load the persisted set, or create and persist a fully locked one.
    /// Stray records are dropped and missing types are added locked.
    pub fn load(store: SharedStore) -> Self {
        let stored: Option<Vec<serde_json::Value>> = load_json(store.as_ref(), ACHIEVEMENTS_KEY);
        let found = stored.is_some();
        let stored = stored.unwrap_or_default();
        let stored_len = stored.len();

        let mut decoded: Vec<Achievement> = stored
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(a) => Some(a),
                Err(err) => {
                    log::warn!("dropping unreadable achievement record: {err}");
                    None
                }
            })
            .collect();

        let mut added = 0;
        let achievements: Vec<Achievement> = AchievementType::ALL
            .into_iter()
            .map(|kind| match decoded.iter().position(|a| a.kind == kind) {
                Some(i) => decoded.swap_remove(i),
                None => {
                    added += 1;
                    Achievement::locked(kind)
                }
            })
            .collect();

        let book = Self {
            achievements,
            store,
        };
        if !found || added > 0 || stored_len != book.achievements.len() {
            log::debug!("initializing achievement set");
            book.persist();
        }
        book
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn get(&self, kind: AchievementType) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.kind == kind)
    }

    pub fn is_unlocked(&self, kind: AchievementType) -> bool {
        self.get(kind).is_some_and(|a| a.is_unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_unlocked).count()
    }

    pub fn evaluate(&mut self, mode: GameMode, score: u32) -> Vec<Achievement> {
        self.evaluate_at(mode, score, Utc::now())
    }

    /// Unlock everything `(mode, score)` qualifies for and return only what
    /// was newly unlocked, in declaration order.
    pub fn evaluate_at(
        &mut self,
        mode: GameMode,
        score: u32,
        at: DateTime<Utc>,
    ) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        for achievement in &mut self.achievements {
            if achievement.is_unlocked || !achievement.kind.requirement().is_met(mode, score) {
                continue;
            }
            achievement.is_unlocked = true;
            achievement.unlocked_date = Some(at);
            log::info!("achievement unlocked: {}", achievement.kind.title());
            unlocked.push(achievement.clone());
        }
        if !unlocked.is_empty() {
            self.persist();
        }
        unlocked
    }

    fn persist(&self) {
        save_json(self.store.as_ref(), ACHIEVEMENTS_KEY, &self.achievements);
    }
}

impl std::fmt::Debug for AchievementBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AchievementBook")
            .field("achievements", &self.achievements)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use truehue_engine::store::MemoryStore;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 5, hour, 0, 0).unwrap()
    }

    #[test]
    fn first_load_creates_and_persists_a_locked_set() {
        let store = MemoryStore::new();
        let book = AchievementBook::load(store.shared());
        assert_eq!(book.achievements().len(), AchievementType::ALL.len());
        assert_eq!(book.unlocked_count(), 0);

        let raw: Vec<Achievement> =
            serde_json::from_str(&store.raw(ACHIEVEMENTS_KEY).unwrap()).unwrap();
        assert_eq!(raw, book.achievements());
    }

    #[test]
    fn returned_order_is_global_thresholds_then_mode() {
        let store = MemoryStore::new();
        let mut book = AchievementBook::load(store.shared());
        let unlocked = book.evaluate_at(GameMode::FindColor, 60, at(1));
        let kinds: Vec<AchievementType> = unlocked.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AchievementType::Score10,
                AchievementType::Score25,
                AchievementType::Score50,
                AchievementType::FindColorMaster,
            ]
        );
        assert!(!book.is_unlocked(AchievementType::ClassicMaster));
        assert!(unlocked.iter().all(|a| a.unlocked_date == Some(at(1))));
    }

    #[test]
    fn mode_threshold_needs_the_matching_mode() {
        let store = MemoryStore::new();
        let mut book = AchievementBook::load(store.shared());
        assert!(book.evaluate_at(GameMode::Chrono, 5, at(1)).is_empty());
        let unlocked = book.evaluate_at(GameMode::Classic, 5, at(2));
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].kind, AchievementType::ClassicMaster);
    }

    #[test]
    fn unlock_keeps_its_first_date() {
        let store = MemoryStore::new();
        let mut book = AchievementBook::load(store.shared());
        book.evaluate_at(GameMode::Chrono, 15, at(1));
        assert_eq!(book.evaluate_at(GameMode::Chrono, 30, at(2)).len(), 1);
        let chrono = book.get(AchievementType::ChronoMaster).unwrap();
        assert_eq!(chrono.unlocked_date, Some(at(1)));
        assert!(chrono.is_unlocked);
    }

    #[test]
    fn repairs_partial_and_unknown_records() {
        let store = MemoryStore::new();
        store.insert_raw(
            ACHIEVEMENTS_KEY,
            r#"[
                {"type": "score25", "isUnlocked": true, "unlockedDate": "2025-08-05T10:00:00Z"},
                {"type": "secretLevel", "isUnlocked": true}
            ]"#,
        );
        let book = AchievementBook::load(store.shared());
        assert_eq!(book.achievements().len(), 6);
        assert!(book.is_unlocked(AchievementType::Score25));
        assert!(!book.is_unlocked(AchievementType::Score10));

        let raw: Vec<Achievement> =
            serde_json::from_str(&store.raw(ACHIEVEMENTS_KEY).unwrap()).unwrap();
        assert_eq!(raw.len(), 6);
    }

    #[test]
    fn corrupt_store_falls_back_to_fresh_set() {
        let store = MemoryStore::new();
        store.insert_raw(ACHIEVEMENTS_KEY, "{{{");
        let book = AchievementBook::load(store.shared());
        assert_eq!(book.unlocked_count(), 0);
        assert_eq!(book.achievements().len(), 6);
    }
}
