//! Local, per-mode ranking of finished runs.
//!
//! Each mode keeps its entries sorted by score, highest first. Ties keep
//! recording order, so an older entry stays above a newer one with the same
//! score. `rank` is `1 + (entries with a strictly higher score)`, which gives
//! tied entries the same rank.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use truehue_engine::store::{SharedStore, load_json, save_json};

use crate::mode::GameMode;

pub const LEADERBOARD_KEY: &str = "localLeaderboards";
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A finished run, produced once at the playing -> game over transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub mode: GameMode,
    pub final_score: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    pub date: DateTime<Utc>,
    pub rank: u32,
}

pub struct LocalLeaderboard {
    boards: BTreeMap<GameMode, Vec<LeaderboardEntry>>,
    store: SharedStore,
}

impl LocalLeaderboard {
    /// Load every mode's entries. A mode whose tag or payload does not decode
    /// is dropped on its own; the others still load.
    pub fn load(store: SharedStore) -> Self {
        let raw: BTreeMap<String, Value> =
            load_json(store.as_ref(), LEADERBOARD_KEY).unwrap_or_default();

        let mut boards = BTreeMap::new();
        for (tag, payload) in raw {
            let Some(mode) = GameMode::from_tag(&tag) else {
                log::warn!("dropping leaderboard for unknown mode `{tag}`");
                continue;
            };
            match serde_json::from_value::<Vec<LeaderboardEntry>>(payload) {
                Ok(mut entries) => {
                    rerank(&mut entries);
                    boards.insert(mode, entries);
                }
                Err(err) => log::warn!("dropping corrupt `{tag}` leaderboard: {err}"),
            }
        }

        Self { boards, store }
    }

    /// Append `run` under `player_name`, re-rank the mode and persist.
    pub fn record_run(&mut self, player_name: &str, run: &RunResult) -> LeaderboardEntry {
        let entries = self.boards.entry(run.mode).or_default();
        entries.push(LeaderboardEntry {
            player_name: player_name.to_string(),
            score: run.final_score,
            date: run.timestamp,
            rank: 0,
        });
        rerank(entries);

        // Stable sort: the new entry lands after every equal score.
        let position = entries
            .iter()
            .filter(|e| e.score >= run.final_score)
            .count()
            - 1;

        let entry = entries[position].clone();
        log::info!(
            "recorded {} run: score {} rank {}",
            run.mode,
            entry.score,
            entry.rank
        );
        self.persist();
        entry
    }

    /// The first `limit` entries, best first.
    pub fn top_scores(&self, mode: GameMode, limit: usize) -> &[LeaderboardEntry] {
        let entries = self.entries(mode);
        &entries[..limit.min(entries.len())]
    }

    pub fn entries(&self, mode: GameMode) -> &[LeaderboardEntry] {
        self.boards.get(&mode).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn best_score(&self, mode: GameMode) -> Option<u32> {
        self.entries(mode).first().map(|e| e.score)
    }

    /// Best standing reached in `mode`.
    pub fn player_rank(&self, mode: GameMode) -> Option<u32> {
        self.entries(mode).first().map(|e| e.rank)
    }

    fn persist(&self) {
        let raw: BTreeMap<&str, &Vec<LeaderboardEntry>> =
            self.boards.iter().map(|(m, e)| (m.tag(), e)).collect();
        save_json(self.store.as_ref(), LEADERBOARD_KEY, &raw);
    }
}

impl std::fmt::Debug for LocalLeaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLeaderboard")
            .field("boards", &self.boards)
            .finish()
    }
}

/// Sort best first (stable) and recompute every rank.
fn rerank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    let mut higher = 0u32;
    for i in 0..entries.len() {
        if i > 0 && entries[i].score < entries[i - 1].score {
            higher = i as u32;
        }
        entries[i].rank = higher + 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use truehue_engine::store::MemoryStore;

    use super::*;

    fn run(mode: GameMode, score: u32, minute: u32) -> RunResult {
        RunResult {
            mode,
            final_score: score,
            timestamp: Utc.with_ymd_and_hms(2025, 8, 5, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn rerank_gives_ties_the_same_rank() {
        let store = MemoryStore::new();
        let mut board = LocalLeaderboard::load(store.shared());
        for (i, score) in [5, 9, 5, 1].into_iter().enumerate() {
            board.record_run("Player", &run(GameMode::Chrono, score, i as u32));
        }
        let ranks: Vec<(u32, u32)> = board
            .entries(GameMode::Chrono)
            .iter()
            .map(|e| (e.score, e.rank))
            .collect();
        assert_eq!(ranks, vec![(9, 1), (5, 2), (5, 2), (1, 4)]);
    }

    #[test]
    fn ties_keep_recording_order() {
        let store = MemoryStore::new();
        let mut board = LocalLeaderboard::load(store.shared());
        board.record_run("first", &run(GameMode::Classic, 7, 0));
        let second = board.record_run("second", &run(GameMode::Classic, 7, 1));
        assert_eq!(second.player_name, "second");
        assert_eq!(second.rank, 1);
        let names: Vec<&str> = board
            .entries(GameMode::Classic)
            .iter()
            .map(|e| e.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn modes_are_ranked_independently() {
        let store = MemoryStore::new();
        let mut board = LocalLeaderboard::load(store.shared());
        board.record_run("Player", &run(GameMode::Classic, 3, 0));
        let entry = board.record_run("Player", &run(GameMode::FindColor, 1, 1));
        assert_eq!(entry.rank, 1);
        assert_eq!(board.best_score(GameMode::Classic), Some(3));
        assert_eq!(board.best_score(GameMode::Chrono), None);
        assert!(board.top_scores(GameMode::Chrono, 10).is_empty());
    }

    #[test]
    fn one_corrupt_mode_does_not_erase_the_others() {
        let store = MemoryStore::new();
        let mut board = LocalLeaderboard::load(store.shared());
        board.record_run("Player", &run(GameMode::Classic, 12, 0));
        board.record_run("Player", &run(GameMode::Chrono, 20, 1));

        let mut raw: BTreeMap<String, Value> =
            serde_json::from_str(&store.raw(LEADERBOARD_KEY).unwrap()).unwrap();
        raw.insert("chrono".into(), Value::String("garbage".into()));
        raw.insert("blitz".into(), Value::Array(vec![]));
        store.insert_raw(LEADERBOARD_KEY, &serde_json::to_string(&raw).unwrap());

        let reloaded = LocalLeaderboard::load(store.shared());
        assert_eq!(reloaded.best_score(GameMode::Classic), Some(12));
        assert_eq!(reloaded.best_score(GameMode::Chrono), None);
    }

    #[test]
    fn unreadable_payload_loads_empty() {
        let store = MemoryStore::new();
        store.insert_raw(LEADERBOARD_KEY, "not json at all");
        let board = LocalLeaderboard::load(store.shared());
        assert!(board.entries(GameMode::Classic).is_empty());
    }

    #[test]
    fn persisted_shape_is_keyed_by_mode_tag() {
        let store = MemoryStore::new();
        let mut board = LocalLeaderboard::load(store.shared());
        board.record_run("Player", &run(GameMode::FindColor, 4, 0));
        let raw: Value = serde_json::from_str(&store.raw(LEADERBOARD_KEY).unwrap()).unwrap();
        let entry = &raw["findColor"][0];
        assert_eq!(entry["playerName"], "Player");
        assert_eq!(entry["score"], 4);
        assert_eq!(entry["rank"], 1);
    }
}
