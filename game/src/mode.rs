use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    Classic,
    Chrono,
    FindColor,
}

/// What kind of question a mode asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    Match,
    FindColor,
}

/// What happens after a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMiss {
    EndRun,
    KeepPlaying,
}

/// Per-mode policy, one row per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    pub round: RoundKind,
    pub on_miss: OnMiss,
    /// Run ends only when the countdown reaches zero.
    pub timed: bool,
}

const RULES: [(GameMode, ModeRules); 3] = [
    (
        GameMode::Classic,
        ModeRules {
            round: RoundKind::Match,
            on_miss: OnMiss::EndRun,
            timed: false,
        },
    ),
    (
        GameMode::Chrono,
        ModeRules {
            round: RoundKind::Match,
            on_miss: OnMiss::KeepPlaying,
            timed: true,
        },
    ),
    (
        GameMode::FindColor,
        ModeRules {
            round: RoundKind::FindColor,
            on_miss: OnMiss::EndRun,
            timed: false,
        },
    ),
];

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Classic, GameMode::Chrono, GameMode::FindColor];

    pub fn rules(self) -> ModeRules {
        RULES[self as usize].1
    }

    /// Stable tag used as the persisted map key.
    pub fn tag(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Chrono => "chrono",
            GameMode::FindColor => "findColor",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Chrono => "Chrono",
            GameMode::FindColor => "Find Color",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
            .or(match s {
                "find-color" | "find_color" | "findcolor" => Some(GameMode::FindColor),
                _ => None,
            })
            .ok_or_else(|| format!("unknown game mode `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_table_rows_line_up_with_modes() {
        for mode in GameMode::ALL {
            assert_eq!(RULES[mode as usize].0, mode);
        }
    }

    #[test]
    fn only_chrono_survives_a_miss_and_is_timed() {
        assert_eq!(GameMode::Classic.rules().on_miss, OnMiss::EndRun);
        assert_eq!(GameMode::FindColor.rules().on_miss, OnMiss::EndRun);
        assert_eq!(GameMode::Chrono.rules().on_miss, OnMiss::KeepPlaying);
        assert!(GameMode::Chrono.rules().timed);
        assert!(!GameMode::Classic.rules().timed);
        assert_eq!(GameMode::FindColor.rules().round, RoundKind::FindColor);
    }

    #[test]
    fn tags_round_trip_through_serde() {
        for mode in GameMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.tag()));
            assert_eq!(GameMode::from_tag(mode.tag()), Some(mode));
        }
        assert_eq!(GameMode::from_tag("arcade"), None);
        assert_eq!("find-color".parse::<GameMode>(), Ok(GameMode::FindColor));
    }
}
