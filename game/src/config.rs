use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use truehue_engine::ticker::{MAX_INTERVAL, MIN_INTERVAL};

use crate::countdown::DEFAULT_CHRONO_BUDGET;
use crate::leaderboard::DEFAULT_PLAYER_NAME;
use crate::round::FIND_COLOR_OPTIONS;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Chrono countdown length, in ticks.
    #[serde(default = "default_chrono_budget")]
    pub chrono_budget: u32,
    #[serde(default = "default_tick_interval", with = "crate::serde_duration")]
    pub tick_interval: Duration,
    #[serde(default = "default_find_color_options")]
    pub find_color_options: usize,
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,
    #[serde(default = "default_player_name")]
    pub player_name: String,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chrono_budget: default_chrono_budget(),
            tick_interval: default_tick_interval(),
            find_color_options: default_find_color_options(),
            leaderboard_limit: default_leaderboard_limit(),
            player_name: default_player_name(),
            data_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn sanitized(mut self) -> Self {
        self.chrono_budget = self.chrono_budget.max(1);
        self.tick_interval = self.tick_interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        self.find_color_options = self.find_color_options.clamp(2, 12);
        self.leaderboard_limit = self.leaderboard_limit.max(1);
        let trimmed = self.player_name.trim();
        self.player_name = if trimmed.is_empty() {
            default_player_name()
        } else {
            trimmed.to_string()
        };
        self
    }

    /// Where persisted game state lives: `TRUEHUE_DATA_DIR`, then `data_dir`,
    /// then the platform data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(explicit) = std::env::var_os("TRUEHUE_DATA_DIR") {
            return PathBuf::from(explicit);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        user_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}

/// `<$xdg_var>/truehue`, falling back to `$HOME/<home_rel>/truehue`, then `./truehue`.
fn user_dir(xdg_var: &str, home_rel: &[&str]) -> PathBuf {
    let base = std::env::var_os(xdg_var)
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .map(|home| home_rel.iter().fold(PathBuf::from(home), |p, part| p.join(part)))
        })
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("truehue")
}

fn default_chrono_budget() -> u32 {
    DEFAULT_CHRONO_BUDGET
}

fn default_tick_interval() -> Duration {
    DEFAULT_TICK_INTERVAL
}

fn default_find_color_options() -> usize {
    FIND_COLOR_OPTIONS
}

fn default_leaderboard_limit() -> usize {
    10
}

fn default_player_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("TRUEHUE_CONFIG_PATH") {
            return Self::new(explicit);
        }

        Self::new(user_dir("XDG_CONFIG_HOME", &[".config"]).join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> EngineConfig {
        let Ok(bytes) = fs::read(&self.path) else {
            return EngineConfig::default();
        };
        match serde_json::from_slice::<EngineConfig>(&bytes) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("ignoring bad config {}: {err}", self.path.display());
                EngineConfig::default()
            }
        }
    }

    /// Write `config` as pretty JSON, creating parent directories.
    pub fn save(&self, config: &EngineConfig) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
