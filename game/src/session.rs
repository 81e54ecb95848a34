//! The game state machine.
//!
//! A `GameSession` owns one run at a time plus the persisted progress it
//! feeds (high scores, leaderboard, achievements). It is single-threaded by
//! construction: the progress components hold `Rc` store handles.
//!
//! Answer calls made while not playing, or that do not fit the active mode,
//! are ignored and return `None`.

use std::time::Duration;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use truehue_engine::store::SharedStore;
use truehue_engine::ticker::{TickToken, Ticker};

use crate::achievements::{Achievement, AchievementBook};
use crate::config::EngineConfig;
use crate::countdown::{Countdown, TimeBand};
use crate::high_scores::HighScores;
use crate::leaderboard::{LeaderboardEntry, LocalLeaderboard, RunResult};
use crate::lifecycle::{GameState, LifecycleEffect, LifecycleEvent};
use crate::mode::{GameMode, OnMiss, RoundKind};
use crate::palette::Palette;
use crate::round::{Round, generate_find_color_round_with, generate_match_round};

/// Everything produced when a run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub result: RunResult,
    pub new_high_score: bool,
    pub entry: LeaderboardEntry,
    pub unlocked: Vec<Achievement>,
}

/// Notifications for the presentation layer (haptics, animation, sounds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started(GameMode),
    Answered { correct: bool },
    TimeUp,
    GameOver(RunOutcome),
    Reset,
}

/// Persisted player progress, injected into the session.
#[derive(Debug)]
pub struct Progress {
    pub high_scores: HighScores,
    pub leaderboard: LocalLeaderboard,
    pub achievements: AchievementBook,
}

impl Progress {
    pub fn load(store: SharedStore) -> Self {
        Self {
            high_scores: HighScores::load(store.clone()),
            leaderboard: LocalLeaderboard::load(store.clone()),
            achievements: AchievementBook::load(store),
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    palette: Palette,
    config: EngineConfig,
    progress: Progress,
    rng: StdRng,

    state: GameState,
    mode: GameMode,
    score: u32,
    round: Option<Round>,
    countdown: Countdown,
    ticker: Ticker,
    last_outcome: Option<RunOutcome>,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(palette: Palette, config: EngineConfig, progress: Progress, rng: StdRng) -> Self {
        let config = config.sanitized();
        Self {
            countdown: Countdown::new(config.chrono_budget),
            ticker: Ticker::new(config.tick_interval),
            palette,
            config,
            progress,
            rng,
            state: GameState::Menu,
            mode: GameMode::Classic,
            score: 0,
            round: None,
            last_outcome: None,
            events: Vec::new(),
        }
    }

    /// Standard palette, progress loaded from `store`. A `seed` makes the
    /// round sequence reproducible.
    pub fn open(store: SharedStore, config: EngineConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(Palette::standard(), config, Progress::load(store), rng)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn time_band(&self) -> TimeBand {
        self.countdown.band()
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn high_score(&self, mode: GameMode) -> Option<u32> {
        self.progress.high_scores.get(mode)
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.progress.high_scores
    }

    pub fn leaderboard(&self) -> &LocalLeaderboard {
        &self.progress.leaderboard
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.progress.achievements
    }

    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    /// Token of the live chrono timer, for hosts that schedule their own
    /// callbacks and deliver them through [`GameSession::tick_with`].
    pub fn ticker_token(&self) -> Option<TickToken> {
        self.ticker.token()
    }

    /// While playing: would the current score beat the stored best? After a
    /// run: did it?
    pub fn is_new_high_score(&self) -> bool {
        match self.state {
            GameState::Playing => self.progress.high_scores.beats(self.mode, self.score),
            GameState::GameOver => self.last_outcome.as_ref().is_some_and(|o| o.new_high_score),
            GameState::Menu => false,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn start_game(&mut self, mode: GameMode) {
        let (next, effect) = self.state.handle(LifecycleEvent::Start);
        if effect != LifecycleEffect::BeginRun {
            log::debug!("start_game({mode}) ignored in {:?}", self.state);
            return;
        }

        self.ticker.cancel();
        self.state = next;
        self.mode = mode;
        self.score = 0;
        self.countdown.reset();
        self.last_outcome = None;
        self.round = Some(self.next_round());
        if mode.rules().timed {
            self.ticker.start();
        }
        log::debug!("started {mode} run");
        self.events.push(GameEvent::Started(mode));
    }

    /// Judge a match round. Returns whether the claim was right.
    pub fn submit_answer(&mut self, user_claims_match: bool) -> Option<bool> {
        if !self.accepts(RoundKind::Match) {
            return None;
        }
        let correct = self
            .round
            .as_ref()
            .is_some_and(|r| r.is_match == user_claims_match);
        self.resolve_answer(correct);
        Some(correct)
    }

    /// Pick an option of a find-color round. Out-of-range picks are wrong.
    pub fn select_option(&mut self, index: usize) -> Option<bool> {
        if !self.accepts(RoundKind::FindColor) {
            return None;
        }
        let correct = self
            .round
            .as_ref()
            .and_then(Round::correct_option_index)
            .is_some_and(|i| i == index);
        self.resolve_answer(correct);
        Some(correct)
    }

    /// One countdown unit. Ends the run when time runs out.
    pub fn tick(&mut self) {
        if !self.state.is_playing() || !self.mode.rules().timed || !self.ticker.is_active() {
            return;
        }
        if self.countdown.tick() {
            log::debug!("chrono time is up");
            self.events.push(GameEvent::TimeUp);
            self.end_game();
        }
    }

    /// Deliver a scheduled tick. Stale tokens are dropped.
    pub fn tick_with(&mut self, token: TickToken) {
        if self.ticker.accepts(token) {
            self.tick();
        }
    }

    /// Advance wall time for hosts that poll instead of scheduling.
    pub fn advance(&mut self, dt: Duration) {
        let fired = self.ticker.advance(dt);
        for _ in 0..fired {
            if !self.state.is_playing() {
                break;
            }
            self.tick();
        }
    }

    /// Finish the active run: update the high score, record it on the
    /// leaderboard and check achievements.
    pub fn end_game(&mut self) -> Option<&RunOutcome> {
        let (next, effect) = self.state.handle(LifecycleEvent::Finish);
        if effect != LifecycleEffect::RecordRun {
            return None;
        }
        self.ticker.cancel();
        self.state = next;

        let result = RunResult {
            mode: self.mode,
            final_score: self.score,
            timestamp: Utc::now(),
        };
        let new_high_score = self.progress.high_scores.submit(self.mode, self.score);
        if new_high_score {
            log::info!("new {} high score: {}", self.mode, self.score);
        }
        let entry = self
            .progress
            .leaderboard
            .record_run(&self.config.player_name, &result);
        let unlocked = self
            .progress
            .achievements
            .evaluate_at(self.mode, self.score, result.timestamp);

        let outcome = RunOutcome {
            result,
            new_high_score,
            entry,
            unlocked,
        };
        self.events.push(GameEvent::GameOver(outcome.clone()));
        self.last_outcome = Some(outcome);
        self.last_outcome.as_ref()
    }

    /// Back to the menu from anywhere. Progress is left untouched.
    pub fn reset_game(&mut self) {
        let (next, _) = self.state.handle(LifecycleEvent::Reset);
        self.ticker.cancel();
        self.state = next;
        self.score = 0;
        self.round = None;
        self.countdown.reset();
        self.last_outcome = None;
        self.events.push(GameEvent::Reset);
    }

    fn accepts(&self, kind: RoundKind) -> bool {
        self.state.is_playing() && self.mode.rules().round == kind && self.round.is_some()
    }

    fn resolve_answer(&mut self, correct: bool) {
        if correct {
            self.score += 1;
        }
        self.events.push(GameEvent::Answered { correct });

        if !correct && self.mode.rules().on_miss == OnMiss::EndRun {
            self.end_game();
        } else {
            self.round = Some(self.next_round());
        }
    }

    fn next_round(&mut self) -> Round {
        match self.mode.rules().round {
            RoundKind::Match => generate_match_round(&self.palette, &mut self.rng),
            RoundKind::FindColor => generate_find_color_round_with(
                &self.palette,
                self.config.find_color_options,
                &mut self.rng,
            ),
        }
    }
}
