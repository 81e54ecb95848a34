//! Round generation, run lifecycle, scoring and local progression for a
//! color-matching quiz.
//!
//! The presentation layer drives a [`session::GameSession`] and reads its
//! state back; everything persisted goes through a
//! [`truehue_engine::store::KeyValueStore`].

pub mod achievements;
pub mod config;
pub mod countdown;
pub mod high_scores;
pub mod leaderboard;
pub mod lifecycle;
pub mod mode;
pub mod palette;
pub mod round;
pub mod serde_duration;
pub mod session;

pub use lifecycle::GameState;
pub use mode::GameMode;
pub use palette::{ColorSample, Palette};
pub use round::Round;
pub use session::{GameEvent, GameSession, Progress, RunOutcome};
