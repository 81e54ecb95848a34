use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Start,
    Finish,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEffect {
    None,
    /// Zero the score, rearm the countdown and deal the first round.
    BeginRun,
    /// Stop the timer and record the finished run.
    RecordRun,
    /// Stop the timer and drop the current run.
    ClearRun,
}

impl GameState {
    /// Pure transition function for the run lifecycle.
    ///
    /// Side-effects are reported via `LifecycleEffect` so the session applies
    /// them and this table stays trivially testable.
    pub fn handle(self, event: LifecycleEvent) -> (GameState, LifecycleEffect) {
        match (self, event) {
            (GameState::Menu | GameState::GameOver, LifecycleEvent::Start) => {
                (GameState::Playing, LifecycleEffect::BeginRun)
            }
            (GameState::Playing, LifecycleEvent::Finish) => {
                (GameState::GameOver, LifecycleEffect::RecordRun)
            }
            (_, LifecycleEvent::Reset) => (GameState::Menu, LifecycleEffect::ClearRun),

            // Ignore irrelevant events in the current state.
            (state, _) => (state, LifecycleEffect::None),
        }
    }

    pub fn is_playing(self) -> bool {
        self == GameState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_menu() {
        assert_eq!(GameState::default(), GameState::Menu);
    }

    #[test]
    fn start_from_menu_or_game_over_begins_a_run() {
        for from in [GameState::Menu, GameState::GameOver] {
            assert_eq!(
                from.handle(LifecycleEvent::Start),
                (GameState::Playing, LifecycleEffect::BeginRun)
            );
        }
    }

    #[test]
    fn start_while_playing_is_ignored() {
        assert_eq!(
            GameState::Playing.handle(LifecycleEvent::Start),
            (GameState::Playing, LifecycleEffect::None)
        );
    }

    #[test]
    fn finish_only_applies_while_playing() {
        assert_eq!(
            GameState::Playing.handle(LifecycleEvent::Finish),
            (GameState::GameOver, LifecycleEffect::RecordRun)
        );
        assert_eq!(
            GameState::Menu.handle(LifecycleEvent::Finish),
            (GameState::Menu, LifecycleEffect::None)
        );
        assert_eq!(
            GameState::GameOver.handle(LifecycleEvent::Finish),
            (GameState::GameOver, LifecycleEffect::None)
        );
    }

    #[test]
    fn reset_returns_to_menu_from_anywhere() {
        for from in [GameState::Menu, GameState::Playing, GameState::GameOver] {
            assert_eq!(
                from.handle(LifecycleEvent::Reset),
                (GameState::Menu, LifecycleEffect::ClearRun)
            );
        }
    }
}
