use serde::{Deserialize, Serialize};

pub const DEFAULT_CHRONO_BUDGET: u32 = 30;

/// Remaining-time budget for a timed run, counted in whole ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
}

/// How urgent the remaining time looks to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBand {
    Calm,
    Warning,
    Critical,
}

impl Countdown {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.budget;
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_up(&self) -> bool {
        self.remaining == 0
    }

    /// Take one unit off. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.is_up() {
            return false;
        }
        self.remaining -= 1;
        self.is_up()
    }

    pub fn band(&self) -> TimeBand {
        match self.remaining {
            r if r > 20 => TimeBand::Calm,
            r if r > 10 => TimeBand::Warning,
            _ => TimeBand::Critical,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_CHRONO_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_up_only_on_the_final_tick() {
        let mut c = Countdown::new(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert!(c.tick());
        assert!(c.is_up());

        // Once up it stays at zero and never reports again.
        assert!(!c.tick());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn reset_restores_the_budget() {
        let mut c = Countdown::default();
        c.tick();
        c.tick();
        assert_eq!(c.remaining(), 28);
        c.reset();
        assert_eq!(c.remaining(), DEFAULT_CHRONO_BUDGET);
    }

    #[test]
    fn band_follows_remaining_time() {
        let mut c = Countdown::new(30);
        assert_eq!(c.band(), TimeBand::Calm);
        for _ in 0..10 {
            c.tick();
        }
        assert_eq!(c.remaining(), 20);
        assert_eq!(c.band(), TimeBand::Warning);
        for _ in 0..10 {
            c.tick();
        }
        assert_eq!(c.band(), TimeBand::Critical);
    }
}
