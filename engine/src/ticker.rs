use std::time::Duration;

pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
pub const MAX_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Identifies one started task. Tokens from a cancelled or superseded task
/// are never accepted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// A cancellable periodic task driven by the host's clock.
///
/// At most one task is live at a time: `start` cancels the previous one.
/// Elapsed time only accumulates while a task is live.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    carry: Duration,
    live: Option<TickToken>,
    issued: u64,
}

impl Ticker {
    /// `interval` is clamped to `MIN_INTERVAL..=MAX_INTERVAL`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            carry: Duration::ZERO,
            live: None,
            issued: 0,
        }
    }

    pub fn start(&mut self) -> TickToken {
        self.cancel();
        self.issued += 1;
        let token = TickToken(self.issued);
        self.live = Some(token);
        token
    }

    /// Returns whether a live task was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        self.carry = Duration::ZERO;
        self.live.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.live.is_some()
    }

    pub fn token(&self) -> Option<TickToken> {
        self.live
    }

    pub fn accepts(&self, token: TickToken) -> bool {
        self.live == Some(token)
    }

    /// Feed elapsed wall time; returns how many whole intervals fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.live.is_none() {
            return 0;
        }
        let total = self.carry.saturating_add(dt).as_nanos();
        let interval = self.interval.as_nanos();
        // The remainder is below MAX_INTERVAL, so it always fits.
        let rest = u64::try_from(total % interval).unwrap_or(u64::MAX);
        self.carry = Duration::from_nanos(rest);
        u32::try_from(total / interval).unwrap_or(u32::MAX)
    }
}
