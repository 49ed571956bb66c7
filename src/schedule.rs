use std::time::{Duration, Instant};

/// Furthest a deadline is ever placed from the origin, about 30 years.
pub const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 86_400);

/// Tick deadlines on a fixed grid: `origin + k * period`.
///
/// Deadlines never depend on when the previous tick finished, so slow frames do
/// not accumulate drift. Grid points that already passed are skipped instead of
/// fired in a burst.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    origin: Instant,
    period: Duration,
    next_tick: u32,
}

impl TickSchedule {
    pub fn new(origin: Instant, period: Duration) -> Self {
        Self {
            origin,
            period,
            next_tick: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Grid point `tick`. Points past what `Instant` can represent are pinned
    /// to [`FAR_FUTURE`] after the origin.
    pub fn deadline(&self, tick: u32) -> Instant {
        let offset = self.period.saturating_mul(tick).min(FAR_FUTURE);
        self.origin
            .checked_add(offset)
            .or_else(|| self.origin.checked_add(FAR_FUTURE))
            .unwrap_or(self.origin)
    }

    /// The next grid point not earlier than `now`, or the pending one if it is
    /// still ahead.
    pub fn next_deadline(&mut self, now: Instant) -> Instant {
        if self.deadline(self.next_tick) < now {
            let behind = now.saturating_duration_since(self.origin);
            let elapsed_ticks = behind.as_nanos().div_ceil(self.period.as_nanos().max(1));
            let skipped = u32::try_from(elapsed_ticks).unwrap_or(u32::MAX);
            if skipped > self.next_tick {
                tracing::debug!(missed = skipped - self.next_tick, "skipping missed ticks");
            }
            self.next_tick = self.next_tick.max(skipped);
        }
        let deadline = self.deadline(self.next_tick);
        self.next_tick = self.next_tick.saturating_add(1);
        deadline
    }
}
