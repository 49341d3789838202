#[cfg(test)]
#[path = "rate_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

/// Leading-edge rate limiter: the first acquire in a window passes, later
/// ones are dropped (not queued) until the window elapses.
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Throttle {
        return Throttle {
            interval,
            last: None,
        };
    }

    pub fn try_acquire(&mut self) -> bool {
        return self.try_acquire_at(Instant::now());
    }

    fn try_acquire_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }

        self.last = Some(now);
        return true;
    }
}

/// Trailing-edge debounce: the timer resets on every poke and only reports
/// ready after a full quiet period.
pub struct Debounce {
    quiet: Duration,
    last_poke: Option<Instant>,
}

impl Debounce {
    pub fn new(quiet: Duration) -> Debounce {
        return Debounce {
            quiet,
            last_poke: None,
        };
    }

    pub fn poke(&mut self) {
        self.poke_at(Instant::now());
    }

    fn poke_at(&mut self, now: Instant) {
        self.last_poke = Some(now);
    }

    pub fn pending(&self) -> bool {
        return self.last_poke.is_some();
    }

    pub fn clear(&mut self) {
        self.last_poke = None;
    }

    /// Reports and consumes readiness once the quiet period has passed.
    pub fn ready(&mut self) -> bool {
        return self.ready_at(Instant::now());
    }

    fn ready_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_poke {
            if now.duration_since(last) >= self.quiet {
                self.last_poke = None;
                return true;
            }
        }

        return false;
    }
}
