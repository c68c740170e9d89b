use std::time::{Duration, Instant};

/// Nominal frame interval for a target rate, or `None` when the rate is not
/// positive or its interval is zero or too long for a `Duration`.
pub fn frame_interval(fps: f32) -> Option<Duration> {
    if !fps.is_finite() || fps <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / f64::from(fps))
        .ok()
        .filter(|interval| !interval.is_zero())
}

/// Converts frame timestamps into elapsed time measured in nominal frames.
///
/// A frame that arrives exactly one interval after the previous one yields
/// `1.0`; a frame that took twice as long yields `2.0`.
#[derive(Debug, Clone)]
pub struct DeltaTimer {
    interval: Duration,
    last: Duration,
}

impl DeltaTimer {
    pub fn new(interval: Duration, start: Duration) -> Self {
        Self {
            interval,
            last: start,
        }
    }

    /// Elapsed frames since the previous tick. Timestamps that go backwards
    /// count as zero.
    pub fn tick(&mut self, now: Duration) -> f32 {
        let dt = now.saturating_sub(self.last);
        self.last = self.last.max(now);
        if self.interval.is_zero() {
            return 0.0;
        }
        (dt.as_secs_f64() / self.interval.as_secs_f64()) as f32
    }
}

/// Timer fallback for hosts without a refresh callback: sleeps to the next
/// frame boundary.
#[derive(Debug)]
pub struct FixedRateClock {
    start: Instant,
    interval: Duration,
    next: Duration,
}

impl FixedRateClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            start: Instant::now(),
            interval,
            next: interval,
        }
    }

    pub fn now(&self) -> Duration {
        self.start.elapsed()
    }

    /// Block until the next boundary and return the wake-up time. A caller that
    /// fell behind skips missed boundaries instead of bursting through them.
    pub fn wait_next(&mut self) -> Duration {
        let now = self.now();
        if now < self.next {
            std::thread::sleep(self.next - now);
        }
        let woke = self.now();
        if self.interval.is_zero() {
            return woke;
        }
        while self.next <= woke {
            self.next += self.interval;
        }
        woke
    }
}
