//! Time-driven animations.
//!
//! Animations do not schedule themselves. The application ticks them with
//! the current time from a [`Clock`], which lets tests substitute a
//! [`VirtualClock`] for wall time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time since creation.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Progress of a running animation at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Between 0 and 1.
    pub progress: f64,
    /// True on the last frame, when progress has reached 1.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Started, waiting for the first tick to fix the start time.
    Pending,
    Running { started_at: Duration },
}

/// A fixed-duration animation driven by [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    duration: Duration,
    phase: Phase,
}

impl AnimationDriver {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            phase: Phase::Idle,
        }
    }

    /// Starts (or restarts) the animation. Progress is measured from the
    /// next tick.
    pub fn start(&mut self) {
        self.phase = Phase::Pending;
    }

    /// Stops without a final frame. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Advances to `now`. Returns `None` when idle. The finished frame is
    /// returned once, after which the driver is idle again.
    pub fn tick(&mut self, now: Duration) -> Option<Frame> {
        let started_at = match self.phase {
            Phase::Idle => return None,
            Phase::Pending => {
                self.phase = Phase::Running { started_at: now };
                now
            }
            Phase::Running { started_at } => started_at,
        };

        let elapsed = now.saturating_sub(started_at);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let finished = progress >= 1.0;
        if finished {
            self.phase = Phase::Idle;
        }
        Some(Frame { progress, finished })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_driver_yields_nothing() {
        let mut driver = AnimationDriver::new(Duration::from_secs(4));
        assert_eq!(driver.tick(Duration::from_secs(1)), None);
        driver.cancel();
        assert!(!driver.is_running());
    }

    #[test]
    fn test_progress_from_first_tick() {
        let clock = VirtualClock::new();
        clock.set(Duration::from_secs(10));
        let mut driver = AnimationDriver::new(Duration::from_secs(4));
        driver.start();

        let first = driver.tick(clock.now()).unwrap();
        assert_eq!(first.progress, 0.0);
        clock.advance(Duration::from_secs(1));
        assert!((driver.tick(clock.now()).unwrap().progress - 0.25).abs() < 1e-9);
        clock.advance(Duration::from_secs(5));
        let last = driver.tick(clock.now()).unwrap();
        assert_eq!(last.progress, 1.0);
        assert!(last.finished);
        assert!(!driver.is_running());
        assert_eq!(driver.tick(clock.now()), None);
    }

    #[test]
    fn test_cancel_stops_frames() {
        let mut driver = AnimationDriver::new(Duration::from_secs(4));
        driver.start();
        driver.tick(Duration::ZERO);
        driver.cancel();
        assert_eq!(driver.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(other.now(), Duration::from_millis(250));
    }
}
