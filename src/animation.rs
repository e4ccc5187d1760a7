//! Time-driven interpolation of the month/week transition progress.
//!
//! Progress is a value in `[0.0, 1.0]` (0 = month view, 1 = week view). An
//! animation moves it linearly from wherever it currently is to an endpoint
//! within a fixed duration. Time is always passed in, never read here.

use std::time::{Duration, Instant};

pub const MONTH_PROGRESS: f32 = 0.0;
pub const WEEK_PROGRESS: f32 = 1.0;

pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        MONTH_PROGRESS
    } else {
        progress.clamp(MONTH_PROGRESS, WEEK_PROGRESS)
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Animation {
    pub fn new(from: f32, to: f32, started: Instant, duration: Duration) -> Self {
        Animation {
            from: clamp_progress(from),
            to: clamp_progress(to),
            started,
            duration,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Fraction of the duration elapsed at `now`, in `[0.0, 1.0]`.
    fn elapsed_fraction(&self, now: Instant) -> f32 {
        if self.duration.as_nanos() == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        if self.is_finished(now) {
            return self.to;
        }
        clamp_progress(lerp(self.from, self.to, self.elapsed_fraction(now)))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.elapsed_fraction(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(220);

    #[test]
    fn interpolates_linearly() {
        let start = Instant::now();
        let anim = Animation::new(0.0, 1.0, start, DURATION);

        assert_eq!(anim.value_at(start), 0.0);
        let half = anim.value_at(start + Duration::from_millis(110));
        assert!((half - 0.5).abs() < 1e-3, "{}", half);
        assert_eq!(anim.value_at(start + DURATION), 1.0);
        assert!(anim.is_finished(start + DURATION));
    }

    #[test]
    fn never_overshoots() {
        let start = Instant::now();
        let anim = Animation::new(0.8, 0.0, start, DURATION);

        assert_eq!(anim.value_at(start + Duration::from_secs(5)), 0.0);

        let mut last = anim.value_at(start);
        for ms in (0..=300).step_by(10) {
            let value = anim.value_at(start + Duration::from_millis(ms));
            assert!(value <= last);
            assert!((0.0..=1.0).contains(&value));
            last = value;
        }
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let start = Instant::now();
        let anim = Animation::new(0.3, 1.0, start, Duration::from_millis(0));

        assert!(anim.is_finished(start));
        assert_eq!(anim.value_at(start), 1.0);
    }

    #[test]
    fn endpoints_are_clamped() {
        let start = Instant::now();
        let anim = Animation::new(-3.0, 7.0, start, DURATION);

        assert_eq!(anim.value_at(start), 0.0);
        assert_eq!(anim.target(), 1.0);
        assert_eq!(clamp_progress(f32::NAN), 0.0);
    }
}
