use crate::animation::{clamp_progress, WEEK_PROGRESS};
use crate::view::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
}

/// An active vertical drag. Positions grow downwards, so upward travel is
/// negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    origin_y: f32,
    last_y: f32,
    origin_progress: f32,
}

impl Drag {
    pub fn begin(y: f32, progress: f32) -> Self {
        Drag {
            origin_y: y,
            last_y: y,
            origin_progress: clamp_progress(progress),
        }
    }

    pub fn move_to(&mut self, y: f32) {
        self.last_y = y;
    }

    pub fn travel(&self) -> f32 {
        self.last_y - self.origin_y
    }

    /// Progress while the grid follows the pointer. Dragging up by
    /// `collapse_distance` goes from month to week.
    pub fn progress(&self, collapse_distance: f32) -> f32 {
        if collapse_distance <= 0.0 {
            return self.origin_progress;
        }
        clamp_progress(self.origin_progress - self.travel() / collapse_distance)
    }
}

/// Decides where a finished (or interrupted) drag settles.
///
/// Travel beyond `threshold` wins; otherwise the nearer endpoint does, with
/// exactly one half going back to month.
pub fn resolve(travel: f32, progress: f32, threshold: f32) -> ViewMode {
    if -travel > threshold {
        ViewMode::Week
    } else if travel > threshold {
        ViewMode::Month
    } else if progress > WEEK_PROGRESS / 2.0 {
        ViewMode::Week
    } else {
        ViewMode::Month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upward_travel_beyond_threshold_goes_weekly() {
        assert_eq!(resolve(-5.0, 0.1, 2.0), ViewMode::Week);
        assert_eq!(resolve(5.0, 0.9, 2.0), ViewMode::Month);
    }

    #[test]
    fn short_travel_snaps_to_nearest() {
        assert_eq!(resolve(-1.0, 0.6, 2.0), ViewMode::Week);
        assert_eq!(resolve(1.0, 0.4, 2.0), ViewMode::Month);
        assert_eq!(resolve(0.0, 0.5, 2.0), ViewMode::Month);
        // Exactly on the threshold does not count as exceeding it.
        assert_eq!(resolve(-2.0, 0.2, 2.0), ViewMode::Month);
    }

    #[test]
    fn drag_follows_pointer() {
        let mut drag = Drag::begin(10.0, 0.0);
        drag.move_to(5.0);
        assert_eq!(drag.travel(), -5.0);
        assert!((drag.progress(10.0) - 0.5).abs() < 1e-6);

        drag.move_to(-40.0);
        assert_eq!(drag.progress(10.0), 1.0);

        drag.move_to(30.0);
        assert_eq!(drag.progress(10.0), 0.0);
    }

    #[test]
    fn drag_from_week_goes_back_down() {
        let mut drag = Drag::begin(0.0, 1.0);
        drag.move_to(2.5);
        assert!((drag.progress(10.0) - 0.75).abs() < 1e-6);
        assert_eq!(drag.progress(0.0), 1.0);
    }
}
