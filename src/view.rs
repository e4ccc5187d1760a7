//! State of the calendar screen.
//!
//! [`ViewController`] owns the selected date, the month cursor and the
//! month/week transition. Every operation touching the transition takes the
//! current `Instant` so the animation can be driven by any frame source.

use chrono::{Duration as DateDuration, NaiveDate};
use derive_more::Display;
use std::convert::TryFrom;
use std::time::{Duration, Instant};

use crate::animation::{clamp_progress, lerp, Animation, MONTH_PROGRESS, WEEK_PROGRESS};
use crate::config::Config;
use crate::gesture::{self, Drag, SwipeDirection};
use crate::grid::{self, Cell, MonthIndex, MONTH_ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ViewMode {
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "week")]
    Week,
}

impl ViewMode {
    pub fn progress(self) -> f32 {
        match self {
            ViewMode::Month => MONTH_PROGRESS,
            ViewMode::Week => WEEK_PROGRESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    /// Height of one grid row, in whatever unit the renderer uses.
    pub cell_height: f32,
    /// Vertical travel a drag must exceed to force a commit.
    pub drag_threshold: f32,
    pub animation_duration: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            cell_height: 2.0,
            drag_threshold: 2.0,
            animation_duration: Duration::from_millis(220),
        }
    }
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        ViewSettings {
            cell_height: config.cell_height as f32,
            drag_threshold: config.drag_threshold,
            animation_duration: config.animation_duration(),
        }
    }
}

/// Geometry of the grid container for the current progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub container_height: f32,
    /// Translation of the month grid; zero or negative.
    pub offset_y: f32,
}

#[derive(Debug, Clone)]
pub struct ViewController {
    settings: ViewSettings,
    selected: NaiveDate,
    cursor: MonthIndex,
    mode: ViewMode,
    progress: f32,
    animation: Option<Animation>,
    drag: Option<Drag>,
}

impl ViewController {
    pub fn new(today: NaiveDate, settings: ViewSettings) -> Self {
        ViewController {
            settings,
            selected: today,
            cursor: MonthIndex::from(today),
            mode: ViewMode::Month,
            progress: MONTH_PROGRESS,
            animation: None,
            drag: None,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn cursor(&self) -> MonthIndex {
        self.cursor
    }

    /// The committed mode. It only flips once an animation has completed.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_weekly(&self) -> bool {
        self.mode == ViewMode::Week
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Mode the view is heading to: the animation target if one is running.
    pub fn target_mode(&self) -> ViewMode {
        match self.animation {
            Some(anim) if anim.target() >= WEEK_PROGRESS => ViewMode::Week,
            Some(_) => ViewMode::Month,
            None => self.mode,
        }
    }

    /// Resets everything to `today` in month mode.
    pub fn focus(&mut self, today: NaiveDate) {
        log::debug!("calendar focused, resetting to {}", today);
        self.selected = today;
        self.cursor = MonthIndex::from(today);
        self.mode = ViewMode::Month;
        self.progress = MONTH_PROGRESS;
        self.animation = None;
        self.drag = None;
    }

    pub fn navigate(&mut self, nav: Navigation) {
        self.navigate_by(nav, 1);
    }

    /// Moves `count` months (or weeks in week mode) at once, saturating at
    /// the ends of the calendar.
    pub fn navigate_by(&mut self, nav: Navigation, count: u32) {
        let sign = match nav {
            Navigation::Prev => -1,
            Navigation::Next => 1,
        };
        let limit = match nav {
            Navigation::Prev => NaiveDate::MIN,
            Navigation::Next => NaiveDate::MAX,
        };

        match self.target_mode() {
            ViewMode::Month => {
                let months = i32::try_from(count).unwrap_or(i32::MAX) * sign;
                self.cursor = self
                    .cursor
                    .shift(months)
                    .unwrap_or_else(|| MonthIndex::from(limit));
                self.selected = self.cursor.first_day();
            }
            ViewMode::Week => {
                let days = i64::from(count) * 7 * i64::from(sign);
                let date = self
                    .selected
                    .checked_add_signed(DateDuration::days(days))
                    .unwrap_or(limit);
                self.select(date);
            }
        }
        log::debug!(
            "navigated {:?} x{}: cursor {}, selected {}",
            nav,
            count,
            self.cursor,
            self.selected
        );
    }

    /// Selects `date`; the cursor follows when the month changes.
    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
        if !self.cursor.contains(&date) {
            self.cursor = MonthIndex::from(date);
        }
    }

    pub fn shift_selection(&mut self, days: i64) {
        if let Some(date) = self
            .selected
            .checked_add_signed(DateDuration::days(days))
        {
            self.select(date);
        }
    }

    pub fn drag_begin(&mut self, y: f32, now: Instant) {
        self.settle(now);
        self.drag = Some(Drag::begin(y, self.progress));
    }

    pub fn drag_move(&mut self, y: f32) {
        let collapse_distance = self.collapse_distance();
        if let Some(drag) = self.drag.as_mut() {
            drag.move_to(y);
            self.progress = drag.progress(collapse_distance);
        }
    }

    pub fn drag_release(&mut self, y: f32, now: Instant) {
        self.drag_move(y);
        self.finish_drag(now);
    }

    /// The gesture ended abnormally; resolve it from the last known position.
    pub fn drag_interrupt(&mut self, now: Instant) {
        self.finish_drag(now);
    }

    fn finish_drag(&mut self, now: Instant) {
        if let Some(drag) = self.drag.take() {
            let target = gesture::resolve(drag.travel(), self.progress, self.settings.drag_threshold);
            log::debug!(
                "drag finished: travel {:.1}, progress {:.2} -> {}",
                drag.travel(),
                self.progress,
                target
            );
            self.transition_to(target, now);
        }
    }

    /// A complete swipe, as if the pointer travelled past the threshold.
    pub fn swipe(&mut self, direction: SwipeDirection, now: Instant) {
        let target = match direction {
            SwipeDirection::Up => ViewMode::Week,
            SwipeDirection::Down => ViewMode::Month,
        };
        self.transition_to(target, now);
    }

    /// Starts animating towards `target`, replacing any running animation
    /// and dropping any drag in progress. The new animation starts at the
    /// current interpolated value.
    pub fn transition_to(&mut self, target: ViewMode, now: Instant) {
        self.settle(now);
        if self.drag.take().is_some() {
            log::debug!("drag superseded by transition to {}", target);
        }

        match target {
            ViewMode::Week => {
                if !self.cursor.contains(&self.selected) {
                    self.selected = self.cursor.first_day();
                }
            }
            ViewMode::Month => {
                self.cursor = MonthIndex::from(self.selected);
            }
        }

        self.animation = Some(Animation::new(
            self.progress,
            target.progress(),
            now,
            self.settings.animation_duration,
        ));
        self.tick(now);
    }

    /// Advances the running animation. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let anim = match self.animation {
            Some(anim) => anim,
            None => return false,
        };

        self.progress = anim.value_at(now);
        if anim.is_finished(now) {
            self.animation = None;
            self.mode = if anim.target() >= WEEK_PROGRESS {
                ViewMode::Week
            } else {
                ViewMode::Month
            };
            log::debug!("transition committed to {} view", self.mode);
        }
        true
    }

    /// Stops any running animation at its current value.
    fn settle(&mut self, now: Instant) {
        if let Some(anim) = self.animation.take() {
            self.progress = anim.value_at(now);
        }
        self.progress = clamp_progress(self.progress);
    }

    fn collapse_distance(&self) -> f32 {
        (MONTH_ROWS - 1) as f32 * self.settings.cell_height
    }

    pub fn month_grid(&self) -> Vec<Cell> {
        grid::build_month_grid(self.cursor)
    }

    pub fn week_grid(&self) -> Vec<Cell> {
        grid::build_week_grid(self.selected, self.cursor)
    }

    /// Row of the selected date within the cursor's month grid.
    pub fn selected_row(&self) -> usize {
        grid::row_of(&self.month_grid(), self.selected).unwrap_or(0)
    }

    /// Whether the view rests in week mode with nothing in flight.
    pub fn is_settled_weekly(&self) -> bool {
        self.is_weekly()
            && self.animation.is_none()
            && self.drag.is_none()
            && self.progress >= WEEK_PROGRESS
    }

    /// Week cells once settled in week mode, the month grid otherwise
    /// (including every frame of a transition).
    pub fn visible_cells(&self) -> Vec<Cell> {
        if self.is_settled_weekly() {
            self.week_grid()
        } else {
            self.month_grid()
        }
    }

    pub fn layout(&self) -> Layout {
        let cell_height = self.settings.cell_height;
        let month_height = MONTH_ROWS as f32 * cell_height;
        let row_offset = -(self.selected_row() as f32 * cell_height);

        Layout {
            container_height: lerp(month_height, cell_height, self.progress),
            offset_y: lerp(0.0, row_offset, self.progress),
        }
    }
}
