//! Month and week grids.
//!
//! A month grid always holds six full weeks starting on a Sunday, padded with
//! days of the neighbouring months. A week grid holds the seven days from the
//! Sunday on or before a given date.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

pub const COLUMNS: usize = 7;
pub const MONTH_ROWS: usize = 6;
pub const MONTH_CELLS: usize = COLUMNS * MONTH_ROWS;

/// A year/month pair anchoring the calendar view.
///
/// Stored as the first day of the month, so every value is a valid month and
/// ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthIndex {
    first: NaiveDate,
}

impl MonthIndex {
    /// `month` is one-based (1 = January).
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| MonthIndex { first })
    }

    /// Builds an index from a zero-based month, carrying overflow into the
    /// year: `(2024, 12)` is January 2025 and `(2025, -1)` is December 2024.
    pub fn from_ym0(year: i32, month0: i32) -> Option<Self> {
        let year = year.checked_add(month0.div_euclid(12))?;
        Self::new(year, month0.rem_euclid(12) as u32 + 1)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn month0(&self) -> u32 {
        self.first.month0()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_of_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(self.year(), self.month(), day).is_some())
            .unwrap_or(28)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        MonthIndex::from(*date) == *self
    }

    pub fn shift(&self, months: i32) -> Option<Self> {
        let month0 = (self.month0() as i32).checked_add(months)?;
        Self::from_ym0(self.year(), month0)
    }

    /// Saturates at the end of the representable calendar.
    pub fn next(&self) -> Self {
        self.shift(1).unwrap_or(*self)
    }

    /// Saturates at the start of the representable calendar.
    pub fn prev(&self) -> Self {
        self.shift(-1).unwrap_or(*self)
    }
}

impl From<NaiveDate> for MonthIndex {
    fn from(date: NaiveDate) -> Self {
        MonthIndex {
            first: date - Duration::days(date.day0() as i64),
        }
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%B %Y"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub date: NaiveDate,
    /// Only used for dimming; every cell stays selectable.
    pub in_current_period: bool,
}

impl Cell {
    fn within(date: NaiveDate, period: MonthIndex) -> Self {
        Cell {
            date,
            in_current_period: period.contains(&date),
        }
    }
}

fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    let back = Duration::days(date.weekday().num_days_from_sunday() as i64);
    date.checked_sub_signed(back).unwrap_or(date)
}

/// The 42 cells of `month`: trailing days of the previous month, every day of
/// `month`, then leading days of the next month.
pub fn build_month_grid(month: MonthIndex) -> Vec<Cell> {
    sunday_on_or_before(month.first_day())
        .iter_days()
        .take(MONTH_CELLS)
        .map(|date| Cell::within(date, month))
        .collect()
}

/// Same as [`build_month_grid`] for a zero-based month, normalizing overflow.
pub fn month_grid(year: i32, month0: i32) -> Option<Vec<Cell>> {
    MonthIndex::from_ym0(year, month0).map(build_month_grid)
}

/// Sunday to Saturday around `selected`. Cells are compared against `cursor`,
/// not against the week's own span, so a straddling week is partly dimmed.
pub fn build_week_grid(selected: NaiveDate, cursor: MonthIndex) -> Vec<Cell> {
    sunday_on_or_before(selected)
        .iter_days()
        .take(COLUMNS)
        .map(|date| Cell::within(date, cursor))
        .collect()
}

pub fn row_of(cells: &[Cell], date: NaiveDate) -> Option<usize> {
    cells
        .iter()
        .position(|cell| cell.date == date)
        .map(|idx| idx / COLUMNS)
}
