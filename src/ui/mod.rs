pub mod app;
pub mod calendar;
pub mod command;
pub mod placeholder;
pub mod tabs;

pub use app::App;
pub use calendar::CalendarScreen;
pub use placeholder::Placeholder;
pub use tabs::{Tab, TabBar};

use chrono::NaiveDate;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;
use unsegen::base::*;
use unsegen::input::Input;
use unsegen::widget::*;

/// One tab's content.
pub trait Screen {
    /// Size of the area the screen is drawn into. Mouse positions handed to
    /// the screen are relative to the same origin.
    fn resize(&mut self, _width: u16, _height: u16) {}

    fn draw(&self, window: Window, hints: RenderingHints);

    /// Called whenever the screen's tab becomes active.
    fn on_focus(&mut self, _today: NaiveDate) {}

    /// Called when the screen's tab is left.
    fn on_blur(&mut self, _now: Instant) {}

    /// Returns the input unless the screen consumed it.
    fn input(&mut self, input: Input, _now: Instant) -> Option<Input> {
        Some(input)
    }

    /// Returns whether a redraw is needed.
    fn tick(&mut self, _now: Instant) -> bool {
        false
    }
}

/// Lets a [`Screen`] take all the space a layout leaves over.
pub struct ScreenWidget<'a>(pub &'a dyn Screen);

impl Widget for ScreenWidget<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1usize),
            height: RowDemand::at_least(1usize),
        }
    }

    fn draw(&self, window: Window, hints: RenderingHints) {
        self.0.draw(window, hints)
    }
}

/// Column at which `text` starts when centred in `width` columns.
pub(crate) fn centered(width: u16, text: &str) -> u16 {
    let text_width = text.width().min(u16::MAX as usize) as u16;
    width.saturating_sub(text_width) / 2
}

pub(crate) fn at(x: u16, y: u16) -> (ColIndex, RowIndex) {
    (ColIndex::new(x as i32), RowIndex::new(y as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centering_uses_display_width() {
        assert_eq!(centered(10, "Sun"), 3);
        assert_eq!(centered(10, "일요일"), 2);
        // combining acute accent takes no column
        assert_eq!(centered(11, "e\u{301}"), 5);
        assert_eq!(centered(10, "\u{1F4C5}"), 4);
        assert_eq!(centered(10, "\u{20000}"), 4);
        assert_eq!(centered(2, "No schedule"), 0);
    }
}
