use unsegen::base::*;
use unsegen::widget::*;

use super::{at, centered, Screen};

/// A screen that only shows its title.
pub struct Placeholder {
    title: &'static str,
    size: (u16, u16),
}

impl Placeholder {
    pub fn new(title: &'static str) -> Self {
        Placeholder {
            title,
            size: (0, 0),
        }
    }
}

impl Screen for Placeholder {
    fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let (width, height) = self.size;
        let (x, y) = at(centered(width, self.title), height / 2);
        Cursor::new(&mut window)
            .position(x, y)
            .style_modifier(StyleModifier::new().bold(true))
            .write(self.title);
    }
}
