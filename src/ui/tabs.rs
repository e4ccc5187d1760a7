use derive_more::Display;
use std::str::FromStr;
use unsegen::base::*;
use unsegen::widget::*;

use super::{at, centered};
use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Tab {
    #[display(fmt = "HOME")]
    Home,
    #[display(fmt = "CALENDAR")]
    Calendar,
    #[display(fmt = "LIBRARY")]
    Library,
    #[display(fmt = "MY PAGE")]
    MyPage,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Calendar, Tab::Library, Tab::MyPage];

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    pub fn from_index(idx: usize) -> Option<Tab> {
        Tab::ALL.get(idx).copied()
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Calendar => "Calendar",
            Tab::Library => "Library",
            Tab::MyPage => "My Page",
        }
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "home" => Ok(Tab::Home),
            "calendar" | "cal" => Ok(Tab::Calendar),
            "library" => Ok(Tab::Library),
            "mypage" | "my" => Ok(Tab::MyPage),
            _ => Err(Error::new(
                ErrorKind::CommandParse,
                &format!("no tab named '{}'", s),
            )),
        }
    }
}

/// Bottom tab bar: one equally wide slot per tab.
pub struct TabBar {
    active: Tab,
    width: u16,
}

impl TabBar {
    pub fn new(active: Tab, width: u16) -> Self {
        TabBar { active, width }
    }

    fn slot_width(width: u16) -> u16 {
        (width / Tab::ALL.len() as u16).max(1)
    }

    /// Tab under the zero-based column `x` of a bar `width` columns wide.
    pub fn hit(width: u16, x: u16) -> Option<Tab> {
        if x >= width {
            return None;
        }
        let idx = (x / Self::slot_width(width)) as usize;
        Tab::from_index(idx.min(Tab::ALL.len() - 1))
    }

    /// Column the label of `tab` starts at.
    fn label_column(&self, tab: Tab) -> u16 {
        let slot = Self::slot_width(self.width);
        tab.index() as u16 * slot + centered(slot, &tab.to_string())
    }
}

impl Widget for TabBar {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1usize),
            height: RowDemand::exact(1usize),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        for tab in Tab::ALL.iter().copied() {
            let style = if tab == self.active {
                StyleModifier::new().bold(true)
            } else {
                StyleModifier::new().fg_color(Color::LightBlack)
            };
            let (x, y) = at(self.label_column(tab), 0);
            Cursor::new(&mut window)
                .position(x, y)
                .style_modifier(style)
                .write(&tab.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_cycling() {
        assert_eq!(Tab::MyPage.to_string(), "MY PAGE");
        assert_eq!(Tab::Home.next(), Tab::Calendar);
        assert_eq!(Tab::MyPage.next(), Tab::Home);
        assert_eq!(Tab::from_index(2), Some(Tab::Library));
        assert_eq!(Tab::from_index(4), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("calendar".parse::<Tab>().unwrap(), Tab::Calendar);
        assert_eq!("My Page".parse::<Tab>().unwrap(), Tab::MyPage);
        assert_eq!("my_page".parse::<Tab>().unwrap(), Tab::MyPage);
        assert!("settings".parse::<Tab>().is_err());
    }

    #[test]
    fn hit_testing() {
        assert_eq!(TabBar::hit(40, 0), Some(Tab::Home));
        assert_eq!(TabBar::hit(40, 10), Some(Tab::Calendar));
        assert_eq!(TabBar::hit(40, 39), Some(Tab::MyPage));
        assert_eq!(TabBar::hit(40, 40), None);
        // leftover columns belong to the last tab
        assert_eq!(TabBar::hit(42, 41), Some(Tab::MyPage));
    }

    #[test]
    fn labels_are_centred_in_their_slot() {
        let bar = TabBar::new(Tab::Home, 40);
        assert_eq!(bar.label_column(Tab::Home), 3);
        assert_eq!(bar.label_column(Tab::Calendar), 11);
        assert_eq!(bar.label_column(Tab::MyPage), 31);
    }
}
