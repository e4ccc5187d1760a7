use chrono::{Local, NaiveDate};
use std::time::Instant;
use termion::event::MouseEvent;
use unsegen::base::*;
use unsegen::input::{EditBehavior, Event as InputEvent, Input, Key, ScrollBehavior};
use unsegen::widget::builtin::PromptLine;
use unsegen::widget::*;

use super::command::{parse_command, Command};
use super::tabs::{Tab, TabBar};
use super::{CalendarScreen, Placeholder, Screen, ScreenWidget};
use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::view::Navigation;

/// Rows below the active screen: status line and tab bar.
const FOOTER_ROWS: u16 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
}

struct StatusLine<'a>(Option<&'a str>);

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1usize),
            height: RowDemand::exact(1usize),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        if let Some(msg) = self.0 {
            Cursor::new(&mut window)
                .style_modifier(StyleModifier::new().invert(true))
                .write(msg);
        }
    }
}

pub struct App {
    mode: Mode,
    active: Tab,
    home: Placeholder,
    calendar: CalendarScreen,
    library: Placeholder,
    my_page: Placeholder,
    command_line: PromptLine,
    last_error_message: Option<String>,
    fixed_today: Option<NaiveDate>,
    size: (u16, u16),
    quit: bool,
}

impl App {
    pub fn new(config: &Config, start: Tab, fixed_today: Option<NaiveDate>) -> App {
        let today = fixed_today.unwrap_or_else(|| Local::now().date_naive());
        let mut app = App {
            mode: Mode::Normal,
            active: Tab::Home,
            home: Placeholder::new(Tab::Home.title()),
            calendar: CalendarScreen::new(config, today),
            library: Placeholder::new(Tab::Library.title()),
            my_page: Placeholder::new(Tab::MyPage.title()),
            command_line: PromptLine::with_prompt(":".to_owned()),
            last_error_message: None,
            fixed_today,
            size: (0, 0),
            quit: false,
        };
        app.resize(80, 24);
        app.switch_tab(start, Instant::now());
        app
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn calendar(&self) -> &CalendarScreen {
        &self.calendar
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn screen(&self, tab: Tab) -> &dyn Screen {
        match tab {
            Tab::Home => &self.home,
            Tab::Calendar => &self.calendar,
            Tab::Library => &self.library,
            Tab::MyPage => &self.my_page,
        }
    }

    fn screen_mut(&mut self, tab: Tab) -> &mut dyn Screen {
        match tab {
            Tab::Home => &mut self.home,
            Tab::Calendar => &mut self.calendar,
            Tab::Library => &mut self.library,
            Tab::MyPage => &mut self.my_page,
        }
    }

    /// Activates `tab`. The tab being left is blurred first, and the new one
    /// is refocused even if it already was active.
    pub fn switch_tab(&mut self, tab: Tab, now: Instant) {
        log::debug!("switching to tab {}", tab);
        let previous = self.active;
        self.screen_mut(previous).on_blur(now);
        self.active = tab;
        let today = self.today();
        self.screen_mut(tab).on_focus(today);
    }

    fn show_calendar(&mut self, now: Instant) {
        if self.active != Tab::Calendar {
            self.switch_tab(Tab::Calendar, now);
        }
    }

    pub fn run_command(&mut self, line: &str, now: Instant) {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                log::info!("rejected command '{}': {}", line, e);
                self.last_error_message = Some(e.to_string());
                return;
            }
        };

        match command {
            Command::Today => self.switch_tab(Tab::Calendar, now),
            Command::Tab(tab) => self.switch_tab(tab, now),
            Command::Goto(date) => {
                self.show_calendar(now);
                self.calendar.view_mut().select(date);
            }
            Command::Mode(mode) => {
                self.show_calendar(now);
                self.calendar.view_mut().transition_to(mode, now);
            }
            Command::Next(n) => {
                self.show_calendar(now);
                self.calendar.view_mut().navigate_by(Navigation::Next, n);
            }
            Command::Prev(n) => {
                self.show_calendar(now);
                self.calendar.view_mut().navigate_by(Navigation::Prev, n);
            }
        }
        self.last_error_message = None;
    }

    fn command_input(&mut self, input: Input, now: Instant) {
        let leave = input.matches(Key::Esc)
            || (input.matches(Key::Backspace) && self.command_line.active_line().is_empty());
        if leave {
            self.command_line.finish_line();
            self.mode = Mode::Normal;
            return;
        }

        if input.matches(Key::Char('\n')) {
            let line = self.command_line.finish_line().to_owned();
            self.mode = Mode::Normal;
            self.run_command(&line, now);
            return;
        }

        input
            .chain(
                EditBehavior::new(&mut self.command_line)
                    .delete_forwards_on(Key::Delete)
                    .delete_backwards_on(Key::Backspace)
                    .left_on(Key::Left)
                    .right_on(Key::Right),
            )
            .chain(
                ScrollBehavior::new(&mut self.command_line)
                    .backwards_on(Key::Up)
                    .forwards_on(Key::Down),
            )
            .finish();
    }

    fn normal_input(&mut self, input: Input, now: Instant) {
        let active = self.active;
        let mut target = None;
        let mut quit = false;
        let mut command = false;

        let leftover = input
            .chain((Key::Char('q'), || quit = true))
            .chain((Key::Char(':'), || command = true))
            .chain((Key::Char('\t'), || target = Some(active.next())))
            .chain((Key::Char('1'), || target = Some(Tab::Home)))
            .chain((Key::Char('2'), || target = Some(Tab::Calendar)))
            .chain((Key::Char('3'), || target = Some(Tab::Library)))
            .chain((Key::Char('4'), || target = Some(Tab::MyPage)))
            .chain((Key::Char('t'), || target = Some(Tab::Calendar)))
            .finish();

        if quit {
            log::info!("quitting");
            self.quit = true;
        }
        if command {
            self.last_error_message = None;
            self.mode = Mode::Command;
        }
        if let Some(tab) = target {
            self.switch_tab(tab, now);
        }
        if let Some(input) = leftover {
            self.screen_mut(active).input(input, now);
        }
    }

    pub fn input(&mut self, input: Input, now: Instant) {
        let (width, height) = self.size;
        if let InputEvent::Mouse(MouseEvent::Press(_, x, y)) = &input.event {
            // termion reports one-based positions; the tab bar is the last row
            if *y == height {
                if let Some(tab) = TabBar::hit(width, x.saturating_sub(1)) {
                    self.switch_tab(tab, now);
                }
                return;
            }
        }

        if let InputEvent::Mouse(_) = &input.event {
            let active = self.active;
            self.screen_mut(active).input(input, now);
            return;
        }

        match self.mode {
            Mode::Normal => self.normal_input(input, now),
            Mode::Command => self.command_input(input, now),
        }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let today = self.today();
        self.calendar.set_today(today);
        let active = self.active;
        self.screen_mut(active).tick(now)
    }

    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if (width, height) == self.size {
            return false;
        }
        self.size = (width, height);
        let body_height = height.saturating_sub(FOOTER_ROWS);
        for tab in Tab::ALL.iter().copied() {
            self.screen_mut(tab).resize(width, body_height);
        }
        true
    }

    pub fn draw(&self, window: Window) {
        let mut layout = VLayout::new().widget(ScreenWidget(self.screen(self.active)));
        layout = if self.mode == Mode::Command {
            layout.widget(self.command_line.as_widget())
        } else {
            layout.widget(StatusLine(self.last_error_message.as_deref()))
        };
        layout
            .widget(TabBar::new(self.active, self.size.0))
            .draw(window, RenderingHints::new());
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut dirty = true;

        while !self.quit {
            if let Ok((width, height)) = termion::terminal_size() {
                dirty |= self.resize(width, height);
            }

            if dirty {
                let root = term.create_root_window();
                self.draw(root);
                term.present();
                dirty = false;
            }

            let now = Instant::now();
            match dispatcher.next()? {
                Event::Tick => dirty |= self.tick(now),
                Event::Input(input) => {
                    self.input(input, now);
                    dirty = true;
                }
            }
        }

        Ok(())
    }
}
