use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;
use unsegen::base::*;
use unsegen::input::{Event, Input, Key, Navigatable, NavigateBehavior, OperationResult};
use unsegen::widget::*;

use termion::event::{MouseButton, MouseEvent};

use super::{at, centered, Screen};
use crate::config::Config;
use crate::gesture::SwipeDirection;
use crate::grid::{Cell, COLUMNS, MONTH_ROWS};
use crate::view::{Navigation, ViewController, ViewMode, ViewSettings};

const CELL_WIDTH: u16 = 5;
const GRID_WIDTH: u16 = CELL_WIDTH * COLUMNS as u16;
const HEADER_ROWS: u16 = 2;

/// Where the grid sits inside the screen, used for drawing and to map pointer
/// positions to cells. Coordinates are zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridGeometry {
    x: u16,
    y: u16,
    /// Visible lines of the grid container.
    height: u16,
    cell_height: u16,
    rows: usize,
    offset_lines: i32,
}

impl GridGeometry {
    fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + GRID_WIDTH && y >= self.y && y < self.y + self.height
    }

    /// Row and sub-line of the grid shown on container line `line`.
    fn line_source(&self, line: u16) -> Option<(usize, u16)> {
        let source = line as i32 - self.offset_lines;
        if source < 0 {
            return None;
        }
        let row = source as usize / self.cell_height as usize;
        let sub = (source as usize % self.cell_height as usize) as u16;
        if row < self.rows {
            Some((row, sub))
        } else {
            None
        }
    }

    /// Index into the visible cells under `(x, y)`.
    fn hit(&self, x: u16, y: u16) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let col = ((x - self.x) / CELL_WIDTH) as usize;
        let (row, _) = self.line_source(y - self.y)?;
        Some(row * COLUMNS + col)
    }
}

fn label_cell(label: &str) -> String {
    let pad = 3usize.saturating_sub(label.width());
    format!("{}{}  ", " ".repeat(pad), label)
}

fn weekday_style(col: usize) -> StyleModifier {
    match col {
        0 => StyleModifier::new().fg_color(Color::Red),
        6 => StyleModifier::new().fg_color(Color::Blue),
        _ => StyleModifier::new(),
    }
}

fn toggle(view: &mut ViewController, now: Instant) {
    let target = match view.target_mode() {
        ViewMode::Month => ViewMode::Week,
        ViewMode::Week => ViewMode::Month,
    };
    view.transition_to(target, now);
}

/// Arrow keys move the selection by a day or a week.
struct SelectionBehaviour<'a>(&'a mut ViewController);

impl Navigatable for SelectionBehaviour<'_> {
    fn move_up(&mut self) -> OperationResult {
        self.0.shift_selection(-7);
        Ok(())
    }

    fn move_down(&mut self) -> OperationResult {
        self.0.shift_selection(7);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.shift_selection(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.shift_selection(1);
        Ok(())
    }
}

pub struct CalendarScreen {
    view: ViewController,
    weekday_labels: [String; 7],
    footer: String,
    today: NaiveDate,
    size: (u16, u16),
    /// Zero-based position the left button went down at.
    pointer: Option<(u16, u16)>,
}

impl CalendarScreen {
    pub fn new(config: &Config, today: NaiveDate) -> Self {
        CalendarScreen {
            view: ViewController::new(today, ViewSettings::from(config)),
            weekday_labels: config.weekday_labels.clone(),
            footer: config.footer.clone(),
            today,
            size: (0, 0),
            pointer: None,
        }
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController {
        &mut self.view
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    fn geometry(&self) -> Option<GridGeometry> {
        let (width, height) = self.size;
        if height <= HEADER_ROWS || width < GRID_WIDTH {
            return None;
        }

        let layout = self.view.layout();
        let cell_height = (self.view.settings().cell_height as u16).max(1);
        let (rows, offset_lines) = if self.view.is_settled_weekly() {
            (1, 0)
        } else {
            (MONTH_ROWS, layout.offset_y.round() as i32)
        };

        Some(GridGeometry {
            x: (width - GRID_WIDTH) / 2,
            y: HEADER_ROWS,
            height: (layout.container_height.round() as u16).min(height - HEADER_ROWS),
            cell_height,
            rows,
            offset_lines,
        })
    }

    fn day_style(&self, cell: &Cell, col: usize) -> StyleModifier {
        let style = weekday_style(col);
        if cell.in_current_period {
            style
        } else {
            style.fg_color(Color::LightBlack)
        }
    }

    fn draw_day(&self, window: &mut Window, cell: &Cell, col: usize, x: u16, y: u16, sub: u16) {
        let (x, y) = at(x, y);
        let mut cursor = Cursor::new(window).position(x, y);
        let is_today = cell.date == self.today;

        if sub > 0 {
            if sub == 1 && is_today {
                cursor.write("  •");
            }
            return;
        }

        let single_line = self.view.settings().cell_height < 2.0;
        let today_mark = if is_today && single_line { "*" } else { " " };
        let style = self.day_style(cell, col);

        cursor.write(" ");
        cursor.set_style_modifier(if cell.date == self.view.selected() {
            style.invert(true)
        } else {
            style
        });
        cursor.write(&format!("{:>2}{}", cell.date.day(), today_mark));
    }

    fn draw_grid(&self, window: &mut Window, geometry: &GridGeometry) {
        let cells = self.view.visible_cells();

        for line in 0..geometry.height {
            if let Some((row, sub)) = geometry.line_source(line) {
                let week = cells.iter().skip(row * COLUMNS).take(COLUMNS);
                for (col, cell) in week.enumerate() {
                    let x = geometry.x + col as u16 * CELL_WIDTH;
                    self.draw_day(window, cell, col, x, geometry.y + line, sub);
                }
            }
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, now: Instant) -> bool {
        match event {
            MouseEvent::Press(MouseButton::Left, x, y) => {
                let (x, y) = (x.saturating_sub(1), y.saturating_sub(1));
                let on_grid = self
                    .geometry()
                    .map(|g| g.contains(x, y))
                    .unwrap_or(false);
                if !on_grid {
                    return false;
                }
                self.pointer = Some((x, y));
                self.view.drag_begin(y as f32, now);
                true
            }
            MouseEvent::Hold(_, y) => {
                if self.pointer.is_none() {
                    return false;
                }
                self.view.drag_move(y.saturating_sub(1) as f32);
                true
            }
            MouseEvent::Release(x, y) => {
                let (x, y) = (x.saturating_sub(1), y.saturating_sub(1));
                let origin = match self.pointer.take() {
                    Some(origin) => origin,
                    None => return false,
                };
                if !self.view.is_dragging() {
                    // a transition took over in the meantime
                    return true;
                }
                let tapped = if origin == (x, y) {
                    self.geometry()
                        .and_then(|g| g.hit(x, y))
                        .and_then(|idx| self.view.visible_cells().get(idx).copied())
                } else {
                    None
                };

                self.view.drag_release(y as f32, now);
                if let Some(cell) = tapped {
                    self.view.select(cell.date);
                }
                true
            }
            _ => false,
        }
    }
}

impl Screen for CalendarScreen {
    fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let geometry = match self.geometry() {
            Some(geometry) => geometry,
            None => {
                Cursor::new(&mut window).write("terminal too small");
                return;
            }
        };
        let x = geometry.x;

        let title = self.view.cursor().to_string();
        let (arrow_x, title_y) = at(x + 1, 0);
        Cursor::new(&mut window).position(arrow_x, title_y).write("‹");
        let (title_x, title_y) = at(x + centered(GRID_WIDTH, &title), 0);
        Cursor::new(&mut window)
            .position(title_x, title_y)
            .style_modifier(StyleModifier::new().bold(true))
            .write(&title);
        let (arrow_x, title_y) = at(x + GRID_WIDTH - 2, 0);
        Cursor::new(&mut window).position(arrow_x, title_y).write("›");

        for (col, label) in self.weekday_labels.iter().enumerate() {
            let (label_x, label_y) = at(x + col as u16 * CELL_WIDTH, 1);
            Cursor::new(&mut window)
                .position(label_x, label_y)
                .style_modifier(weekday_style(col))
                .write(&label_cell(label));
        }

        self.draw_grid(&mut window, &geometry);

        let footer_y = geometry.y + geometry.height + 1;
        if footer_y < self.size.1 {
            let (footer_x, footer_y) = at(x + centered(GRID_WIDTH, &self.footer), footer_y);
            Cursor::new(&mut window)
                .position(footer_x, footer_y)
                .style_modifier(StyleModifier::new().fg_color(Color::LightBlack))
                .write(&self.footer);
        }
    }

    fn on_focus(&mut self, today: NaiveDate) {
        self.today = today;
        self.pointer = None;
        self.view.focus(today);
    }

    fn on_blur(&mut self, now: Instant) {
        if self.pointer.take().is_some() {
            self.view.drag_interrupt(now);
        }
    }

    fn input(&mut self, input: Input, now: Instant) -> Option<Input> {
        if let Event::Mouse(event) = &input.event {
            return if self.handle_mouse(*event, now) {
                None
            } else {
                Some(input)
            };
        }

        // Any other input ends a gesture the terminal never finished.
        self.on_blur(now);

        let view = &mut self.view;
        let leftover = input
            .chain((Key::Char('h'), || view.navigate(Navigation::Prev)))
            .chain((Key::Char('p'), || view.navigate(Navigation::Prev)))
            .chain((Key::Char('l'), || view.navigate(Navigation::Next)))
            .chain((Key::Char('n'), || view.navigate(Navigation::Next)))
            .chain((Key::Char('K'), || view.swipe(SwipeDirection::Up, now)))
            .chain((Key::Char('J'), || view.swipe(SwipeDirection::Down, now)))
            .chain((Key::Char(' '), || toggle(view, now)))
            .chain((Key::Char('\n'), || toggle(view, now)))
            .chain(
                NavigateBehavior::new(&mut SelectionBehaviour(view))
                    .up_on(Key::Up)
                    .down_on(Key::Down)
                    .left_on(Key::Left)
                    .right_on(Key::Right),
            )
            .finish();
        leftover
    }

    fn tick(&mut self, now: Instant) -> bool {
        self.view.tick(now)
    }
}

/// Plain-text rendition of the cursor's month, without escape sequences.
/// Days outside the month stay blank and the selection is marked with `>`.
pub fn render_month(view: &ViewController, weekday_labels: &[String; 7]) -> String {
    let title = view.cursor().to_string();
    let pad = centered(GRID_WIDTH, &title) as usize;

    let mut lines = vec![
        format!("{}{}", " ".repeat(pad), title),
        weekday_labels.iter().map(|l| label_cell(l)).join(""),
    ];

    lines.extend(view.month_grid().chunks(COLUMNS).map(|week| {
        week.iter()
            .map(|cell| {
                if !cell.in_current_period {
                    "     ".to_owned()
                } else if cell.date == view.selected() {
                    format!(">{:>2}  ", cell.date.day())
                } else {
                    format!(" {:>2}  ", cell.date.day())
                }
            })
            .join("")
            .trim_end()
            .to_owned()
    }));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn geometry(offset_lines: i32, height: u16) -> GridGeometry {
        GridGeometry {
            x: 10,
            y: 5,
            height,
            cell_height: 2,
            rows: 6,
            offset_lines,
        }
    }

    fn screen() -> CalendarScreen {
        let mut screen = CalendarScreen::new(&Config::default(), ymd(2025, 6, 15));
        screen.resize(40, 20);
        screen
    }

    fn input(event: Event) -> Input {
        Input {
            event,
            raw: Vec::new(),
        }
    }

    /// Feeds a mouse event at the zero-based screen position `(x, y)`.
    fn mouse(screen: &mut CalendarScreen, event: MouseEvent, now: Instant) -> bool {
        let event = match event {
            MouseEvent::Press(b, x, y) => MouseEvent::Press(b, x + 1, y + 1),
            MouseEvent::Hold(x, y) => MouseEvent::Hold(x + 1, y + 1),
            MouseEvent::Release(x, y) => MouseEvent::Release(x + 1, y + 1),
        };
        screen.input(input(Event::Mouse(event)), now).is_none()
    }

    #[test]
    fn lines_map_to_rows() {
        let g = geometry(0, 12);
        assert_eq!(g.line_source(0), Some((0, 0)));
        assert_eq!(g.line_source(1), Some((0, 1)));
        assert_eq!(g.line_source(5), Some((2, 1)));
        assert_eq!(g.line_source(12), None);
    }

    #[test]
    fn offset_shifts_rows_up() {
        // Selected row 2 pulled to the top.
        let g = geometry(-4, 2);
        assert_eq!(g.line_source(0), Some((2, 0)));
        assert_eq!(g.line_source(1), Some((2, 1)));
    }

    #[test]
    fn hit_testing() {
        let g = geometry(0, 12);
        assert_eq!(g.hit(10, 5), Some(0));
        assert_eq!(g.hit(10 + CELL_WIDTH * 6, 5), Some(6));
        assert_eq!(g.hit(10 + CELL_WIDTH, 5 + 3), Some(8));
        assert_eq!(g.hit(9, 5), None);
        assert_eq!(g.hit(10 + GRID_WIDTH, 5), None);
        assert_eq!(g.hit(10, 17), None);

        let collapsed = geometry(-4, 2);
        assert_eq!(collapsed.hit(10, 5), Some(14));
    }

    #[test]
    fn weekday_labels_are_padded_by_display_width() {
        assert_eq!(label_cell("Sun"), "Sun  ");
        assert_eq!(label_cell("일"), " 일  ");
        assert_eq!(label_cell("\u{1F4C5}"), " \u{1F4C5}  ");
        assert_eq!(label_cell("e\u{301}"), "  e\u{301}  ");
    }

    #[test]
    fn geometry_follows_the_transition() {
        let mut screen = screen();
        let month = screen.geometry().unwrap();
        assert_eq!((month.x, month.y), (2, HEADER_ROWS));
        assert_eq!(month.height, 12);
        assert_eq!(month.rows, 6);

        let now = Instant::now();
        screen.view_mut().swipe(SwipeDirection::Up, now);
        screen.tick(now + std::time::Duration::from_millis(220));
        let week = screen.geometry().unwrap();
        assert_eq!(week.height, 2);
        assert_eq!((week.rows, week.offset_lines), (1, 0));

        screen.resize(20, 20);
        assert!(screen.geometry().is_none());
    }

    #[test]
    fn plain_month() {
        let config = Config::default();
        let view = ViewController::new(ymd(2025, 6, 15), ViewSettings::from(&config));
        let text = render_month(&view, &config.weekday_labels);
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("June 2025"));
        assert!(lines[1].starts_with("Sun  Mon"));
        assert!(lines[2].starts_with("  1    2"));
        assert!(lines[4].starts_with(">15"));
        assert_eq!(lines[7], "");
    }

    #[test]
    fn tap_selects_cell() {
        let mut screen = screen();
        let g = screen.geometry().unwrap();
        let now = Instant::now();

        // Row 0, Tuesday: June 3rd.
        let (x, y) = (g.x + 2 * CELL_WIDTH, g.y);
        assert!(mouse(&mut screen, MouseEvent::Press(MouseButton::Left, x, y), now));
        assert!(mouse(&mut screen, MouseEvent::Release(x, y), now));
        screen.tick(now + std::time::Duration::from_millis(500));

        assert_eq!(screen.view().selected(), ymd(2025, 6, 3));
        assert!(!screen.view().is_weekly());
    }

    #[test]
    fn press_outside_grid_is_not_consumed() {
        let mut screen = screen();
        let now = Instant::now();
        assert!(!mouse(&mut screen, MouseEvent::Press(MouseButton::Left, 0, 0), now));
        assert!(!screen.view().is_dragging());
    }

    #[test]
    fn mouse_drag_collapses_to_week() {
        let mut screen = screen();
        let g = screen.geometry().unwrap();
        let now = Instant::now();

        let (x, y) = (g.x + 1, g.y + 8);
        mouse(&mut screen, MouseEvent::Press(MouseButton::Left, x, y), now);
        mouse(&mut screen, MouseEvent::Hold(x, y - 3), now);
        mouse(&mut screen, MouseEvent::Release(x, y - 4), now);
        screen.tick(now + std::time::Duration::from_millis(220));

        assert!(screen.view().is_settled_weekly());
        assert_eq!(screen.view().selected(), ymd(2025, 6, 15));
        assert_eq!(screen.view().visible_cells().len(), 7);
    }

    #[test]
    fn keys_drive_the_view() {
        let mut screen = screen();
        let now = Instant::now();

        assert!(screen.input(input(Event::Key(Key::Char('l'))), now).is_none());
        assert_eq!(screen.view().selected(), ymd(2025, 7, 1));

        assert!(screen.input(input(Event::Key(Key::Right)), now).is_none());
        assert!(screen.input(input(Event::Key(Key::Down)), now).is_none());
        assert_eq!(screen.view().selected(), ymd(2025, 7, 9));

        assert!(screen.input(input(Event::Key(Key::Char(' '))), now).is_none());
        assert_eq!(screen.view().target_mode(), ViewMode::Week);

        assert!(screen.input(input(Event::Key(Key::Char('x'))), now).is_some());
    }

    #[test]
    fn release_after_command_transition_is_not_a_tap() {
        let mut screen = screen();
        let g = screen.geometry().unwrap();
        let now = Instant::now();

        let (x, y) = (g.x + 2 * CELL_WIDTH, g.y);
        mouse(&mut screen, MouseEvent::Press(MouseButton::Left, x, y), now);
        screen.view_mut().transition_to(ViewMode::Week, now);
        assert!(mouse(&mut screen, MouseEvent::Release(x, y), now));

        assert_eq!(screen.view().selected(), ymd(2025, 6, 15));
        assert_eq!(screen.view().target_mode(), ViewMode::Week);
    }

    #[test]
    fn focus_discards_pending_drag() {
        let mut screen = screen();
        let g = screen.geometry().unwrap();
        let now = Instant::now();

        mouse(&mut screen, MouseEvent::Press(MouseButton::Left, g.x, g.y), now);
        screen.on_focus(ymd(2025, 7, 1));

        assert!(!screen.view().is_dragging());
        assert!(!mouse(&mut screen, MouseEvent::Release(g.x, g.y), now));
        assert_eq!(screen.view().selected(), ymd(2025, 7, 1));
    }

    #[test]
    fn blur_resolves_pending_drag() {
        let mut screen = screen();
        let g = screen.geometry().unwrap();
        let now = Instant::now();

        let (x, y) = (g.x + 1, g.y + 8);
        mouse(&mut screen, MouseEvent::Press(MouseButton::Left, x, y), now);
        mouse(&mut screen, MouseEvent::Hold(x, y - 4), now);
        screen.on_blur(now);

        assert!(!screen.view().is_dragging());
        assert_eq!(screen.view().target_mode(), ViewMode::Week);
        assert!(!mouse(&mut screen, MouseEvent::Release(x, y - 4), now));
    }

    #[test]
    fn key_during_drag_resolves_it() {
        let mut screen = screen();
        let g = screen.geometry().unwrap();
        let now = Instant::now();

        let (x, y) = (g.x + 1, g.y + 8);
        mouse(&mut screen, MouseEvent::Press(MouseButton::Left, x, y), now);
        mouse(&mut screen, MouseEvent::Hold(x, y - 4), now);
        screen.input(input(Event::Key(Key::Char('x'))), now);

        assert!(!screen.view().is_dragging());
        assert_eq!(screen.view().target_mode(), ViewMode::Week);
        assert!(!mouse(&mut screen, MouseEvent::Release(x, y - 4), now));
    }
}
