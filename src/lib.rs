pub mod animation;
pub mod config;
pub mod error;
pub mod events;
pub mod gesture;
pub mod grid;
pub mod ui;
pub mod view;

pub use error::{Error, ErrorKind, Result};
pub use grid::{build_month_grid, build_week_grid, month_grid, Cell, MonthIndex};
pub use view::{Layout, Navigation, ViewController, ViewMode, ViewSettings};
