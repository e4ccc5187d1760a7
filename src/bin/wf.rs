extern crate weekfold as lib;

use chrono::{Local, NaiveDate};
use flexi_logger::{FileSpec, Logger};
use lib::events::Dispatcher;
use lib::ui::app::App;
use lib::ui::calendar::render_month;
use lib::ui::Tab;
use lib::view::{ViewController, ViewSettings};
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use termion::input::MouseTerminal;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "wf",
    about = "weekfold - a month/week calendar for the terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the current month non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "date", help = "use this date (YYYY-MM-DD) as today")]
    pub date: Option<NaiveDate>,

    #[structopt(
        long = "tab",
        help = "tab to open: home, calendar, library or mypage",
        default_value = "calendar"
    )]
    pub tab: Tab,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    } else if !args.show {
        // stderr would scribble over the alternate screen
        logger = logger.do_not_log();
    }

    let _logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    if args.show {
        let today = args.date.unwrap_or_else(|| Local::now().date_naive());
        let view = ViewController::new(today, ViewSettings::from(&config));
        println!("{}", render_month(&view, &config.weekday_labels));
        return Ok(());
    }

    const STDIN: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDIN)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!(
            "{}{}",
            termion::screen::ToMainScreen,
            termion::cursor::Show
        );

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDIN, termios::SetArg::TCSANOW, &attr);
        }

        println!("weekfold ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let dispatcher = Dispatcher::from_config(&config);
    let mut app = App::new(&config, args.tab, args.date);

    // Mouse reporting stays on until the guard drops, after the terminal.
    let _mouse = MouseTerminal::from(stdout());
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    app.run(dispatcher, term)
}
