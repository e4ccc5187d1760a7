use chrono::NaiveDate;
use nom::{
    bytes::complete::take_while1,
    character::complete::{digit0, space1},
    combinator::{all_consuming, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};

use super::tabs::Tab;
use crate::error::{Error, ErrorKind, Result};
use crate::view::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Today,
    Mode(ViewMode),
    Next(u32),
    Prev(u32),
    Goto(NaiveDate),
    Tab(Tab),
}

enum Action {
    NoArg(fn() -> Command),
    Repeatable(fn(u32) -> Command),
    Arg(fn(&str) -> Result<Command>),
}

const COMMANDS: &[(&str, Action)] = &[
    ("today", Action::NoArg(|| Command::Today)),
    ("month", Action::NoArg(|| Command::Mode(ViewMode::Month))),
    ("week", Action::NoArg(|| Command::Mode(ViewMode::Week))),
    ("next", Action::Repeatable(Command::Next)),
    ("prev", Action::Repeatable(Command::Prev)),
    (
        "goto",
        Action::Arg(|arg| {
            let date = NaiveDate::parse_from_str(arg, "%Y-%m-%d")?;
            Ok(Command::Goto(date))
        }),
    ),
    ("tab", Action::Arg(|arg| Ok(Command::Tab(arg.parse()?)))),
];

fn split_command(input: &str) -> IResult<&str, (&str, &str, Option<&str>)> {
    all_consuming(tuple((
        digit0,
        take_while1(|c: char| c.is_ascii_alphabetic()),
        opt(preceded(space1, rest)),
    )))(input)
}

fn find_action(name: &str) -> Option<&'static Action> {
    COMMANDS
        .iter()
        .find(|(cmd, _)| *cmd == name)
        .map(|(_, action)| action)
}

/// Parses a command line such as `3next`, `goto 2025-06-15` or `tab library`.
pub fn parse_command(input: &str) -> Result<Command> {
    let (_, (repeat, name, arg)) = split_command(input.trim())?;

    let action = find_action(name).ok_or_else(|| {
        Error::new(ErrorKind::CommandParse, &format!("'{}'", name))
    })?;

    match (action, arg) {
        (Action::Repeatable(a), None) => {
            let count = if repeat.is_empty() {
                1
            } else {
                repeat.parse::<u32>().map_err(|_| {
                    Error::new(ErrorKind::CommandParse, &format!("invalid count '{}'", repeat))
                })?
            };
            Ok(a(count))
        }
        (Action::NoArg(a), None) if repeat.is_empty() => Ok(a()),
        (Action::Arg(a), Some(arg)) if repeat.is_empty() => a(arg.trim()),
        (Action::Arg(_), None) => Err(Error::new(
            ErrorKind::CommandParse,
            &format!("'{}' needs an argument", name),
        )),
        _ => Err(Error::new(
            ErrorKind::CommandParse,
            &format!("'{}' takes no count or argument", name),
        )),
    }
}
