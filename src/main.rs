mod adjust;
mod app;
mod convert;
mod help;
mod logging;
mod panel;
mod picker;
mod project;
mod settings;
mod theme;
use crate::app::App;
use crate::convert::{CalendarDate, CalendarSystem};
use crate::picker::Ymd;
use crate::project::Projection;
use crate::settings::{AdjustmentSettings, FileStore, MemoryStore, SettingsStore};
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::io::stdout;
use std::path::PathBuf;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    system: CalendarSystem,
    config_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
    print: bool,
    date: Option<Ymd>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        let mut date = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("hijri") => opts.system = CalendarSystem::Hijri,
                Arg::Long("config-dir") => opts.config_dir = Some(parser.value()?.into()),
                Arg::Long("log-file") => opts.log_file = Some(parser.value()?.into()),
                Arg::Long("print") => opts.print = true,
                Arg::Value(value) if date.is_none() => date = Some(value.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        // The date is parsed last so that `--hijri` may come after it
        if let Some(value) = date {
            match parse_ymd(&value, opts.system) {
                Ok(ymd) => opts.date = Some(ymd),
                Err(e) => {
                    return Err(lexopt::Error::ParsingFailed {
                        value,
                        error: Box::new(e),
                    })
                }
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    logging::init(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let settings = AdjustmentSettings::load(open_store(opts.config_dir));
                if opts.print {
                    print_projection(today, opts.system, opts.date, &settings)
                } else {
                    with_terminal(|mut terminal| {
                        terminal.hide_cursor().context("failed to hide cursor")?;
                        App::new(today, opts.system, opts.date, settings).run(terminal)?;
                        Ok(())
                    })
                }
            }
            Command::Help => {
                println!("Usage: hijripick [<options>] [YYYY-MM-DD]");
                println!();
                println!("Pick a date on a Gregorian or Hijri wheel and see it in the other calendar");
                println!();
                println!("Options:");
                println!("  --hijri             Pick Hijri dates instead of Gregorian ones");
                println!("  --config-dir DIR    Store date adjustments in DIR");
                println!("  --log-file PATH     Append log messages to PATH");
                println!("  --print             Print the conversion of the date and exit");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn open_store(config_dir: Option<PathBuf>) -> Box<dyn SettingsStore> {
    match config_dir.map(FileStore::new).or_else(FileStore::default_location) {
        Some(store) => Box::new(store),
        None => {
            tracing::warn!("Could not determine config directory; adjustments will not be saved");
            Box::new(MemoryStore::default())
        }
    }
}

fn print_projection(
    today: Date,
    system: CalendarSystem,
    date: Option<Ymd>,
    settings: &AdjustmentSettings,
) -> anyhow::Result<()> {
    let adjustments = settings.current();
    let input = match date {
        Some((year, month, day)) => CalendarDate::from_ymd(system, year, month, day, adjustments)?,
        None => {
            let today = CalendarDate::Gregorian(today);
            match system {
                CalendarSystem::Gregorian => today,
                CalendarSystem::Hijri => today.counterpart(adjustments)?,
            }
        }
    };
    println!("{system}: {input}");
    println!("{}", Projection::new(input, adjustments, today)?);
    Ok(())
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
enum DateArgError {
    #[error("expected a date in YYYY-MM-DD format")]
    Format,
    #[error("month must be between 1 and 12")]
    Month,
    #[error("day must be between 1 and {0}")]
    Day(u8),
}

/// Parses a `YYYY-MM-DD` date for the given calendar.  Hijri days are only
/// checked against the longest month length; the configured length is
/// applied once the settings are loaded.
fn parse_ymd(s: &str, system: CalendarSystem) -> Result<Ymd, DateArgError> {
    match system {
        CalendarSystem::Gregorian => Date::parse(s, &YMD_FMT)
            .map(|d| (d.year(), u8::from(d.month()), d.day()))
            .map_err(|_| DateArgError::Format),
        CalendarSystem::Hijri => {
            let mut parts = s.splitn(3, '-');
            let mut next = || {
                parts
                    .next()
                    .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
                    .ok_or(DateArgError::Format)
            };
            let year = next()?.parse::<i32>().map_err(|_| DateArgError::Format)?;
            let month = next()?.parse::<u8>().map_err(|_| DateArgError::Format)?;
            let day = next()?.parse::<u8>().map_err(|_| DateArgError::Format)?;
            if !(1..=12).contains(&month) {
                return Err(DateArgError::Month);
            }
            let max_day = system.max_day();
            if !(1..=max_day).contains(&day) {
                return Err(DateArgError::Day(max_day));
            }
            Ok((year, month, day))
        }
    }
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = execute!(stdout(), DisableMouseCapture) {
        tracing::warn!("Failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}
