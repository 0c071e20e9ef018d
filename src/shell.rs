//! Line-command driver for a [`Site`].
//!
//! Reads one command per line and writes the visible page state after each:
//!
//! ```text
//! lang <code>        select a language
//! type <text>        set the search input (text may be empty)
//! click inside       click within the search region
//! click outside      click anywhere else
//! submit             submit the search form
//! show               print the state again
//! quit               stop reading
//! ```

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{
    AsyncBufRead,
    AsyncBufReadExt,
    AsyncWrite,
    AsyncWriteExt,
};

use crate::search::ResultEntry;
use crate::site::{
    PageEvent,
    Site,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("expected 'inside' or 'outside', got '{0}'")]
    InvalidClickTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(PageEvent),
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (name, argument) = line.split_once(' ').unwrap_or((line, ""));

        match name.trim_end() {
            "" => Err(CommandError::Empty),
            "lang" => match argument.trim() {
                "" => Err(CommandError::MissingArgument("lang")),
                code => Ok(Self::Event(PageEvent::SelectLanguage(code.to_string()))),
            },
            // The input text is taken as typed, surrounding spaces included.
            "type" => Ok(Self::Event(PageEvent::Input(argument.to_string()))),
            "click" => match argument.trim() {
                "inside" => Ok(Self::Event(PageEvent::Click { inside_search: true })),
                "outside" => Ok(Self::Event(PageEvent::Click { inside_search: false })),
                "" => Err(CommandError::MissingArgument("click")),
                other => Err(CommandError::InvalidClickTarget(other.to_string())),
            },
            "submit" => Ok(Self::Event(PageEvent::Submit)),
            "show" => Ok(Self::Show),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Visible state: document language, panel state, and one line per result entry.
#[must_use]
pub fn snapshot(site: &Site) -> String {
    let page = site.page();
    let mut out = String::new();

    let lang = page.document_language().unwrap_or("-");
    let region = page.search_region();
    let expanded = region.is_some_and(|r| r.input.aria_expanded);
    let _ = writeln!(out, "lang={lang} expanded={expanded}");

    for entry in region.map(|r| r.results()).unwrap_or_default() {
        let _ = match entry {
            ResultEntry::Link { href, title, .. } => writeln!(out, "  {title} <{href}>"),
            ResultEntry::Placeholder { text } => writeln!(out, "  ({text})"),
        };
    }
    out
}

/// Drives `site` from `reader` until end of input or `quit`.
///
/// Malformed commands are reported on `writer` and skipped.
pub async fn run<R, W>(site: &mut Site, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(snapshot(site).as_bytes()).await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                tracing::debug!("Rejected command {line:?}: {e}");
                writer.write_all(format!("error: {e}\n").as_bytes()).await?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Show => {}
            Command::Event(event) => site.dispatch(event),
        }
        writer.write_all(snapshot(site).as_bytes()).await?;
    }

    writer.flush().await
}
