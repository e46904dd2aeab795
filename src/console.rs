//! Line-oriented console front end for `shepherd watch`.
//!
//! Stands in for the canvas: the user types pointer clicks and actions on
//! stdin, and the console prints the selection panel, an `Events: N` header
//! whenever the count changes, and acknowledge and connection notices.

#[cfg(test)]
#[path = "console_test.rs"]
mod console_test;

use field::point::Point;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::error::ShepherdError;
use crate::interaction::Selection;
use crate::session::{Notice, SessionHandle, View};

pub const HELP: &str = "commands: click X Y | clear | ack | list | status | frame | help | quit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Click(Point),
    Clear,
    Ack,
    List,
    Status,
    Frame,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns `InvalidCommand` for unknown words or bad click coordinates.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ShepherdError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "click" => {
            let (Some(x), Some(y), None) = (words.next(), words.next(), words.next()) else {
                return Err(ShepherdError::InvalidCommand("usage: click X Y".to_owned()));
            };
            ConsoleCommand::Click(Point::new(coordinate(x)?, coordinate(y)?))
        }
        "clear" => ConsoleCommand::Clear,
        "ack" => ConsoleCommand::Ack,
        "list" => ConsoleCommand::List,
        "status" => ConsoleCommand::Status,
        "frame" => ConsoleCommand::Frame,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ShepherdError::InvalidCommand(format!("unknown command `{other}`; {HELP}"))),
    };
    Ok(Some(command))
}

fn coordinate(text: &str) -> Result<f64, ShepherdError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ShepherdError::InvalidCommand(format!("not a coordinate: `{text}`"))),
    }
}

/// The detail panel for a selection.
#[must_use]
pub fn render_selection(selection: &Selection) -> String {
    let action = if selection.acknowledged { "Acknowledged" } else { "[ack] to acknowledge" };
    format!(
        "Selected: {}\n  Status: {}  Level: {}\n  Raw: {}\n  {action}",
        selection.event_id,
        selection.status,
        selection.level.as_str(),
        selection.raw
    )
}

/// One line per drawable, in render order.
#[must_use]
pub fn render_list(view: &View) -> String {
    if view.scene.is_empty() {
        return "no events".to_owned();
    }
    view.scene
        .drawables
        .iter()
        .map(|d| format!("{:<24} at ({:.0}, {:.0})  size {:.0}  {}", d.event_id, d.center.x, d.center.y, d.size, d.color.to_css()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn render_status(view: &View) -> String {
    let selected = view.selection.as_ref().map_or("none", |s| s.event_id.as_str());
    format!(
        "connection: {}  events: {}  tick: {}  selected: {}",
        view.connection.as_str(),
        view.event_count,
        view.tick,
        selected
    )
}

#[must_use]
pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Connection(status) => format!("-- {}", status.as_str()),
        Notice::SnapshotLoaded { count } => format!("-- snapshot loaded ({count} events)"),
        Notice::Acknowledged { id } => format!("-- acknowledged {id}"),
        Notice::AckFailed { id, error } => format!("-- acknowledge {id} failed: {error}"),
    }
}

/// Drive `handle` from stdin until `quit`, end of input, or session stop.
///
/// # Errors
///
/// Returns stdin read failures and JSON encoding failures of `frame`.
pub async fn run(handle: SessionHandle) -> Result<(), ShepherdError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut notices = handle.notices();
    let mut views = handle.views();
    let mut last_count: Option<usize> = None;
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&handle, command).await?,
                    Err(error) => println!("{error}"),
                }
            }
            notice = notices.recv() => match notice {
                Ok(notice) => println!("{}", render_notice(&notice)),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "console: notices lagged"),
                Err(RecvError::Closed) => break,
            },
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = views.borrow_and_update().event_count;
                if last_count != Some(count) {
                    println!("Events: {count}");
                    last_count = Some(count);
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn execute(handle: &SessionHandle, command: ConsoleCommand) -> Result<(), ShepherdError> {
    match command {
        ConsoleCommand::Click(point) => match handle.pointer_down(point).await? {
            Some(selection) => println!("{}", render_selection(&selection)),
            None => println!("nothing at ({:.0}, {:.0})", point.x, point.y),
        },
        ConsoleCommand::Clear => handle.clear_selection().await?,
        ConsoleCommand::Ack => match handle.acknowledge().await {
            Ok(id) => println!("acknowledging {id}"),
            Err(
                error @ (ShepherdError::NoSelection
                | ShepherdError::AlreadyAcknowledged(_)
                | ShepherdError::AckInFlight(_)),
            ) => println!("{error}"),
            Err(error) => return Err(error),
        },
        ConsoleCommand::List => println!("{}", render_list(&handle.view())),
        ConsoleCommand::Status => println!("{}", render_status(&handle.view())),
        ConsoleCommand::Frame => println!("{}", serde_json::to_string_pretty(&*handle.view())?),
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}
