//! Operator console: the text stand-in for picking gaits, speed and mode
//! while the robot runs.

use anyhow::{Context, Result};
use snake_gait::{GaitFeedWriter, GaitLibrary};
use snake_proto::CommandKind;
use tracing::warn;

pub const HELP: &str = "commands: gait <id> | speed <0.2..2.0> | mode rel|abs | list | status | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCmd {
    Gait(String),
    Speed(f64),
    Mode(CommandKind),
    List,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCmd>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word {
        "gait" => {
            anyhow::ensure!(!rest.is_empty(), "gait needs an id");
            ConsoleCmd::Gait(rest.to_string())
        }
        "speed" => ConsoleCmd::Speed(rest.parse().with_context(|| format!("bad speed {:?}", rest))?),
        "mode" => match rest {
            "rel" | "relative" | "R" => ConsoleCmd::Mode(CommandKind::Relative),
            "abs" | "absolute" | "S" => ConsoleCmd::Mode(CommandKind::Absolute),
            other => anyhow::bail!("unknown mode {:?} (rel|abs)", other),
        },
        "list" => ConsoleCmd::List,
        "status" => ConsoleCmd::Status,
        "help" | "?" => ConsoleCmd::Help,
        "quit" | "exit" => ConsoleCmd::Quit,
        other => anyhow::bail!("unknown command {:?}; {}", other, HELP),
    };
    Ok(Some(cmd))
}

pub fn apply(cmd: ConsoleCmd, writer: &mut GaitFeedWriter, lib: &GaitLibrary) -> Flow {
    let result: Result<()> = match cmd {
        ConsoleCmd::Gait(id) => lib.get(&id).map(|g| writer.select(g)).map_err(Into::into),
        ConsoleCmd::Speed(s) => writer.set_speed(s).map_err(Into::into),
        ConsoleCmd::Mode(kind) => writer.set_kind(kind).map_err(Into::into),
        ConsoleCmd::List => {
            for id in lib.ids() {
                println!("  {}", id);
            }
            Ok(())
        }
        ConsoleCmd::Status => {
            println!(
                "gait={:?} speed={} mode={:?}",
                writer.selected_gait(),
                writer.speed(),
                writer.kind()
            );
            Ok(())
        }
        ConsoleCmd::Help => {
            println!("{}", HELP);
            Ok(())
        }
        ConsoleCmd::Quit => return Flow::Quit,
    };
    if let Err(e) = result {
        warn!("console: {:#}", e);
    }
    Flow::Continue
}
