//! Commands typed at the prompt.

use std::str::FromStr;
use thiserror::Error;

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  tests            list tests grouped by status
  select <name>    select a test
  next | n | d     apply the next event
  prev | p | a     undo the last event
  run              auto-play to the end (Ctrl-C or any input stops)
  stop             stop auto-play
  reset            rewind the selected test
  seek <n>         replay the first n events
  error            show the selected test's error
  layout           show node positions
  help             show this text
  quit | q         exit";

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tests,
    Select(String),
    Next,
    Prev,
    Run,
    Stop,
    Reset,
    Seek(usize),
    Error,
    Layout,
    Help,
    Quit,
}

/// Errors from parsing a prompt line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for `{command}`: {value:?}")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => return Err(CommandError::Empty),
            "tests" | "list" => Command::Tests,
            // Test names may contain spaces.
            "select" | "s" if rest.is_empty() => return Err(CommandError::MissingArgument("select")),
            "select" | "s" => Command::Select(rest.to_string()),
            "next" | "n" | "d" => Command::Next,
            "prev" | "p" | "a" => Command::Prev,
            "run" | "play" => Command::Run,
            "stop" => Command::Stop,
            "reset" | "rerun" => Command::Reset,
            "seek" if rest.is_empty() => return Err(CommandError::MissingArgument("seek")),
            "seek" => Command::Seek(rest.parse().map_err(|_| CommandError::InvalidArgument {
                command: "seek",
                value: rest.to_string(),
            })?),
            "error" => Command::Error,
            "layout" => Command::Layout,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
