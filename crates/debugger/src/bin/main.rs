//! vdebug CLI
//!
//! Loads a trace log and steps through it interactively.

use clap::Parser;
use std::io::{Stdout, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vdebug_debugger::interrupt::{listen_for_ctrl_c, Interrupts};
use vdebug_debugger::{Command, CommandError, DebuggerConfig, Flow, Repl};
use vdebug_parser::parse_file;
use vdebug_replay::Debugger;

#[derive(Parser)]
#[command(name = "vdebug")]
#[command(about = "Step-debugger for distributed-system simulation traces")]
#[command(version)]
struct Cli {
    /// Trace log written by the simulation
    log: PathBuf,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with the session.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = parse_file(&cli.log)?;
    info!(path = %cli.log.display(), "Loaded log");

    let mut repl = Repl::new(
        Debugger::new(session),
        std::io::stdout(),
        DebuggerConfig::default(),
    );
    repl.print_menu()?;

    let mut interrupts = listen_for_ctrl_c();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<String> = None;
    loop {
        let line = match pending.take() {
            Some(line) => line,
            None => {
                repl.prompt()?;
                tokio::select! {
                    line = input.next_line() => match line? {
                        Some(line) => line,
                        None => break,
                    },
                    Some(()) = interrupts.recv() => {
                        debug!("Ctrl-C at the prompt");
                        println!();
                        break;
                    }
                }
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                println!("! {}", err);
                continue;
            }
        };

        match repl.execute(command)? {
            Flow::Continue => {}
            Flow::Quit => break,
            Flow::Play => pending = play(&mut repl, &mut input, &mut interrupts).await?,
        }
    }

    std::io::stdout().flush()?;
    Ok(())
}

/// Drive auto-play until the test ends, Ctrl-C, or a line of input.
///
/// A line typed during auto-play stops it and is returned so the caller can
/// run it as the next command.
async fn play(
    repl: &mut Repl<Stdout>,
    input: &mut Input,
    interrupts: &mut Interrupts,
) -> std::io::Result<Option<String>> {
    let mut interval = tokio::time::interval(repl.step_delay());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately.
    interval.tick().await;

    // Piped input may end while playing; keep playing to the end then.
    let mut input_open = true;
    while repl.is_playing() {
        tokio::select! {
            _ = interval.tick() => repl.tick()?,
            Some(()) = interrupts.recv() => {
                debug!("Ctrl-C during auto-play");
                repl.stop();
            }
            line = input.next_line(), if input_open => match line? {
                Some(line) => {
                    repl.stop();
                    return Ok(Some(line).filter(|line| line.trim() != "stop"));
                }
                None => input_open = false,
            },
        }
    }
    Ok(None)
}
