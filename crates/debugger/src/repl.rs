//! Command loop state, independent of where input comes from.

use crate::{Command, ConsoleRenderer, DebuggerConfig, HELP};
use std::fmt::Display;
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;
use vdebug_replay::{AutoPlay, Debugger, Tick};

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Auto-play was started and made its first step; drive
    /// [`Repl::tick`] until it stops.
    Play,
    /// Exit.
    Quit,
}

/// One interactive session: debugger, renderer and auto-play together.
///
/// Replay errors (no test selected, end of test, unmatched receive, ...)
/// are printed and the session goes on; only output failures are returned.
pub struct Repl<W: Write> {
    debugger: Debugger,
    renderer: ConsoleRenderer<W>,
    autoplay: AutoPlay,
    config: DebuggerConfig,
}

impl<W: Write> Repl<W> {
    /// Create a session printing to `out`.
    pub fn new(debugger: Debugger, out: W, config: DebuggerConfig) -> Self {
        Self {
            autoplay: config.autoplay(),
            debugger,
            renderer: ConsoleRenderer::new(out),
            config,
        }
    }

    /// The debugging session.
    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    /// Hand back the output writer.
    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }

    /// Delay between auto-play steps.
    pub fn step_delay(&self) -> Duration {
        self.autoplay.period()
    }

    /// Check if auto-play is running.
    pub fn is_playing(&self) -> bool {
        self.autoplay.is_running()
    }

    /// Run one command.
    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        debug!(?command, "Command");
        match command {
            Command::Tests => self.print_menu()?,
            Command::Select(name) => {
                self.autoplay.stop();
                if let Err(err) = self.debugger.select_test(&name, &mut self.renderer) {
                    self.report(err)?;
                }
            }
            Command::Next => match self.debugger.step_forward(&mut self.renderer) {
                Ok(report) if report.is_last() => {
                    writeln!(self.out(), "{} (end of test)", report.progress())?
                }
                Ok(_) => {}
                Err(err) => self.report(err)?,
            },
            Command::Prev => {
                if let Err(err) = self.debugger.step_back(&mut self.renderer) {
                    self.report(err)?;
                }
            }
            Command::Run => match self.autoplay.start(&mut self.debugger, &mut self.renderer) {
                Ok(()) => {
                    // First step right away, the rest once per period.
                    self.tick()?;
                    return Ok(Flow::Play);
                }
                Err(err) => self.report(err)?,
            },
            Command::Stop => self.stop(),
            Command::Reset => {
                self.autoplay.stop();
                if let Err(err) = self.debugger.reset(&mut self.renderer) {
                    self.report(err)?;
                }
            }
            Command::Seek(target) => {
                self.autoplay.stop();
                match self.debugger.seek(target, &mut self.renderer) {
                    Ok(_) => self.print_progress()?,
                    Err(err) => self.report(err)?,
                }
            }
            Command::Error => {
                let error = self
                    .debugger
                    .current_error()
                    .map(|error| error.map(str::to_string));
                match error {
                    Ok(Some(error)) => writeln!(self.out(), "Test error: {}", error)?,
                    Ok(None) => writeln!(self.out(), "Test has no error")?,
                    Err(err) => self.report(err)?,
                }
            }
            Command::Layout => self.print_layout()?,
            Command::Help => writeln!(self.out(), "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Apply one auto-play step.
    pub fn tick(&mut self) -> io::Result<()> {
        match self.autoplay.tick(&mut self.debugger, &mut self.renderer) {
            Ok(Tick::Stepped(_)) | Ok(Tick::Idle) => Ok(()),
            Ok(Tick::Finished) => {
                self.print_progress()?;
                writeln!(self.out(), "Auto-play finished")
            }
            Err(err) => self.report(err),
        }
    }

    /// Stop auto-play.
    pub fn stop(&mut self) {
        self.autoplay.stop();
    }

    /// Print the tests grouped by status.
    pub fn print_menu(&mut self) -> io::Result<()> {
        let menu = self.debugger.tests_by_status();
        let out = self.renderer.out_mut();
        for (title, tests) in [
            ("PASSED", &menu.passed),
            ("FAILED", &menu.failed),
            ("UNFINISHED", &menu.unfinished),
        ] {
            if tests.is_empty() {
                continue;
            }
            writeln!(out, "{} ({}):", title, tests.len())?;
            for test in tests {
                writeln!(out, "  {} ({} events)", test.name, test.len())?;
            }
        }
        Ok(())
    }

    /// Print the prompt.
    pub fn prompt(&mut self) -> io::Result<()> {
        let progress = self
            .debugger
            .cursor()
            .map(|cursor| format!("{} {}", cursor.test().name, cursor.progress()));
        let out = self.renderer.out_mut();
        match progress {
            Some(progress) => write!(out, "[{}] > ", progress)?,
            None => write!(out, "> ")?,
        }
        out.flush()
    }

    fn print_progress(&mut self) -> io::Result<()> {
        let progress = self
            .debugger
            .cursor()
            .map(|cursor| format!("Event: #{}/{}", cursor.position(), cursor.len()));
        match progress {
            Some(progress) => writeln!(self.out(), "{}", progress),
            None => Ok(()),
        }
    }

    fn print_layout(&mut self) -> io::Result<()> {
        match self.config.positions(self.debugger.node_ids()) {
            Ok(positions) => {
                let out = self.renderer.out_mut();
                for position in positions {
                    writeln!(
                        out,
                        "  node {:>6}: ({:.1}, {:.1})",
                        position.node_id, position.x, position.y
                    )?;
                }
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: impl Display) -> io::Result<()> {
        writeln!(self.out(), "! {}", err)
    }

    fn out(&mut self) -> &mut W {
        self.renderer.out_mut()
    }
}
