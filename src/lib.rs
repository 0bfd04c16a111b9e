pub mod catalog;
pub mod command;
pub mod configure;
pub mod error;
pub mod matcher;
pub mod modes;
pub mod monitor;
pub mod request;
pub mod system;

#[cfg(target_os = "macos")]
pub mod quartz;
#[cfg(not(target_os = "macos"))]
pub mod sway;

#[cfg(test)]
mod mock;

use log::{error, info, warn};
use std::io::Write;

use catalog::{current_mode, ModeCatalog};
use command::{Command, SetDirective, USAGE};
use monitor::Monitor;
use request::parse_spec;
use system::DisplaySystem;

/// Number of modes per line in `list` output.
const MODES_PER_LINE: usize = 3;

/// Handles the commands that never touch a display. Returns the number of
/// failures to add to the tally.
pub fn run_informational<W: Write>(command: &Command, out: &mut W) -> std::io::Result<u32> {
    match command {
        Command::Version => {
            writeln!(
                out,
                "displayres version {}\nLicensed under GPLv2",
                env!("CARGO_PKG_VERSION")
            )?;
            Ok(0)
        }
        Command::Help => {
            writeln!(out, "{USAGE}")?;
            Ok(0)
        }
        Command::Unknown(name) => {
            error!("I'm sorry, I'm afraid I can't do '{name}'");
            Ok(1)
        }
        _ => Ok(0),
    }
}

/// Runs commands against every active display and keeps the failure tally.
#[derive(Debug)]
pub struct DisplayManager<S: DisplaySystem> {
    system: S,
    failures: u32,
}

impl<S: DisplaySystem> DisplayManager<S> {
    pub fn new(system: S) -> DisplayManager<S> {
        DisplayManager {
            system,
            failures: 0,
        }
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    /// Failed operations so far. The process exits non-zero unless this is 0.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Runs one command. Per-display failures are logged and counted; only
    /// a failure to enumerate displays (or to write output) is returned.
    pub async fn run<W: Write>(
        &mut self,
        command: &Command,
        out: &mut W,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !command.needs_displays() {
            self.failures += run_informational(command, out)?;
            return Ok(());
        }

        let monitors = Monitor::enumerate(&self.system).await?;
        info!("{} active displays", monitors.len());
        for monitor in monitors {
            let index = monitor.index();
            let outcome = match command {
                Command::Get => self.current(&monitor).await.map(Some),
                Command::GetMax => self.maximum(&monitor).await.map(Some),
                Command::List { verbose } => self.list(monitor, *verbose).await.map(Some),
                Command::Set(directives) => match directives.get(index) {
                    Some(directive) => self.set(&monitor, directive).await.map(Some),
                    None => Ok(None),
                },
                Command::Version | Command::Help | Command::Unknown(_) => Ok(None),
            };
            match outcome {
                Ok(Some(text)) => writeln!(out, "{text}")?,
                Ok(None) => {}
                Err(e) => {
                    error!("Display {index}: {e}");
                    self.failures += 1;
                }
            }
        }
        Ok(())
    }

    async fn current(&self, monitor: &Monitor<S::Handle>) -> error::Result<String> {
        let current = current_mode(&self.system, monitor.handle()).await?;
        Ok(format!("Display {}: {}", monitor.index(), current.mode))
    }

    async fn maximum(&self, monitor: &Monitor<S::Handle>) -> error::Result<String> {
        let catalog = ModeCatalog::load(&self.system, monitor.handle(), true).await?;
        let max = catalog.find_maximum()?;
        Ok(format!("Display {}: {}", monitor.index(), max.mode))
    }

    async fn list(&self, monitor: Monitor<S::Handle>, verbose: bool) -> error::Result<String> {
        let catalog = ModeCatalog::load(&self.system, monitor.handle(), false).await?;
        let monitor = if verbose {
            monitor.with_name(&self.system).await
        } else {
            monitor
        };

        let mut text = format!("Available Modes on {monitor}");
        for (i, entry) in catalog.sorted().into_iter().enumerate() {
            if verbose {
                text.push('\n');
                text.push_str(&modes::describe_flags(
                    monitor.index(),
                    &entry.mode,
                    entry.flags,
                ));
                continue;
            }
            text.push_str(if i % MODES_PER_LINE == 0 { "\n  " } else { "\t" });
            text.push_str(&format!("{:<20} ", entry.mode.to_string()));
        }
        Ok(text)
    }

    async fn set(
        &self,
        monitor: &Monitor<S::Handle>,
        directive: &SetDirective,
    ) -> error::Result<String> {
        let token = match directive {
            SetDirective::Skip => return Ok(format!("Skipping display {}", monitor.index())),
            SetDirective::Apply(token) => token,
        };
        let parsed = parse_spec(token)?;
        if let Some(warning) = parsed.warning {
            warn!("Display {}: {warning}", monitor.index());
        }

        let catalog = ModeCatalog::load(&self.system, monitor.handle(), false).await?;
        let entry = catalog.find_exact(&parsed.spec)?;
        configure::apply(&self.system, monitor.handle(), &entry.raw).await?;
        Ok(format!(
            "set mode on display {} to {}",
            monitor.index(),
            entry.mode
        ))
    }
}
