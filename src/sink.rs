//! Hand the finished PDF to the print queue or a local viewer.
//!
//! Both are fire-and-forget: the child process is spawned and never waited on.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::media::StickyEdge;

pub trait Dispatch {
    /// The command that would hand `path` off
    fn command(&self, path: &Path) -> Command;

    fn dispatch(&self, path: &Path) -> Result<()> {
        let mut command = self.command(path);
        info!("Running {:?}", command);
        command
            .spawn()
            .with_context(|| format!("Failed to run {:?}", command.get_program()))?;
        Ok(())
    }
}

/// Submits to a CUPS queue through `lpr`
pub struct LprPrinter {
    pub printer: String,
    pub edge: StickyEdge,
}

impl LprPrinter {
    pub fn new(printer: &str, edge: StickyEdge) -> Self {
        Self {
            printer: printer.to_string(),
            edge,
        }
    }
}

impl Dispatch for LprPrinter {
    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new("lpr");
        command
            .arg("-o")
            .arg(self.edge.lpr_option())
            .arg("-P")
            .arg(&self.printer)
            .arg(path);
        command
    }
}

/// Opens the file with the desktop's default PDF viewer
pub struct Viewer;

impl Dispatch for Viewer {
    fn command(&self, path: &Path) -> Command {
        if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(path);
            command
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}
