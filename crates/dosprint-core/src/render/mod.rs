//! External renderer invocation.
//!
//! The pipeline never rasterizes anything itself; it shells out to a
//! dot-matrix rasterizer or to Ghostscript and picks up the page files they
//! leave in the scratch workspace. The `Renderer` trait is the narrow seam
//! between the orchestrator and those collaborators: build a command line,
//! run it, capture combined output.
//!
//! Invocations are synchronous. Both output pipes are drained to completion
//! before the pipeline proceeds; draining only one stream can deadlock on a
//! full pipe buffer. A non-zero exit status is logged but never aborts the
//! run: the merge step simply finds however many page files exist.

mod epson;
mod postscript;

pub use epson::EpsonRenderer;
pub use postscript::PostscriptRenderer;

use std::process::{Command, ExitStatus};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::workspace::ScratchWorkspace;

/// Which external rendering path converts the capture into page files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Dot-matrix rasterizer (EPSON FX dialect), the default.
    #[default]
    Epson,
    /// Ghostscript distiller for PostScript captures.
    Postscript,
}

/// One external rendering pass over an input capture file.
pub trait Renderer {
    /// Run the renderer(s) for `input`, leaving page PDFs in
    /// `<workspace>/pdf/` and PNG previews in `<workspace>/png/`.
    fn render(&self, input: &std::path::Path, workspace: &ScratchWorkspace) -> Result<()>;
}

/// Run an external command, waiting for it to exit with both output streams
/// fully captured.
pub(crate) fn run_command(mut command: Command) -> Result<ExitStatus> {
    let rendered = command_line(&command);
    info!("Command [{rendered}]");

    let output = command.output().map_err(|e| Error::RendererSpawn {
        command: rendered.clone(),
        reason: e.to_string(),
    })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!("  > {}", line.trim_end());
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!("  > {}", line.trim_end());
    }

    if !output.status.success() {
        warn!("Renderer exited with {} [{rendered}]", output.status);
    }

    Ok(output.status)
}

/// Human-readable form of a command line for logging.
fn command_line(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
