//! dosprint Core Library
//!
//! This library converts DOS print-capture files into merged PDFs:
//! - Page geometry table and filename-based inference
//! - External renderer invocation (dot-matrix rasterizer, Ghostscript)
//! - Blank-page detection on rendered previews
//! - PDF page concatenation and output placement

pub mod blank;
pub mod config;
pub mod error;
pub mod geometry;
pub mod merge;
pub mod render;
pub mod util;
pub mod workspace;

pub use config::{AppConfig, BlankCheck, ToolsConfig};
pub use error::{Error, Result};
pub use geometry::{GeometryMode, PageGeometry, AUTO_MODE, GENERIC_MODE, GEOMETRY_NAMES};
pub use merge::{final_output_path, MergeReport};
pub use render::{EpsonRenderer, PostscriptRenderer, RenderMode, Renderer};
pub use workspace::ScratchWorkspace;

use std::path::{Path, PathBuf};
use tracing::info;

/// Per-run behavior flags, the CLI surface of the tool.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Geometry mode string (a table key or "auto")
    pub mode: String,
    /// Swap page width and height
    pub landscape: bool,
    /// Keep the scratch workspace after processing
    pub preserve: bool,
    /// Use the PostScript/distiller path instead of the dot-matrix rasterizer
    pub postscript: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: geometry::AUTO_MODE.to_string(),
            landscape: false,
            preserve: false,
            postscript: false,
        }
    }
}

/// Orchestrates the whole pipeline for a batch of input capture files.
///
/// Processing is strictly sequential: one input is fully rendered, filtered,
/// and merged before the next begins.
pub struct PrintManager {
    config: AppConfig,
    mode: GeometryMode,
    render_mode: RenderMode,
    landscape: bool,
    preserve: bool,
}

impl PrintManager {
    /// Create a new manager.
    ///
    /// Fails before any file is touched if the mode string is neither a
    /// geometry table key nor "auto".
    pub fn new(config: AppConfig, options: &RunOptions) -> Result<Self> {
        let mode = GeometryMode::parse(&options.mode)?;
        let render_mode = if options.postscript {
            RenderMode::Postscript
        } else {
            RenderMode::Epson
        };

        Ok(Self {
            config,
            mode,
            render_mode,
            landscape: options.landscape,
            preserve: options.preserve,
        })
    }

    /// Process every path in `inputs`, in order.
    ///
    /// A path that does not exist aborts the whole batch; files already
    /// completed are not rolled back. Directories expand to their `*.prt`
    /// files sorted by name. Returns the number of files processed.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<usize> {
        let mut processed = 0;
        for input in inputs {
            if !input.exists() {
                return Err(Error::MissingInput(input.clone()));
            }
            if input.is_dir() {
                for file in expand_dir(input)? {
                    self.run_one_file(&file)?;
                    processed += 1;
                }
            } else {
                self.run_one_file(input)?;
                processed += 1;
            }
        }
        Ok(processed)
    }

    /// Render, blank-filter, and merge a single capture file.
    pub fn run_one_file(&self, input: &Path) -> Result<MergeReport> {
        info!("[BEGIN] [{}] ---", input.display());

        // Dropped on every exit path, so a failure mid-pipeline still
        // removes the scratch directory (unless preserve was requested).
        let ws = ScratchWorkspace::create(self.preserve)?;

        match self.render_mode {
            RenderMode::Epson => {
                let file_name = input.file_name().and_then(|s| s.to_str()).unwrap_or("");
                let name = self.mode.name_for_file(file_name);
                info!("mode selected by file: {name}");
                let geometry = geometry::resolve(&name, self.landscape).ok_or_else(|| {
                    Error::ConfigInvalid {
                        field: "mode".to_string(),
                        reason: format!("unresolvable geometry name '{name}'"),
                    }
                })?;
                EpsonRenderer::new(&self.config.tools, geometry).render(input, &ws)?;
            }
            RenderMode::Postscript => {
                PostscriptRenderer::new(&self.config.tools).render(input, &ws)?;
            }
        }

        let report = merge::merge(input, &ws, self.config.blank_check)?;
        info!("[END] ---");
        Ok(report)
    }
}

/// The `*.prt` files directly inside `dir`, sorted by name.
fn expand_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(geometry::PRINT_EXT))
        })
        .collect();
    files.sort_by_key(|path| path.file_name().map(std::ffi::OsStr::to_os_string));
    Ok(files)
}
