//! Scratch workspace for one input file's intermediate renderer output.
//!
//! Layout produced per run:
//! - `<root>/pdf/page<N>.pdf` — one PDF per rendered page
//! - `<root>/png/page<N>.png` — one preview bitmap per page
//! - `<root>/<stem>.pdf` — intermediate merge target
//!
//! The workspace is exclusively owned by the single in-flight file. Deletion
//! happens in `Drop`, so it runs on every exit path, including error
//! propagation out of the pipeline. With preserve set the directory is
//! detached from its guard and survives the run.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

pub struct ScratchWorkspace {
    root: PathBuf,
    // None once the directory has been detached for preservation
    guard: Option<tempfile::TempDir>,
}

impl ScratchWorkspace {
    /// Create a fresh scratch directory, optionally preserved after the run.
    pub fn create(preserve: bool) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("print").tempdir()?;
        let workspace = if preserve {
            let root = dir.keep();
            debug!("Preserving scratch workspace at {}", root.display());
            Self { root, guard: None }
        } else {
            Self {
                root: dir.path().to_path_buf(),
                guard: Some(dir),
            }
        };
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one PDF file per rendered page.
    pub fn pdf_dir(&self) -> PathBuf {
        self.root.join("pdf")
    }

    /// Directory holding one PNG preview per rendered page.
    pub fn png_dir(&self) -> PathBuf {
        self.root.join("png")
    }

    /// Create the `pdf/` and `png/` subdirectories.
    ///
    /// The PostScript path needs these up front; the dot-matrix rasterizer
    /// creates them itself.
    pub fn create_page_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.pdf_dir())?;
        std::fs::create_dir_all(self.png_dir())?;
        Ok(())
    }

    /// Intermediate merge target inside the workspace.
    pub fn merge_target(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{stem}.pdf"))
    }

    pub const fn is_preserved(&self) -> bool {
        self.guard.is_none()
    }
}
