//! Ghostscript distiller invocation (PostScript capture files).

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run_command, Renderer};
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::workspace::ScratchWorkspace;

/// Preview rasterization resolution in DPI.
const PREVIEW_DPI: u32 = 720;

/// Text anti-aliasing bits for the preview pass.
const TEXT_ALPHA_BITS: u32 = 4;

/// Runs Ghostscript twice per input file: once to distill per-page PDFs,
/// once to rasterize per-page PNG previews for the blank-page check.
pub struct PostscriptRenderer {
    ghostscript: PathBuf,
}

impl PostscriptRenderer {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            ghostscript: tools.ghostscript.clone(),
        }
    }

    fn distill_pdf_pages(&self, input: &Path, workspace: &ScratchWorkspace) -> Result<()> {
        let mut cmd = Command::new(&self.ghostscript);
        cmd.arg("-sDEVICE=pdfwrite")
            .arg("-dPDFSETTINGS=/prepress")
            .arg("-dHaveTrueTypes=true")
            .arg("-dEmbedAllFonts=true")
            .arg("-dSubsetFonts=false")
            .arg("-o")
            .arg(workspace.pdf_dir().join("page%d.pdf"))
            .arg("-DNOSAFER")
            .arg("-dNOPAUSE")
            .arg("-dBATCH")
            .arg("-f")
            .arg(input);

        run_command(cmd)?;
        Ok(())
    }

    fn rasterize_png_previews(&self, input: &Path, workspace: &ScratchWorkspace) -> Result<()> {
        let mut cmd = Command::new(&self.ghostscript);
        cmd.arg("-q")
            .arg("-sPAPERSIZE=a4")
            .arg("-sDEVICE=png16m")
            .arg(format!("-dTextAlphaBits={TEXT_ALPHA_BITS}"))
            .arg(format!("-r{PREVIEW_DPI}x{PREVIEW_DPI}"))
            .arg("-o")
            .arg(workspace.png_dir().join("page%d.png"))
            .arg("-DNOSAFER")
            .arg("-dNOPAUSE")
            .arg("-dBATCH")
            .arg("-f")
            .arg(input);

        run_command(cmd)?;
        Ok(())
    }
}

impl Renderer for PostscriptRenderer {
    fn render(&self, input: &Path, workspace: &ScratchWorkspace) -> Result<()> {
        workspace.create_page_dirs()?;
        self.distill_pdf_pages(input, workspace)?;
        self.rasterize_png_previews(input, workspace)?;
        Ok(())
    }
}
