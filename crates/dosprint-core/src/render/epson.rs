//! Dot-matrix rasterizer invocation (EPSON FX capture files).

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run_command, Renderer};
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::geometry::PageGeometry;
use crate::workspace::ScratchWorkspace;

/// Runs the external dot-matrix rasterizer once per input file.
///
/// The rasterizer receives the workspace root, the printer font, and the
/// resolved page geometry in millimeters. It creates the `pdf/` and `png/`
/// page directories itself; the PNG previews are a side effect of its own
/// invocation and are not verified here.
pub struct EpsonRenderer {
    rasterizer: PathBuf,
    font: PathBuf,
    geometry: PageGeometry,
}

impl EpsonRenderer {
    pub fn new(tools: &ToolsConfig, geometry: PageGeometry) -> Self {
        Self {
            rasterizer: tools.rasterizer.clone(),
            font: tools.font.clone(),
            geometry,
        }
    }
}

impl Renderer for EpsonRenderer {
    fn render(&self, input: &Path, workspace: &ScratchWorkspace) -> Result<()> {
        let g = &self.geometry;

        let mut cmd = Command::new(&self.rasterizer);
        cmd.arg("-o")
            .arg(workspace.root())
            .arg("-f")
            .arg(&self.font)
            .arg("-p")
            .arg(format!("{},{}", g.width_mm, g.height_mm))
            .arg("-m")
            .arg(format!(
                "{},{},{},{}",
                g.margin_left_mm, g.margin_right_mm, g.margin_top_mm, g.margin_bottom_mm
            ))
            .arg(input);

        run_command(cmd)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::geometry;

    #[test]
    fn test_page_size_arguments_format() {
        // Whole millimeters print without a trailing ".0", fractional ones keep it
        let letter = geometry::lookup("Letter").unwrap();
        assert_eq!(
            format!("{},{}", letter.width_mm, letter.height_mm),
            "215.9,279.4"
        );
        let a4 = geometry::lookup("A4").unwrap();
        assert_eq!(format!("{},{}", a4.width_mm, a4.height_mm), "210,297");
    }
}
