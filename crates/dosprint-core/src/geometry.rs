//! Page geometry table for the supported retro printer paper sizes.
//!
//! All values are in millimeters. The table is a process-wide constant;
//! `generic` is a value copy of `A4`, never a reference, so editing one
//! entry can never leak into the other.

use crate::error::{Error, Result};

/// Extension carried by DOS print-capture files.
pub const PRINT_EXT: &str = "prt";

/// Geometry used when auto-inference cannot name a better one.
pub const GENERIC_MODE: &str = "generic";

/// Sentinel mode meaning "infer the geometry from the file name".
pub const AUTO_MODE: &str = "auto";

/// A named page size plus margin quadruple, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
}

impl PageGeometry {
    const fn new(width_mm: f64, height_mm: f64, margins_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            margin_left_mm: margins_mm,
            margin_right_mm: margins_mm,
            margin_top_mm: margins_mm,
            margin_bottom_mm: margins_mm,
        }
    }

    /// Swap width and height, keeping margins as-is.
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self {
            width_mm: self.height_mm,
            height_mm: self.width_mm,
            margin_left_mm: self.margin_left_mm,
            margin_right_mm: self.margin_right_mm,
            margin_top_mm: self.margin_top_mm,
            margin_bottom_mm: self.margin_bottom_mm,
        }
    }
}

const A4: PageGeometry = PageGeometry::new(210.0, 297.0, 2.5);
// Old continuous-form paper size
const FOLIO: PageGeometry = PageGeometry::new(215.0, 315.0, 2.5);
// Custom First Publisher size (A4+), borderless
const FP: PageGeometry = PageGeometry {
    width_mm: 210.0,
    height_mm: 310.0,
    margin_left_mm: 0.0,
    margin_right_mm: 0.0,
    margin_top_mm: 0.0,
    margin_bottom_mm: 0.0,
};
const LETTER: PageGeometry = PageGeometry::new(215.9, 279.4, 2.5);
// Print Master output, very tall page
const PMMAIN: PageGeometry = PageGeometry::new(205.0, 335.0, 2.5);

/// All recognized geometry names, in table order.
pub const GEOMETRY_NAMES: [&str; 6] = ["A4", "folio", "fp", "Letter", "pmmain", "generic"];

/// Look up a geometry by name, case-insensitively.
///
/// `generic` resolves to the same values as `A4` (alias by value copy).
pub fn lookup(name: &str) -> Option<PageGeometry> {
    match name.to_ascii_lowercase().as_str() {
        "a4" | "generic" => Some(A4),
        "folio" => Some(FOLIO),
        "fp" => Some(FP),
        "letter" => Some(LETTER),
        "pmmain" => Some(PMMAIN),
        _ => None,
    }
}

/// Resolve a geometry name, applying the landscape swap at resolution time.
pub fn resolve(name: &str, landscape: bool) -> Option<PageGeometry> {
    lookup(name).map(|g| if landscape { g.rotated() } else { g })
}

/// How the page geometry for an input file is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryMode {
    /// Infer the geometry name from the file name pattern.
    Auto,
    /// Use this geometry name for every input (stored lowercase).
    Named(String),
}

impl GeometryMode {
    /// Parse a mode string, case-insensitively.
    ///
    /// Fails at construction time for anything that is neither a table key
    /// nor the auto sentinel.
    pub fn parse(mode: &str) -> Result<Self> {
        let lower = mode.to_ascii_lowercase();
        if lower == AUTO_MODE {
            return Ok(Self::Auto);
        }
        if lookup(&lower).is_some() {
            return Ok(Self::Named(lower));
        }
        Err(Error::InvalidMode {
            mode: mode.to_string(),
            valid: format!("{GEOMETRY_NAMES:?} or \"{AUTO_MODE}\""),
        })
    }

    /// The geometry name to use for `file_name`.
    ///
    /// In auto mode the name comes from the `<alpha>_<digits>.prt` pattern;
    /// unresolved or unknown prefixes fall back to `generic`.
    pub fn name_for_file(&self, file_name: &str) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Auto => infer_geometry_name(file_name)
                .map(|prefix| prefix.to_ascii_lowercase())
                .filter(|prefix| lookup(prefix).is_some())
                .unwrap_or_else(|| GENERIC_MODE.to_string()),
        }
    }
}

/// Extract the geometry prefix from a file name matching
/// `^([A-Za-z]+)_\d+\.prt$`, case-insensitively.
fn infer_geometry_name(file_name: &str) -> Option<String> {
    let ext_len = PRINT_EXT.len() + 1;
    if file_name.len() <= ext_len || !file_name.is_char_boundary(file_name.len() - ext_len) {
        return None;
    }
    let (stem, ext) = file_name.split_at(file_name.len() - ext_len);
    if !ext.eq_ignore_ascii_case(&format!(".{PRINT_EXT}")) {
        return None;
    }

    let (prefix, digits) = stem.split_once('_')?;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(prefix.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_all_names() {
        for name in GEOMETRY_NAMES {
            assert!(lookup(name).is_some(), "missing geometry for {name}");
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("LETTER"), lookup("letter"));
        assert_eq!(lookup("PmMaIn"), lookup("pmmain"));
    }

    #[test]
    fn test_generic_is_a4_by_value() {
        assert_eq!(lookup("generic").unwrap(), lookup("A4").unwrap());
    }

    #[test]
    fn test_landscape_swaps_dimensions_only() {
        for name in GEOMETRY_NAMES {
            let portrait = resolve(name, false).unwrap();
            let landscape = resolve(name, true).unwrap();
            assert_eq!(landscape.width_mm, portrait.height_mm);
            assert_eq!(landscape.height_mm, portrait.width_mm);
            assert_eq!(landscape.margin_left_mm, portrait.margin_left_mm);
            assert_eq!(landscape.margin_right_mm, portrait.margin_right_mm);
            assert_eq!(landscape.margin_top_mm, portrait.margin_top_mm);
            assert_eq!(landscape.margin_bottom_mm, portrait.margin_bottom_mm);
        }
    }

    #[test]
    fn test_parse_known_mode() {
        assert_eq!(
            GeometryMode::parse("Letter").unwrap(),
            GeometryMode::Named("letter".to_string())
        );
        assert_eq!(GeometryMode::parse("AUTO").unwrap(), GeometryMode::Auto);
    }

    #[test]
    fn test_parse_bogus_mode_fails() {
        assert!(matches!(
            GeometryMode::parse("bogus"),
            Err(Error::InvalidMode { .. })
        ));
    }

    #[test]
    fn test_infer_known_prefix() {
        let mode = GeometryMode::Auto;
        assert_eq!(mode.name_for_file("pmmain_000.prt"), "pmmain");
        assert_eq!(mode.name_for_file("PMMAIN_000.PRT"), "pmmain");
    }

    #[test]
    fn test_infer_unknown_prefix_falls_back_to_generic() {
        let mode = GeometryMode::Auto;
        assert_eq!(mode.name_for_file("foo_12.prt"), GENERIC_MODE);
    }

    #[test]
    fn test_infer_nonmatching_name_falls_back_to_generic() {
        let mode = GeometryMode::Auto;
        assert_eq!(mode.name_for_file("report.prt"), GENERIC_MODE);
        assert_eq!(mode.name_for_file("a4_12.txt"), GENERIC_MODE);
        assert_eq!(mode.name_for_file("a4_x2.prt"), GENERIC_MODE);
        assert_eq!(mode.name_for_file("_12.prt"), GENERIC_MODE);
    }

    #[test]
    fn test_named_mode_ignores_filename() {
        let mode = GeometryMode::Named("folio".to_string());
        assert_eq!(mode.name_for_file("pmmain_000.prt"), "folio");
    }
}
