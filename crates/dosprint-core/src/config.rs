use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Strategy used to decide whether a rendered page is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlankCheck {
    /// Inspect the PNG preview's 1-bit histogram (the active strategy of the
    /// original pipeline). A page has content exactly when the darkest bin
    /// is populated.
    #[default]
    Histogram,
    /// Inspect the page PDF itself: nonempty extracted text or an Image
    /// XObject counts as content.
    PdfContent,
}

/// Paths of the external collaborators this tool shells out to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Dot-matrix rasterizer (EPSON FX capture to per-page PDF/PNG)
    #[serde(default = "default_rasterizer")]
    pub rasterizer: PathBuf,

    /// Ghostscript binary (PostScript distiller)
    #[serde(default = "default_ghostscript")]
    pub ghostscript: PathBuf,

    /// Printer font resource handed to the rasterizer
    #[serde(default = "default_font")]
    pub font: PathBuf,
}

fn default_rasterizer() -> PathBuf {
    PathBuf::from("./printerToPDF_png")
}

fn default_ghostscript() -> PathBuf {
    PathBuf::from("/usr/bin/gs")
}

fn default_font() -> PathBuf {
    PathBuf::from("font2/Epson-Standard.C16")
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            rasterizer: default_rasterizer(),
            ghostscript: default_ghostscript(),
            font: default_font(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// External tool paths
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Blank-page detection strategy
    #[serde(default)]
    pub blank_check: BlankCheck,
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/dosprint/config.toml, ./dosprint.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("dosprint").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("dosprint.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./dosprint.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./dosprint.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}
