use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for dosprint-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Configuration (geometry mode validation, config file loading)
/// - Input resolution (missing files, directory expansion)
/// - External renderer invocation (spawning, output capture)
/// - Blank-page inspection (PNG decoding, PDF parsing)
/// - Merge and output placement
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Unrecognized geometry mode string (must match a table key or "auto")
    #[error("invalid geometry mode '{mode}': must be one of {valid}")]
    InvalidMode { mode: String, valid: String },

    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// An input path from the batch does not exist; aborts the whole run
    #[error("input file (or dir) {0} doesn't exist")]
    MissingInput(PathBuf),

    // ==========================================================================
    // Renderer Errors
    // ==========================================================================
    /// Failed to spawn or capture an external renderer process
    #[error("failed to run renderer command '{command}': {reason}")]
    RendererSpawn { command: String, reason: String },

    // ==========================================================================
    // Blank-Page Inspection Errors
    // ==========================================================================
    /// A listed page PDF has no matching PNG preview
    #[error("missing PNG preview for page {0}")]
    MissingPreview(PathBuf),

    /// Failed to decode a page preview image
    #[error("failed to decode preview {path}: {source}")]
    PreviewDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    // ==========================================================================
    // Merge Errors
    // ==========================================================================
    /// Error from the lopdf library
    #[error("lopdf error: {0}")]
    Lopdf(String),

    /// Failed to save a PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
