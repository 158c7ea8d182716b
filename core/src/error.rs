use std::path::PathBuf;
use thiserror::Error;

/// Result type for b-value standardization
pub type Result<T> = std::result::Result<T, StandardizeError>;

/// Per-file failures of the standardization pipeline
///
/// None of these abort a batch; the caller reports them and moves on.
#[derive(Error, Debug)]
pub enum StandardizeError {
    /// DICOM reading error
    #[error("could not read '{}': {message}", path.display())]
    Dicom { path: PathBuf, message: String },

    /// DICOM writing error
    #[error("failed to save '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// Tag not found in the metadata dictionary
    #[error("could not determine {0}")]
    TagNotFound(&'static str),

    /// Modality other than MR
    #[error("incorrect imaging modality ({0} != MR)")]
    IncorrectModality(String),

    /// Pixel layout the slice loader does not handle
    #[error("unsupported pixel type: {0}")]
    UnsupportedPixelType(String),

    /// No vendor strategy produced a b-value
    #[error("could not determine diffusion b-value (not a diffusion scan?)")]
    Undetermined,

    /// Invalid tag value
    #[error("invalid value for {tag}: '{value}'")]
    InvalidValue { tag: String, value: String },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StandardizeError {
    pub(crate) fn read(path: impl Into<PathBuf>, e: impl std::fmt::Display) -> Self {
        StandardizeError::Dicom {
            path: path.into(),
            message: e.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, e: impl std::fmt::Display) -> Self {
        StandardizeError::Write {
            path: path.into(),
            message: e.to_string(),
        }
    }
}
