use crate::dicom_io::{DicomImageIo, FileDicomIo};
use crate::error::{Result, StandardizeError};
use crate::extraction::compute_b_value;
use crate::extraction::tags::{get_string_value, DIFFUSION_B_VALUE, MODALITY};
use crate::types::MetadataDictionary;
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Rewrites the diffusion b-value of MR slices into DiffusionBValue (0018,9087)
///
/// Each file is handled on its own: metadata is read, the modality and an
/// existing standard b-value are checked, the vendor convention is applied
/// and, on success, the slice is written back in place.
///
/// # Example
///
/// ```no_run
/// use bvalue_core::{BValueStandardizer, Outcome};
/// use std::path::Path;
///
/// let standardizer = BValueStandardizer::default();
/// match standardizer.standardize_file(Path::new("slice.dcm")) {
///     Ok(Outcome::Standardized { b_value }) => println!("b = {}", b_value),
///     Ok(Outcome::AlreadyStandardized { b_value }) => println!("already b = {}", b_value),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub struct BValueStandardizer<I = FileDicomIo> {
    io: I,
}

impl Default for BValueStandardizer<FileDicomIo> {
    fn default() -> Self {
        Self::new(FileDicomIo)
    }
}

impl<I: DicomImageIo> BValueStandardizer<I> {
    pub fn new(io: I) -> Self {
        Self { io }
    }

    /// Standardizes the b-value of one file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or written
    /// - The modality is missing or not "MR"
    /// - The pixel layout cannot be loaded
    /// - No b-value can be determined
    pub fn standardize_file(&self, path: &Path) -> Result<Outcome> {
        let (tags, pixel_info) = self.io.read_metadata(path)?;

        check_modality(&tags)?;

        if let Some(b_value) = existing_b_value(&tags) {
            warn!("Diffusion b-value is already standardized (b = {})", b_value);
            return Ok(Outcome::AlreadyStandardized { b_value });
        }

        let pixel_type = pixel_info
            .pixel_type()
            .ok_or_else(|| StandardizeError::UnsupportedPixelType(pixel_info.to_string()))?;
        info!("Pixel type: {}", pixel_type);

        let mut slice = self.io.read_slice(path)?;

        let b_value = compute_b_value(slice.tags()).ok_or(StandardizeError::Undetermined)?;
        info!("Diffusion b-value = {}", b_value);

        slice.set_diffusion_b_value(&b_value)?;

        info!("Saving standardized image to '{}' ...", path.display());
        self.io.write_slice(&slice, path)?;

        Ok(Outcome::Standardized { b_value })
    }

    /// Standardizes every file, continuing past failures
    pub fn standardize_files<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<FileReport> {
        paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                info!("Processing '{}' ...", path.display());

                let result = self.standardize_file(path);
                if let Err(e) = &result {
                    error!("{}: {}", path.display(), e);
                }

                FileReport {
                    path: path.to_path_buf(),
                    result,
                }
            })
            .collect()
    }
}

/// Rejects anything but MR images
pub fn check_modality(tags: &MetadataDictionary) -> Result<()> {
    let modality =
        get_string_value(tags, MODALITY).ok_or(StandardizeError::TagNotFound("image modality"))?;

    if modality != "MR" {
        return Err(StandardizeError::IncorrectModality(modality));
    }
    Ok(())
}

/// Returns the trimmed DiffusionBValue (0018,9087), if present
pub fn existing_b_value(tags: &MetadataDictionary) -> Option<String> {
    get_string_value(tags, DIFFUSION_B_VALUE)
}

/// Successful result of standardizing one file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(tag = "status", rename_all = "snake_case"))]
pub enum Outcome {
    /// The b-value was computed and written
    Standardized { b_value: String },

    /// The file already had a standard b-value; nothing was written
    AlreadyStandardized { b_value: String },
}

impl Outcome {
    pub fn b_value(&self) -> &str {
        match self {
            Outcome::Standardized { b_value } | Outcome::AlreadyStandardized { b_value } => {
                b_value
            }
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Outcome::Standardized { .. } => "standardized",
            Outcome::AlreadyStandardized { .. } => "already standardized",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (b = {})", self.simple_name(), self.b_value())
    }
}

/// Outcome of one file in a batch
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<Outcome>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
