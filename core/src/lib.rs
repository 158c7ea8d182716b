pub mod api;
pub mod cli;
pub mod csa;
pub mod dicom_io;
pub mod error;
pub mod extraction;
pub mod types;

pub use api::{BValueStandardizer, FileReport, Outcome};
pub use cli::report::BatchReport;
pub use csa::{CsaElement, CsaError, CsaHeader};
pub use dicom_io::{DicomImageIo, FileDicomIo, Slice};
pub use error::{Result, StandardizeError};
pub use types::*;
