//! # hairscan-core
//!
//! Core types, traits, and validation for hairscan.
//!
//! This crate provides the data model shared by the completion API client,
//! the fallback generator and the analysis orchestrator, plus the error
//! taxonomy and the upload validator.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, FileValidationError, Result};
pub use models::*;
pub use traits::{AnalysisBackend, QualityChecker};
pub use validation::{detect_mime_type, validate_image, validate_image_file};
