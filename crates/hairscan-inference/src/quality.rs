//! Image quality check.

use async_trait::async_trait;
use hairscan_core::{ImageFile, QualityCheckResult, QualityChecker, Result};
use tracing::debug;

/// Quality checker that accepts every image as high quality.
///
/// Stands in until a real clarity/lighting analysis exists; it keeps the
/// pipeline shape so a real checker can be swapped in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticQualityChecker;

#[async_trait]
impl QualityChecker for StaticQualityChecker {
    async fn check_quality(&self, image: &ImageFile) -> Result<QualityCheckResult> {
        debug!(
            subsystem = "inference",
            component = "quality",
            file_name = %image.name,
            "Quality check (static)"
        );
        Ok(QualityCheckResult::high_quality())
    }
}
