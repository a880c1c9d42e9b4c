//! Core traits for hairscan abstractions.
//!
//! These traits define the seams between the orchestrator and the services
//! it sequences, so the hosted API can be swapped for a mock in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AdviceResult, AnalysisResult, ImageFile, QualityCheckResult};

/// A service that turns images into metrics and metrics into advice.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Whether the backend has the credentials it needs.
    fn is_configured(&self) -> bool;

    /// Extract structured hair metrics from raw image bytes.
    async fn extract_features(&self, image: &[u8]) -> Result<AnalysisResult>;

    /// Generate an encouraging summary and one recommendation.
    async fn generate_advice(&self, analysis: &AnalysisResult) -> Result<AdviceResult>;

    /// Name of the model used for feature extraction.
    fn vision_model(&self) -> &str;

    /// Name of the model used for advice generation.
    fn text_model(&self) -> &str;
}

/// Judges whether an image is usable before analysis.
#[async_trait]
pub trait QualityChecker: Send + Sync {
    async fn check_quality(&self, image: &ImageFile) -> Result<QualityCheckResult>;
}
