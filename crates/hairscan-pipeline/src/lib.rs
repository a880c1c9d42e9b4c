//! # hairscan-pipeline
//!
//! Analysis orchestration for hairscan.
//!
//! This crate provides:
//! - The session state machine (`idle → quality-check → feature-extraction →
//!   advice-generation → done`, plus `error`)
//! - [`Analyzer`], which sequences the stages and applies the strict or
//!   graceful failure policy
//! - Progress events and cooperative cancellation
//! - The `hairscan` command-line binary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hairscan_core::ImageFile;
//! use hairscan_inference::{FailureMode, OpenAIBackend, OpenAIConfig};
//! use hairscan_pipeline::Analyzer;
//!
//! #[tokio::main]
//! async fn main() -> hairscan_core::Result<()> {
//!     let backend = OpenAIBackend::new(OpenAIConfig::default())?;
//!     let analyzer = Analyzer::new(Arc::new(backend)).with_failure_mode(FailureMode::Graceful);
//!
//!     let image = ImageFile::from_bytes("scalp.jpg", std::fs::read("scalp.jpg")?);
//!     let report = analyzer.run(image).await?;
//!     println!("stage {} confidence {}", report.analysis.raw_stage, report.confidence);
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod events;
pub mod orchestrator;
pub mod session;

pub use cancel::CancelFlag;
pub use events::PipelineEvent;
pub use hairscan_inference::FailureMode;
pub use orchestrator::Analyzer;
pub use session::{AnalysisReport, AnalysisSession, SessionState, STEP_LABELS};
