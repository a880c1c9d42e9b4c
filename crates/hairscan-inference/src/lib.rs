//! # hairscan-inference
//!
//! Completion API access for hairscan.
//!
//! This crate provides:
//! - OpenAI-compatible client for feature extraction and advice generation
//! - JSON recovery from free-form model replies
//! - Schema checks that turn recovered JSON into typed results
//! - Seeded fallback data for offline or failed sessions
//! - TOML/environment configuration loading
//!
//! # Feature Flags
//!
//! - `mock`: Expose [`mock::MockAnalysisBackend`] to downstream test suites
//!
//! # Example
//!
//! ```rust,no_run
//! use hairscan_inference::{HairscanConfig, OpenAIBackend};
//!
//! let config = HairscanConfig::load().expect("Failed to load config");
//! let backend = OpenAIBackend::new(config.api).expect("Failed to create client");
//! println!("{:?}", backend.status());
//! ```

pub mod config;
pub mod extraction;
pub mod fallback;
pub mod openai;
pub mod prompts;
pub mod quality;
pub mod schema;

// Mock analysis backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use hairscan_core::*;

pub use config::{ConfigError, FailureMode, HairscanConfig, PipelineSettings};
pub use extraction::{excerpt, extract_json, extract_json_with_strategy, ExtractionStrategy};
pub use fallback::{advice_for_stage, FallbackGenerator, FallbackSeed};
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use prompts::{advice_prompt, FEATURE_EXTRACTION_PROMPT};
pub use quality::StaticQualityChecker;
pub use schema::{parse_advice, parse_analysis};
