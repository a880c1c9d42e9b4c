//! Mock analysis backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hairscan_inference::mock::{MockAnalysisBackend, MockFailure};
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockAnalysisBackend::new()
//!         .with_extract_failure(MockFailure::Transport(503));
//!
//!     assert!(backend.extract_features(b"img").await.is_err());
//!     assert_eq!(backend.extract_call_count(), 1);
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;
use hairscan_core::{AdviceResult, AnalysisBackend, AnalysisResult, Error, Result};

/// Error the mock returns on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Non-2xx HTTP status.
    Transport(u16),
    EmptyResponse,
    Extraction,
    Schema,
}

impl MockFailure {
    fn to_error(self) -> Error {
        match self {
            Self::Transport(status) => Error::transport(Some(status), "simulated failure"),
            Self::EmptyResponse => Error::EmptyResponse,
            Self::Extraction => Error::Extraction {
                excerpt: "no json here".to_string(),
            },
            Self::Schema => Error::schema("stage", "missing"),
        }
    }
}

#[derive(Debug, Clone)]
struct MockConfig {
    configured: bool,
    analysis: AnalysisResult,
    advice: AdviceResult,
    extract_failure: Option<MockFailure>,
    advice_failure: Option<MockFailure>,
    latency_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            configured: true,
            analysis: AnalysisResult {
                density_score: 72.0,
                scalp_exposure_percent: 18.5,
                parting_width_px: 7.5,
                baby_hairs_visible: true,
                raw_stage: 2,
                hairline_stability: Some(true),
                left_right_symmetry: Some("正常".to_string()),
            },
            advice: AdviceResult::new("Mock summary", "Mock advice"),
            extract_failure: None,
            advice_failure: None,
            latency_ms: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: Instant,
}

/// Mock analysis backend for testing.
#[derive(Clone)]
pub struct MockAnalysisBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockAnalysisBackend {
    /// Create a configured mock returning a fixed stage-2 analysis.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report the backend as unconfigured (no API key).
    pub fn unconfigured(mut self) -> Self {
        Arc::make_mut(&mut self.config).configured = false;
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisResult) -> Self {
        Arc::make_mut(&mut self.config).analysis = analysis;
        self
    }

    pub fn with_advice(mut self, advice: AdviceResult) -> Self {
        Arc::make_mut(&mut self.config).advice = advice;
        self
    }

    /// Fail every feature extraction call.
    pub fn with_extract_failure(mut self, failure: MockFailure) -> Self {
        Arc::make_mut(&mut self.config).extract_failure = Some(failure);
        self
    }

    /// Fail every advice call.
    pub fn with_advice_failure(mut self, failure: MockFailure) -> Self {
        Arc::make_mut(&mut self.config).advice_failure = Some(failure);
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.calls().clear()
    }

    pub fn extract_call_count(&self) -> usize {
        self.count("extract_features")
    }

    pub fn advice_call_count(&self) -> usize {
        self.count("generate_advice")
    }

    fn calls(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn log_call(&self, operation: &str, input: String) {
        self.calls().push(MockCall {
            operation: operation.to_string(),
            input,
            timestamp: Instant::now(),
        });
    }

    fn require_configured(&self) -> Result<()> {
        if self.config.configured {
            Ok(())
        } else {
            Err(Error::Config("API key is not configured".to_string()))
        }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockAnalysisBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisBackend for MockAnalysisBackend {
    fn is_configured(&self) -> bool {
        self.config.configured
    }

    async fn extract_features(&self, image: &[u8]) -> Result<AnalysisResult> {
        self.log_call("extract_features", format!("{} bytes", image.len()));
        self.simulate_latency().await;
        self.require_configured()?;

        if let Some(failure) = self.config.extract_failure {
            return Err(failure.to_error());
        }
        Ok(self.config.analysis.clone())
    }

    async fn generate_advice(&self, analysis: &AnalysisResult) -> Result<AdviceResult> {
        self.log_call("generate_advice", format!("stage {}", analysis.raw_stage));
        self.simulate_latency().await;
        self.require_configured()?;

        if let Some(failure) = self.config.advice_failure {
            return Err(failure.to_error());
        }
        Ok(self.config.advice.clone())
    }

    fn vision_model(&self) -> &str {
        "mock-vision"
    }

    fn text_model(&self) -> &str {
        "mock-text"
    }
}
