//! Analysis session state.
//!
//! A session walks `idle → quality-check → feature-extraction →
//! advice-generation → done`, with `error` reachable from any stage. It holds
//! the selected image and, once done, the report the analyzer produced.

use std::fmt;

use hairscan_core::{
    AdviceResult, AnalysisResult, Error, ErrorKind, ImageFile, QualityCheckResult,
};
use serde::{Deserialize, Serialize};

/// User-facing labels for the three working stages.
pub const STEP_LABELS: [&str; 3] = ["图片质量检测", "AI特征分析", "生成分析报告"];

/// Position in the analysis state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Idle,
    QualityCheck,
    FeatureExtraction,
    AdviceGeneration,
    Done,
    Error,
}

impl SessionState {
    /// Progress percentage shown for this state.
    pub fn progress(self) -> u8 {
        match self {
            Self::Idle | Self::Error => 0,
            Self::QualityCheck => 10,
            Self::FeatureExtraction => 30,
            Self::AdviceGeneration => 70,
            Self::Done => 100,
        }
    }

    /// Index into [`STEP_LABELS`] for working stages.
    pub fn step_index(self) -> Option<usize> {
        match self {
            Self::QualityCheck => Some(0),
            Self::FeatureExtraction => Some(1),
            Self::AdviceGeneration => Some(2),
            _ => None,
        }
    }

    pub fn step_label(self) -> Option<&'static str> {
        self.step_index().map(|i| STEP_LABELS[i])
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::QualityCheck => "quality-check",
            Self::FeatureExtraction => "feature-extraction",
            Self::AdviceGeneration => "advice-generation",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: AnalysisResult,
    pub advice: AdviceResult,
    /// One of 55, 70, 85, from the quality check.
    pub confidence: u8,
    pub quality: QualityCheckResult,
    /// True when any stage used fallback data.
    pub used_fallback: bool,
}

/// State for one analysis of one image.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    image: Option<ImageFile>,
    state: SessionState,
    progress: u8,
    quality: Option<QualityCheckResult>,
    confidence: Option<u8>,
    report: Option<AnalysisReport>,
    error: Option<String>,
    error_kind: Option<ErrorKind>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    /// Empty idle session with no image.
    pub fn new() -> Self {
        Self {
            image: None,
            state: SessionState::Idle,
            progress: 0,
            quality: None,
            confidence: None,
            report: None,
            error: None,
            error_kind: None,
        }
    }

    pub fn with_image(image: ImageFile) -> Self {
        let mut session = Self::new();
        session.image = Some(image);
        session
    }

    /// Select a new image, discarding any previous results.
    pub fn select_image(&mut self, image: ImageFile) {
        self.reset();
        self.image = Some(image);
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Progress percentage. On error, the progress of the failed stage.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn quality(&self) -> Option<&QualityCheckResult> {
        self.quality.as_ref()
    }

    pub fn confidence(&self) -> Option<u8> {
        self.confidence
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.report.as_ref().map(|r| &r.analysis)
    }

    pub fn advice(&self) -> Option<&AdviceResult> {
        self.report.as_ref().map(|r| &r.advice)
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// User-visible error message, set in the `error` state.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    /// Clear the error and progress, keeping the selected image.
    pub fn retry(&mut self) {
        let image = self.image.take();
        *self = Self::new();
        self.image = image;
    }

    /// Return to an empty idle session.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn enter(&mut self, state: SessionState) {
        self.state = state;
        self.progress = state.progress();
    }

    pub(crate) fn record_quality(&mut self, quality: QualityCheckResult) {
        self.confidence = Some(quality.confidence_score());
        self.quality = Some(quality);
    }

    pub(crate) fn complete(&mut self, report: AnalysisReport) {
        self.enter(SessionState::Done);
        self.error = None;
        self.error_kind = None;
        self.report = Some(report);
    }

    pub(crate) fn fail(&mut self, error: &Error) {
        self.state = SessionState::Error;
        self.error = Some(error.to_string());
        self.error_kind = Some(error.kind());
    }
}
