//! Analysis orchestrator.
//!
//! Runs one session through quality check, feature extraction and advice
//! generation in strict sequence, with at most one request in flight. The
//! [`FailureMode`] decides whether API errors end the session or are
//! replaced with fallback data.

use std::sync::Arc;
use std::time::Instant;

use hairscan_core::defaults::EVENT_CHANNEL_CAPACITY;
use hairscan_core::{
    validate_image_file, AdviceResult, AnalysisBackend, AnalysisResult, Error, FileValidationError,
    ImageFile, QualityChecker, Result,
};
use hairscan_inference::{FailureMode, FallbackGenerator, PipelineSettings, StaticQualityChecker};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::cancel::CancelFlag;
use crate::events::PipelineEvent;
use crate::session::{AnalysisReport, AnalysisSession, SessionState};

/// Sequences the analysis stages for a session.
pub struct Analyzer {
    backend: Arc<dyn AnalysisBackend>,
    quality: Arc<dyn QualityChecker>,
    fallback: FallbackGenerator,
    failure_mode: FailureMode,
    event_tx: broadcast::Sender<PipelineEvent>,
}

impl Analyzer {
    /// Strict analyzer with the static quality checker and an unseeded fallback.
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            quality: Arc::new(StaticQualityChecker),
            fallback: FallbackGenerator::new(),
            failure_mode: FailureMode::default(),
            event_tx,
        }
    }

    /// Analyzer configured from the `[pipeline]` settings.
    pub fn from_settings(backend: Arc<dyn AnalysisBackend>, settings: &PipelineSettings) -> Self {
        let fallback = match settings.fallback_seed {
            Some(seed) => FallbackGenerator::with_seed(seed),
            None => FallbackGenerator::new(),
        };
        Self::new(backend)
            .with_failure_mode(settings.failure_mode)
            .with_fallback(fallback)
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn with_quality_checker(mut self, quality: Arc<dyn QualityChecker>) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackGenerator) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Subscribe to progress events.
    pub fn events(&self) -> broadcast::Receiver<PipelineEvent> {
        self.event_tx.subscribe()
    }

    /// Analyze one image in a fresh session.
    pub async fn run(&self, image: ImageFile) -> Result<AnalysisReport> {
        let mut session = AnalysisSession::with_image(image);
        self.analyze(&mut session, &CancelFlag::new()).await
    }

    /// Run `session` from idle to done or error.
    ///
    /// A finished or failed session is restarted from idle, keeping its image.
    #[instrument(
        skip(self, session, cancel),
        fields(subsystem = "pipeline", component = "analyzer", op = "analyze")
    )]
    pub async fn analyze(
        &self,
        session: &mut AnalysisSession,
        cancel: &CancelFlag,
    ) -> Result<AnalysisReport> {
        if session.state() != SessionState::Idle {
            session.retry();
        }

        let started = Instant::now();
        let outcome = self.run_stages(session, cancel).await;

        match outcome {
            Ok(report) => {
                info!(
                    subsystem = "pipeline",
                    component = "analyzer",
                    stage = report.analysis.raw_stage,
                    confidence = report.confidence,
                    fallback = report.used_fallback,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Analysis complete"
                );
                self.emit(PipelineEvent::Completed {
                    confidence: report.confidence,
                    used_fallback: report.used_fallback,
                });
                session.complete(report.clone());
                Ok(report)
            }
            Err(e) => {
                let stage = session.state();
                error!(
                    subsystem = "pipeline",
                    component = "analyzer",
                    failed_stage = %stage,
                    error_kind = %e.kind(),
                    error = %e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Analysis failed"
                );
                self.emit(PipelineEvent::Failed {
                    stage,
                    kind: e.kind(),
                    message: e.to_string(),
                });
                session.fail(&e);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        session: &mut AnalysisSession,
        cancel: &CancelFlag,
    ) -> Result<AnalysisReport> {
        let image = session
            .image()
            .cloned()
            .ok_or(Error::Validation(FileValidationError::NoImage))?;

        validate_image_file(&image)?;

        info!(
            subsystem = "pipeline",
            component = "analyzer",
            file_name = %image.name,
            file_size = image.size(),
            failure_mode = %self.failure_mode,
            "Analysis started"
        );

        self.enter(session, SessionState::QualityCheck, cancel)?;
        let quality = self.quality.check_quality(&image).await?;
        let confidence = quality.confidence_score();
        session.record_quality(quality.clone());

        self.enter(session, SessionState::FeatureExtraction, cancel)?;
        let (analysis, extract_fallback) = self.extract_features(&image).await?;

        self.enter(session, SessionState::AdviceGeneration, cancel)?;
        let (advice, advice_fallback) = self.generate_advice(&analysis).await?;

        Ok(AnalysisReport {
            analysis,
            advice,
            confidence,
            quality,
            used_fallback: extract_fallback || advice_fallback,
        })
    }

    fn enter(
        &self,
        session: &mut AnalysisSession,
        stage: SessionState,
        cancel: &CancelFlag,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            debug!(op = "enter", next_stage = %stage, "Cancellation observed");
            return Err(Error::Cancelled);
        }
        session.enter(stage);
        self.emit(PipelineEvent::StageStarted {
            stage,
            progress: stage.progress(),
        });
        Ok(())
    }

    async fn extract_features(&self, image: &ImageFile) -> Result<(AnalysisResult, bool)> {
        let stage = SessionState::FeatureExtraction;

        let attempt = if self.backend.is_configured() {
            self.backend
                .extract_features(&image.data)
                .await
                .and_then(check_stage)
        } else {
            Err(Error::Config("API key is not configured".to_string()))
        };

        match attempt {
            Ok(analysis) => Ok((analysis, false)),
            Err(e) => {
                self.recover(stage, e)?;
                let seed = self.fallback.seed_for(&image.name, image.size());
                Ok((self.fallback.analysis(seed), true))
            }
        }
    }

    async fn generate_advice(&self, analysis: &AnalysisResult) -> Result<(AdviceResult, bool)> {
        let stage = SessionState::AdviceGeneration;

        let attempt = if self.backend.is_configured() {
            self.backend.generate_advice(analysis).await
        } else {
            Err(Error::Config("API key is not configured".to_string()))
        };

        match attempt {
            Ok(advice) => Ok((advice, false)),
            Err(e) => {
                self.recover(stage, e)?;
                Ok((self.fallback.advice(analysis), true))
            }
        }
    }

    /// Apply the failure policy: strict returns the error, graceful logs it.
    fn recover(&self, stage: SessionState, e: Error) -> Result<()> {
        if self.failure_mode == FailureMode::Strict {
            return Err(e);
        }

        warn!(
            subsystem = "pipeline",
            component = "analyzer",
            stage = %stage,
            error_kind = %e.kind(),
            error = %e,
            "Using fallback data"
        );
        self.emit(PipelineEvent::FallbackUsed {
            stage,
            reason: e.kind(),
        });
        Ok(())
    }

    fn emit(&self, event: PipelineEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Results with a stage outside 0..=3 are not usable downstream.
fn check_stage(analysis: AnalysisResult) -> Result<AnalysisResult> {
    match analysis.stage() {
        Some(_) => Ok(analysis),
        None => Err(Error::schema(
            "stage",
            format!("{} is outside 0..=3", analysis.raw_stage),
        )),
    }
}
