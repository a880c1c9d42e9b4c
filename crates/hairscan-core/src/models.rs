//! Data model shared by the client, fallback generator and orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::defaults;

// =============================================================================
// ANALYSIS RESULT
// =============================================================================

/// Structured hair metrics extracted from one image.
///
/// `stage` is kept as the raw integer the producer reported. Use
/// [`AnalysisResult::stage`] to get a checked [`Stage`]; anything outside
/// 0..=3 is invalid and yields `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Hair density score, 0-100, higher is denser.
    pub density_score: f64,
    /// Share of visible scalp in percent, 0-100.
    pub scalp_exposure_percent: f64,
    /// Width of the parting line in pixels.
    pub parting_width_px: f64,
    /// Whether new vellus hairs are visible.
    pub baby_hairs_visible: bool,
    /// Recovery stage as reported, see [`Stage`].
    #[serde(rename = "stage")]
    pub raw_stage: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hairline_stability: Option<bool>,
    /// Left/right symmetry label, passed through as reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_right_symmetry: Option<String>,
}

impl AnalysisResult {
    /// Checked recovery stage.
    pub fn stage(&self) -> Option<Stage> {
        Stage::try_from(self.raw_stage).ok()
    }

    /// Parsed symmetry label, if present and recognised.
    pub fn symmetry(&self) -> Option<Symmetry> {
        self.left_right_symmetry
            .as_deref()
            .and_then(Symmetry::from_label)
    }

    /// Scalp coverage in percent (the complement of exposure).
    pub fn coverage_percent(&self) -> f64 {
        100.0 - self.scalp_exposure_percent
    }

    pub fn density_status(&self) -> MetricStatus {
        MetricStatus::grade(
            self.density_score,
            defaults::DENSITY_GOOD,
            defaults::DENSITY_MEDIUM,
        )
    }

    pub fn coverage_status(&self) -> MetricStatus {
        MetricStatus::grade(
            self.coverage_percent(),
            defaults::COVERAGE_GOOD,
            defaults::COVERAGE_MEDIUM,
        )
    }

    /// True when every bounded field is inside its documented range.
    pub fn is_within_bounds(&self) -> bool {
        self.stage().is_some()
            && (0.0..=100.0).contains(&self.density_score)
            && (0.0..=100.0).contains(&self.scalp_exposure_percent)
            && self.parting_width_px >= 0.0
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// Hair recovery stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// 0: visible exposure, no new growth.
    Shedding,
    /// 1: first vellus hairs appear.
    EarlyRegrowth,
    /// 2: parting narrows.
    Growth,
    /// 3: largely recovered.
    Stable,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Shedding,
        Stage::EarlyRegrowth,
        Stage::Growth,
        Stage::Stable,
    ];

    pub fn index(self) -> u8 {
        match self {
            Stage::Shedding => 0,
            Stage::EarlyRegrowth => 1,
            Stage::Growth => 2,
            Stage::Stable => 3,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Shedding => "掉发期",
            Stage::EarlyRegrowth => "新生绒毛期",
            Stage::Growth => "增长期",
            Stage::Stable => "稳定维护期",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Shedding => "暴露明显，无绒毛",
            Stage::EarlyRegrowth => "开始恢复",
            Stage::Growth => "发缝收窄",
            Stage::Stable => "基本恢复",
        }
    }
}

impl TryFrom<i64> for Stage {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Stage::Shedding),
            1 => Ok(Stage::EarlyRegrowth),
            2 => Ok(Stage::Growth),
            3 => Ok(Stage::Stable),
            other => Err(other),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.name())
    }
}

// =============================================================================
// SYMMETRY
// =============================================================================

/// Left/right symmetry of the hair distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symmetry {
    #[serde(rename = "正常")]
    Normal,
    #[serde(rename = "不对称")]
    Asymmetric,
    #[serde(rename = "未知")]
    Unknown,
}

impl Symmetry {
    pub fn label(self) -> &'static str {
        match self {
            Symmetry::Normal => "正常",
            Symmetry::Asymmetric => "不对称",
            Symmetry::Unknown => "未知",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "正常" => Some(Symmetry::Normal),
            "不对称" => Some(Symmetry::Asymmetric),
            "未知" => Some(Symmetry::Unknown),
            _ => None,
        }
    }
}

// =============================================================================
// METRIC GRADING
// =============================================================================

/// Coarse grade shown next to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    Medium,
    Poor,
}

impl MetricStatus {
    /// Grade `value` against inclusive lower thresholds.
    pub fn grade(value: f64, good: f64, medium: f64) -> Self {
        if value >= good {
            MetricStatus::Good
        } else if value >= medium {
            MetricStatus::Medium
        } else {
            MetricStatus::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricStatus::Good => "良好",
            MetricStatus::Medium => "一般",
            MetricStatus::Poor => "需要改善",
        }
    }
}

// =============================================================================
// ADVICE
// =============================================================================

/// Encouraging summary and one actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub summary: String,
    pub advice: String,
}

impl AdviceResult {
    pub fn new(summary: impl Into<String>, advice: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            advice: advice.into(),
        }
    }
}

// =============================================================================
// QUALITY CHECK
// =============================================================================

/// Overall image quality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallQuality {
    High,
    Medium,
    Low,
}

impl OverallQuality {
    /// Fixed confidence table: high 85, medium 70, low 55.
    pub fn confidence_score(self) -> u8 {
        match self {
            OverallQuality::High => defaults::CONFIDENCE_HIGH,
            OverallQuality::Medium => defaults::CONFIDENCE_MEDIUM,
            OverallQuality::Low => defaults::CONFIDENCE_LOW,
        }
    }
}

/// Result of the image quality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheckResult {
    pub is_clear: bool,
    pub has_good_lighting: bool,
    pub has_hair_region: bool,
    pub overall_quality: OverallQuality,
    pub suggestions: Vec<String>,
}

impl QualityCheckResult {
    /// The verdict used while no real quality analysis exists.
    pub fn high_quality() -> Self {
        Self {
            is_clear: true,
            has_good_lighting: true,
            has_hair_region: true,
            overall_quality: OverallQuality::High,
            suggestions: Vec::new(),
        }
    }

    pub fn confidence_score(&self) -> u8 {
        self.overall_quality.confidence_score()
    }
}

/// Display tier for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ConfidenceTier::High
        } else if score >= 60 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

// =============================================================================
// IMAGE INPUT
// =============================================================================

/// An image selected or captured by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    /// MIME type as declared by the source.
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Build from raw bytes, detecting the MIME type from content and
    /// falling back to the file extension.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = crate::validation::detect_mime_type(&name, &data);
        Self {
            name,
            mime_type,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Whether the completion API can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Configured,
    Unconfigured,
}

impl ApiStatus {
    pub fn from_configured(configured: bool) -> Self {
        if configured {
            ApiStatus::Configured
        } else {
            ApiStatus::Unconfigured
        }
    }
}
