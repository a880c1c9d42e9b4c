//! Offline fallback data.
//!
//! Produces a plausible [`AnalysisResult`] and matching [`AdviceResult`]
//! when the completion API is unconfigured or fails. Generation never fails.
//!
//! Values come from a seeded PRNG so a given seed always yields the same
//! result. [`FallbackSeed::from_file`] derives a seed from file metadata and
//! the clock when the caller has no seed of its own.

use chrono::Utc;
use hairscan_core::{AdviceResult, AnalysisResult, Stage, Symmetry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Explicit seed for the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackSeed(pub u64);

impl FallbackSeed {
    /// Name length + byte size + current Unix milliseconds.
    pub fn from_file(name: &str, size: u64) -> Self {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        Self::from_parts(name, size, now_ms)
    }

    /// Deterministic variant of [`from_file`](Self::from_file).
    pub fn from_parts(name: &str, size: u64, timestamp_ms: u64) -> Self {
        let name_len = name.chars().count() as u64;
        Self(name_len.wrapping_add(size).wrapping_add(timestamp_ms))
    }
}

/// Inclusive value band for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn sample(&self, rng: &mut StdRng, decimals: i32) -> f64 {
        let raw = rng.gen_range(self.min..=self.max);
        let scale = 10f64.powi(decimals);
        ((raw * scale).round() / scale).clamp(self.min, self.max)
    }
}

/// Metric bands for one stage. Higher stages have denser hair, less
/// exposure and a narrower parting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageProfile {
    pub density: Band,
    pub exposure: Band,
    pub parting: Band,
}

const STAGE_PROFILES: [StageProfile; 4] = [
    StageProfile {
        density: Band::new(35.0, 50.0),
        exposure: Band::new(30.0, 45.0),
        parting: Band::new(12.0, 16.0),
    },
    StageProfile {
        density: Band::new(50.0, 65.0),
        exposure: Band::new(20.0, 30.0),
        parting: Band::new(9.0, 12.0),
    },
    StageProfile {
        density: Band::new(65.0, 80.0),
        exposure: Band::new(12.0, 20.0),
        parting: Band::new(6.0, 9.0),
    },
    StageProfile {
        density: Band::new(80.0, 92.0),
        exposure: Band::new(5.0, 12.0),
        parting: Band::new(3.0, 6.0),
    },
];

impl StageProfile {
    pub fn for_stage(stage: Stage) -> &'static StageProfile {
        &STAGE_PROFILES[stage.index() as usize]
    }
}

/// Canned advice per stage: (summary, advice).
const ADVICE_TABLE: [(&str, &str); 4] = [
    (
        "头发正处于掉发期，别担心，及时调整就有改善的机会！",
        "建议减少熬夜和烫染，温和洗护，必要时咨询皮肤科医生",
    ),
    (
        "你正处于新生绒毛期，恢复初见成效！",
        "建议继续保持营养补充和规律作息，坚持记录变化",
    ),
    (
        "头发正在稳步增长，发缝已经开始收窄，继续加油！",
        "建议保持当前护理习惯，每两周同一角度拍照对比",
    ),
    (
        "恢复效果显著，已经进入稳定维护期，为你高兴！",
        "建议保持健康作息和均衡饮食，定期复查巩固成果",
    ),
];

/// Canned advice for `stage`; out-of-range stages use the stage-1 entry.
pub fn advice_for_stage(raw_stage: i64) -> AdviceResult {
    let index = Stage::try_from(raw_stage)
        .map(|s| s.index() as usize)
        .unwrap_or(Stage::EarlyRegrowth.index() as usize);
    let (summary, advice) = ADVICE_TABLE[index];
    AdviceResult::new(summary, advice)
}

/// Seeded generator for fallback analysis results.
#[derive(Debug, Clone, Default)]
pub struct FallbackGenerator {
    fixed_seed: Option<u64>,
}

impl FallbackGenerator {
    /// Generator that derives a fresh seed per file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator pinned to one seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            fixed_seed: Some(seed),
        }
    }

    pub fn fixed_seed(&self) -> Option<u64> {
        self.fixed_seed
    }

    /// Seed to use for a file: the pinned seed, or one derived from metadata.
    pub fn seed_for(&self, name: &str, size: u64) -> FallbackSeed {
        match self.fixed_seed {
            Some(seed) => FallbackSeed(seed),
            None => FallbackSeed::from_file(name, size),
        }
    }

    /// Produce an analysis result from an explicit seed.
    pub fn analysis(&self, seed: FallbackSeed) -> AnalysisResult {
        let stage = Stage::ALL[(seed.0 % 4) as usize];
        let profile = StageProfile::for_stage(stage);
        let mut rng = StdRng::seed_from_u64(seed.0);

        let symmetry = match stage {
            Stage::Shedding => Symmetry::Asymmetric,
            Stage::EarlyRegrowth => Symmetry::Unknown,
            Stage::Growth | Stage::Stable => Symmetry::Normal,
        };

        let result = AnalysisResult {
            density_score: profile.density.sample(&mut rng, 0),
            scalp_exposure_percent: profile.exposure.sample(&mut rng, 1),
            parting_width_px: profile.parting.sample(&mut rng, 1),
            baby_hairs_visible: stage >= Stage::EarlyRegrowth,
            raw_stage: stage.index() as i64,
            hairline_stability: Some(stage >= Stage::Growth),
            left_right_symmetry: Some(symmetry.label().to_string()),
        };

        debug!(
            subsystem = "inference",
            component = "fallback",
            seed = seed.0,
            stage = result.raw_stage,
            "Generated fallback analysis"
        );
        result
    }

    /// Canned advice matching an analysis result.
    pub fn advice(&self, analysis: &AnalysisResult) -> AdviceResult {
        advice_for_stage(analysis.raw_stage)
    }
}
