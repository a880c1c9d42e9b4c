//! Centralized default constants for hairscan.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// FILE INPUT
// =============================================================================

/// Maximum accepted image size in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted by the file validator.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// MIME type declared in the data URL sent to the vision model.
pub const WIRE_IMAGE_MIME: &str = "image/jpeg";

// =============================================================================
// COMPLETION API
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const API_URL: &str = "https://api.openai.com/v1";

/// Chat completions path appended to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Vision-capable model used for feature extraction.
pub const VISION_MODEL: &str = "gpt-4o";

/// Text model used for advice generation.
pub const TEXT_MODEL: &str = "gpt-4o-mini";

/// Literal placeholder that counts as "no key configured".
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Per-request HTTP timeout in seconds.
pub const API_TIMEOUT_SECS: u64 = 60;

/// Output budget for feature extraction.
pub const VISION_MAX_TOKENS: u32 = 1000;

/// Low temperature keeps the extracted numbers literal.
pub const VISION_TEMPERATURE: f32 = 0.1;

/// Output budget for advice generation.
pub const ADVICE_MAX_TOKENS: u32 = 500;

/// Advice text is allowed some variety in phrasing.
pub const ADVICE_TEMPERATURE: f32 = 0.7;

/// Maximum characters of a model reply kept in extraction errors.
pub const EXCERPT_CHARS: usize = 200;

// =============================================================================
// SCORING
// =============================================================================

/// Confidence score for a high quality image.
pub const CONFIDENCE_HIGH: u8 = 85;

/// Confidence score for a medium quality image.
pub const CONFIDENCE_MEDIUM: u8 = 70;

/// Confidence score for a low quality image.
pub const CONFIDENCE_LOW: u8 = 55;

/// Density score at or above which density is graded good.
pub const DENSITY_GOOD: f64 = 80.0;

/// Density score at or above which density is graded medium.
pub const DENSITY_MEDIUM: f64 = 60.0;

/// Scalp coverage (100 - exposure) at or above which coverage is graded good.
pub const COVERAGE_GOOD: f64 = 82.0;

/// Scalp coverage at or above which coverage is graded medium.
pub const COVERAGE_MEDIUM: f64 = 70.0;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "HAIRSCAN_API_KEY";

/// Secondary environment variable checked for the API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "HAIRSCAN_API_URL";

/// Environment variable overriding the vision model.
pub const ENV_VISION_MODEL: &str = "HAIRSCAN_VISION_MODEL";

/// Environment variable overriding the text model.
pub const ENV_TEXT_MODEL: &str = "HAIRSCAN_TEXT_MODEL";

/// Environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT: &str = "HAIRSCAN_TIMEOUT";

/// Environment variable disabling TLS verification.
pub const ENV_SKIP_TLS_VERIFY: &str = "HAIRSCAN_SKIP_TLS_VERIFY";

/// Environment variable selecting `strict` or `graceful` failure handling.
pub const ENV_FAILURE_MODE: &str = "HAIRSCAN_FAILURE_MODE";

/// Environment variable pinning the fallback generator seed.
pub const ENV_FALLBACK_SEED: &str = "HAIRSCAN_FALLBACK_SEED";

// =============================================================================
// EVENTS
// =============================================================================

/// Capacity of the pipeline progress broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
