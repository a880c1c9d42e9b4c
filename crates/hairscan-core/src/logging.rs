//! Structured logging field name constants for hairscan.
//!
//! All crates use these constants for consistent structured logging fields.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Session failed and the error is surfaced to the caller |
//! | WARN  | Recoverable issue, fallback data substituted |
//! | INFO  | Session lifecycle (start, done), client initialisation |
//! | DEBUG | Decision points, extraction strategy used, request sizes |
//! | TRACE | Raw model replies |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "inference", "pipeline", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "openai", "fallback", "extraction", "analyzer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "extract_features", "generate_advice", "quality_check"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Image file name being analysed.
pub const FILE_NAME: &str = "file_name";

/// Image size in bytes.
pub const FILE_SIZE: &str = "file_size";

/// Recovery stage reported by a result.
pub const STAGE: &str = "stage";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Confidence score assigned to a session.
pub const CONFIDENCE: &str = "confidence";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// JSON extraction strategy that succeeded.
pub const STRATEGY: &str = "strategy";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Error classification (see `ErrorKind`).
pub const ERROR_KIND: &str = "error_kind";

/// Whether fallback data replaced an API result.
pub const FALLBACK: &str = "fallback";
