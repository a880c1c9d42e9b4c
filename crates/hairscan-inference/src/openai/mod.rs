//! OpenAI-compatible completion client.
//!
//! Works with any endpoint exposing `POST /chat/completions` with
//! multimodal (text + `image_url`) user turns and bearer authentication:
//!
//! - OpenAI cloud API
//! - Azure OpenAI (via a compatible gateway)
//! - OpenRouter, vLLM, LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use hairscan_core::AnalysisBackend;
//! use hairscan_inference::openai::{OpenAIBackend, OpenAIConfig};
//!
//! #[tokio::main]
//! async fn main() -> hairscan_core::Result<()> {
//!     let config = OpenAIConfig {
//!         api_key: Some("sk-...".to_string()),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config)?;
//!
//!     let image = std::fs::read("scalp.jpg")?;
//!     let analysis = backend.extract_features(&image).await?;
//!     let advice = backend.generate_advice(&analysis).await?;
//!     println!("{}", advice.summary);
//!     Ok(())
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{encode_image, image_data_url, OpenAIBackend, OpenAIConfig};
pub use error::{to_transport_error, OpenAIErrorCode};
pub use types::*;
