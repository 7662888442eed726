//! LungVision Client Library
//!
//! Async access to the LungVision prediction service plus the pieces the
//! terminal front end needs to drive an intake [`Session`].
//!
//! # Modules
//!
//! - [`config`]: Base URL and timeout resolution
//! - [`api`]: `reqwest` client for every service endpoint
//! - [`predictor`]: Analysis-step driver over a [`Predictor`]
//! - [`chat`]: Assistant conversation history
//! - [`error`]: Error taxonomy shown to the patient
//!
//! [`Session`]: lungvision_core::Session

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod predictor;

pub use api::{ApiClient, HealthStatus};
pub use chat::{ChatBackend, ChatMessage, ChatSession, Sender};
pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use error::{ApiError, ApiResult};
pub use predictor::{retry_analysis, run_analysis, AnalysisOutcome, Pacing, Predictor, Recovery};
