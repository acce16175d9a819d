//! mockprep-providers: Question generation and answer evaluation adapters.
//!
//! Implements the `QuestionService` and `EvaluationService` traits for an
//! HTTP gateway and a local Ollama model, plus a scripted mock for tests.

pub mod api;
pub mod config;
mod error;
pub mod mock;
pub mod ollama;

pub use config::{create_services, load_config_from, MockprepConfig, ServiceConfig, Services};
