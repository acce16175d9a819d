//! mockprep-core: Adaptive scoring and progression engine for mock interviews.
//!
//! This crate defines the data model, the external capability traits, and
//! the three engine components (rubric scorer, progress tracker, question
//! selector) that the rest of mockprep builds on.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod guard;
pub mod model;
pub mod parser;
pub mod progress;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod statistics;
pub mod traits;
