//! Financial Document Analyzer
//!
//! A fixed four-step pipeline of persona-driven LLM tasks over an
//! uploaded financial PDF:
//!
//! VERIFY → ANALYZE → ADVISE → ASSESS RISK
//!
//! Each task binds one agent persona and the shared document reader
//! tool; outputs flow forward explicitly from task to task.

pub mod agents;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod tasks;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use config::{AppConfig, ModelBinding, ModelProvider};
pub use models::*;
