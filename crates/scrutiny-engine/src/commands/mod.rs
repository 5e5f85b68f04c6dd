//! Command orchestration layer.
//!
//! Provides the end-to-end verification run and report summarization.

pub mod engine_command;
pub mod summarize;
pub mod verify;
