//! Scrutiny Engine - Orchestration layer
//!
//! Provides high-level command orchestration that coordinates schema
//! loading, ingestion, comparison and report assembly.

#![allow(clippy::result_large_err)]

pub mod commands;
