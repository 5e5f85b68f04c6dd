//! Core types shared across scrutiny facilities
//!
//! This crate provides the constants that both the logging facility and the
//! report wire format agree on:
//!
//! - **Schema constants**: canonical structured-logging field keys and event names
//! - **Wire markers**: sentinel diff field names understood by every report consumer

pub mod schema;
pub mod wire;
