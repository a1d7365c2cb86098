//! Unit tests for the Consult SDK
//!
//! This module contains tests for various components of the SDK.

pub mod error_tests;
pub mod fallback_tests;
pub mod orchestrator_tests;
