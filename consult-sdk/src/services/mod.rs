//! Remote and local answer sources
//!
//! This module contains the client for the query webhook, the local keyword
//! responder used when the webhook fails, and the rating submission pipeline.

pub mod webhook;
pub mod fallback;
pub mod rating;
mod common;
