#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Straico API
//!
//! Covers model listing, prompt completion, file upload, and image
//! generation. Responses wrapped in the service's `success`/`data`
//! envelope are unwrapped; other bodies are returned unchanged.

mod client;
mod envelope;
pub mod error;
pub mod types;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, StraicoClient};
pub use error::{Result, StraicoError};
pub use types::*;
