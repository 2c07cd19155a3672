//! # Sentir Common Library
//!
//! Shared code for the Sentir services:
//! - Error types
//! - Configuration file resolution and loading
//! - Logging bootstrap

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
