//! # tvplay-core
//!
//! Core types and error handling shared by the tvplay playback facade,
//! its engine seam and its resolution seam.

pub mod error;
pub mod types;

pub use error::{Error, HttpError, Result};
pub use types::*;
