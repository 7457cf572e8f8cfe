//! # tvplay-resolver
//!
//! Resolves the indirect playback URLs some providers return into a URL an
//! engine can load.
//!
//! Features:
//! - Cancellable resolution tasks with at-most-once completion callbacks
//! - JSON parse-endpoint resolver over reqwest, trying parsers in order

pub mod http;
pub mod task;

pub use http::{HttpResolver, Parser, ResolverConfig};
pub use task::{Resolution, ResolutionCallback, ResolutionHandle, ResolutionOutcome, Resolver};
