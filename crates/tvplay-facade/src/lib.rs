//! # tvplay-facade
//!
//! Playback-control facade for tvplay.
//!
//! `PlaybackFacade` drives one engine at a time (adaptive-streaming or
//! decoder-based), forwards transport controls to it, runs the optional
//! URL resolution step before loading, and publishes normalized state and
//! error events to its subscribers.

pub mod config;
pub mod events;
pub mod facade;
pub mod messages;

#[cfg(test)]
mod testing;

pub use config::FacadeConfig;
pub use events::EventBus;
pub use facade::PlaybackFacade;
pub use messages::{DefaultMessages, LogNotifier, Messages, Notifier};
