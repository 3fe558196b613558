//! Adsync - playhead normalization and ad-beacon scheduling
//!
//! This library crate wires the timeline, normalizer and emitter into a
//! playback session and exposes it for the CLI and integration tests.

pub mod config;
pub mod replay;
pub mod session;
