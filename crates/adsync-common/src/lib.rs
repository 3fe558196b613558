//! Adsync-Common: Shared types, IDs, and errors.
//!
//! This crate provides the vocabulary used across adsync:
//!
//! - **Typed IDs**: `SessionId` for playback sessions, `MediaId` for ad-marker media identifiers
//! - **Core Types**: `TimeRange`, seekable-window computation, beacon kinds
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use adsync_common::{BeaconKind, MediaId, TimeRange};
//!
//! let window = TimeRange::new(0.0, 600.0);
//! assert!(window.contains(42.0));
//!
//! let media = MediaId::from("ad-42");
//! assert_eq!(media.as_str(), "ad-42");
//! assert_eq!(BeaconKind::Mid.code(), "M");
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
