//! Adsync-Timeline: stitched versus content time for SSAI streams
//!
//! A server-side-stitched stream plays content and ads back to back on one
//! continuous timeline. This crate models that timeline and translates between
//! its two coordinate systems.
//!
//! # Modules
//!
//! - `descriptor` - Inbound ad-break data as reported by the ad-management SDK
//! - `timeline` - The rebuilt-on-update `AdTimeline` and its lookups
//!
//! # Coordinate systems
//!
//! - **Absolute** (stitched) time is the position in the played stream,
//!   including every ad second.
//! - **Relative** (content) time is the position a viewer perceives, with ad
//!   breaks excised.
//!
//! A break at absolute `[50, 55)` preceded by a ten-second break starts at
//! relative `40`. While the playhead is inside a break the relative position is
//! pinned to the break's relative start.

pub mod descriptor;
pub mod timeline;

pub use descriptor::{AdBreakDescriptor, AdBreakPosition, AdDescriptor};
pub use timeline::{Ad, AdBreak, AdTimeline, AdTimelineBuilder};
