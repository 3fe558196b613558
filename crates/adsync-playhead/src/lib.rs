//! Adsync-Playhead: playhead correction and ad-beacon scheduling
//!
//! Host players sample their playhead roughly once a second, but around ad
//! insertion points the reported value sometimes jumps far ahead or behind and
//! later jumps back. Tracking beacons scheduled against those values fire at
//! the wrong time and corrupt ad-billing analytics.
//!
//! # Modules
//!
//! - `normalizer` - Mode-aware anomaly filter over successive playhead samples
//! - `emitter` - Start/mid/end beacon schedule derived from date-range tags
//! - `error` - Errors from parsing tags and validating configuration
//!
//! # Flow
//!
//! 1. The host forwards every sample and lifecycle signal to the
//!    [`PlayheadNormalizer`], which returns the corrected playhead plus a list
//!    of tagged [`Effect`]s.
//! 2. When a date-range tag arrives, the normalizer is told first (it resyncs
//!    and enters its ads policy), then the [`ScheduledMetadataEmitter`] builds
//!    the beacon batch against the corrected time.
//! 3. On every sample the emitter compares the corrected time to the earliest
//!    queued beacon and delivers whatever is due.

pub mod emitter;
pub mod error;
pub mod normalizer;

pub use emitter::{DateRangeTag, EmitterConfig, ScheduledMetadataEmitter, TimedMetadataEvent};
pub use error::{Error, Result};
pub use normalizer::{
    AnomalyKind, Effect, Jump, JumpEntry, JumpHistory, Mode, NormalizerConfig, NormalizerState,
    PlayheadNormalizer, ResyncReason, Signal, Transition,
};
