//! Events flowing into and out of an [`super::AdSession`].
//!
//! Both enums are internally tagged with `event` so a trace is one JSON object
//! per line.

use adsync_common::SeekableWindow;
use adsync_playhead::{DateRangeTag, TimedMetadataEvent};
use adsync_timeline::{AdBreakDescriptor, AdTimeline};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PlayerEvent
// ---------------------------------------------------------------------------

/// A signal reported by the host player or the ad-management SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// New source is ready to play.
    Ready {
        /// Program date time of the stream at the initial playhead.
        #[serde(default)]
        program_date_time: Option<DateTime<Utc>>,
        /// Device clock when the player became ready; defaults to now.
        #[serde(default)]
        device_time: Option<DateTime<Utc>>,
        /// Seekable window at ready, used for diagnostics.
        #[serde(default)]
        seekable: Option<SeekableWindow>,
    },

    // -- Playhead ------------------------------------------------------------
    TimeChanged {
        time: f64,
    },
    Seek {
        target: f64,
    },
    Seeked {
        time: f64,
    },
    TimeShift {
        offset: f64,
    },
    TimeShifted {
        time: f64,
    },

    // -- Ads -----------------------------------------------------------------
    AdBreakStarted,
    AdBreakFinished,
    AdBreaksUpdated {
        breaks: Vec<AdBreakDescriptor>,
    },
    DateRange {
        tag: DateRangeTag,
    },
    /// An unparsed `#EXT-X-DATERANGE` playlist line.
    DateRangeTag {
        line: String,
    },

    // -- Source lifecycle ----------------------------------------------------
    SourceLoaded,
    SourceUnloaded,
    Error {
        #[serde(default)]
        message: String,
    },
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Notification produced while handling a [`PlayerEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The ad-break list was rebuilt.
    TimelineChanged { timeline: AdTimeline },
    /// A playhead sample and its corrected value.
    Playhead { raw: f64, normalized: f64 },
    NormalizingStarted,
    NormalizingFinished,
    /// A beacon batch was scheduled.
    MetadataParsed { beacons: Vec<TimedMetadataEvent> },
    /// A beacon is due and should be reported to the analytics session.
    Beacon { beacon: TimedMetadataEvent },
}
