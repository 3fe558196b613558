//! Core type definitions shared by the timeline, normalizer, and emitter.
//!
//! All times are `f64` seconds. Enums serialize in lowercase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed interval of content time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range.
    pub start: f64,
    /// End of the range.
    pub end: f64,
}

impl TimeRange {
    /// Create a new range.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Compute the currently seekable window of a stream.
    pub fn seekable(window: SeekableWindow) -> Self {
        match window {
            SeekableWindow::Live {
                current_time,
                time_shift,
                max_time_shift,
            } => Self {
                start: current_time + max_time_shift - time_shift,
                end: current_time - time_shift,
            },
            SeekableWindow::Vod { duration } => Self {
                start: 0.0,
                end: duration,
            },
        }
    }

    /// Length of the range. Inverted ranges report zero.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Check whether `time` lies inside the range, bounds included.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Clamp `time` into the range.
    pub fn clamp(&self, time: f64) -> f64 {
        time.max(self.start).min(self.end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.start, self.end)
    }
}

/// Player-reported inputs for [`TimeRange::seekable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeekableWindow {
    /// A live stream with a DVR window.
    Live {
        /// Current playhead (absolute).
        current_time: f64,
        /// Current time shift; zero at the live edge, negative behind it.
        time_shift: f64,
        /// Maximum (most negative) time shift the stream allows.
        max_time_shift: f64,
    },
    /// A video-on-demand asset.
    Vod {
        /// Total stitched duration.
        duration: f64,
    },
}

/// Kind of tracking beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeaconKind {
    /// Fired just after the ad marker begins.
    Start,
    /// Fired periodically while the marker is active.
    Mid,
    /// Fired just before the marker ends.
    End,
}

impl BeaconKind {
    /// Single-letter code used on the timed-metadata wire format.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Start => "S",
            Self::Mid => "M",
            Self::End => "E",
        }
    }
}

impl fmt::Display for BeaconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Mid => write!(f, "mid"),
            Self::End => write!(f, "end"),
        }
    }
}
