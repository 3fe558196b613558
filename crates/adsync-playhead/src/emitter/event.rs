//! Scheduled tracking beacons.

use adsync_common::{BeaconKind, MediaId};
use chrono::{DateTime, Utc};
use std::fmt;

/// A tracking beacon waiting for the playhead to reach `fire_time`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedMetadataEvent {
    pub kind: BeaconKind,
    pub media_id: MediaId,
    pub segment_index: u32,
    pub segment_count: u32,
    /// Seconds from the start of the date range.
    pub offset_secs: f64,
    /// Device wall-clock instant the beacon represents.
    pub wallclock: DateTime<Utc>,
    /// Playhead at which the beacon is due.
    pub fire_time: f64,
}

impl TimedMetadataEvent {
    /// Segment sequence in `index:count` form.
    pub fn sequence(&self) -> String {
        format!("{}:{}", self.segment_index, self.segment_count)
    }

    /// True once `time` is within `grace` seconds of the fire time, or past it.
    pub fn is_due(&self, time: f64, grace: f64) -> bool {
        time - self.fire_time >= -grace
    }
}

impl fmt::Display for TimedMetadataEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} id={} seq={} offset={:.1} fire={:.3} wallclock={}",
            self.kind.code(),
            self.media_id,
            self.sequence(),
            self.offset_secs,
            self.fire_time,
            self.wallclock.to_rfc3339()
        )
    }
}
