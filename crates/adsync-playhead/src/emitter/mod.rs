//! Scheduled metadata emitter.
//!
//! Turns ad-marker date ranges into a start/mid/end beacon schedule expressed
//! in playhead time, and delivers each beacon as the (corrected) playhead
//! crosses it.

mod config;
mod daterange;
mod event;

pub use config::EmitterConfig;
pub use daterange::DateRangeTag;
pub use event::TimedMetadataEvent;

use adsync_common::{BeaconKind, MediaId};
use chrono::{DateTime, Duration, Utc};
use daterange::secs_to_duration;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

const SEGMENT_INDEX: u32 = 1;
const SEGMENT_COUNT: u32 = 1;

/// Beacon scheduler keyed by date-range media id.
#[derive(Debug, Clone)]
pub struct ScheduledMetadataEmitter {
    config: EmitterConfig,
    /// Pending beacons in ascending fire-time order.
    queue: VecDeque<TimedMetadataEvent>,
    /// Start of the last accepted tag per media id.
    processed: HashMap<MediaId, DateTime<Utc>>,
    /// Device clock minus the stream's program date time.
    device_offset: Duration,
}

impl Default for ScheduledMetadataEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl ScheduledMetadataEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            processed: HashMap::new(),
            device_offset: Duration::zero(),
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Record how far the device clock runs ahead of the stream's program
    /// date time. Beacon wall-clock stamps are shifted by this amount.
    pub fn on_ready(&mut self, initial_pdt: DateTime<Utc>, now: DateTime<Utc>) {
        self.device_offset = now - initial_pdt;
        debug!(
            "initial_pdt={} device_offset={}ms",
            initial_pdt.to_rfc3339(),
            self.device_offset.num_milliseconds()
        );
    }

    pub fn device_offset(&self) -> Duration {
        self.device_offset
    }

    /// True if `tag` starts within the duplicate window of the last accepted
    /// tag with the same media id.
    pub fn is_duplicate(&self, tag: &DateRangeTag) -> bool {
        self.processed.get(&tag.media_id).is_some_and(|previous| {
            let apart = (tag.start_date - *previous).num_milliseconds().abs() as f64 / 1000.0;
            apart < self.config.duplicate_window_secs
        })
    }

    /// True if [`Self::on_date_range`] would produce beacons for `tag`.
    pub fn would_schedule(&self, tag: &DateRangeTag) -> bool {
        !self.is_duplicate(tag)
            && tag
                .duration_secs()
                .is_some_and(|d| d > 0.0 && d <= self.config.max_range_secs)
    }

    /// Schedule beacons for a date range seen while the (corrected) playhead
    /// was at `current_time`.
    ///
    /// Returns the newly scheduled batch; empty when the tag is a duplicate or
    /// has no usable end.
    pub fn on_date_range(
        &mut self,
        tag: &DateRangeTag,
        current_time: f64,
    ) -> Vec<TimedMetadataEvent> {
        if self.is_duplicate(tag) {
            warn!(
                "Duplicate date range for {} starting {} - ignoring",
                tag.media_id,
                tag.start_date.to_rfc3339()
            );
            return Vec::new();
        }
        self.processed.insert(tag.media_id.clone(), tag.start_date);

        let Some(duration) = tag.duration_secs() else {
            debug!("Date range {} has no end - nothing to schedule", tag.media_id);
            return Vec::new();
        };
        if duration <= 0.0 {
            warn!(
                "Date range {} has non-positive duration {} - nothing to schedule",
                tag.media_id, duration
            );
            return Vec::new();
        }
        if duration > self.config.max_range_secs {
            warn!(
                "Date range {} lasts {}s, over the {}s limit - nothing to schedule",
                tag.media_id, duration, self.config.max_range_secs
            );
            return Vec::new();
        }

        let batch = self.schedule(tag, duration, current_time);
        info!(
            "Scheduled {} beacons for {} (duration={}, current_time={}, start={})",
            batch.len(),
            tag.media_id,
            duration,
            current_time,
            tag.start_date.to_rfc3339()
        );
        for event in &batch {
            self.enqueue(event.clone());
        }
        batch
    }

    /// Deliver the beacons due at playhead `time`.
    ///
    /// With `drain_due_beacons` off at most one beacon is delivered per call.
    pub fn on_time_changed(&mut self, time: f64) -> Vec<TimedMetadataEvent> {
        let mut delivered = Vec::new();
        while let Some(next) = self.queue.front() {
            if !next.is_due(time, self.config.fire_grace_secs) {
                break;
            }
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            info!("Firing beacon at playhead {}: {}", time, event);
            delivered.push(event);
            if !self.config.drain_due_beacons {
                break;
            }
        }
        delivered
    }

    /// Drop every pending beacon and forget processed tags.
    pub fn reset(&mut self) {
        if !self.queue.is_empty() || !self.processed.is_empty() {
            debug!(
                "Resetting emitter: dropping {} pending beacons, {} processed tags",
                self.queue.len(),
                self.processed.len()
            );
        }
        self.queue.clear();
        self.processed.clear();
    }

    /// Number of pending beacons.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fire time of the earliest pending beacon.
    pub fn next_fire_time(&self) -> Option<f64> {
        self.queue.front().map(|event| event.fire_time)
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &TimedMetadataEvent> {
        self.queue.iter()
    }

    fn schedule(
        &self,
        tag: &DateRangeTag,
        duration: f64,
        current_time: f64,
    ) -> Vec<TimedMetadataEvent> {
        let lead_in = self.config.lead_in_secs;
        let interval = self.config.mid_interval_secs;
        let wallclock_base = tag.start_date + self.device_offset;

        let beacon = |kind: BeaconKind, offset: f64| TimedMetadataEvent {
            kind,
            media_id: tag.media_id.clone(),
            segment_index: SEGMENT_INDEX,
            segment_count: SEGMENT_COUNT,
            offset_secs: offset,
            wallclock: wallclock_base + secs_to_duration(offset),
            fire_time: current_time + offset,
        };

        let mut batch = vec![beacon(BeaconKind::Start, lead_in)];
        let mut k = 1u64;
        loop {
            let offset = lead_in + k as f64 * interval;
            if offset >= duration {
                break;
            }
            batch.push(beacon(BeaconKind::Mid, offset));
            k += 1;
        }
        batch.push(beacon(BeaconKind::End, duration - lead_in));
        batch
    }

    fn enqueue(&mut self, event: TimedMetadataEvent) {
        let index = self
            .queue
            .partition_point(|queued| queued.fire_time <= event.fire_time);
        self.queue.insert(index, event);
    }
}
