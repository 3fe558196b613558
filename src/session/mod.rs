//! Playback session wiring.
//!
//! [`AdSession`] routes player signals to the ad timeline, the playhead
//! normalizer and the beacon emitter, in the order the player reports them.

mod events;

pub use events::{PlayerEvent, SessionEvent};

use crate::config::Config;
use adsync_common::{SeekableWindow, SessionId, TimeRange};
use adsync_playhead::{
    DateRangeTag, Effect, PlayheadNormalizer, ScheduledMetadataEmitter, Signal, Transition,
};
use adsync_timeline::{AdBreakDescriptor, AdTimeline};
use chrono::{DateTime, Utc};

/// One playback session.
#[derive(Debug, Clone)]
pub struct AdSession {
    id: SessionId,
    timeline: AdTimeline,
    /// Present only when playhead normalization is enabled.
    normalizer: Option<PlayheadNormalizer>,
    emitter: ScheduledMetadataEmitter,
    raw_time: f64,
}

impl Default for AdSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AdSession {
    pub fn new(config: &Config) -> Self {
        let id = SessionId::new();
        let normalizer = config
            .normalizer
            .enabled
            .then(|| PlayheadNormalizer::new(config.normalizer.clone()));

        tracing::debug!(
            "Created session {} (normalization {})",
            id,
            if normalizer.is_some() { "on" } else { "off" }
        );

        Self {
            id,
            timeline: AdTimeline::default(),
            normalizer,
            emitter: ScheduledMetadataEmitter::new(config.emitter.clone()),
            raw_time: 0.0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn timeline(&self) -> &AdTimeline {
        &self.timeline
    }

    pub fn normalizer(&self) -> Option<&PlayheadNormalizer> {
        self.normalizer.as_ref()
    }

    pub fn emitter(&self) -> &ScheduledMetadataEmitter {
        &self.emitter
    }

    /// Last playhead the player reported.
    pub fn raw_time(&self) -> f64 {
        self.raw_time
    }

    /// Playhead the emitter schedules and fires against.
    pub fn current_time(&self) -> f64 {
        match &self.normalizer {
            Some(normalizer) => normalizer.current_normalized_time(),
            None => self.raw_time,
        }
    }

    /// Absolute position to seek the player to for a content-time target.
    pub fn seek_target(&self, relative: f64) -> f64 {
        self.timeline.relative_to_absolute(relative)
    }

    /// Content time to show the viewer for an absolute playhead.
    pub fn displayed_time(&self, absolute: f64) -> f64 {
        self.timeline.absolute_to_relative(absolute)
    }

    /// Where to seek to skip the break playing at `absolute`, if any.
    pub fn skip_ad_target(&self, absolute: f64) -> Option<f64> {
        self.timeline
            .current_break(absolute)
            .map(|current| current.absolute_end)
    }

    /// Handle one player signal and return the resulting notifications.
    pub fn handle(&mut self, event: PlayerEvent) -> Vec<SessionEvent> {
        let mut out = Vec::new();

        match event {
            PlayerEvent::Ready {
                program_date_time,
                device_time,
                seekable,
            } => self.on_ready(program_date_time, device_time, seekable, &mut out),
            PlayerEvent::TimeChanged { time } => self.on_time_changed(time, &mut out),
            PlayerEvent::Seek { target } => {
                self.drive_normalizer(|n| n.on_seek(target), &mut out);
            }
            PlayerEvent::Seeked { time } => {
                self.raw_time = time;
                self.drive_normalizer(|n| n.on_seeked(time), &mut out);
            }
            PlayerEvent::TimeShift { offset } => {
                self.drive_normalizer(|n| n.on_time_shift(offset), &mut out);
            }
            PlayerEvent::TimeShifted { time } => {
                self.raw_time = time;
                self.drive_normalizer(|n| n.on_time_shifted(time), &mut out);
            }
            PlayerEvent::AdBreakStarted => {
                self.drive_normalizer(|n| n.on_ad_break_started(), &mut out);
            }
            PlayerEvent::AdBreakFinished => {
                self.drive_normalizer(|n| n.on_ad_break_finished(), &mut out);
            }
            PlayerEvent::AdBreaksUpdated { breaks } => self.on_breaks_updated(breaks, &mut out),
            PlayerEvent::DateRange { tag } => self.on_date_range(&tag, &mut out),
            PlayerEvent::DateRangeTag { line } => match DateRangeTag::parse(&line) {
                Ok(tag) => self.on_date_range(&tag, &mut out),
                Err(e) => tracing::warn!("[{}] Ignoring date range tag: {}", self.id, e),
            },
            PlayerEvent::SourceLoaded | PlayerEvent::SourceUnloaded => {
                tracing::debug!("[{}] Source changed - resetting emitter", self.id);
                self.emitter.reset();
            }
            PlayerEvent::Error { message } => {
                tracing::warn!("[{}] Player error: {} - resetting emitter", self.id, message);
                self.emitter.reset();
            }
        }

        out
    }

    fn on_ready(
        &mut self,
        program_date_time: Option<DateTime<Utc>>,
        device_time: Option<DateTime<Utc>>,
        seekable: Option<SeekableWindow>,
        out: &mut Vec<SessionEvent>,
    ) {
        self.drive_normalizer(|n| n.on_ready(), out);

        if let Some(pdt) = program_date_time {
            let now = device_time.unwrap_or_else(Utc::now);
            self.emitter.on_ready(pdt, now);
        }

        if let Some(window) = seekable {
            let range = TimeRange::seekable(window);
            tracing::debug!(
                "[{}] Ready: seekable={} relative_playhead={}",
                self.id,
                range,
                self.raw_time - range.start
            );
        }
    }

    fn on_time_changed(&mut self, time: f64, out: &mut Vec<SessionEvent>) {
        self.raw_time = time;

        let normalized = match self.normalizer.as_mut() {
            Some(normalizer) => {
                let transition = normalizer.apply(Signal::Sample(time));
                push_lifecycle(&transition, out);
                transition.normalized
            }
            None => time,
        };

        out.push(SessionEvent::Playhead {
            raw: time,
            normalized,
        });

        for beacon in self.emitter.on_time_changed(normalized) {
            out.push(SessionEvent::Beacon { beacon });
        }
    }

    fn on_breaks_updated(&mut self, breaks: Vec<AdBreakDescriptor>, out: &mut Vec<SessionEvent>) {
        self.timeline = AdTimeline::from_descriptors(breaks);
        tracing::info!("[{}] {}", self.id, self.timeline);
        out.push(SessionEvent::TimelineChanged {
            timeline: self.timeline.clone(),
        });
    }

    fn on_date_range(&mut self, tag: &DateRangeTag, out: &mut Vec<SessionEvent>) {
        // The normalizer resyncs before the batch is timed so the schedule is
        // anchored on a trusted playhead.
        if self.emitter.would_schedule(tag) {
            self.drive_normalizer(|n| n.notify_date_range_metadata_received(), out);
        }

        let current = self.current_time();
        let beacons = self.emitter.on_date_range(tag, current);
        if !beacons.is_empty() {
            out.push(SessionEvent::MetadataParsed { beacons });
        }
    }

    fn drive_normalizer<F>(&mut self, f: F, out: &mut Vec<SessionEvent>)
    where
        F: FnOnce(&mut PlayheadNormalizer) -> Transition,
    {
        if let Some(normalizer) = self.normalizer.as_mut() {
            let transition = f(normalizer);
            push_lifecycle(&transition, out);
        }
    }
}

/// Surface normalizing started/finished; other effects are logged by the
/// normalizer itself.
fn push_lifecycle(transition: &Transition, out: &mut Vec<SessionEvent>) {
    for effect in &transition.effects {
        match effect {
            Effect::NormalizingStarted => out.push(SessionEvent::NormalizingStarted),
            Effect::NormalizingFinished => out.push(SessionEvent::NormalizingFinished),
            _ => {}
        }
    }
}
