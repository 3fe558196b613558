//! Playhead normalizer.
//!
//! A stateful filter over a playhead sampled about once a second. Around ad
//! insertion points the host sometimes reports a value that jumps well ahead of
//! (or behind) the true position and later jumps back. The normalizer detects
//! such jumps, holds a steadily advancing value while one is outstanding, and
//! resynchronizes on trusted external signals (seek end, metadata arrival, a
//! deferred reset after the break ends).
//!
//! There is no authoritative clock to check against, so the correction is a
//! heuristic. Every transition and anomaly is logged with before/after values.
//!
//! The state machine has a single entry point, [`PlayheadNormalizer::apply`],
//! which returns the corrected playhead and the [`Effect`]s the signal caused.

mod config;
mod history;
mod signal;
mod state;

pub use config::NormalizerConfig;
pub use history::{JumpEntry, JumpHistory, JUMP_HISTORY_CAPACITY};
pub use signal::{AnomalyKind, Effect, ResyncReason, Signal, Transition};
pub use state::{Jump, Mode, NormalizerState};

use tracing::{debug, info, warn};

/// Mode-aware playhead anomaly filter.
#[derive(Debug, Clone, Default)]
pub struct PlayheadNormalizer {
    config: NormalizerConfig,
    state: NormalizerState,
    history: JumpHistory,
}

impl PlayheadNormalizer {
    /// Create a normalizer with the given tuning.
    pub fn new(config: NormalizerConfig) -> Self {
        debug!("Playhead normalizer initialized: {:?}", config);
        Self {
            config,
            state: NormalizerState::default(),
            history: JumpHistory::new(),
        }
    }

    /// Apply one signal and report what it did.
    pub fn apply(&mut self, signal: Signal) -> Transition {
        let was_pending = self.state.expecting_jump.is_pending();
        let mut effects = Vec::new();

        match signal {
            Signal::Ready => self.reset_session(&mut effects),
            Signal::Sample(time) => self.sample(time, &mut effects),
            Signal::SeekStarted { target } => {
                info!("Seek started - target {}", target);
                self.state.is_seeking = true;
            }
            Signal::SeekFinished { time } => {
                info!("Seek finished - resetting to {}", time);
                self.resync(time, ResyncReason::Seek, &mut effects);
                self.state.is_seeking = false;
            }
            Signal::TimeShiftStarted { offset } => {
                info!("Time shift started - offset {}", offset);
                self.state.is_seeking = true;
            }
            Signal::TimeShiftFinished { time } => {
                info!("Time shift finished - resetting to {}", time);
                self.resync(time, ResyncReason::TimeShift, &mut effects);
                self.state.is_seeking = false;
            }
            Signal::AdBreakStarted => {
                info!("Ad break started");
                self.set_mode(Mode::AdsPlaying, &mut effects);
            }
            Signal::AdBreakFinished => self.ad_break_finished(&mut effects),
            Signal::DateRangeMetadataReceived => self.metadata_received(&mut effects),
        }

        let now_pending = self.state.expecting_jump.is_pending();
        if !was_pending && now_pending {
            info!("Normalizing started - expecting {} jump", self.state.expecting_jump);
            effects.push(Effect::NormalizingStarted);
        } else if was_pending && !now_pending {
            info!("Normalizing finished");
            effects.push(Effect::NormalizingFinished);
        }

        Transition {
            normalized: self.state.last_normalized_playhead,
            expecting_jump: self.state.expecting_jump,
            effects,
        }
    }

    /// Normalize a playhead sample.
    pub fn normalize(&mut self, time: f64) -> f64 {
        self.apply(Signal::Sample(time)).normalized
    }

    /// Start of a new playback session; clears all state and history.
    pub fn on_ready(&mut self) -> Transition {
        self.apply(Signal::Ready)
    }

    /// Seek started; samples are held until it finishes.
    pub fn on_seek(&mut self, target: f64) -> Transition {
        self.apply(Signal::SeekStarted { target })
    }

    /// Seek finished at `time`; resyncs to it.
    pub fn on_seeked(&mut self, time: f64) -> Transition {
        self.apply(Signal::SeekFinished { time })
    }

    /// Live time shift started.
    pub fn on_time_shift(&mut self, offset: f64) -> Transition {
        self.apply(Signal::TimeShiftStarted { offset })
    }

    /// Time shift finished at `time`; resyncs to it.
    pub fn on_time_shifted(&mut self, time: f64) -> Transition {
        self.apply(Signal::TimeShiftFinished { time })
    }

    /// Switch to the ads policy.
    pub fn on_ad_break_started(&mut self) -> Transition {
        self.apply(Signal::AdBreakStarted)
    }

    /// Leave the ads policy and arm the deferred reset.
    pub fn on_ad_break_finished(&mut self) -> Transition {
        self.apply(Signal::AdBreakFinished)
    }

    /// Tell the normalizer ad-marker metadata arrived.
    ///
    /// Outside the ads modes this forces a resync to the last raw sample, since
    /// metadata arrival is the most trustworthy signal that an ad region is
    /// about to start.
    pub fn notify_date_range_metadata_received(&mut self) -> Transition {
        self.apply(Signal::DateRangeMetadataReceived)
    }

    /// Last corrected playhead.
    pub fn current_normalized_time(&self) -> f64 {
        self.state.last_normalized_playhead
    }

    /// Last raw playhead.
    pub fn current_raw_time(&self) -> f64 {
        self.state.last_raw_playhead
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn expecting_jump(&self) -> Jump {
        self.state.expecting_jump
    }

    pub fn state(&self) -> &NormalizerState {
        &self.state
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn jump_history(&self) -> &JumpHistory {
        &self.history
    }

    /// Net jump delta recorded after raw time `raw_time`.
    pub fn delta_since(&self, raw_time: f64) -> f64 {
        self.history.delta_since(raw_time)
    }

    /// Re-derive a value normalized against an older baseline.
    ///
    /// `normalized` was computed when the raw playhead was `raw_time`. The
    /// result accounts for every jump recorded since then.
    pub fn normalize_to_current(&self, raw_time: f64, normalized: f64) -> f64 {
        let delta_since = self.delta_since(raw_time);
        normalized - (delta_since - (normalized - raw_time))
    }

    fn reset_session(&mut self, effects: &mut Vec<Effect>) {
        info!("Session ready - resetting normalizer state");
        let previous = self.state.mode;
        self.state = NormalizerState::default();
        self.history.clear();
        if previous != Mode::Unknown {
            effects.push(Effect::ModeChanged {
                from: previous,
                to: Mode::Unknown,
            });
        }
    }

    fn sample(&mut self, time: f64, effects: &mut Vec<Effect>) {
        if !self.state.seeded {
            debug!("First playhead sample {}", time);
            self.state.seeded = true;
            self.state.last_raw_playhead = time;
            self.state.last_normalized_playhead = time;
            return;
        }

        if self.state.is_seeking {
            debug!(
                "Sample {} while seeking; keeping {}",
                time, self.state.last_normalized_playhead
            );
            return;
        }

        let delta = time - self.state.last_raw_playhead;

        if let Some(remaining) = self.state.scheduled_reset {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.state.scheduled_reset = None;
                // The reciprocal jump can land just after ad-break-finished;
                // adopt the raw value once the grace window has passed.
                if self.state.expecting_jump.is_pending() {
                    info!("Hit scheduled reset");
                    self.resync(time, ResyncReason::ScheduledReset, effects);
                    return;
                }
            } else {
                self.state.scheduled_reset = Some(remaining);
            }
        }

        let normalized = if self.state.mode.is_ads() {
            self.ads_policy(time, delta, effects)
        } else if self.config.normalize_outside_ads {
            self.default_policy(time, delta, effects)
        } else {
            self.passthrough(time, delta)
        };

        self.state.last_raw_playhead = time;
        self.state.last_normalized_playhead = normalized;
    }

    fn ads_policy(&mut self, time: f64, delta: f64, effects: &mut Vec<Effect>) -> f64 {
        if self.state.expecting_jump.is_pending() {
            let normalized = self.increment_prev();
            debug!(
                "Waiting for {} jump; raw {} normalized to {}",
                self.state.expecting_jump, time, normalized
            );
            return normalized;
        }

        if delta > self.config.ads_forward_threshold {
            self.unexpected_jump(AnomalyKind::UnexpectedForward, time, delta, effects)
        } else if delta < self.config.backward_threshold {
            self.unexpected_jump(AnomalyKind::UnexpectedBackward, time, delta, effects)
        } else {
            self.state.last_good_delta = delta;
            time
        }
    }

    fn default_policy(&mut self, time: f64, delta: f64, effects: &mut Vec<Effect>) -> f64 {
        let expecting = self.state.expecting_jump;

        if delta > self.config.default_forward_threshold {
            if expecting == Jump::Forward {
                self.expected_jump(time, delta, effects)
            } else {
                self.unexpected_jump(AnomalyKind::UnexpectedForward, time, delta, effects)
            }
        } else if delta < self.config.backward_threshold {
            if expecting == Jump::Backward {
                self.expected_jump(time, delta, effects)
            } else {
                self.unexpected_jump(AnomalyKind::UnexpectedBackward, time, delta, effects)
            }
        } else if expecting.is_pending() {
            let normalized = self.increment_prev();
            debug!("Waiting for {} jump; normalizing incrementally to {}", expecting, normalized);
            normalized
        } else {
            self.state.last_good_delta = delta;
            time
        }
    }

    /// Accept the raw sample unless a jump from an ads mode is still
    /// outstanding; then keep advancing until the scheduled reset clamps.
    fn passthrough(&mut self, time: f64, delta: f64) -> f64 {
        if self.state.expecting_jump.is_pending() {
            let normalized = self.increment_prev();
            debug!(
                "Holding until scheduled reset; raw {} normalized to {}",
                time, normalized
            );
            return normalized;
        }

        if delta <= self.config.default_forward_threshold && delta >= self.config.backward_threshold
        {
            self.state.last_good_delta = delta;
        }
        time
    }

    fn unexpected_jump(
        &mut self,
        kind: AnomalyKind,
        time: f64,
        delta: f64,
        effects: &mut Vec<Effect>,
    ) -> f64 {
        self.state.expecting_jump = match kind {
            AnomalyKind::UnexpectedForward => Jump::Backward,
            AnomalyKind::UnexpectedBackward => Jump::Forward,
        };
        let normalized = self.increment_prev();
        self.history.record(time, delta);

        warn!(
            "Unexpected jump {:?} of {:.3} in {} mode; normalizing {} to {} (previous raw {}, normalized {})",
            kind,
            delta,
            self.state.mode,
            time,
            normalized,
            self.state.last_raw_playhead,
            self.state.last_normalized_playhead
        );

        effects.push(Effect::Anomaly {
            kind,
            raw: time,
            delta,
            normalized,
        });
        normalized
    }

    fn expected_jump(&mut self, time: f64, delta: f64, effects: &mut Vec<Effect>) -> f64 {
        info!(
            "Received expected {} jump of {:.3}; reset playhead to {}",
            self.state.expecting_jump, delta, time
        );
        self.state.expecting_jump = Jump::None;
        self.history.record(time, delta);
        effects.push(Effect::ExpectedJump { raw: time, delta });
        time
    }

    fn ad_break_finished(&mut self, effects: &mut Vec<Effect>) {
        self.set_mode(Mode::MediaPlaying, effects);

        let samples = self.config.post_break_reset_samples;
        if samples == 0 {
            if self.state.expecting_jump.is_pending() {
                let time = self.state.last_raw_playhead;
                self.resync(time, ResyncReason::ScheduledReset, effects);
            }
            return;
        }

        self.state.scheduled_reset = Some(samples);
        info!("Ad break finished - scheduled a reset in {} samples", samples);
        effects.push(Effect::ResetScheduled { samples });
    }

    fn metadata_received(&mut self, effects: &mut Vec<Effect>) {
        if self.state.mode.is_ads() {
            debug!("Date range metadata received; already in {} mode", self.state.mode);
            return;
        }

        if !self.state.seeded {
            // Nothing to resync to yet; the first sample still seeds verbatim.
            debug!("Date range metadata received before the first sample");
            self.set_mode(Mode::MetadataReceived, effects);
            return;
        }

        let time = self.state.last_raw_playhead;
        self.resync(time, ResyncReason::Metadata, effects);
        self.set_mode(Mode::MetadataReceived, effects);
    }

    fn set_mode(&mut self, mode: Mode, effects: &mut Vec<Effect>) {
        if self.state.mode == mode {
            return;
        }
        info!("Mode {} -> {}", self.state.mode, mode);
        effects.push(Effect::ModeChanged {
            from: self.state.mode,
            to: mode,
        });
        self.state.mode = mode;
    }

    /// Replace the baseline with `time` and drop any outstanding expectation.
    fn resync(&mut self, time: f64, reason: ResyncReason, effects: &mut Vec<Effect>) {
        info!(
            "Resetting playhead ({:?}) to {} from {} | {}",
            reason, time, self.state.last_raw_playhead, self.state.last_normalized_playhead
        );
        effects.push(Effect::Resync {
            reason,
            from_raw: self.state.last_raw_playhead,
            from_normalized: self.state.last_normalized_playhead,
            to: time,
        });
        self.state.seeded = true;
        self.state.last_raw_playhead = time;
        self.state.last_normalized_playhead = time;
        self.state.expecting_jump = Jump::None;
    }

    /// Advance the last good value by the last good delta.
    fn increment_prev(&self) -> f64 {
        let increment = if self.state.last_good_delta > 0.0 {
            self.state.last_good_delta
        } else {
            self.config.default_increment
        };
        self.state.last_normalized_playhead + increment
    }
}
