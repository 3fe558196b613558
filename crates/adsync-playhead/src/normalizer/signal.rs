//! Inputs and outputs of the normalizer state machine.

use super::state::{Jump, Mode};

/// A signal delivered by the host player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// New playback session; resets all state.
    Ready,
    /// Periodic playhead sample (absolute seconds).
    Sample(f64),
    /// User seek started (VOD).
    SeekStarted { target: f64 },
    /// User seek finished at `time`.
    SeekFinished { time: f64 },
    /// Time shift started (live).
    TimeShiftStarted { offset: f64 },
    /// Time shift finished at `time`.
    TimeShiftFinished { time: f64 },
    /// Ad break started.
    AdBreakStarted,
    /// Ad break finished.
    AdBreakFinished,
    /// Ad-marker date-range metadata arrived.
    DateRangeMetadataReceived,
}

/// Class of an unexpected jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum AnomalyKind {
    UnexpectedForward,
    UnexpectedBackward,
}

/// Why the baseline was forcibly replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum ResyncReason {
    Seek,
    TimeShift,
    Metadata,
    ScheduledReset,
}

/// Side effect of a transition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(tag = "effect", rename_all = "snake_case"))]
pub enum Effect {
    /// Baseline replaced by `to`; any outstanding expectation cleared.
    Resync {
        reason: ResyncReason,
        from_raw: f64,
        from_normalized: f64,
        to: f64,
    },
    /// A jump was detected and absorbed.
    Anomaly {
        kind: AnomalyKind,
        raw: f64,
        delta: f64,
        normalized: f64,
    },
    /// The reciprocal of an earlier anomaly arrived.
    ExpectedJump { raw: f64, delta: f64 },
    /// Correction policy changed.
    ModeChanged { from: Mode, to: Mode },
    /// A forced resync was armed `samples` samples ahead.
    ResetScheduled { samples: u32 },
    /// `expecting_jump` left `none`.
    NormalizingStarted,
    /// `expecting_jump` returned to `none`.
    NormalizingFinished,
}

/// Result of applying one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Corrected playhead after the signal.
    pub normalized: f64,
    /// Expected-jump direction after the signal.
    pub expecting_jump: Jump,
    /// Effects in the order they occurred.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// True if any anomaly was recorded.
    pub fn has_anomaly(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, Effect::Anomaly { .. }))
    }
}
