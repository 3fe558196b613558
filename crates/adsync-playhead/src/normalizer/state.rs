//! Normalizer state.

use std::fmt;

/// Which correction policy applies.
///
/// Modes are driven only by external signals; the normalizer never infers a
/// mode from the sampled time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Fresh session, nothing known yet.
    #[default]
    Unknown,
    /// Ad-marker metadata arrived; an ad region is imminent.
    MetadataReceived,
    /// Between ad-break-started and ad-break-finished.
    AdsPlaying,
    /// Content resumed after a break.
    MediaPlaying,
}

impl Mode {
    /// True for the modes that use the ads policy.
    pub fn is_ads(&self) -> bool {
        matches!(self, Self::MetadataReceived | Self::AdsPlaying)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::MetadataReceived => write!(f, "metadata_received"),
            Self::AdsPlaying => write!(f, "ads_playing"),
            Self::MediaPlaying => write!(f, "media_playing"),
        }
    }
}

/// Direction of the compensating jump the normalizer is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum Jump {
    /// No anomaly outstanding.
    #[default]
    None,
    /// An earlier backward jump is expected to be undone by a forward one.
    Forward,
    /// An earlier forward jump is expected to be undone by a backward one.
    Backward,
}

impl Jump {
    /// True while a reciprocal jump is outstanding.
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// Everything the normalizer remembers between signals.
///
/// Reset in full on every session ready.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizerState {
    pub mode: Mode,
    pub expecting_jump: Jump,
    pub last_raw_playhead: f64,
    pub last_normalized_playhead: f64,
    /// Last delta that was neither an anomaly nor a seek.
    pub last_good_delta: f64,
    /// Suppresses analysis between seek/time-shift start and end.
    pub is_seeking: bool,
    /// Samples left before a forced resync, if one is armed.
    pub scheduled_reset: Option<u32>,
    /// Whether the first sample of the session has been seen.
    pub seeded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ads_modes() {
        assert!(Mode::MetadataReceived.is_ads());
        assert!(Mode::AdsPlaying.is_ads());
        assert!(!Mode::MediaPlaying.is_ads());
        assert!(!Mode::Unknown.is_ads());
    }

    #[test]
    fn test_default_state() {
        let state = NormalizerState::default();
        assert_eq!(state.mode, Mode::Unknown);
        assert!(!state.expecting_jump.is_pending());
        assert_eq!(state.scheduled_reset, None);
        assert!(!state.seeded);
    }
}
