//! Normalizer tuning.

use crate::error::{Error, Result};

/// Thresholds and switches for [`super::PlayheadNormalizer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct NormalizerConfig {
    /// Playhead normalization, on by default; when off the emitter sees raw time.
    pub enabled: bool,
    /// Apply the default policy in `unknown`/`media_playing` modes.
    pub normalize_outside_ads: bool,
    /// Largest forward delta accepted in ads modes.
    pub ads_forward_threshold: f64,
    /// Largest forward delta accepted by the default policy.
    pub default_forward_threshold: f64,
    /// Most negative delta accepted in any mode.
    pub backward_threshold: f64,
    /// Increment used before a good delta has been observed.
    pub default_increment: f64,
    /// Samples after ad-break-finished before a forced resync.
    pub post_break_reset_samples: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            normalize_outside_ads: false,
            ads_forward_threshold: 1.5,
            default_forward_threshold: 2.0,
            backward_threshold: -0.5,
            default_increment: 1.0,
            post_break_reset_samples: 2,
        }
    }
}

impl NormalizerConfig {
    /// Reject thresholds that would classify ordinary playback as a jump.
    pub fn validate(&self) -> Result<()> {
        if !(self.ads_forward_threshold > 0.0) {
            return Err(Error::invalid_config(format!(
                "ads_forward_threshold must be positive, got {}",
                self.ads_forward_threshold
            )));
        }
        if !(self.default_forward_threshold > 0.0) {
            return Err(Error::invalid_config(format!(
                "default_forward_threshold must be positive, got {}",
                self.default_forward_threshold
            )));
        }
        if !(self.backward_threshold < 0.0) {
            return Err(Error::invalid_config(format!(
                "backward_threshold must be negative, got {}",
                self.backward_threshold
            )));
        }
        if !(self.default_increment > 0.0) {
            return Err(Error::invalid_config(format!(
                "default_increment must be positive, got {}",
                self.default_increment
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = NormalizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ads_forward_threshold, 1.5);
        assert_eq!(config.default_forward_threshold, 2.0);
        assert_eq!(config.backward_threshold, -0.5);
        assert_eq!(config.post_break_reset_samples, 2);
        assert!(config.enabled);
        assert!(!config.normalize_outside_ads);
    }

    #[test]
    fn test_rejects_positive_backward_threshold() {
        let config = NormalizerConfig {
            backward_threshold: 0.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backward_threshold"));
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let config = NormalizerConfig {
            ads_forward_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
