//! Emitter tuning.

use crate::error::{Error, Result};

/// Schedule and delivery parameters for [`super::ScheduledMetadataEmitter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct EmitterConfig {
    /// Lead-in of the start beacon and lead-out of the end beacon.
    pub lead_in_secs: f64,
    /// Spacing of mid beacons.
    pub mid_interval_secs: f64,
    /// A beacon is delivered once the playhead is this close to its fire time.
    pub fire_grace_secs: f64,
    /// Tags for the same media id starting closer than this are duplicates.
    pub duplicate_window_secs: f64,
    /// Deliver every due beacon per sample instead of only the earliest.
    pub drain_due_beacons: bool,
    /// Longer date ranges are ignored rather than expanded into mid beacons.
    pub max_range_secs: f64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            lead_in_secs: 0.1,
            mid_interval_secs: 2.0,
            fire_grace_secs: 1.0,
            duplicate_window_secs: 15.0,
            drain_due_beacons: true,
            max_range_secs: 3600.0,
        }
    }
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.mid_interval_secs > 0.0) {
            return Err(Error::invalid_config(format!(
                "mid_interval_secs must be positive, got {}",
                self.mid_interval_secs
            )));
        }
        if !(self.lead_in_secs >= 0.0 && self.lead_in_secs < self.mid_interval_secs / 2.0) {
            return Err(Error::invalid_config(format!(
                "lead_in_secs must be in [0, {}), got {}",
                self.mid_interval_secs / 2.0,
                self.lead_in_secs
            )));
        }
        if !(self.fire_grace_secs >= 0.0) {
            return Err(Error::invalid_config(format!(
                "fire_grace_secs must not be negative, got {}",
                self.fire_grace_secs
            )));
        }
        if !(self.duplicate_window_secs >= 0.0) {
            return Err(Error::invalid_config(format!(
                "duplicate_window_secs must not be negative, got {}",
                self.duplicate_window_secs
            )));
        }
        if !(self.max_range_secs > 0.0 && self.max_range_secs.is_finite()) {
            return Err(Error::invalid_config(format!(
                "max_range_secs must be positive and finite, got {}",
                self.max_range_secs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmitterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lead_in_secs, 0.1);
        assert_eq!(config.mid_interval_secs, 2.0);
        assert_eq!(config.duplicate_window_secs, 15.0);
    }

    #[test]
    fn test_lead_in_must_fit_interval() {
        let config = EmitterConfig {
            lead_in_secs: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EmitterConfig {
            mid_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("mid_interval_secs"));
    }

    #[test]
    fn test_max_range_must_be_finite() {
        for max_range_secs in [0.0, f64::INFINITY, f64::NAN] {
            let config = EmitterConfig {
                max_range_secs,
                ..Default::default()
            };
            assert!(config.validate().unwrap_err().to_string().contains("max_range_secs"));
        }
    }
}
