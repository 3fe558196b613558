//! Ad timeline for SSAI playback.
//!
//! The timeline is rebuilt wholesale from the SDK's break list on every update
//! and never mutated in place. Lookups never fail: a time outside every break
//! is treated as plain content time.

mod builder;

pub use builder::AdTimelineBuilder;

use crate::descriptor::{AdBreakDescriptor, AdBreakPosition};
use std::fmt;

/// A single ad within a break.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Ad {
    /// Ad identifier, if the SDK provided one.
    pub id: Option<String>,
    /// Absolute start in seconds.
    pub absolute_start: f64,
    /// Relative start; the parent break's relative start.
    pub relative_start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Absolute end (`absolute_start + duration`).
    pub absolute_end: f64,
    /// Whether the ad carries an interactive unit.
    pub has_interactive_unit: bool,
    /// Click-through destination.
    pub click_through_url: Option<String>,
    /// Linear (content-replacing) ad.
    pub is_linear: bool,
}

impl Ad {
    /// Check whether `time` lies strictly inside the ad.
    pub fn contains(&self, time: f64) -> bool {
        self.absolute_start < time && time < self.absolute_end
    }
}

/// An ad break placed on both coordinate systems.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AdBreak {
    /// Break identifier.
    pub id: String,
    /// Absolute start in seconds.
    pub absolute_start: f64,
    /// Absolute end (`absolute_start + duration`).
    pub absolute_end: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Content-time position the break occupies.
    pub relative_start: f64,
    /// Placement of the break.
    pub position: AdBreakPosition,
    /// Ads in play order.
    pub ads: Vec<Ad>,
}

impl AdBreak {
    /// Check whether `time` lies strictly inside the break.
    ///
    /// Both boundaries are exclusive: a time exactly at the start or end of a
    /// break is content time.
    pub fn contains(&self, time: f64) -> bool {
        self.absolute_start < time && time < self.absolute_end
    }
}

/// Sorted ad breaks with absolute/relative translation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AdTimeline {
    breaks: Vec<AdBreak>,
}

impl AdTimeline {
    /// Create a new timeline builder.
    pub fn builder() -> AdTimelineBuilder {
        AdTimelineBuilder::new()
    }

    /// Build a timeline from an unordered set of break descriptors.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = AdBreakDescriptor>,
    {
        AdTimelineBuilder::new().ad_breaks(descriptors).build()
    }

    /// Breaks sorted by absolute start.
    pub fn breaks(&self) -> &[AdBreak] {
        &self.breaks
    }

    /// Number of breaks.
    pub fn len(&self) -> usize {
        self.breaks.len()
    }

    /// True when the stream has no breaks.
    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }

    /// Sum of every break's duration.
    pub fn total_ad_duration(&self) -> f64 {
        self.breaks.iter().map(|b| b.duration).sum()
    }

    /// Translate content time into stitched time.
    ///
    /// Every break whose relative start lies strictly before `time` has already
    /// played and contributes its duration; a break exactly at `time` has not.
    pub fn relative_to_absolute(&self, time: f64) -> f64 {
        let passed: f64 = self
            .breaks
            .iter()
            .filter(|b| b.relative_start < time)
            .map(|b| b.duration)
            .sum();
        time + passed
    }

    /// Translate stitched time into content time.
    ///
    /// Inside a break the result is clamped to that break's relative start.
    pub fn absolute_to_relative(&self, time: f64) -> f64 {
        if let Some(current) = self.current_break(time) {
            return current.relative_start;
        }

        let passed: f64 = self
            .breaks
            .iter()
            .filter(|b| b.absolute_end < time)
            .map(|b| b.duration)
            .sum();
        time - passed
    }

    /// Find the break strictly containing `time`.
    pub fn current_break(&self, time: f64) -> Option<&AdBreak> {
        self.breaks.iter().find(|b| b.contains(time))
    }

    /// Find the ad strictly containing `time`.
    pub fn current_ad(&self, time: f64) -> Option<&Ad> {
        self.current_break(time)?
            .ads
            .iter()
            .find(|ad| ad.contains(time))
    }

    /// Seconds elapsed inside the current ad, or `time` itself outside ads.
    pub fn ad_time(&self, time: f64) -> f64 {
        match self.current_ad(time) {
            Some(ad) => time - ad.absolute_start,
            None => time,
        }
    }
}

impl fmt::Display for AdTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timeline has {} ad breaks.", self.breaks.len())?;
        for b in &self.breaks {
            write!(
                f,
                " [{} relative={:.3} duration={:.3} absolute={:.3}-{:.3}]",
                b.id, b.relative_start, b.duration, b.absolute_start, b.absolute_end
            )?;
        }
        Ok(())
    }
}
