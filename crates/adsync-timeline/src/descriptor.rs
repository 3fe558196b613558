//! Ad-break descriptors.
//!
//! Descriptors are the unsorted, unprocessed break list delivered by the
//! ad-management SDK. [`crate::AdTimeline`] is built from them.

use std::fmt;

/// Placement of a break within the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum AdBreakPosition {
    /// Plays before content.
    Preroll,
    /// Plays inside content.
    Midroll,
    /// Plays after content.
    Postroll,
    /// The SDK did not say.
    #[default]
    Unknown,
}

impl fmt::Display for AdBreakPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preroll => write!(f, "preroll"),
            Self::Midroll => write!(f, "midroll"),
            Self::Postroll => write!(f, "postroll"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single ad inside a break descriptor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AdDescriptor {
    /// Ad identifier, when the SDK provides one.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub id: Option<String>,
    /// Absolute start in seconds.
    pub absolute_start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Whether the ad carries an interactive unit.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub has_interactive_unit: bool,
    /// Whether the ad is linear (replaces content) rather than an overlay.
    #[cfg_attr(feature = "serialize", serde(default = "default_linear"))]
    pub is_linear: bool,
    /// Click-through destination.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub click_through_url: Option<String>,
}

#[cfg(feature = "serialize")]
fn default_linear() -> bool {
    true
}

impl AdDescriptor {
    /// Create a linear ad without interactive unit or click-through.
    pub fn new(id: impl Into<String>, absolute_start: f64, duration: f64) -> Self {
        Self {
            id: Some(id.into()),
            absolute_start,
            duration,
            has_interactive_unit: false,
            is_linear: true,
            click_through_url: None,
        }
    }
}

/// An ad break as reported by the ad-management SDK.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AdBreakDescriptor {
    /// Break identifier.
    pub id: String,
    /// Absolute start in seconds.
    pub absolute_start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Placement of the break.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub position: AdBreakPosition,
    /// Ads in play order.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub ads: Vec<AdDescriptor>,
}

impl AdBreakDescriptor {
    /// Create a break descriptor with no ads.
    pub fn new(id: impl Into<String>, absolute_start: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            absolute_start,
            duration,
            position: AdBreakPosition::Unknown,
            ads: Vec::new(),
        }
    }

    /// Set the placement.
    pub fn with_position(mut self, position: AdBreakPosition) -> Self {
        self.position = position;
        self
    }

    /// Append an ad.
    pub fn with_ad(mut self, ad: AdDescriptor) -> Self {
        self.ads.push(ad);
        self
    }
}
