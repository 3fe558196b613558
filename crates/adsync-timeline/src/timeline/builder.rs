//! Ad timeline builder.

use super::{Ad, AdBreak, AdTimeline};
use crate::descriptor::{AdBreakDescriptor, AdDescriptor};

/// Builder for creating timelines from break descriptors.
#[derive(Debug, Default)]
pub struct AdTimelineBuilder {
    descriptors: Vec<AdBreakDescriptor>,
}

impl AdTimelineBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single break.
    pub fn ad_break(mut self, descriptor: AdBreakDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add several breaks, in any order.
    pub fn ad_breaks<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = AdBreakDescriptor>,
    {
        self.descriptors.extend(descriptors);
        self
    }

    /// Build the timeline.
    ///
    /// Breaks are sorted by absolute start, then walked in order while the
    /// durations of already-placed breaks accumulate into a relative offset.
    /// This excises every ad second from content time regardless of the gaps
    /// between breaks.
    pub fn build(self) -> AdTimeline {
        let mut descriptors = self.descriptors;
        descriptors.sort_by(|a, b| a.absolute_start.total_cmp(&b.absolute_start));

        let mut relative_offset = 0.0;
        let mut breaks = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let duration = sanitize_duration(&descriptor.id, descriptor.duration);
            let relative_start = descriptor.absolute_start - relative_offset;

            let ads = descriptor
                .ads
                .into_iter()
                .map(|ad| create_ad(ad, relative_start))
                .collect();

            breaks.push(AdBreak {
                id: descriptor.id,
                absolute_start: descriptor.absolute_start,
                absolute_end: descriptor.absolute_start + duration,
                duration,
                relative_start,
                position: descriptor.position,
                ads,
            });

            relative_offset += duration;
        }

        let timeline = AdTimeline { breaks };
        tracing::debug!("Built ad timeline: {}", timeline);
        timeline
    }
}

fn create_ad(descriptor: AdDescriptor, relative_start: f64) -> Ad {
    let label = descriptor.id.as_deref().unwrap_or("unknown");
    let duration = sanitize_duration(label, descriptor.duration);

    Ad {
        absolute_start: descriptor.absolute_start,
        absolute_end: descriptor.absolute_start + duration,
        relative_start,
        duration,
        has_interactive_unit: descriptor.has_interactive_unit,
        click_through_url: descriptor.click_through_url,
        is_linear: descriptor.is_linear,
        id: descriptor.id,
    }
}

/// Negative or non-finite durations would run relative time backwards.
fn sanitize_duration(id: &str, duration: f64) -> f64 {
    if duration.is_finite() && duration >= 0.0 {
        duration
    } else {
        tracing::warn!("Ignoring invalid duration {} for '{}'; using 0", duration, id);
        0.0
    }
}
