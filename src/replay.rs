//! JSON-lines trace replay.
//!
//! A trace is one [`PlayerEvent`] per line, in the order the player delivered
//! them. Blank lines and lines starting with `#` are skipped.

use crate::config::Config;
use crate::session::{AdSession, PlayerEvent, SessionEvent};
use adsync_common::{Error, Result};
use std::io::BufRead;

/// Parse a trace.
///
/// With `strict` a malformed line fails the whole trace; otherwise it is
/// logged and skipped.
pub fn read_trace<R: BufRead>(reader: R, strict: bool) -> Result<Vec<PlayerEvent>> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<PlayerEvent>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) if strict => {
                return Err(Error::invalid_input(format!("line {}: {}", index + 1, e)));
            }
            Err(e) => tracing::warn!("Skipping trace line {}: {}", index + 1, e),
        }
    }

    Ok(events)
}

/// Output of a replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    /// Every session event, in order.
    pub events: Vec<SessionEvent>,
    /// Player events consumed.
    pub inputs: usize,
}

impl ReplayReport {
    /// Delivered beacons.
    pub fn beacons(&self) -> impl Iterator<Item = &adsync_playhead::TimedMetadataEvent> {
        self.events.iter().filter_map(|event| match event {
            SessionEvent::Beacon { beacon } => Some(beacon),
            _ => None,
        })
    }

    /// Playhead samples whose corrected value differs from the raw one.
    pub fn corrections(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SessionEvent::Playhead { raw, normalized } if raw != normalized => {
                Some((*raw, *normalized))
            }
            _ => None,
        })
    }

    /// Number of beacon batches scheduled.
    pub fn batches(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SessionEvent::MetadataParsed { .. }))
            .count()
    }
}

/// Feed `events` through a fresh session.
pub fn replay<I>(config: &Config, events: I) -> ReplayReport
where
    I: IntoIterator<Item = PlayerEvent>,
{
    let mut session = AdSession::new(config);
    let mut report = ReplayReport::default();

    for event in events {
        report.inputs += 1;
        report.events.extend(session.handle(event));
    }

    tracing::info!(
        "Replayed {} player events for session {}: {} session events",
        report.inputs,
        session.id(),
        report.events.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRACE: &str = r#"
# comment
{"event":"ready"}
{"event":"time_changed","time":1.0}

{"event":"time_changed","time":2.0}
"#;

    #[test]
    fn test_read_trace_skips_blank_and_comments() {
        let events = read_trace(Cursor::new(TRACE), true).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], PlayerEvent::TimeChanged { time: 2.0 });
    }

    #[test]
    fn test_strict_rejects_bad_line() {
        let trace = "{\"event\":\"ready\"}\n{\"event\":\"bogus\"}\n";
        let err = read_trace(Cursor::new(trace), true).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("line 2"));

        let events = read_trace(Cursor::new(trace), false).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_replay_counts_inputs() {
        let events = read_trace(Cursor::new(TRACE), true).unwrap();
        let report = replay(&Config::default(), events);
        assert_eq!(report.inputs, 3);
        assert_eq!(report.beacons().count(), 0);
        assert_eq!(report.corrections().count(), 0);
    }
}
