//! Session integration tests
//!
//! Drive an `AdSession` through realistic player sequences.

use adsync::config::Config;
use adsync::replay::{read_trace, replay};
use adsync::session::{AdSession, PlayerEvent, SessionEvent};
use adsync_common::BeaconKind;
use adsync_playhead::DateRangeTag;
use adsync_timeline::AdBreakDescriptor;
use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/traces")
        .join(name)
}

fn tag(id: &str, start: i64, duration: i64) -> DateRangeTag {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(start);
    DateRangeTag::new(id, start, Some(start + chrono::Duration::seconds(duration)))
}

fn beacons(events: &[SessionEvent]) -> Vec<BeaconKind> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Beacon { beacon } => Some(beacon.kind),
            _ => None,
        })
        .collect()
}

fn sample(session: &mut AdSession, time: f64) -> Vec<SessionEvent> {
    session.handle(PlayerEvent::TimeChanged { time })
}

// ---------------------------------------------------------------------------
// Normalized playback through an ad break
// ---------------------------------------------------------------------------

#[test]
fn test_jump_inside_break_is_normalized() {
    let mut session = AdSession::default();
    session.handle(PlayerEvent::Ready {
        program_date_time: None,
        device_time: None,
        seekable: None,
    });
    sample(&mut session, 8.0);
    sample(&mut session, 9.0);

    let out = session.handle(PlayerEvent::DateRange { tag: tag("M1", 10, 6) });
    assert_matches!(out.as_slice(), [SessionEvent::MetadataParsed { beacons }] if beacons.len() == 4);

    session.handle(PlayerEvent::AdBreakStarted);
    assert_eq!(beacons(&sample(&mut session, 10.0)), vec![BeaconKind::Start]);

    let out = sample(&mut session, 14.0);
    assert!(out.contains(&SessionEvent::NormalizingStarted));
    assert!(out.contains(&SessionEvent::Playhead {
        raw: 14.0,
        normalized: 11.0
    }));
    assert_eq!(beacons(&out), vec![BeaconKind::Mid]);

    assert!(beacons(&sample(&mut session, 15.0)).is_empty());
    assert_eq!(beacons(&sample(&mut session, 16.0)), vec![BeaconKind::Mid]);

    session.handle(PlayerEvent::AdBreakFinished);
    assert_eq!(beacons(&sample(&mut session, 17.0)), vec![BeaconKind::End]);

    let out = sample(&mut session, 18.0);
    assert!(out.contains(&SessionEvent::NormalizingFinished));
    assert_eq!(session.current_time(), 18.0);
    assert_eq!(session.emitter().pending(), 0);
}

#[test]
fn test_duplicate_tag_schedules_once() {
    let mut session = AdSession::default();
    sample(&mut session, 0.0);

    let first = session.handle(PlayerEvent::DateRange { tag: tag("M1", 0, 10) });
    let second = session.handle(PlayerEvent::DateRange { tag: tag("M1", 5, 10) });
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(session.emitter().pending(), 6);
}

#[test]
fn test_unparseable_tag_is_ignored() {
    let mut session = AdSession::default();
    let out = session.handle(PlayerEvent::DateRangeTag {
        line: "#EXT-X-DATERANGE:ID=\"x\"".to_string(),
    });
    assert!(out.is_empty());
    assert_eq!(session.emitter().pending(), 0);
}

#[test]
fn test_tag_before_first_sample_keeps_first_sample() {
    let mut session = AdSession::default();
    session.handle(PlayerEvent::Ready {
        program_date_time: None,
        device_time: None,
        seekable: None,
    });
    session.handle(PlayerEvent::DateRange { tag: tag("pre", 0, 6) });

    let out = sample(&mut session, 1000.0);
    assert!(out.contains(&SessionEvent::Playhead {
        raw: 1000.0,
        normalized: 1000.0
    }));
    assert!(!out.contains(&SessionEvent::NormalizingStarted));
    assert_eq!(session.current_time(), 1000.0);
}

#[test]
fn test_out_of_range_duration_is_ignored() {
    let mut session = AdSession::default();
    sample(&mut session, 0.0);
    for duration in ["1e13", "inf", "2000000"] {
        let out = session.handle(PlayerEvent::DateRangeTag {
            line: format!(
                "#EXT-X-DATERANGE:ID=\"x\",START-DATE=\"2024-01-01T00:00:00Z\",DURATION={}",
                duration
            ),
        });
        assert!(out.is_empty(), "DURATION={} scheduled beacons", duration);
    }
    assert_eq!(session.emitter().pending(), 0);
}

#[test]
fn test_source_unloaded_drops_pending_beacons() {
    let mut session = AdSession::default();
    sample(&mut session, 0.0);
    session.handle(PlayerEvent::DateRange { tag: tag("M1", 0, 10) });
    assert!(session.emitter().pending() > 0);

    session.handle(PlayerEvent::SourceUnloaded);
    assert_eq!(session.emitter().pending(), 0);
    assert!(beacons(&sample(&mut session, 100.0)).is_empty());
}

#[test]
fn test_seek_resyncs_playhead() {
    let mut session = AdSession::default();
    session.handle(PlayerEvent::AdBreakStarted);
    sample(&mut session, 10.0);
    sample(&mut session, 11.0);

    session.handle(PlayerEvent::Seek { target: 300.0 });
    let out = sample(&mut session, 150.0);
    assert!(out.contains(&SessionEvent::Playhead {
        raw: 150.0,
        normalized: 11.0
    }));

    session.handle(PlayerEvent::Seeked { time: 300.0 });
    let out = sample(&mut session, 301.0);
    assert!(out.contains(&SessionEvent::Playhead {
        raw: 301.0,
        normalized: 301.0
    }));
}

#[test]
fn test_timeline_changed_on_breaks_update() {
    let mut session = AdSession::default();
    let out = session.handle(PlayerEvent::AdBreaksUpdated {
        breaks: vec![
            AdBreakDescriptor::new("b2", 50.0, 5.0),
            AdBreakDescriptor::new("b1", 10.0, 10.0),
        ],
    });
    match out.as_slice() {
        [SessionEvent::TimelineChanged { timeline }] => {
            assert_eq!(timeline.len(), 2);
            assert_eq!(timeline.breaks()[0].id, "b1");
            assert_eq!(timeline.breaks()[1].relative_start, 40.0);
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert_eq!(session.seek_target(45.0), 60.0);
    assert_eq!(session.skip_ad_target(52.0), Some(55.0));
}

// ---------------------------------------------------------------------------
// Trace replay
// ---------------------------------------------------------------------------

#[test]
fn test_replay_fixture() {
    let file = File::open(fixture("ad_break.jsonl")).unwrap();
    let events = read_trace(BufReader::new(file), true).unwrap();
    assert_eq!(events.len(), 15);

    let report = replay(&Config::default(), events);
    let kinds: Vec<_> = report.beacons().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![BeaconKind::Start, BeaconKind::Mid, BeaconKind::Mid, BeaconKind::End]
    );
    assert_eq!(report.batches(), 1);
    assert_eq!(report.corrections().count(), 4);

    let start = report.beacons().next().unwrap();
    assert_eq!(start.media_id.as_str(), "M1");
    assert_eq!(
        start.wallclock,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 12).unwrap() + chrono::Duration::milliseconds(100)
    );
}

#[test]
fn test_replay_fixture_without_normalization() {
    let file = File::open(fixture("ad_break.jsonl")).unwrap();
    let events = read_trace(BufReader::new(file), true).unwrap();

    let mut config = Config::default();
    config.normalizer.enabled = false;
    let report = replay(&config, events);
    assert_eq!(report.beacons().count(), 4);
    assert_eq!(report.corrections().count(), 0);
}
