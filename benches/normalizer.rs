//! Benchmark the per-sample normalizer path and beacon delivery.
//!
//! Simulates an hour of 1 Hz samples with a spurious jump inside every
//! 30-second ad break every five minutes.

use adsync_playhead::{
    DateRangeTag, PlayheadNormalizer, ScheduledMetadataEmitter, Signal,
};
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SAMPLES: usize = 3600;

fn session_signals() -> Vec<Signal> {
    let mut signals = Vec::with_capacity(SAMPLES + 64);
    let mut skew = 0.0;
    for i in 0..SAMPLES {
        let in_break = i % 300;
        if in_break == 0 {
            signals.push(Signal::DateRangeMetadataReceived);
            signals.push(Signal::AdBreakStarted);
        }
        if in_break == 10 {
            skew = 3.0;
        }
        if in_break == 30 {
            signals.push(Signal::AdBreakFinished);
            skew = 0.0;
        }
        signals.push(Signal::Sample(i as f64 + skew));
    }
    signals
}

fn bench_normalizer(c: &mut Criterion) {
    let signals = session_signals();
    let mut group = c.benchmark_group("normalizer");

    group.bench_function("apply_hour_of_samples", |b| {
        b.iter(|| {
            let mut normalizer = PlayheadNormalizer::default();
            for signal in &signals {
                black_box(normalizer.apply(*signal));
            }
            normalizer.current_normalized_time()
        });
    });

    group.bench_function("emitter_hour_of_beacons", |b| {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        b.iter(|| {
            let mut emitter = ScheduledMetadataEmitter::default();
            for i in 0..SAMPLES {
                if i % 300 == 0 {
                    let begin = start + chrono::Duration::seconds(i as i64);
                    let tag = DateRangeTag::new(
                        format!("M{}", i / 300),
                        begin,
                        Some(begin + chrono::Duration::seconds(30)),
                    );
                    emitter.on_date_range(&tag, i as f64);
                }
                black_box(emitter.on_time_changed(i as f64));
            }
            emitter.pending()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_normalizer);
criterion_main!(benches);
