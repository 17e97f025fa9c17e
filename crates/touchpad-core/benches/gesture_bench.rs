//! Criterion benchmarks for the line parser and gesture tracker.
//!
//! The relay delivers samples at the touch controller's report rate, so the
//! per-line cost has to stay far below one millisecond.
//!
//! Run with:
//! ```bash
//! cargo bench --package touchpad-core --bench gesture_bench
//! ```

use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use touchpad_core::{parse_line, EventLineParser, GestureTracker};

const POSITION_LINE: &str = "/dev/input/event4: EV_ABS       ABS_MT_POSITION_X    000001a4";
const SYNC_LINE: &str = "/dev/input/event4: EV_SYN       SYN_REPORT           00000000";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_position_line", |b| {
        b.iter(|| parse_line(black_box(POSITION_LINE)))
    });
    c.bench_function("parse_sync_line", |b| b.iter(|| parse_line(black_box(SYNC_LINE))));
}

fn bench_track(c: &mut Criterion) {
    let parser = EventLineParser::with_device_filter("/dev/input/event4");
    let lines: Vec<String> = (0..64u32)
        .flat_map(|i| {
            [
                format!("/dev/input/event4: EV_ABS ABS_MT_POSITION_X {:08x}", 400 + i),
                format!("/dev/input/event4: EV_ABS ABS_MT_POSITION_Y {:08x}", 300 + i),
                SYNC_LINE.to_string(),
            ]
        })
        .collect();

    c.bench_function("track_64_samples", |b| {
        b.iter(|| {
            let mut tracker = GestureTracker::default();
            let now = Instant::now();
            tracker.handle(touchpad_core::TouchEvent::FingerDown { tracking_id: 1 }, now, true);
            for line in &lines {
                if let Some(event) = parser.parse(line) {
                    black_box(tracker.handle(event, now, true));
                }
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_track);
criterion_main!(benches);
