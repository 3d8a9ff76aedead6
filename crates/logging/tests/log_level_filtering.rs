//! Integration tests for severity filtering.
//!
//! These tests drive events through a [`Dispatcher`] and check which ones
//! reach the sink groups for a given threshold.

use std::io;
use std::sync::{Arc, Mutex};

use logging::{
    Dispatcher, FixedClock, LogCall, Severity, Sink, SinkGroup, TimestampFormat, is_enabled,
    levels, normalize,
};
use time::macros::datetime;

#[derive(Clone, Default)]
struct Collected(Arc<Mutex<Vec<(Severity, String)>>>);

impl Collected {
    fn levels(&self) -> Vec<Severity> {
        self.0.lock().unwrap().iter().map(|(level, _)| *level).collect()
    }
}

impl Sink for Collected {
    fn name(&self) -> &str {
        "collected"
    }

    fn write(&mut self, level: Severity, payload: &str) -> io::Result<()> {
        self.0.lock().unwrap().push((level, payload.to_owned()));
        Ok(())
    }
}

fn dispatcher(threshold: Severity) -> (Dispatcher, Collected, Collected) {
    let text = Collected::default();
    let structured = Collected::default();
    let dispatcher = Dispatcher::new(
        "filtering",
        threshold,
        SinkGroup::new("text").with(text.clone()),
        SinkGroup::new("structured").with(structured.clone()),
    )
    .with_timestamp_format(TimestampFormat::parse("HH:mm:ss").unwrap())
    .with_clock(FixedClock::new(datetime!(2024-03-05 14:07:09 UTC)));
    (dispatcher, text, structured)
}

fn log(dispatcher: &Dispatcher, level: Severity) -> bool {
    let event = normalize(LogCall::positional(level, "event")).unwrap();
    dispatcher.dispatch(&event)
}

// ============================================================================
// Rank Comparison Tests
// ============================================================================

/// Verifies a candidate passes exactly when its rank is at most the threshold.
#[test]
fn is_enabled_is_rank_at_most_threshold() {
    for threshold in 0..=7u8 {
        for candidate in 0..=7u8 {
            assert_eq!(
                is_enabled(candidate, threshold),
                candidate <= threshold,
                "candidate {candidate} threshold {threshold}"
            );
        }
    }
}

/// Verifies the severity table is fixed and repeatable.
#[test]
fn levels_are_idempotent() {
    let first: Vec<_> = levels().iter().collect();
    let second: Vec<_> = levels().iter().collect();
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            ("emerg", 0),
            ("alert", 1),
            ("crit", 2),
            ("error", 3),
            ("warning", 4),
            ("notice", 5),
            ("info", 6),
            ("debug", 7),
        ]
    );
}

// ============================================================================
// Dispatch Filtering Tests
// ============================================================================

/// Verifies an `error` threshold drops `warning` and keeps the more severe levels.
#[test]
fn error_threshold_keeps_error_and_above() {
    let (dispatcher, text, structured) = dispatcher(Severity::Error);

    assert!(!log(&dispatcher, Severity::Warning));
    for level in [
        Severity::Error,
        Severity::Crit,
        Severity::Alert,
        Severity::Emerg,
    ] {
        assert!(log(&dispatcher, level), "{level}");
    }

    let expected = vec![
        Severity::Error,
        Severity::Crit,
        Severity::Alert,
        Severity::Emerg,
    ];
    assert_eq!(text.levels(), expected);
    assert_eq!(structured.levels(), expected);
}

/// Verifies a `debug` threshold keeps every level.
#[test]
fn debug_threshold_keeps_everything() {
    let (dispatcher, text, _structured) = dispatcher(Severity::Debug);
    for level in Severity::ALL {
        assert!(log(&dispatcher, level));
    }
    assert_eq!(text.levels(), Severity::ALL.to_vec());
}

/// Verifies an `emerg` threshold keeps only `emerg`.
#[test]
fn emerg_threshold_keeps_only_emerg() {
    let (dispatcher, text, _structured) = dispatcher(Severity::Emerg);
    let accepted: Vec<_> = Severity::ALL
        .into_iter()
        .filter(|level| log(&dispatcher, *level))
        .collect();
    assert_eq!(accepted, vec![Severity::Emerg]);
    assert_eq!(text.levels(), vec![Severity::Emerg]);
}

/// Verifies threshold changes apply to the very next dispatch.
#[test]
fn lowering_and_raising_threshold() {
    let (dispatcher, _text, _structured) = dispatcher(Severity::Info);
    assert!(!log(&dispatcher, Severity::Debug));

    dispatcher.set_threshold(Severity::Debug);
    assert!(log(&dispatcher, Severity::Debug));

    dispatcher.set_threshold(Severity::Crit);
    assert!(!log(&dispatcher, Severity::Error));
    assert!(log(&dispatcher, Severity::Crit));
}

/// Verifies threshold updates are visible across threads.
#[test]
fn threshold_is_shared_between_threads() {
    let (dispatcher, text, _structured) = dispatcher(Severity::Info);
    let dispatcher = Arc::new(dispatcher);

    let setter = Arc::clone(&dispatcher);
    std::thread::spawn(move || setter.set_threshold(Severity::Error))
        .join()
        .unwrap();

    assert_eq!(dispatcher.threshold(), Severity::Error);
    assert!(!log(&dispatcher, Severity::Info));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || log(&dispatcher, Severity::Error))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(text.levels().len(), 4);
}
