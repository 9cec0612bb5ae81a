use crate::events::*;
use std::sync::{Arc, Mutex};

#[test]
fn recorder_flushes_on_interval() {
	let flushed = Arc::new(Mutex::new(Vec::new()));
	let flushed_clone = flushed.clone();
	let mut recorder = EventRecorder::new(
		1000,
		Box::new(move |events| flushed_clone.lock().unwrap().extend_from_slice(events)),
	);
	recorder.record(SessionEvent::Key { at_ms: 0, code: "a".into() });
	assert!(flushed.lock().unwrap().is_empty());
	recorder.record(SessionEvent::Key { at_ms: 1500, code: "b".into() });
	assert_eq!(flushed.lock().unwrap().len(), 2);
}

#[test]
fn recorder_stop_flushes_remaining() {
	let flushed = Arc::new(Mutex::new(Vec::new()));
	let flushed_clone = flushed.clone();
	let mut recorder = EventRecorder::new(
		10_000,
		Box::new(move |events| flushed_clone.lock().unwrap().extend_from_slice(events)),
	);
	recorder.record(SessionEvent::Key { at_ms: 0, code: "a".into() });
	recorder.stop(100);
	assert_eq!(flushed.lock().unwrap().len(), 1);
}

#[test]
fn burst_detector_fires_on_fast_sustained_typing() {
	let mut burst = BurstDetector::new(5_000, 30, 50);
	let mut fired = false;
	for i in 0..30 {
		fired = burst.observe(i * 20);
	}
	assert!(fired);
}

#[test]
fn burst_detector_does_not_fire_on_normal_typing() {
	let mut burst = BurstDetector::new(5_000, 30, 50);
	let mut fired = false;
	for i in 0..30 {
		fired = burst.observe(i * 200);
	}
	assert!(!fired);
}

#[test]
fn burst_detector_resets_window_on_gap() {
	let mut burst = BurstDetector::new(5_000, 3, 50);
	assert!(!burst.observe(0));
	assert!(!burst.observe(10));
	// big gap clears relevance of earlier keys once window passes
	assert!(!burst.observe(6_000));
	assert!(!burst.observe(6_010));
}
