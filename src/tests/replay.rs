use crate::events::SessionEvent;
use crate::replay::*;

fn key(at_ms: i64) -> SessionEvent {
	SessionEvent::Key {
		at_ms,
		code: "a".into(),
	}
}

#[test]
fn tick_reports_gap_scaled_by_speed() {
	let mut engine = ReplayEngine::new(vec![key(0), key(100), key(300)]);
	engine.set_speed(2.0);
	assert_eq!(engine.tick(), Some(50.0));
	assert_eq!(engine.tick(), Some(100.0));
	assert_eq!(engine.tick(), None);
	assert!(engine.is_finished());
}

#[test]
fn tick_caps_long_gaps() {
	let mut engine = ReplayEngine::new(vec![key(0), key(120_000)]);
	assert_eq!(engine.tick(), Some(2000.0));
}

#[test]
fn tick_cap_scales_down_with_speed() {
	let mut engine = ReplayEngine::new(vec![key(0), key(120_000)]);
	engine.set_speed(8.0);
	assert_eq!(engine.tick(), Some(250.0));
}

#[test]
fn seek_to_time_lands_on_first_event_at_or_after() {
	let mut engine = ReplayEngine::new(vec![key(0), key(500), key(1000)]);
	engine.seek_to_time(600);
	assert_eq!(engine.current_index(), 2);
}
