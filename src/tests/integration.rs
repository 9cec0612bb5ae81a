//! End-to-end scenarios driven entirely through `TerminalEngine`'s public
//! byte-in/text-out surface, the way a host actually talks to it.
use pretty_assertions::assert_eq;

use crate::{ShellConfig, TerminalEngine};

fn type_line(engine: &mut TerminalEngine, line: &str, at_ms: &mut i64) -> String {
	*at_ms += 10;
	engine.handle_input(format!("{line}\r").as_bytes(), *at_ms)
}

#[test]
fn quoted_pipeline_survives_spaces_inside_quotes() {
	let mut engine = TerminalEngine::new(ShellConfig::default());
	let mut clock = 0;
	type_line(&mut engine, "mkdir /tmp", &mut clock);
	type_line(&mut engine, "echo 'two words' > /tmp/f", &mut clock);
	let out = type_line(&mut engine, "cat /tmp/f | grep words", &mut clock);
	assert!(out.contains("two words"));
}

#[test]
fn conditional_operators_short_circuit_correctly() {
	let mut engine = TerminalEngine::new(ShellConfig::default());
	let mut clock = 0;
	let out = type_line(&mut engine, "false && echo nope || echo yes", &mut clock);
	assert!(out.contains("yes"));
	assert!(!out.contains("nope"));
}

#[test]
fn redirection_read_back_round_trips_through_the_vfs() {
	let mut engine = TerminalEngine::new(ShellConfig::default());
	let mut clock = 0;
	type_line(&mut engine, "mkdir /work", &mut clock);
	type_line(&mut engine, "echo first > /work/log", &mut clock);
	type_line(&mut engine, "echo second >> /work/log", &mut clock);
	let out = type_line(&mut engine, "cat /work/log", &mut clock);
	assert!(out.contains("first"));
	assert!(out.contains("second"));
}

#[test]
fn history_navigation_restores_prior_commands() {
	let mut engine = TerminalEngine::new(ShellConfig::default());
	let mut clock = 0;
	type_line(&mut engine, "echo one", &mut clock);
	type_line(&mut engine, "echo two", &mut clock);
	clock += 10;
	// Up, Up recalls "echo one" into the buffer without submitting it yet.
	let out = engine.handle_input(b"\x1b[A\x1b[A", clock);
	assert_eq!(out, "");
	clock += 10;
	let out = engine.handle_input(b"\r", clock);
	assert!(out.contains("one"));
	assert!(!out.contains("two"));
}

#[test]
fn fast_paste_burst_is_recorded_even_without_a_clipboard_signal() {
	use std::sync::{Arc, Mutex};

	let mut engine = TerminalEngine::new(ShellConfig::default());
	let events = Arc::new(Mutex::new(Vec::new()));
	let events_clone = events.clone();
	engine.enable_recording(
		1_000_000,
		Box::new(move |batch| events_clone.lock().unwrap().extend_from_slice(batch)),
	);

	let mut clock = 0i64;
	for ch in "echo this was definitely not typed by a human being right now".chars() {
		clock += 5; // far under the burst gap threshold
		engine.handle_input(ch.to_string().as_bytes(), clock);
	}
	engine.stop_recording(clock + 1);

	let recorded = events.lock().unwrap();
	let saw_burst = recorded.iter().any(|e| {
		matches!(
			e,
			crate::events::SessionEvent::Paste {
				source: crate::events::PasteSource::Burst,
				..
			}
		)
	});
	assert!(saw_burst, "expected a burst-detected paste event, got: {recorded:?}");
}

#[test]
fn replay_engine_reproduces_recorded_timeline_deterministically() {
	use crate::events::SessionEvent;
	use crate::replay::ReplayEngine;

	let events = vec![
		SessionEvent::Key { at_ms: 0, code: "a".into() },
		SessionEvent::Key { at_ms: 120, code: "b".into() },
		SessionEvent::Key { at_ms: 260, code: "c".into() },
	];
	let mut engine = ReplayEngine::new(events);
	let mut gaps = Vec::new();
	while let Some(gap) = engine.tick() {
		gaps.push(gap);
	}
	assert_eq!(gaps, vec![120.0, 140.0]);
	assert!(engine.is_finished());
}
