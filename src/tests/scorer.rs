use crate::events::SessionEvent;
use crate::scorer::*;

fn key_event(at_ms: i64, code: &str) -> SessionEvent {
	SessionEvent::Key {
		at_ms,
		code: code.to_string(),
	}
}

#[test]
fn clean_pattern_scores_perfect() {
	let pattern = TypingPattern {
		average_wpm: 45.0,
		max_wpm: 70.0,
		..Default::default()
	};
	let report = IntegrityScorer::score(&pattern);
	assert_eq!(report.score, 100);
	assert!(report.deductions.is_empty());
}

#[test]
fn excessive_paste_outweighs_moderate() {
	let pattern = TypingPattern {
		paste_count: 6,
		..Default::default()
	};
	let report = IntegrityScorer::score(&pattern);
	assert_eq!(report.score, 100 - 30);
	assert!(report.summary.contains("copy-pasted"));
}

#[test]
fn moderate_paste_between_two_and_five() {
	let pattern = TypingPattern {
		paste_count: 3,
		..Default::default()
	};
	let report = IntegrityScorer::score(&pattern);
	assert_eq!(report.score, 100 - 15);
}

#[test]
fn score_never_goes_negative() {
	let pattern = TypingPattern {
		paste_count: 20,
		sustained_high_speed_segments: 4,
		perfect_code_segments: 10,
		idle_burst_count: 10,
		tab_away_count: 20,
		..Default::default()
	};
	let report = IntegrityScorer::score(&pattern);
	assert_eq!(report.score, 0);
}

#[test]
fn tab_away_only_penalised_past_threshold() {
	let pattern = TypingPattern {
		tab_away_count: 5,
		..Default::default()
	};
	assert!(IntegrityScorer::score(&pattern).deductions.is_empty());
	let pattern = TypingPattern {
		tab_away_count: 11,
		..Default::default()
	};
	let report = IntegrityScorer::score(&pattern);
	assert_eq!(report.score, 100 - 5);
}

#[test]
fn derive_computes_average_wpm_from_key_span() {
	let events: Vec<SessionEvent> = (0..5).map(|i| key_event(i * 1000, "a")).collect();
	let pattern = TypingPattern::derive_from_events(&events);
	// 5 chars / 5 / (4000ms / 60000) = 1 / (1/15) = 15 wpm
	assert!((pattern.average_wpm - 15.0).abs() < 0.01);
}

#[test]
fn derive_flags_backspace_ratio() {
	let mut events = vec![key_event(0, "a"), key_event(10, "a")];
	events.push(key_event(20, "Backspace"));
	events.push(key_event(30, "a"));
	let pattern = TypingPattern::derive_from_events(&events);
	assert!((pattern.backspace_ratio - 0.25).abs() < 0.001);
}

#[test]
fn derive_counts_focus_change_as_tab_away() {
	let events = vec![
		key_event(0, "a"),
		SessionEvent::FocusChange { at_ms: 5, focused: false },
		SessionEvent::FocusChange { at_ms: 10, focused: true },
	];
	let pattern = TypingPattern::derive_from_events(&events);
	assert_eq!(pattern.tab_away_count, 1);
}

#[test]
fn derive_counts_idle_then_burst() {
	let mut events = vec![key_event(0, "a")];
	for i in 1..=25 {
		events.push(key_event(15_000 + i * 50, "a"));
	}
	let pattern = TypingPattern::derive_from_events(&events);
	assert_eq!(pattern.idle_burst_count, 1);
}
