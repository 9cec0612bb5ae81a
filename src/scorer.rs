//! Post-session integrity scoring: derives a `TypingPattern` from the raw
//! event log, then turns that pattern into a 0-100 score and a short
//! bucketed summary by applying a fixed table of flagged-severity
//! deductions.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::events::SessionEvent;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypingPattern {
	pub average_wpm: f64,
	pub max_wpm: f64,
	pub backspace_ratio: f64,
	pub idle_burst_count: u32,
	pub tab_away_count: u32,
	pub sustained_high_speed_segments: u32,
	pub perfect_code_segments: u32,
	pub paste_count: u32,
}

const WINDOW_WPM_SAMPLE: usize = 10;
const SUSTAINED_SEGMENT_LEN: usize = 50;
const SUSTAINED_WPM_THRESHOLD: f64 = 200.0;
const PERFECT_SEGMENT_LEN: usize = 100;
const PERFECT_BACKSPACE_RATIO: f64 = 0.02;
const IDLE_GAP_MS: i64 = 10_000;
const IDLE_RUN_GAP_MS: i64 = 100;
const IDLE_RUN_MIN_KEYS: usize = 20;

impl TypingPattern {
	/// Pure function of the event log: no mutable state survives a call.
	pub fn derive_from_events(events: &[SessionEvent]) -> Self {
		let keys: Vec<(i64, &str)> = events
			.iter()
			.filter_map(|e| match e {
				SessionEvent::Key { at_ms, code } => Some((*at_ms, code.as_str())),
				_ => None,
			})
			.collect();
		let paste_count = events.iter().filter(|e| matches!(e, SessionEvent::Paste { .. })).count() as u32;
		let tab_away_count = events
			.iter()
			.filter(|e| matches!(e, SessionEvent::FocusChange { focused: false, .. }))
			.count() as u32;

		if keys.is_empty() {
			return Self {
				paste_count,
				tab_away_count,
				..Default::default()
			};
		}

		let total_chars = keys.len() as f64;
		let span_ms = (keys.last().unwrap().0 - keys.first().unwrap().0).max(0) as f64;
		let average_wpm = wpm(total_chars, span_ms);

		let max_wpm = keys
			.windows(WINDOW_WPM_SAMPLE)
			.map(|w| wpm(WINDOW_WPM_SAMPLE as f64, (w[w.len() - 1].0 - w[0].0) as f64))
			.fold(0.0_f64, f64::max);

		let backspace_count = keys.iter().filter(|(_, code)| is_backspace(code)).count() as f64;
		let backspace_ratio = backspace_count / total_chars;

		let gaps: Vec<i64> = keys.iter().tuple_windows().map(|(a, b)| b.0 - a.0).collect();
		let idle_burst_count = count_idle_bursts(&gaps);
		let sustained_high_speed_segments = count_sustained_segments(&keys);
		let perfect_code_segments = count_perfect_segments(&keys);

		Self {
			average_wpm,
			max_wpm,
			backspace_ratio,
			idle_burst_count,
			tab_away_count,
			sustained_high_speed_segments,
			perfect_code_segments,
			paste_count,
		}
	}
}

fn wpm(chars: f64, duration_ms: f64) -> f64 {
	if duration_ms <= 0.0 {
		return 0.0;
	}
	chars / 5.0 / (duration_ms / 60_000.0)
}

fn is_backspace(code: &str) -> bool {
	code.contains("Backspace") || code.contains('\u{8}') || code.contains("127")
}

/// A gap `>= 10s` immediately followed by a run of `>= 20` keys each spaced
/// `< 100ms` apart counts as one idle-then-burst. Runs are consumed once
/// found so a single burst is never double-counted.
fn count_idle_bursts(gaps: &[i64]) -> u32 {
	let mut count = 0;
	let mut i = 0;
	while i < gaps.len() {
		if gaps[i] < IDLE_GAP_MS {
			i += 1;
			continue;
		}
		let mut run = 1;
		let mut j = i + 1;
		while j < gaps.len() && gaps[j] < IDLE_RUN_GAP_MS {
			run += 1;
			j += 1;
		}
		if run >= IDLE_RUN_MIN_KEYS {
			count += 1;
		}
		i = j.max(i + 1);
	}
	count
}

/// Non-overlapping 50-event windows whose WPM exceeds the sustained-speed
/// threshold; a match advances by the full segment length, a miss slides by
/// one event.
fn count_sustained_segments(keys: &[(i64, &str)]) -> u32 {
	let mut count = 0;
	let mut idx = 0;
	while idx + SUSTAINED_SEGMENT_LEN <= keys.len() {
		let window = &keys[idx..idx + SUSTAINED_SEGMENT_LEN];
		let duration = (window[window.len() - 1].0 - window[0].0) as f64;
		if wpm(SUSTAINED_SEGMENT_LEN as f64, duration) > SUSTAINED_WPM_THRESHOLD {
			count += 1;
			idx += SUSTAINED_SEGMENT_LEN;
		} else {
			idx += 1;
		}
	}
	count
}

/// Non-overlapping 100-event windows whose backspace ratio stays under 2%.
fn count_perfect_segments(keys: &[(i64, &str)]) -> u32 {
	let mut count = 0;
	let mut idx = 0;
	while idx + PERFECT_SEGMENT_LEN <= keys.len() {
		let window = &keys[idx..idx + PERFECT_SEGMENT_LEN];
		let backspaces = window.iter().filter(|(_, code)| is_backspace(code)).count() as f64;
		if backspaces / PERFECT_SEGMENT_LEN as f64 < PERFECT_BACKSPACE_RATIO {
			count += 1;
			idx += PERFECT_SEGMENT_LEN;
		} else {
			idx += 1;
		}
	}
	count
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
	pub score: u32,
	pub summary: String,
	pub deductions: Vec<(&'static str, u32)>,
}

const SEVERITY_HIGH: u32 = 30;
const SEVERITY_MEDIUM: u32 = 15;
const SEVERITY_LOW: u32 = 5;

pub struct IntegrityScorer;

impl IntegrityScorer {
	pub fn score(pattern: &TypingPattern) -> IntegrityReport {
		let mut deductions = Vec::new();

		if pattern.paste_count > 5 {
			deductions.push(("excessive_paste", SEVERITY_HIGH));
		} else if pattern.paste_count > 2 {
			deductions.push(("moderate_paste", SEVERITY_MEDIUM));
		}
		if pattern.sustained_high_speed_segments > 0 {
			deductions.push(("speed_anomaly", SEVERITY_MEDIUM));
		}
		if pattern.perfect_code_segments > 2 {
			deductions.push(("perfect_code", SEVERITY_MEDIUM));
		}
		if pattern.idle_burst_count > 3 {
			deductions.push(("idle_burst", SEVERITY_LOW));
		}
		if pattern.tab_away_count > 10 {
			deductions.push(("frequent_tab_away", SEVERITY_LOW));
		}

		let total: u32 = deductions.iter().map(|(_, d)| d).sum();
		let score = 100u32.saturating_sub(total).clamp(0, 100);
		IntegrityReport {
			score,
			summary: bucket_summary(score),
			deductions,
		}
	}
}

fn bucket_summary(score: u32) -> String {
	match score {
		90..=100 => "Typing pattern consistent with organic, hand-typed work.".to_string(),
		70..=89 => "Minor anomalies detected; overall consistent with genuine effort.".to_string(),
		50..=69 => "Several anomalies detected; manual review recommended.".to_string(),
		_ => "Strong indicators of copy-pasted or assisted work.".to_string(),
	}
}
