//! Deterministic playback of a recorded `SessionEvent` timeline at an
//! arbitrary speed, with seeking by index or by timestamp.
use crate::events::SessionEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEngine {
	events: Vec<SessionEvent>,
	current_index: usize,
	is_playing: bool,
	speed: f64,
}

/// Upper bound on the gap the engine will schedule between two events,
/// independent of `speed` — without this a long idle stretch in the
/// recording (someone reading the prompt for two minutes) would replay as a
/// two-minute wait.
const MAX_TICK_MS: f64 = 2000.0;

impl ReplayEngine {
	pub fn new(events: Vec<SessionEvent>) -> Self {
		Self {
			events,
			current_index: 0,
			is_playing: false,
			speed: 1.0,
		}
	}

	pub fn play(&mut self) {
		self.is_playing = true;
	}

	pub fn pause(&mut self) {
		self.is_playing = false;
	}

	pub fn is_playing(&self) -> bool {
		self.is_playing
	}

	pub fn set_speed(&mut self, speed: f64) {
		self.speed = speed.max(0.01);
	}

	pub fn speed(&self) -> f64 {
		self.speed
	}

	pub fn current_index(&self) -> usize {
		self.current_index
	}

	pub fn current_event(&self) -> Option<&SessionEvent> {
		self.events.get(self.current_index)
	}

	pub fn seek_to(&mut self, index: usize) {
		self.current_index = index.min(self.events.len());
	}

	/// Seeks to the first event at or after `at_ms`.
	pub fn seek_to_time(&mut self, at_ms: i64) {
		self.current_index = self
			.events
			.iter()
			.position(|e| e.at_ms() >= at_ms)
			.unwrap_or(self.events.len());
	}

	pub fn is_finished(&self) -> bool {
		self.current_index >= self.events.len()
	}

	/// Advances past the current event and returns the delay, in
	/// milliseconds, the host should wait before presenting the next one.
	/// `None` once the timeline is exhausted.
	pub fn tick(&mut self) -> Option<f64> {
		if self.is_finished() {
			self.is_playing = false;
			return None;
		}
		let current_at = self.events[self.current_index].at_ms();
		self.current_index += 1;
		let next_at = self
			.events
			.get(self.current_index)
			.map(|e| e.at_ms())
			.unwrap_or(current_at);
		let gap_ms = (next_at - current_at).max(0) as f64;
		Some(gap_ms.min(MAX_TICK_MS) / self.speed)
	}
}
