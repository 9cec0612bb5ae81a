//! Session event log: every observable thing that happens during a session
//! is tagged and appended to an append-only record, periodically flushed to
//! a host-supplied sink. Also owns burst (paste) detection, which looks at
//! key-arrival timing rather than the transport-level paste signal so it
//! still fires when a host can't tell a bracketed paste from fast typing.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
	Key { at_ms: i64, code: String },
	Paste { at_ms: i64, content: String, length: usize, source: PasteSource },
	Output { at_ms: i64, bytes: usize },
	Command { at_ms: i64, line: String, exit_code: i32 },
	ObjectiveComplete { at_ms: i64, id: String },
	LevelAdvance { at_ms: i64, level: u32 },
	HintUsed { at_ms: i64, id: String },
	FocusChange { at_ms: i64, focused: bool },
	Resize { at_ms: i64, cols: u16, rows: u16 },
}

impl SessionEvent {
	pub fn at_ms(&self) -> i64 {
		match self {
			Self::Key { at_ms, .. }
			| Self::Paste { at_ms, .. }
			| Self::Output { at_ms, .. }
			| Self::Command { at_ms, .. }
			| Self::ObjectiveComplete { at_ms, .. }
			| Self::LevelAdvance { at_ms, .. }
			| Self::HintUsed { at_ms, .. }
			| Self::FocusChange { at_ms, .. }
			| Self::Resize { at_ms, .. } => *at_ms,
		}
	}
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PasteSource {
	/// Detected purely from keystroke burst timing.
	Burst,
	/// Reported by the host's clipboard/bracketed-paste API.
	Clipboard,
	/// Both signals fired for the same input — the strongest evidence of
	/// an actual paste.
	Both,
}

/// Append-only event log with a pluggable flush sink. The host decides what
/// "flush" means (write to disk, POST to a collector, ...); this type only
/// owns buffering and the flush cadence.
pub struct EventRecorder {
	events: Vec<SessionEvent>,
	flush_interval_ms: u64,
	last_flush_ms: i64,
	sink: Box<dyn FnMut(&[SessionEvent]) + Send>,
}

impl EventRecorder {
	pub fn new(flush_interval_ms: u64, sink: Box<dyn FnMut(&[SessionEvent]) + Send>) -> Self {
		Self {
			events: Vec::new(),
			flush_interval_ms,
			last_flush_ms: 0,
			sink,
		}
	}

	/// Appends `event` and flushes if `flush_interval_ms` has elapsed since
	/// the last flush (or this is the first event).
	pub fn record(&mut self, event: SessionEvent) {
		let now = event.at_ms();
		self.events.push(event);
		if now.saturating_sub(self.last_flush_ms) as u64 >= self.flush_interval_ms {
			self.flush(now);
		}
	}

	pub fn flush(&mut self, now_ms: i64) {
		if !self.events.is_empty() {
			(self.sink)(&self.events);
			self.events.clear();
		}
		self.last_flush_ms = now_ms;
	}

	pub fn stop(&mut self, now_ms: i64) {
		self.flush(now_ms);
	}

	pub fn pending(&self) -> &[SessionEvent] {
		&self.events
	}
}

/// Sliding-window keystroke burst detector. Accumulates keystroke
/// timestamps in a window of `window_ms`; fires when at least
/// `min_keys` of them are separated by no more than `gap_ms`.
pub struct BurstDetector {
	window_ms: i64,
	min_keys: usize,
	gap_ms: i64,
	timestamps: Vec<i64>,
}

impl BurstDetector {
	pub fn new(window_ms: i64, min_keys: usize, gap_ms: i64) -> Self {
		Self {
			window_ms,
			min_keys,
			gap_ms,
			timestamps: Vec::new(),
		}
	}

	/// Records one keystroke at `at_ms` and returns `true` if it completes
	/// a detected burst (the caller should then emit a `Paste` event and
	/// reset via `clear`).
	pub fn observe(&mut self, at_ms: i64) -> bool {
		self.timestamps.retain(|&t| at_ms - t <= self.window_ms);
		self.timestamps.push(at_ms);
		if self.timestamps.len() < self.min_keys {
			return false;
		}
		self.timestamps
			.windows(2)
			.all(|w| w[1] - w[0] <= self.gap_ms)
	}

	pub fn clear(&mut self) {
		self.timestamps.clear();
	}

	pub fn is_active(&self) -> bool {
		self.timestamps.len() >= self.min_keys
	}

	pub fn key_count(&self) -> usize {
		self.timestamps.len()
	}

	/// Span from the first to the last keystroke currently in the window.
	pub fn duration_ms(&self) -> i64 {
		match (self.timestamps.first(), self.timestamps.last()) {
			(Some(first), Some(last)) => last - first,
			_ => 0,
		}
	}
}
