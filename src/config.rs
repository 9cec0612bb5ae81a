//! Construction-time configuration for a `TerminalEngine` instance.
//!
//! One place the host sets the handful of external knobs the engine needs;
//! everything else is derived.
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ShellConfig {
	pub user: String,
	pub hostname: String,
	pub home: String,
	pub cwd: String,
	/// JSON-shaped VFS fixture (see `fixture::FixtureSource`); `None` boots
	/// an empty tree with just `/` and `HOME`.
	pub fixture: Option<Value>,
	pub recorder_flush_interval_ms: u64,
	pub burst_window_ms: i64,
	pub burst_min_keys: usize,
	pub burst_gap_ms: i64,
}

impl Default for ShellConfig {
	fn default() -> Self {
		Self {
			user: "candidate".to_string(),
			hostname: "fleetcore".to_string(),
			home: "/home/candidate".to_string(),
			cwd: "/home/candidate".to_string(),
			fixture: None,
			recorder_flush_interval_ms: 5_000,
			burst_window_ms: 5_000,
			burst_min_keys: 30,
			burst_gap_ms: 50,
		}
	}
}
