//! `TerminalEngine`: the thing a host embeds. Owns the VFS, the command
//! registry, the line editor, and the event/replay/scoring subsystems, and
//! turns raw terminal bytes into executed commands and rendered output.
use log::debug;
use unicode_width::UnicodeWidthStr;

use crate::config::ShellConfig;
use crate::context::CommandContext;
use crate::editor::{EditorAction, InputBuffer};
use crate::events::{BurstDetector, EventRecorder, PasteSource, SessionEvent};
use crate::executor::Executor;
use crate::keys::{ByteDecoder, KeyCode, KeyEvent};
use crate::parser::parse_pipeline;
use crate::registry::Registry;
use crate::vfs::Vfs;

/// Evaluates the challenge's objectives after a command runs. Returns the
/// ids of objectives that just became complete.
pub type ObjectiveHook = Box<dyn FnMut(&str, i32, &mut CommandContext) -> Vec<String> + Send>;

pub struct TerminalEngine {
	pub ctx: CommandContext,
	registry: Registry,
	decoder: ByteDecoder,
	editor: InputBuffer,
	recorder: Option<EventRecorder>,
	burst: BurstDetector,
	objective_hook: Option<ObjectiveHook>,
	heredoc: Option<HeredocState>,
	processing: bool,
}

struct HeredocState {
	command_line: String,
	terminator: String,
	lines: Vec<String>,
}

impl TerminalEngine {
	pub fn new(config: ShellConfig) -> Self {
		let fs = match &config.fixture {
			Some(value) => Vfs::from_snapshot(value).unwrap_or_default(),
			None => Vfs::new(),
		};
		let ctx = CommandContext::new(config.user, config.hostname, config.home, fs);
		Self {
			ctx,
			registry: Registry::new(),
			decoder: ByteDecoder::new(),
			editor: InputBuffer::new(),
			recorder: None,
			burst: BurstDetector::new(config.burst_window_ms, config.burst_min_keys, config.burst_gap_ms),
			objective_hook: None,
			heredoc: None,
			processing: false,
		}
	}

	pub fn set_objective_hook(&mut self, hook: ObjectiveHook) {
		self.objective_hook = Some(hook);
	}

	pub fn enable_recording(&mut self, flush_interval_ms: u64, sink: Box<dyn FnMut(&[SessionEvent]) + Send>) {
		self.recorder = Some(EventRecorder::new(flush_interval_ms, sink));
	}

	pub fn stop_recording(&mut self, now_ms: i64) {
		if let Some(recorder) = &mut self.recorder {
			recorder.stop(now_ms);
		}
	}

	/// Renders the banner + first prompt. Call once before feeding input.
	pub fn boot(&self) -> String {
		format!(
			"Welcome to fleetcore shell. Type 'help' for a list of commands.\n{}",
			self.prompt()
		)
	}

	pub fn prompt(&self) -> String {
		format!(
			"\x1b[32m{}@{}\x1b[0m:\x1b[34m{}\x1b[0m$ ",
			self.ctx.user,
			self.ctx.hostname,
			self.ctx.display_cwd()
		)
	}

	/// Feeds raw bytes typed at the terminal (not a paste) through the key
	/// decoder and editor, returning text to echo back to the terminal
	/// (this already includes a trailing prompt after a submitted command).
	pub fn handle_input(&mut self, bytes: &[u8], at_ms: i64) -> String {
		// Per the discard-while-processing decision (see DESIGN.md): input
		// that arrives while a previous command is still executing this
		// same call stack is dropped rather than queued. In a strictly
		// synchronous embedding `processing` can never actually be true
		// when `handle_input` is re-entered, but the flag exists so a host
		// that schedules `handle_input` from an async callback can still
		// honour the discard semantics by checking `is_processing()` first.
		if self.processing {
			return String::new();
		}
		self.processing = true;
		let mut echoed = String::new();
		for event in self.decoder.decode(bytes) {
			self.record_key(&event, at_ms);
			echoed.push_str(&self.handle_key_event(&event, at_ms));
		}
		self.processing = false;
		echoed
	}

	pub fn is_processing(&self) -> bool {
		self.processing
	}

	/// Feeds a block of pasted text (e.g. from a bracketed-paste sequence
	/// or a host clipboard API) in one shot. Control characters other than
	/// newline/carriage-return/tab are filtered; a paste event is always
	/// recorded regardless of burst detection, since the transport told us
	/// directly that this was a paste.
	pub fn handle_paste(&mut self, text: &str, at_ms: i64) -> String {
		let filtered: String = text
			.chars()
			.filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
			.collect();
		let was_burst_active = self.burst.is_active();
		self.burst.clear();
		self.record_event(SessionEvent::Paste {
			at_ms,
			content: filtered.clone(),
			length: filtered.len(),
			source: if was_burst_active {
				PasteSource::Both
			} else {
				PasteSource::Clipboard
			},
		});

		let mut echoed = String::new();
		if filtered.contains('\n') {
			for line in filtered.split('\n') {
				echoed.push_str(&self.submit_line(line, at_ms));
			}
		} else {
			for ch in filtered.chars() {
				echoed.push_str(&self.handle_key_event(&KeyEvent::printable(ch), at_ms));
			}
		}
		echoed
	}

	fn record_key(&mut self, event: &KeyEvent, at_ms: i64) {
		if self.burst.observe(at_ms) {
			let chars = self.burst.key_count();
			let duration = self.burst.duration_ms();
			self.record_event(SessionEvent::Paste {
				at_ms,
				content: format!("[burst detected: {chars} chars in {duration}ms]"),
				length: self.editor.line().len(),
				source: PasteSource::Burst,
			});
		}
		self.record_event(SessionEvent::Key {
			at_ms,
			code: format!("{:?}", event),
		});
	}

	fn record_event(&mut self, event: SessionEvent) {
		if let Some(recorder) = &mut self.recorder {
			recorder.record(event);
		}
	}

	fn handle_key_event(&mut self, event: &KeyEvent, at_ms: i64) -> String {
		let completions = if matches!(event, KeyEvent(KeyCode::Tab, _)) {
			let prefix = self.editor.completion_prefix();
			Some(self.ctx.fs.complete_path(&prefix, &self.ctx.cwd))
		} else {
			None
		};
		let action = self.editor.handle_key(event, completions.as_deref());
		match action {
			EditorAction::Continue => self.redraw_line(),
			EditorAction::ClearScreen => "\x1b[2J\x1b[H".to_string() + &self.prompt(),
			EditorAction::Abandon => format!("^C\n{}", self.prompt()),
			EditorAction::Submit(line) => self.submit_line(&line, at_ms),
		}
	}

	/// Redraws the current input line in place: return to column 0, clear to
	/// end of line, reprint the prompt and buffer, then move the cursor back
	/// left to its logical position. Cheap enough to run on every keystroke
	/// and correct regardless of what the editor did (insert, delete, kill,
	/// yank, history recall, completion) since it never assumes a diff.
	fn redraw_line(&self) -> String {
		let line = self.editor.line();
		let width = line.width();
		let col = self.editor.cursor_display_column();
		let mut out = format!("\r\x1b[K{}{}", self.prompt(), line);
		let trailing = width.saturating_sub(col);
		if trailing > 0 {
			out.push_str(&format!("\x1b[{trailing}D"));
		}
		out
	}

	/// Runs one submitted line (heredoc-aware) and returns the text to
	/// echo: the command's output followed by a fresh prompt.
	fn submit_line(&mut self, line: &str, at_ms: i64) -> String {
		if let Some(heredoc) = &mut self.heredoc {
			if line.trim_end() == heredoc.terminator {
				let HeredocState { command_line, lines, .. } = self.heredoc.take().unwrap();
				let body = lines.join("\n");
				return self.execute(&command_line, Some(body), at_ms);
			}
			heredoc.lines.push(line.to_string());
			return String::new();
		}

		if let Some((cmd_part, tag)) = parse_heredoc_header(line) {
			self.heredoc = Some(HeredocState {
				command_line: cmd_part.to_string(),
				terminator: tag.to_string(),
				lines: Vec::new(),
			});
			return String::new();
		}

		self.execute(line, None, at_ms)
	}

	fn execute(&mut self, line: &str, stdin: Option<String>, at_ms: i64) -> String {
		let pipeline = parse_pipeline(line);
		let executor = Executor::new(&self.registry);
		let output = executor.run_with_stdin(&pipeline, &mut self.ctx, stdin);
		debug!("executed `{line}` -> exit {}", output.exit_code);
		self.record_event(SessionEvent::Command {
			at_ms,
			line: line.to_string(),
			exit_code: output.exit_code,
		});

		let mut rendered = output.output.clone();
		if !rendered.is_empty() {
			rendered.push('\n');
		}

		rendered.push_str(&self.run_objective_hook(line, output.exit_code, at_ms));
		rendered.push_str(&self.prompt());
		rendered
	}

	fn run_objective_hook(&mut self, line: &str, exit_code: i32, at_ms: i64) -> String {
		let Some(hook) = &mut self.objective_hook else {
			return String::new();
		};
		let completed = hook(line, exit_code, &mut self.ctx);
		let mut banner = String::new();
		for id in completed {
			if let Some(objective) = self.ctx.challenge.objective_mut(&id) {
				objective.completed = true;
			}
			banner.push_str(&format!("✓ Objective complete: {id}\n"));
			self.record_event(SessionEvent::ObjectiveComplete {
				at_ms,
				id: id.clone(),
			});
		}
		if self.ctx.challenge.all_complete() {
			banner.push_str("All objectives for this level are complete. Run `next-level` to continue.\n");
		}
		banner
	}

	pub fn handle_resize(&mut self, cols: u16, rows: u16, at_ms: i64) {
		self.record_event(SessionEvent::Resize { at_ms, cols, rows });
	}

	pub fn handle_focus_change(&mut self, focused: bool, at_ms: i64) {
		self.record_event(SessionEvent::FocusChange { at_ms, focused });
	}
}

/// Recognises a `<cmd...> << [-]TAG` or `<cmd...> << 'TAG'/"TAG"` heredoc
/// header, returning the command portion and the (quote-stripped) tag.
pub(crate) fn parse_heredoc_header(line: &str) -> Option<(&str, &str)> {
	let idx = line.find("<<")?;
	let (cmd_part, rest) = line.split_at(idx);
	let tag_part = rest[2..].trim_start();
	let tag_part = tag_part.strip_prefix('-').unwrap_or(tag_part).trim_start();
	let tag = tag_part
		.strip_prefix('\'')
		.and_then(|s| s.strip_suffix('\''))
		.or_else(|| tag_part.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
		.unwrap_or(tag_part);
	if tag.is_empty() {
		return None;
	}
	Some((cmd_part.trim_end(), tag))
}
