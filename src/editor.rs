//! Line editing: a single-line input buffer with history, cursor motion,
//! a kill/yank register, and tab completion.
//!
//! Flat emacs-style bindings: printable insert, Backspace/Delete, arrows,
//! Home/End, Ctrl-A/E/K/U/W, history Up/Down, Tab completion, Enter,
//! Ctrl-C, Ctrl-L.
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::keys::{KeyCode, KeyEvent, ModKeys};

/// What the editor wants the host to do after processing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
	/// Nothing externally observable beyond the buffer/cursor changing.
	Continue,
	/// Enter: the line should be submitted as-is.
	Submit(String),
	/// Ctrl-C: abandon the current line without submitting it.
	Abandon,
	/// Ctrl-L: the host should clear the screen; buffer is untouched.
	ClearScreen,
}

/// A completion request the host resolves against the VFS/registry and
/// feeds back via `apply_completions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
	pub prefix: String,
}

pub struct InputBuffer {
	graphemes: Vec<String>,
	cursor: usize,
	history: Vec<String>,
	history_index: Option<usize>,
	temp_buffer: Option<String>,
	kill_buffer: String,
}

impl InputBuffer {
	pub fn new() -> Self {
		Self {
			graphemes: Vec::new(),
			cursor: 0,
			history: Vec::new(),
			history_index: None,
			temp_buffer: None,
			kill_buffer: String::new(),
		}
	}

	pub fn line(&self) -> String {
		self.graphemes.concat()
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn history(&self) -> &[String] {
		&self.history
	}

	/// Terminal column width of the buffer up to the cursor — wide (e.g. CJK)
	/// graphemes occupy two columns, so this is not simply `cursor()`. A host
	/// rendering the prompt over a real ANSI terminal needs this to place the
	/// hardware cursor correctly.
	pub fn cursor_display_column(&self) -> usize {
		self.graphemes[..self.cursor].iter().map(|g| g.width()).sum()
	}

	fn set_line(&mut self, line: &str) {
		self.graphemes = line.graphemes(true).map(str::to_string).collect();
		self.cursor = self.graphemes.len();
	}

	fn clear(&mut self) {
		self.graphemes.clear();
		self.cursor = 0;
		self.history_index = None;
		self.temp_buffer = None;
	}

	/// Feeds one decoded key to the buffer. `completions`, when `Some`, is
	/// only consulted for `Tab` and is the already-resolved candidate list
	/// for the buffer's current word (the host computes it, since only the
	/// host knows the VFS/registry — see `CompletionRequest`).
	pub fn handle_key(&mut self, event: &KeyEvent, completions: Option<&[String]>) -> EditorAction {
		let KeyEvent(code, mods) = event;
		match (code, *mods) {
			(KeyCode::Char(c), m) if m.contains(ModKeys::CTRL) => self.handle_ctrl_chord(*c),
			(KeyCode::Char(c), _) => {
				self.insert_char(*c);
				EditorAction::Continue
			}
			(KeyCode::Backspace, _) => {
				self.backspace();
				EditorAction::Continue
			}
			(KeyCode::Delete, _) => {
				self.delete_forward();
				EditorAction::Continue
			}
			(KeyCode::Left, _) => {
				if self.cursor > 0 {
					self.cursor -= 1;
				}
				EditorAction::Continue
			}
			(KeyCode::Right, _) => {
				if self.cursor < self.graphemes.len() {
					self.cursor += 1;
				}
				EditorAction::Continue
			}
			(KeyCode::Home, _) => {
				self.cursor = 0;
				EditorAction::Continue
			}
			(KeyCode::End, _) => {
				self.cursor = self.graphemes.len();
				EditorAction::Continue
			}
			(KeyCode::Up, _) => {
				self.history_prev();
				EditorAction::Continue
			}
			(KeyCode::Down, _) => {
				self.history_next();
				EditorAction::Continue
			}
			(KeyCode::Tab, _) => {
				self.apply_completion(completions);
				EditorAction::Continue
			}
			(KeyCode::Enter, _) => {
				let line = self.line();
				if !line.is_empty() {
					self.history.push(line.clone());
				}
				self.clear();
				EditorAction::Submit(line)
			}
			_ => EditorAction::Continue,
		}
	}

	fn handle_ctrl_chord(&mut self, c: char) -> EditorAction {
		match c.to_ascii_uppercase() {
			'A' => {
				self.cursor = 0;
				EditorAction::Continue
			}
			'E' => {
				self.cursor = self.graphemes.len();
				EditorAction::Continue
			}
			'K' => {
				self.kill_buffer = self.graphemes[self.cursor..].concat();
				self.graphemes.truncate(self.cursor);
				EditorAction::Continue
			}
			'U' => {
				self.kill_buffer = self.graphemes[..self.cursor].concat();
				self.graphemes.drain(..self.cursor);
				self.cursor = 0;
				EditorAction::Continue
			}
			'W' => {
				self.kill_word_back();
				EditorAction::Continue
			}
			'L' => EditorAction::ClearScreen,
			'C' => {
				self.clear();
				EditorAction::Abandon
			}
			'D' => {
				if self.graphemes.is_empty() {
					EditorAction::Abandon
				} else {
					self.delete_forward();
					EditorAction::Continue
				}
			}
			_ => EditorAction::Continue,
		}
	}

	fn insert_char(&mut self, c: char) {
		let mut buf = [0u8; 4];
		let s = c.encode_utf8(&mut buf).to_string();
		self.graphemes.insert(self.cursor, s);
		self.cursor += 1;
	}

	fn backspace(&mut self) {
		if self.cursor > 0 {
			self.graphemes.remove(self.cursor - 1);
			self.cursor -= 1;
		}
	}

	fn delete_forward(&mut self) {
		if self.cursor < self.graphemes.len() {
			self.graphemes.remove(self.cursor);
		}
	}

	fn kill_word_back(&mut self) {
		let start = self.cursor;
		let mut i = start;
		while i > 0 && self.graphemes[i - 1] == " " {
			i -= 1;
		}
		while i > 0 && self.graphemes[i - 1] != " " {
			i -= 1;
		}
		self.kill_buffer = self.graphemes[i..start].concat();
		self.graphemes.drain(i..start);
		self.cursor = i;
	}

	fn history_prev(&mut self) {
		if self.history.is_empty() {
			return;
		}
		let next_index = match self.history_index {
			None => {
				self.temp_buffer = Some(self.line());
				self.history.len() - 1
			}
			Some(0) => 0,
			Some(i) => i - 1,
		};
		self.history_index = Some(next_index);
		let line = self.history[next_index].clone();
		self.set_line(&line);
	}

	fn history_next(&mut self) {
		let Some(i) = self.history_index else { return };
		if i + 1 < self.history.len() {
			self.history_index = Some(i + 1);
			let line = self.history[i + 1].clone();
			self.set_line(&line);
		} else {
			self.history_index = None;
			let line = self.temp_buffer.take().unwrap_or_default();
			self.set_line(&line);
		}
	}

	/// Current word under/behind the cursor, used by the host to build a
	/// `CompletionRequest`.
	pub fn completion_prefix(&self) -> String {
		let mut i = self.cursor;
		while i > 0 && self.graphemes[i - 1] != " " {
			i -= 1;
		}
		self.graphemes[i..self.cursor].concat()
	}

	fn apply_completion(&mut self, completions: Option<&[String]>) {
		let Some(candidates) = completions else { return };
		match candidates.len() {
			0 => {}
			1 => {
				let prefix = self.completion_prefix();
				let suffix = &candidates[0][prefix.len().min(candidates[0].len())..];
				for ch in suffix.chars() {
					self.insert_char(ch);
				}
			}
			_ => {
				// Multiple candidates: complete the longest common prefix
				// beyond what's already typed, same as a standard shell.
				let prefix = self.completion_prefix();
				if let Some(common) = longest_common_prefix(candidates) {
					if common.len() > prefix.len() {
						let suffix = &common[prefix.len()..];
						for ch in suffix.chars() {
							self.insert_char(ch);
						}
					}
				}
			}
		}
	}
}

impl Default for InputBuffer {
	fn default() -> Self {
		Self::new()
	}
}

fn longest_common_prefix(candidates: &[String]) -> Option<String> {
	let first = candidates.first()?;
	let mut prefix = first.as_str();
	for candidate in &candidates[1..] {
		while !candidate.starts_with(prefix) {
			let next_len = prefix.len() - 1;
			prefix = &prefix[..next_len];
			if prefix.is_empty() {
				return Some(String::new());
			}
		}
	}
	Some(prefix.to_string())
}
