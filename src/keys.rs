//! Key decoding: turns raw input bytes into `KeyEvent`s.
//!
//! General byte-stream-to-key decoding, trimmed to exactly the key codes
//! the line editor's binding table names.
use std::collections::VecDeque;

bitflags::bitflags! {
	#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Default)]
	pub struct ModKeys: u8 {
		const CTRL  = 1 << 3;
		const ALT   = 1 << 2;
		const SHIFT = 1 << 1;
		const NONE  = 0;
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum KeyCode {
	Char(char),
	Backspace,
	Delete,
	Enter,
	Tab,
	Esc,
	Up,
	Down,
	Left,
	Right,
	Home,
	End,
	Null,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeyEvent(pub KeyCode, pub ModKeys);

impl KeyEvent {
	pub fn printable(c: char) -> Self {
		Self(KeyCode::Char(c), ModKeys::NONE)
	}

	/// Decodes a single logical key from one UTF-8 scalar plus the modifier
	/// state already known to the caller (used for the bracketed-paste and
	/// typed-input paths, where control bytes have already been filtered out
	/// by the caller).
	pub fn from_char(ch: char, mods: ModKeys) -> Self {
		use KeyCode as K;
		match ch {
			'\x08' | '\x7f' => Self(K::Backspace, mods),
			'\x09' => Self(K::Tab, mods),
			'\x0d' | '\x0a' => Self(K::Enter, mods),
			'\x1b' => Self(K::Esc, mods),
			'\x01' => Self(K::Char('A'), mods | ModKeys::CTRL), // Ctrl-A
			'\x05' => Self(K::Char('E'), mods | ModKeys::CTRL), // Ctrl-E
			'\x0b' => Self(K::Char('K'), mods | ModKeys::CTRL), // Ctrl-K
			'\x15' => Self(K::Char('U'), mods | ModKeys::CTRL), // Ctrl-U
			'\x17' => Self(K::Char('W'), mods | ModKeys::CTRL), // Ctrl-W
			'\x0c' => Self(K::Char('L'), mods | ModKeys::CTRL), // Ctrl-L
			'\x03' => Self(K::Char('C'), mods | ModKeys::CTRL), // Ctrl-C
			'\x04' => Self(K::Char('D'), mods | ModKeys::CTRL), // Ctrl-D
			c if (c as u32) < 0x20 => Self(K::Null, mods),
			c => Self(K::Char(c), mods),
		}
	}
}

/// Decodes a byte stream into `KeyEvent`s, recognising a bounded set of CSI
/// sequences (`ESC[A/B/C/D/H/F`, `ESC[3~`) with a fixed look-ahead of up to
/// 3 bytes; anything else starting with ESC is swallowed as a no-op rather
/// than surfaced.
#[derive(Default, Debug)]
pub struct ByteDecoder {
	pending: VecDeque<u8>,
}

impl ByteDecoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decodes every key event contained in `bytes`, appending to any bytes
	/// left over from a previous partial escape sequence.
	pub fn decode(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
		self.pending.extend(bytes.iter().copied());
		let mut events = Vec::new();
		while let Some(event) = self.next_event() {
			events.push(event);
		}
		events
	}

	fn next_event(&mut self) -> Option<KeyEvent> {
		let &first = self.pending.front()?;
		if first == 0x1b {
			return self.decode_escape();
		}
		self.decode_utf8_char()
	}

	fn decode_escape(&mut self) -> Option<KeyEvent> {
		use KeyCode as K;
		// Need at least a second byte to know if this is CSI.
		if self.pending.len() < 2 {
			return None;
		}
		let mut iter = self.pending.iter();
		let _esc = iter.next();
		let second = *iter.next().unwrap();
		if second != b'[' {
			self.pending.pop_front();
			return Some(KeyEvent(K::Esc, ModKeys::NONE));
		}
		let Some(&third) = iter.next() else {
			return None;
		};
		let key = match third {
			b'A' => Some(K::Up),
			b'B' => Some(K::Down),
			b'C' => Some(K::Right),
			b'D' => Some(K::Left),
			b'H' => Some(K::Home),
			b'F' => Some(K::End),
			b'3' => {
				let Some(&fourth) = iter.next() else {
					return None;
				};
				if fourth == b'~' {
					self.pending.pop_front();
					self.pending.pop_front();
					self.pending.pop_front();
					self.pending.pop_front();
					return Some(KeyEvent(K::Delete, ModKeys::NONE));
				}
				None
			}
			_ => None,
		};
		match key {
			Some(k) => {
				self.pending.pop_front();
				self.pending.pop_front();
				self.pending.pop_front();
				Some(KeyEvent(k, ModKeys::NONE))
			}
			None => {
				// Unrecognised CSI sequence: drop what's been peeked so the
				// decoder doesn't spin on it, and emit nothing.
				self.pending.pop_front();
				self.pending.pop_front();
				self.pending.pop_front();
				None
			}
		}
	}

	fn decode_utf8_char(&mut self) -> Option<KeyEvent> {
		let mut buf = Vec::with_capacity(4);
		for _ in 0..4 {
			let Some(&b) = self.pending.front() else {
				break;
			};
			buf.push(b);
			if let Ok(s) = std::str::from_utf8(&buf) {
				if let Some(ch) = s.chars().next() {
					for _ in 0..buf.len() {
						self.pending.pop_front();
					}
					return Some(KeyEvent::from_char(ch, ModKeys::NONE));
				}
			}
			self.pending.pop_front();
			if buf.len() >= 4 {
				break;
			}
		}
		None
	}
}
