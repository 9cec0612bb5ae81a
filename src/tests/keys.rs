use crate::keys::*;

#[test]
fn decodes_printable_ascii() {
	let mut d = ByteDecoder::new();
	let events = d.decode(b"ab");
	assert_eq!(
		events,
		vec![
			KeyEvent(KeyCode::Char('a'), ModKeys::NONE),
			KeyEvent(KeyCode::Char('b'), ModKeys::NONE)
		]
	);
}

#[test]
fn decodes_arrow_keys() {
	let mut d = ByteDecoder::new();
	let events = d.decode(b"\x1b[A\x1b[B\x1b[C\x1b[D");
	assert_eq!(
		events,
		vec![
			KeyEvent(KeyCode::Up, ModKeys::NONE),
			KeyEvent(KeyCode::Down, ModKeys::NONE),
			KeyEvent(KeyCode::Right, ModKeys::NONE),
			KeyEvent(KeyCode::Left, ModKeys::NONE),
		]
	);
}

#[test]
fn decodes_delete_sequence() {
	let mut d = ByteDecoder::new();
	let events = d.decode(b"\x1b[3~");
	assert_eq!(events, vec![KeyEvent(KeyCode::Delete, ModKeys::NONE)]);
}

#[test]
fn decodes_backspace_and_ctrl_chords() {
	let mut d = ByteDecoder::new();
	let events = d.decode(b"\x7f\x0b\x17");
	assert_eq!(
		events,
		vec![
			KeyEvent(KeyCode::Backspace, ModKeys::NONE),
			KeyEvent(KeyCode::Char('K'), ModKeys::CTRL),
			KeyEvent(KeyCode::Char('W'), ModKeys::CTRL),
		]
	);
}

#[test]
fn unrecognised_escape_sequence_is_swallowed() {
	let mut d = ByteDecoder::new();
	let events = d.decode(b"\x1b[Zx");
	assert_eq!(events, vec![KeyEvent(KeyCode::Char('x'), ModKeys::NONE)]);
}

#[test]
fn decodes_multibyte_utf8() {
	let mut d = ByteDecoder::new();
	let events = d.decode("é".as_bytes());
	assert_eq!(events, vec![KeyEvent(KeyCode::Char('é'), ModKeys::NONE)]);
}
