//! Thin CLI driver: runs a `TerminalEngine` against real stdin/stdout for
//! manual smoke-testing outside the browser host.
use std::io::{self, Read, Write};

use shellcraft_core::{ShellConfig, TerminalEngine};

fn main() {
	env_logger::init();

	let mut engine = TerminalEngine::new(ShellConfig::default());
	print!("{}", engine.boot());
	let _ = io::stdout().flush();

	let stdin = io::stdin();
	let mut clock_ms: i64 = 0;
	let mut line = String::new();
	loop {
		line.clear();
		let mut handle = stdin.lock();
		let mut byte = [0u8; 1];
		let mut got = false;
		loop {
			match handle.read(&mut byte) {
				Ok(0) => break,
				Ok(_) => {
					got = true;
					line.push(byte[0] as char);
					if byte[0] == b'\n' {
						break;
					}
				}
				Err(_) => break,
			}
		}
		if !got {
			break;
		}
		clock_ms += 50;
		let out = engine.handle_input(line.as_bytes(), clock_ms);
		print!("{out}");
		let _ = io::stdout().flush();
	}
}
