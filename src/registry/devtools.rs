//! Scripted dev-tooling CLIs (`node`, `npm`/`npx`, `python`/`pip`). These
//! never actually execute anything — a challenge VFS fixture carries the
//! files a candidate is meant to inspect; these handlers only need to look
//! plausible when run against them.
use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

/// Evaluates a tiny arithmetic grammar: numeric literals, `+ - * / ( )` and
/// decimal points, left-to-right with standard precedence. Returns `None` if
/// `expr` contains anything else (identifiers, strings, ...).
fn eval_arithmetic(expr: &str) -> Option<f64> {
	let expr = expr.trim();
	if expr.is_empty() || !expr.chars().all(|c| c.is_ascii_digit() || "+-*/(). ".contains(c)) {
		return None;
	}
	let tokens = tokenize_arith(expr);
	let mut pos = 0;
	let value = parse_expr(&tokens, &mut pos)?;
	if pos != tokens.len() {
		return None;
	}
	Some(value)
}

#[derive(Debug, Clone, PartialEq)]
enum ArithTok {
	Num(f64),
	Plus,
	Minus,
	Star,
	Slash,
	LParen,
	RParen,
}

fn tokenize_arith(expr: &str) -> Vec<ArithTok> {
	let chars: Vec<char> = expr.chars().collect();
	let mut out = Vec::new();
	let mut i = 0;
	while i < chars.len() {
		let c = chars[i];
		match c {
			' ' => i += 1,
			'+' => {
				out.push(ArithTok::Plus);
				i += 1;
			}
			'-' => {
				out.push(ArithTok::Minus);
				i += 1;
			}
			'*' => {
				out.push(ArithTok::Star);
				i += 1;
			}
			'/' => {
				out.push(ArithTok::Slash);
				i += 1;
			}
			'(' => {
				out.push(ArithTok::LParen);
				i += 1;
			}
			')' => {
				out.push(ArithTok::RParen);
				i += 1;
			}
			_ if c.is_ascii_digit() || c == '.' => {
				let start = i;
				while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
					i += 1;
				}
				let text: String = chars[start..i].iter().collect();
				match text.parse() {
					Ok(n) => out.push(ArithTok::Num(n)),
					Err(_) => i = chars.len() + 1, // force failure below
				}
			}
			_ => i += 1,
		}
	}
	out
}

fn parse_expr(tokens: &[ArithTok], pos: &mut usize) -> Option<f64> {
	let mut value = parse_term(tokens, pos)?;
	loop {
		match tokens.get(*pos) {
			Some(ArithTok::Plus) => {
				*pos += 1;
				value += parse_term(tokens, pos)?;
			}
			Some(ArithTok::Minus) => {
				*pos += 1;
				value -= parse_term(tokens, pos)?;
			}
			_ => break,
		}
	}
	Some(value)
}

fn parse_term(tokens: &[ArithTok], pos: &mut usize) -> Option<f64> {
	let mut value = parse_factor(tokens, pos)?;
	loop {
		match tokens.get(*pos) {
			Some(ArithTok::Star) => {
				*pos += 1;
				value *= parse_factor(tokens, pos)?;
			}
			Some(ArithTok::Slash) => {
				*pos += 1;
				let rhs = parse_factor(tokens, pos)?;
				if rhs == 0.0 {
					return None;
				}
				value /= rhs;
			}
			_ => break,
		}
	}
	Some(value)
}

fn parse_factor(tokens: &[ArithTok], pos: &mut usize) -> Option<f64> {
	match tokens.get(*pos) {
		Some(ArithTok::Num(n)) => {
			*pos += 1;
			Some(*n)
		}
		Some(ArithTok::Minus) => {
			*pos += 1;
			Some(-parse_factor(tokens, pos)?)
		}
		Some(ArithTok::LParen) => {
			*pos += 1;
			let value = parse_expr(tokens, pos)?;
			if tokens.get(*pos) != Some(&ArithTok::RParen) {
				return None;
			}
			*pos += 1;
			Some(value)
		}
		_ => None,
	}
}

fn format_number(n: f64) -> String {
	if n.fract() == 0.0 && n.abs() < 1e15 {
		format!("{}", n as i64)
	} else {
		format!("{n}")
	}
}

/// Extracts the sole string-literal argument of a `console.log(...)` or
/// `print(...)` call, if that's the entire body of `code`.
fn single_string_literal_call(code: &str, fn_name: &str) -> Option<String> {
	let code = code.trim();
	let prefix = format!("{fn_name}(");
	let inner = code.strip_prefix(&prefix)?.strip_suffix(')')?;
	let inner = inner.trim();
	for quote in ['"', '\''] {
		if inner.len() >= 2 && inner.starts_with(quote) && inner.ends_with(quote) {
			return Some(inner[1..inner.len() - 1].to_string());
		}
	}
	None
}

/// `node -e '<code>'`: handles a single `console.log("literal")` call or a
/// pure arithmetic expression; anything richer is out of scope for a
/// simulated runtime and falls back to a generic acknowledgement.
fn eval_node_inline(code: &str) -> String {
	if let Some(text) = single_string_literal_call(code, "console.log") {
		return text;
	}
	if let Some(n) = eval_arithmetic(code) {
		return format_number(n);
	}
	format!("[executed: {code}]")
}

fn eval_python_inline(code: &str) -> String {
	if let Some(text) = single_string_literal_call(code, "print") {
		return text;
	}
	if let Some(n) = eval_arithmetic(code) {
		return format_number(n);
	}
	format!("[executed: {code}]")
}

fn run_script_file(content: &str, runtime: &str) -> String {
	if content.contains("express") && content.contains("listen") {
		return "Server listening on port 3000".to_string();
	}
	if content.contains("describe") || content.contains("test(") || content.contains("it(") {
		return "PASS  ./test.js\n  ✓ runs expected assertions (3ms)\n\nTest Suites: 1 passed, 1 total\nTests:       1 passed, 1 total".to_string();
	}
	format!("[executed: {runtime}]")
}

pub fn node(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.flag_bool("version") || cmd.args.first().is_some_and(|a| a == "-v") {
		return CommandOutput::ok("v20.11.0");
	}
	// `-e`'s value is never flag-value syntax (`-e CODE`, not `-eCODE`), so the
	// parser's short-flag coalescing already leaves the whole code string as a
	// positional argument; re-tokenizing raw_args here would re-strip any
	// quote characters embedded in the code itself.
	if cmd.flag_bool("e") {
		let Some(code) = cmd.args.first() else {
			return CommandOutput::err("node: -e requires an argument", 9);
		};
		return CommandOutput::ok(eval_node_inline(code));
	}
	let rest = &cmd.args;
	let Some(path) = rest.first() else {
		return CommandOutput::ok("Welcome to Node.js v20.11.0.\n(sandboxed REPL not available; run a script file instead)");
	};
	match ctx.fs.read_file(path, &ctx.cwd) {
		Ok(content) => CommandOutput::ok(run_script_file(&content, path)),
		Err(e) => CommandOutput::err(format!("node: {e}"), 1),
	}
}

fn canned_npm_script(script: &str) -> Option<&'static str> {
	match script {
		"dev" => Some("> dev\n> vite\n\n  VITE ready in 320 ms\n  ➜  Local:   http://localhost:5173/"),
		"build" => Some("> build\n> vite build\n\nvite v5.0.0 building for production...\n✓ 42 modules transformed."),
		"test" => Some("> test\n> jest\n\nPASS  ./test.js\nTest Suites: 1 passed, 1 total"),
		"lint" => Some("> lint\n> eslint .\n\n✔ No lint errors found"),
		"migrate" => Some("> migrate\n> node scripts/migrate.js\n\nRunning migrations...\nMigrations complete."),
		"seed" => Some("> seed\n> node scripts/seed.js\n\nSeeding database...\nSeed complete."),
		_ => None,
	}
}

pub fn npm(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	match cmd.args.first().map(String::as_str) {
		Some("--version") | Some("-v") => CommandOutput::ok("10.2.4"),
		Some("install") | Some("i") => {
			if ctx.fs.is_file("package.json", &ctx.cwd) {
				CommandOutput::ok("added 0 packages in 1s")
			} else {
				CommandOutput::err("npm error: no package.json found", 1)
			}
		}
		Some("run") => match cmd.args.get(1) {
			Some(script) => match canned_npm_script(script) {
				Some(output) => CommandOutput::ok(output),
				None => CommandOutput::ok(format!("> {script}\n> echo '{script}'")),
			},
			None => CommandOutput::err("npm error: missing script name", 1),
		},
		Some("test") => CommandOutput::ok(canned_npm_script("test").unwrap()),
		Some(other) => CommandOutput::err(format!("npm: unknown command '{other}'"), 1),
		None => CommandOutput::err("npm: missing command", 1),
	}
}

pub fn npx(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(tool) = cmd.args.first() else {
		return CommandOutput::err("npx: missing package name", 1);
	};
	CommandOutput::ok(format!("npx: running {tool}..."))
}

pub fn python(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.flag_bool("version") || cmd.args.first().is_some_and(|a| a == "-V" || a == "--version") {
		return CommandOutput::ok("Python 3.11.8");
	}
	if cmd.flag_bool("c") {
		let Some(code) = cmd.args.first() else {
			return CommandOutput::err("python: -c requires an argument", 2);
		};
		return CommandOutput::ok(eval_python_inline(code));
	}
	let rest = &cmd.args;
	let Some(path) = rest.first() else {
		return CommandOutput::ok("Python 3.11.8 (interactive mode not available)");
	};
	match ctx.fs.read_file(path, &ctx.cwd) {
		Ok(content) => CommandOutput::ok(run_script_file(&content, path)),
		Err(e) => CommandOutput::err(format!("python: {e}"), 1),
	}
}

pub fn pip(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	match cmd.args.first().map(String::as_str) {
		Some("install") => match cmd.args.get(1) {
			Some(pkg) => CommandOutput::ok(format!("Successfully installed {pkg}")),
			None => CommandOutput::err("ERROR: You must give at least one requirement to install", 1),
		},
		Some("--version") => CommandOutput::ok("pip 24.0"),
		Some("list") => CommandOutput::ok("Package    Version\n---------- -------"),
		_ => CommandOutput::err("pip: missing command", 1),
	}
}
