//! Tokenization and parsing: turns a raw input line into a `Pipeline` of
//! `ParsedCommand`s connected by `|`, `&&`, `||`, `;`.
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	Pipe,
	And,
	Or,
	Seq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
	Bool(bool),
	Value(String),
}

impl FlagValue {
	pub fn is_true(&self) -> bool {
		matches!(self, FlagValue::Bool(true))
	}
	pub fn as_str(&self) -> Option<&str> {
		match self {
			FlagValue::Value(v) => Some(v),
			FlagValue::Bool(_) => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRedirect {
	pub path: String,
	pub append: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
	pub command: String,
	pub args: Vec<String>,
	pub raw_args: String,
	pub flags: BTreeMap<String, FlagValue>,
	pub input_redirect: Option<String>,
	pub output_redirect: Option<OutputRedirect>,
}

impl ParsedCommand {
	pub fn flag_bool(&self, name: &str) -> bool {
		self.flags.get(name).is_some_and(|v| match v {
			FlagValue::Bool(b) => *b,
			FlagValue::Value(_) => true,
		})
	}
	pub fn flag_str(&self, name: &str) -> Option<&str> {
		self.flags.get(name).and_then(FlagValue::as_str)
	}
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
	pub commands: Vec<ParsedCommand>,
	/// `operators[i]` sits between `commands[i]` and `commands[i+1]`.
	pub operators: Vec<Operator>,
}

/// Shared quote/escape scanner state used by both the tokenizer and the
/// pipeline splitter — they walk the same four-state machine, just react to
/// different terminating characters.
#[derive(Default)]
struct ScanState {
	in_single: bool,
	in_double: bool,
	escaped: bool,
}

impl ScanState {
	fn step(&mut self, ch: char) -> StepAction {
		if self.escaped {
			self.escaped = false;
			return StepAction::Literal(ch);
		}
		match ch {
			'\\' if !self.in_single => {
				self.escaped = true;
				StepAction::Consumed
			}
			'\'' if !self.in_double => {
				self.in_single = !self.in_single;
				StepAction::Consumed
			}
			'"' if !self.in_single => {
				self.in_double = !self.in_double;
				StepAction::Consumed
			}
			_ => StepAction::Literal(ch),
		}
	}
	fn quoted(&self) -> bool {
		self.in_single || self.in_double
	}
}

enum StepAction {
	Literal(char),
	Consumed,
}

/// Splits `line` into whitespace/quote-aware tokens. Backslash escapes
/// inside single quotes are literal; elsewhere the next character is taken
/// verbatim. Quote characters are stripped once they're no longer active.
pub fn tokenize(line: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut current = String::new();
	let mut has_token = false;
	let mut state = ScanState::default();

	for ch in line.chars() {
		if !state.quoted() && !state.escaped && ch == ' ' {
			if has_token {
				tokens.push(std::mem::take(&mut current));
				has_token = false;
			}
			continue;
		}
		match state.step(ch) {
			StepAction::Literal(c) => {
				current.push(c);
				has_token = true;
			}
			StepAction::Consumed => {
				has_token = true;
			}
		}
	}
	if has_token {
		tokens.push(current);
	}
	tokens
}

/// Splits a raw line into a sequence of `(token-list, operator)` segments on
/// `||`, `&&`, `|`, `;`, respecting quoting/escaping. Two-character
/// operators are matched before single-character ones. Trailing or
/// consecutive operators yield empty token lists — the executor collapses
/// those to no-ops with exit code 0.
pub fn split_pipeline(line: &str) -> (Vec<Vec<String>>, Vec<Operator>) {
	let mut segments: Vec<Vec<String>> = Vec::new();
	let mut operators = Vec::new();
	let mut current = String::new();
	let mut state = ScanState::default();

	let chars: Vec<char> = line.chars().collect();
	let mut i = 0;
	while i < chars.len() {
		let ch = chars[i];
		if !state.quoted() && !state.escaped {
			let two: Option<Operator> = if i + 1 < chars.len() {
				match (ch, chars[i + 1]) {
					('|', '|') => Some(Operator::Or),
					('&', '&') => Some(Operator::And),
					_ => None,
				}
			} else {
				None
			};
			if let Some(op) = two {
				segments.push(tokenize(&current));
				operators.push(op);
				current.clear();
				i += 2;
				continue;
			}
			match ch {
				'|' => {
					segments.push(tokenize(&current));
					operators.push(Operator::Pipe);
					current.clear();
					i += 1;
					continue;
				}
				';' => {
					segments.push(tokenize(&current));
					operators.push(Operator::Seq);
					current.clear();
					i += 1;
					continue;
				}
				_ => {}
			}
		}
		match state.step(ch) {
			StepAction::Literal(c) => current.push(c),
			StepAction::Consumed => current.push(ch),
		}
		i += 1;
	}
	segments.push(tokenize(&current));
	(segments, operators)
}

/// Parses a single already-tokenized command. `token[0]` is the command
/// name; everything else is flags, args, or a redirection.
pub fn parse_command(tokens: &[String]) -> ParsedCommand {
	if tokens.is_empty() {
		return ParsedCommand::default();
	}
	let command = tokens[0].clone();
	let raw_args = tokens[1..].join(" ");
	let mut args = Vec::new();
	let mut flags = BTreeMap::new();
	let mut input_redirect = None;
	let mut output_redirect = None;

	let mut i = 1;
	while i < tokens.len() {
		let tok = &tokens[i];
		if let Some(rest) = tok.strip_prefix(">>") {
			let path = if rest.is_empty() {
				i += 1;
				tokens.get(i).cloned().unwrap_or_default()
			} else {
				rest.to_string()
			};
			output_redirect = Some(OutputRedirect { path, append: true });
		} else if let Some(rest) = tok.strip_prefix('>') {
			let path = if rest.is_empty() {
				i += 1;
				tokens.get(i).cloned().unwrap_or_default()
			} else {
				rest.to_string()
			};
			output_redirect = Some(OutputRedirect { path, append: false });
		} else if let Some(rest) = tok.strip_prefix('<') {
			let path = if rest.is_empty() {
				i += 1;
				tokens.get(i).cloned().unwrap_or_default()
			} else {
				rest.to_string()
			};
			input_redirect = Some(path);
		} else if let Some(rest) = tok.strip_prefix("--") {
			if let Some((name, value)) = rest.split_once('=') {
				flags.insert(name.to_string(), FlagValue::Value(value.to_string()));
			} else {
				let takes_value = tokens
					.get(i + 1)
					.is_some_and(|next| !is_flag_like(next));
				if takes_value {
					i += 1;
					flags.insert(rest.to_string(), FlagValue::Value(tokens[i].clone()));
				} else {
					flags.insert(rest.to_string(), FlagValue::Bool(true));
				}
			}
		} else if tok.len() > 1 && tok.starts_with('-') && !looks_numeric(tok) {
			for ch in tok[1..].chars() {
				flags.insert(ch.to_string(), FlagValue::Bool(true));
			}
		} else {
			args.push(tok.clone());
		}
		i += 1;
	}

	ParsedCommand {
		command,
		args,
		raw_args,
		flags,
		input_redirect,
		output_redirect,
	}
}

/// Pulls a value-taking flag's following token out of an already-tokenized
/// argument list, handler-side. `parse_command`'s short-flag branch only
/// ever coalesces booleans (see its doc comment), so a handler that needs
/// `-n 5` or a single-dash multi-letter flag like `-name PATTERN` re-scans
/// `raw_args` itself; `flag` is matched verbatim (`"-n"`, `"-name"`, ...).
/// Returns the value and the remaining tokens with the flag and its value
/// removed, so the handler can still find its positional arguments.
pub fn take_flag_value_tokens(tokens: &[String], flag: &str) -> (Option<String>, Vec<String>) {
	let mut value = None;
	let mut rest = Vec::with_capacity(tokens.len());
	let mut i = 0;
	while i < tokens.len() {
		if value.is_none() && tokens[i] == flag {
			value = tokens.get(i + 1).cloned();
			i += 2;
			continue;
		}
		rest.push(tokens[i].clone());
		i += 1;
	}
	(value, rest)
}

/// `take_flag_value_tokens`, tokenizing `raw_args` first.
pub fn take_flag_value(raw_args: &str, flag: &str) -> (Option<String>, Vec<String>) {
	take_flag_value_tokens(&tokenize(raw_args), flag)
}

fn is_flag_like(tok: &str) -> bool {
	tok.starts_with('-') && !looks_numeric(tok)
}

/// `-5` and `-3.2` are args/values, not short-flag clusters — this is how
/// handlers like `head -n -5` and bare negative numbers stay out of the
/// flag table.
fn looks_numeric(tok: &str) -> bool {
	tok.len() > 1 && tok[1..].chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Parses a full raw input line into a `Pipeline`. Empty segments (from
/// trailing/consecutive operators) become no-op `ParsedCommand`s with an
/// empty `command` string.
pub fn parse_pipeline(line: &str) -> Pipeline {
	let (segments, operators) = split_pipeline(line);
	let commands = segments.iter().map(|toks| parse_command(toks)).collect();
	Pipeline {
		commands,
		operators,
	}
}
