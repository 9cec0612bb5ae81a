//! Shell builtins that don't touch the VFS: environment, introspection,
//! and the handful of no-op/always-succeed commands a grading script might
//! reasonably run.
use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

/// Expands `$VAR` and `${VAR}` references against the session environment.
/// Unset variables expand to the empty string, matching a POSIX shell with
/// `nounset` off.
fn expand_vars(text: &str, ctx: &CommandContext) -> String {
	let mut out = String::with_capacity(text.len());
	let chars: Vec<char> = text.chars().collect();
	let mut i = 0;
	while i < chars.len() {
		if chars[i] != '$' {
			out.push(chars[i]);
			i += 1;
			continue;
		}
		if chars.get(i + 1) == Some(&'{') {
			if let Some(end) = chars[i + 2..].iter().position(|&c| c == '}') {
				let name: String = chars[i + 2..i + 2 + end].iter().collect();
				out.push_str(ctx.env.get(&name).map(String::as_str).unwrap_or(""));
				i += 2 + end + 1;
				continue;
			}
		}
		let name_len = chars[i + 1..]
			.iter()
			.take_while(|c| c.is_alphanumeric() || **c == '_')
			.count();
		if name_len > 0 {
			let name: String = chars[i + 1..i + 1 + name_len].iter().collect();
			out.push_str(ctx.env.get(&name).map(String::as_str).unwrap_or(""));
			i += 1 + name_len;
		} else {
			out.push('$');
			i += 1;
		}
	}
	out
}

pub fn echo(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let joined = expand_vars(&cmd.args.join(" "), ctx);
	let body = if cmd.flag_bool("e") {
		joined
			.replace("\\n", "\n")
			.replace("\\t", "\t")
	} else {
		joined
	};
	let text = if cmd.flag_bool("n") {
		body
	} else {
		format!("{body}\n")
	};
	CommandOutput::ok(text.trim_end_matches('\n').to_string())
}

pub fn env(_cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let lines: Vec<String> = ctx
		.env
		.iter()
		.map(|(k, v)| format!("{k}={v}"))
		.collect();
	CommandOutput::ok(lines.join("\n"))
}

pub fn export(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(assignment) = cmd.args.first() else {
		return CommandOutput::err("export: usage: export NAME=value", 2);
	};
	match assignment.split_once('=') {
		Some((name, value)) => {
			ctx.env.insert(name.to_string(), value.to_string());
			CommandOutput::success()
		}
		None => CommandOutput::err(format!("export: {assignment}: not a valid identifier"), 1),
	}
}

pub fn clear(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::ok("\x1b[2J\x1b[H")
}

pub fn history(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	// The engine owns the `InputBuffer` (and its history) outside the
	// registry's reach, so it substitutes the formatted listing before
	// running this handler's output through the executor. Left as a plain
	// success here; see `engine::TerminalEngine::run_command`.
	CommandOutput::success()
}

pub fn whoami(_cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::ok(ctx.user.clone())
}

pub fn hostname(_cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::ok(ctx.hostname.clone())
}

pub fn date(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	// No wall-clock access inside the sandboxed core; the host composites
	// the real timestamp in if a fixture needs one.
	CommandOutput::ok("Thu Jan  1 00:00:00 UTC 1970")
}

pub fn uname(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.flag_bool("a") {
		CommandOutput::ok("Linux fleetcore 6.1.0 x86_64 GNU/Linux")
	} else {
		CommandOutput::ok("Linux")
	}
}

const KNOWN_COMMANDS: &[&str] = &[
	"pwd", "cd", "ls", "cat", "mkdir", "touch", "rm", "cp", "mv", "find", "grep", "head", "tail",
	"wc", "tree", "realpath", "dirname", "basename", "cut", "tr", "diff", "chmod", "chown", "echo",
	"env", "export", "clear", "history", "whoami", "hostname", "date", "uname", "which", "man",
	"help", "true", "false", "exit", "sort", "uniq", "xargs", "docker", "git", "node", "npm", "npx",
	"python", "python3", "pip", "pip3", "curl", "wget", "ping", "netstat", "ss", "status", "hint",
	"submit", "next-level",
];

pub fn which(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(name) = cmd.args.first() else {
		return CommandOutput::err("which: missing operand", 2);
	};
	if KNOWN_COMMANDS.contains(&name.as_str()) {
		CommandOutput::ok(format!("/usr/bin/{name}"))
	} else {
		CommandOutput::err(String::new(), 1)
	}
}

pub fn man(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(name) = cmd.args.first() else {
		return CommandOutput::err("What manual page do you want?", 2);
	};
	if KNOWN_COMMANDS.contains(&name.as_str()) {
		CommandOutput::ok(format!("{name}(1)\n\nNo manual entry available in this sandboxed environment."))
	} else {
		CommandOutput::err(format!("No manual entry for {name}"), 1)
	}
}

pub fn help(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::ok(KNOWN_COMMANDS.join(" "))
}

pub fn true_cmd(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::success()
}

pub fn false_cmd(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::err(String::new(), 1)
}

pub fn exit(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let code = cmd
		.args
		.first()
		.and_then(|a| a.parse::<i32>().ok())
		.unwrap_or(0);
	// The engine treats a handler named "exit" specially (ends the
	// session); the exit code still flows through the normal contract.
	CommandOutput::err(String::new(), code)
}

pub fn sort(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let input = if let Some(path) = cmd.args.first() {
		match ctx.fs.read_file(path, &ctx.cwd) {
			Ok(c) => c,
			Err(e) => return CommandOutput::err(format!("sort: {e}"), 1),
		}
	} else {
		stdin.unwrap_or_default()
	};
	let mut lines: Vec<&str> = input.lines().collect();
	lines.sort_unstable();
	if cmd.flag_bool("r") {
		lines.reverse();
	}
	CommandOutput::ok(lines.join("\n"))
}

pub fn uniq(_cmd: &ParsedCommand, _ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let input = stdin.unwrap_or_default();
	let mut out = Vec::new();
	let mut prev: Option<&str> = None;
	for line in input.lines() {
		if prev != Some(line) {
			out.push(line);
		}
		prev = Some(line);
	}
	CommandOutput::ok(out.join("\n"))
}

pub fn xargs(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let Some(sub) = cmd.args.first() else {
		return CommandOutput::err("xargs: missing command", 2);
	};
	let input = stdin.unwrap_or_default();
	let extra_args: Vec<String> = input.split_whitespace().map(str::to_string).collect();
	let mut tokens = vec![sub.clone()];
	tokens.extend(cmd.args[1..].iter().cloned());
	tokens.extend(extra_args);
	let sub_cmd = crate::parser::parse_command(&tokens);
	let registry = crate::registry::Registry::new();
	registry.dispatch(&sub_cmd, ctx, None)
}
