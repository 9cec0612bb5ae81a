//! VFS-backed coreutils: the handlers that read or mutate the virtual
//! filesystem. Every path argument goes through `ctx.fs.resolve_path` so
//! relative paths, `.`/`..`, and symlinks behave the way the VFS defines.
use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

fn first_arg(cmd: &ParsedCommand) -> Option<&str> {
	cmd.args.first().map(String::as_str)
}

pub fn pwd(_cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::ok(ctx.cwd.clone())
}

pub fn cd(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let target = first_arg(cmd).unwrap_or("~");
	if target == "-" {
		let Some(oldpwd) = ctx.oldpwd() else {
			return CommandOutput::err("cd: OLDPWD not set", 1);
		};
		ctx.set_cwd(&oldpwd);
		return CommandOutput::ok(ctx.cwd.clone());
	}
	let target = if target == "~" || target.starts_with("~/") {
		let home = ctx.home();
		target.replacen('~', &home, 1)
	} else {
		target.to_string()
	};
	let resolved = ctx.fs.resolve_path(&target, &ctx.cwd);
	if !ctx.fs.is_directory(&resolved, "/") {
		return CommandOutput::err(format!("cd: {target}: No such file or directory"), 1);
	}
	ctx.set_cwd(&resolved);
	CommandOutput::success()
}

fn format_listing(nodes: &[&crate::vfs::FSNode], long: bool, show_all: bool) -> String {
	let visible: Vec<&&crate::vfs::FSNode> = nodes
		.iter()
		.filter(|n| show_all || !n.name.starts_with('.'))
		.collect();
	if long {
		visible
			.iter()
			.map(|n| format!("{} {} {}", n.permissions, n.modified, n.name))
			.collect::<Vec<_>>()
			.join("\n")
	} else {
		visible
			.iter()
			.map(|n| n.name.clone())
			.collect::<Vec<_>>()
			.join("  ")
	}
}

pub fn ls(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let path = first_arg(cmd).unwrap_or(".");
	match ctx.fs.list_dir(path, &ctx.cwd) {
		Ok(nodes) => CommandOutput::ok(format_listing(&nodes, cmd.flag_bool("l"), cmd.flag_bool("a"))),
		Err(e) => CommandOutput::err(format!("ls: {e}"), e.exit_code()),
	}
}

pub fn cat(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	if cmd.args.is_empty() {
		return CommandOutput::ok(stdin.unwrap_or_default());
	}
	let mut out = String::new();
	for path in &cmd.args {
		match ctx.fs.read_file(path, &ctx.cwd) {
			Ok(content) => out.push_str(&content),
			Err(e) => return CommandOutput::err(format!("cat: {e}"), e.exit_code()),
		}
	}
	CommandOutput::ok(out)
}

pub fn mkdir(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = first_arg(cmd) else {
		return CommandOutput::err("mkdir: missing operand", 2);
	};
	match ctx.fs.mkdir(path, cmd.flag_bool("p"), &ctx.cwd) {
		Ok(()) => CommandOutput::success(),
		Err(e) => CommandOutput::err(format!("mkdir: {e}"), e.exit_code()),
	}
}

pub fn touch(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = first_arg(cmd) else {
		return CommandOutput::err("touch: missing operand", 2);
	};
	let existing = ctx.fs.read_file(path, &ctx.cwd).unwrap_or_default();
	match ctx.fs.write_file(path, &existing, &ctx.cwd) {
		Ok(()) => CommandOutput::success(),
		Err(e) => CommandOutput::err(format!("touch: {e}"), e.exit_code()),
	}
}

pub fn rm(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = first_arg(cmd) else {
		return CommandOutput::err("rm: missing operand", 2);
	};
	let recursive = cmd.flag_bool("r") || cmd.flag_bool("R") || cmd.flag_bool("recursive");
	match ctx.fs.rm(path, recursive, &ctx.cwd) {
		Ok(()) => CommandOutput::success(),
		Err(e) => CommandOutput::err(format!("rm: {e}"), e.exit_code()),
	}
}

pub fn cp(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.args.len() < 2 {
		return CommandOutput::err("cp: missing file operand", 2);
	}
	match ctx.fs.copy(&cmd.args[0], &cmd.args[1], &ctx.cwd) {
		Ok(()) => CommandOutput::success(),
		Err(e) => CommandOutput::err(format!("cp: {e}"), e.exit_code()),
	}
}

pub fn mv(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.args.len() < 2 {
		return CommandOutput::err("mv: missing file operand", 2);
	}
	match ctx.fs.rename(&cmd.args[0], &cmd.args[1], &ctx.cwd) {
		Ok(()) => CommandOutput::success(),
		Err(e) => CommandOutput::err(format!("mv: {e}"), e.exit_code()),
	}
}

pub fn find(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let base = first_arg(cmd).unwrap_or(".");
	// `-name` is a single-dash multi-letter flag, so the parser coalesces it
	// as booleans rather than capturing its value; pull it from raw_args.
	// `--name` (long form) still resolves through the ordinary flag table.
	let (raw_name, _) = crate::parser::take_flag_value(&cmd.raw_args, "-name");
	let glob = cmd.flag_str("name").map(str::to_string).or(raw_name).unwrap_or_else(|| "*".to_string());
	match ctx.fs.find(base, &glob, &ctx.cwd) {
		Ok(hits) => CommandOutput::ok(hits.join("\n")),
		Err(e) => CommandOutput::err(format!("find: {e}"), e.exit_code()),
	}
}

pub fn grep(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let Some(pattern) = first_arg(cmd) else {
		return CommandOutput::err("grep: missing pattern", 2);
	};
	let ignore_case = cmd.flag_bool("i");
	let recursive = cmd.flag_bool("r") || cmd.flag_bool("R");
	let Some(path) = cmd.args.get(1) else {
		let Some(input) = stdin else {
			return CommandOutput::err("grep: missing file operand", 2);
		};
		let re = match if ignore_case {
			regex::Regex::new(&format!("(?i){pattern}"))
		} else {
			regex::Regex::new(pattern)
		} {
			Ok(re) => re,
			Err(e) => return CommandOutput::err(format!("grep: invalid pattern: {e}"), 2),
		};
		let matched: Vec<&str> = input.lines().filter(|l| re.is_match(l)).collect();
		return CommandOutput::ok(matched.join("\n"));
	};
	match ctx.fs.grep(pattern, path, recursive, ignore_case, &ctx.cwd) {
		Ok(hits) => {
			let lines: Vec<String> = hits
				.iter()
				.map(|h| format!("{}:{}:{}", h.file, h.line_number, h.line_text))
				.collect();
			CommandOutput::ok(lines.join("\n"))
		}
		Err(e) => CommandOutput::err(format!("grep: {e}"), e.exit_code()),
	}
}

fn read_input_or_file(cmd: &ParsedCommand, ctx: &CommandContext, stdin: Option<String>) -> Result<String, String> {
	read_input_or_path(first_arg(cmd), ctx, stdin)
}

fn read_input_or_path(path: Option<&str>, ctx: &CommandContext, stdin: Option<String>) -> Result<String, String> {
	if let Some(path) = path {
		ctx.fs.read_file(path, &ctx.cwd).map_err(|e| e.to_string())
	} else {
		Ok(stdin.unwrap_or_default())
	}
}

pub fn head(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let (n_value, rest) = crate::parser::take_flag_value(&cmd.raw_args, "-n");
	let n: usize = n_value.and_then(|v| v.parse().ok()).unwrap_or(10);
	match read_input_or_path(rest.first().map(String::as_str), ctx, stdin) {
		Ok(content) => CommandOutput::ok(content.lines().take(n).collect::<Vec<_>>().join("\n")),
		Err(e) => CommandOutput::err(format!("head: {e}"), 1),
	}
}

pub fn tail(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let (n_value, rest) = crate::parser::take_flag_value(&cmd.raw_args, "-n");
	let n: usize = n_value.and_then(|v| v.parse().ok()).unwrap_or(10);
	match read_input_or_path(rest.first().map(String::as_str), ctx, stdin) {
		Ok(content) => {
			let lines: Vec<&str> = content.lines().collect();
			let skip = lines.len().saturating_sub(n);
			CommandOutput::ok(lines[skip..].join("\n"))
		}
		Err(e) => CommandOutput::err(format!("tail: {e}"), 1),
	}
}

pub fn wc(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	match read_input_or_file(cmd, ctx, stdin) {
		Ok(content) => {
			let lines = content.lines().count();
			let words = content.split_whitespace().count();
			let bytes = content.len();
			let (show_l, show_w, show_c) = (cmd.flag_bool("l"), cmd.flag_bool("w"), cmd.flag_bool("c"));
			if !show_l && !show_w && !show_c {
				return CommandOutput::ok(format!("{lines} {words} {bytes}"));
			}
			let mut parts = Vec::new();
			if show_l {
				parts.push(lines.to_string());
			}
			if show_w {
				parts.push(words.to_string());
			}
			if show_c {
				parts.push(bytes.to_string());
			}
			CommandOutput::ok(parts.join(" "))
		}
		Err(e) => CommandOutput::err(format!("wc: {e}"), 1),
	}
}

pub fn tree(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let path = first_arg(cmd).unwrap_or(".");
	let Some(node) = ctx.fs.resolve(path, &ctx.cwd) else {
		return CommandOutput::err(format!("tree: {path}: No such file or directory"), 1);
	};
	let mut out = String::new();
	render_tree(node, "", &mut out);
	CommandOutput::ok(out.trim_end().to_string())
}

fn render_tree(node: &crate::vfs::FSNode, prefix: &str, out: &mut String) {
	let children = node.sorted_children();
	for (i, child) in children.iter().enumerate() {
		let is_last = i == children.len() - 1;
		let branch = if is_last { "└── " } else { "├── " };
		out.push_str(&format!("{prefix}{branch}{}\n", child.name));
		let next_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
		render_tree(child, &next_prefix, out);
	}
}

pub fn realpath(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = first_arg(cmd) else {
		return CommandOutput::err("realpath: missing operand", 2);
	};
	CommandOutput::ok(ctx.fs.resolve_path(path, &ctx.cwd))
}

pub fn dirname(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = first_arg(cmd) else {
		return CommandOutput::err("dirname: missing operand", 2);
	};
	let trimmed = path.trim_end_matches('/');
	match trimmed.rfind('/') {
		Some(0) => CommandOutput::ok("/"),
		Some(idx) => CommandOutput::ok(trimmed[..idx].to_string()),
		None => CommandOutput::ok("."),
	}
}

pub fn basename(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = first_arg(cmd) else {
		return CommandOutput::err("basename: missing operand", 2);
	};
	let trimmed = path.trim_end_matches('/');
	let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
	CommandOutput::ok(base.to_string())
}

pub fn cut(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let tokens = crate::parser::tokenize(&cmd.raw_args);
	let (delim_value, rest) = crate::parser::take_flag_value_tokens(&tokens, "-d");
	let delim = delim_value.unwrap_or_else(|| "\t".to_string());
	let (field_value, rest) = crate::parser::take_flag_value_tokens(&rest, "-f");
	let Some(field_spec) = field_value else {
		return CommandOutput::err("cut: you must specify a list of fields with -f", 2);
	};
	let Ok(field) = field_spec.parse::<usize>() else {
		return CommandOutput::err("cut: invalid field list", 2);
	};
	match read_input_or_path(rest.first().map(String::as_str), ctx, stdin) {
		Ok(content) => {
			let out: Vec<String> = content
				.lines()
				.map(|line| {
					line.split(delim)
						.nth(field.saturating_sub(1))
						.unwrap_or("")
						.to_string()
				})
				.collect();
			CommandOutput::ok(out.join("\n"))
		}
		Err(e) => CommandOutput::err(format!("cut: {e}"), 1),
	}
}

pub fn tr(cmd: &ParsedCommand, _ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	let Some(from) = cmd.args.first() else {
		return CommandOutput::err("tr: missing operand", 2);
	};
	let Some(to) = cmd.args.get(1) else {
		return CommandOutput::err("tr: missing operand", 2);
	};
	let from_chars: Vec<char> = from.chars().collect();
	let to_chars: Vec<char> = to.chars().collect();
	let input = stdin.unwrap_or_default();
	let translated: String = input
		.chars()
		.map(|c| match from_chars.iter().position(|&f| f == c) {
			Some(idx) => *to_chars.get(idx).or(to_chars.last()).unwrap_or(&c),
			None => c,
		})
		.collect();
	CommandOutput::ok(translated)
}

pub fn diff(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.args.len() < 2 {
		return CommandOutput::err("diff: missing operand", 2);
	}
	let a = match ctx.fs.read_file(&cmd.args[0], &ctx.cwd) {
		Ok(c) => c,
		Err(e) => return CommandOutput::err(format!("diff: {e}"), 1),
	};
	let b = match ctx.fs.read_file(&cmd.args[1], &ctx.cwd) {
		Ok(c) => c,
		Err(e) => return CommandOutput::err(format!("diff: {e}"), 1),
	};
	if a == b {
		return CommandOutput::success();
	}
	let a_lines: Vec<&str> = a.lines().collect();
	let b_lines: Vec<&str> = b.lines().collect();
	let mut out = Vec::new();
	for i in 0..a_lines.len().max(b_lines.len()) {
		match (a_lines.get(i), b_lines.get(i)) {
			(Some(x), Some(y)) if x == y => {}
			(Some(x), Some(y)) => {
				out.push(format!("{}c{}", i + 1, i + 1));
				out.push(format!("< {x}"));
				out.push("---".to_string());
				out.push(format!("> {y}"));
			}
			(Some(x), None) => out.push(format!("{}d{}\n< {x}", i + 1, i)),
			(None, Some(y)) => out.push(format!("{}a{}\n> {y}", i, i + 1)),
			(None, None) => {}
		}
	}
	CommandOutput::err(out.join("\n"), 1)
}

pub fn chmod(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = cmd.args.get(1).or(cmd.args.first()) else {
		return CommandOutput::err("chmod: missing operand", 2);
	};
	if !ctx.fs.exists(path, &ctx.cwd) {
		return CommandOutput::err(format!("chmod: {path}: No such file or directory"), 1);
	}
	CommandOutput::success()
}

pub fn chown(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(path) = cmd.args.get(1).or(cmd.args.first()) else {
		return CommandOutput::err("chown: missing operand", 2);
	};
	if !ctx.fs.exists(path, &ctx.cwd) {
		return CommandOutput::err(format!("chown: {path}: No such file or directory"), 1);
	}
	CommandOutput::success()
}
