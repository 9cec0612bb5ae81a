//! A scripted `git` CLI: tracks just enough branch/staged/commit state to
//! make the common status/add/commit/log/branch workflow behave plausibly.
use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

#[derive(Debug, Clone)]
pub struct Commit {
	pub hash: String,
	pub message: String,
}

#[derive(Debug, Clone)]
pub struct GitState {
	pub initialized: bool,
	pub branch: String,
	pub branches: Vec<String>,
	pub staged: Vec<String>,
	pub modified: Vec<String>,
	pub commits: Vec<Commit>,
	pub stash: Vec<String>,
	pub remote: Option<String>,
}

impl Default for GitState {
	fn default() -> Self {
		let seed_messages = [
			"Initial commit",
			"Add vehicle tracking module",
			"Fix driver assignment race condition",
			"Add integration tests for trip scheduling",
			"Update dependencies",
		];
		let commits: Vec<Commit> = seed_messages
			.iter()
			.enumerate()
			.map(|(i, message)| Commit {
				hash: format!("{:07x}", (i + 1) * 0x9e3779),
				message: message.to_string(),
			})
			.collect();
		Self {
			initialized: true,
			branch: "main".to_string(),
			branches: vec!["main".to_string()],
			staged: Vec::new(),
			modified: Vec::new(),
			commits,
			stash: Vec::new(),
			remote: None,
		}
	}
}

fn next_hash(state: &GitState) -> String {
	format!("{:07x}", (state.commits.len() + 1) * 0x9e3779)
}

pub fn git_cmd(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if cmd.flag_bool("version") {
		return CommandOutput::ok("git version 2.43.0");
	}
	let Some(sub) = cmd.args.first().map(String::as_str) else {
		return CommandOutput::err("git: missing subcommand", 1);
	};
	if !ctx.git.initialized && sub != "init" {
		return CommandOutput::err("fatal: not a git repository (or any of the parent directories): .git", 1);
	}
	match sub {
		"init" => {
			ctx.git.initialized = true;
			CommandOutput::ok(format!("Initialized empty Git repository in {}/.git/", ctx.cwd))
		}
		"status" => status(ctx),
		"add" => add(cmd, ctx),
		"commit" => commit(cmd, ctx),
		"log" => log(cmd, ctx),
		"branch" => branch(cmd, ctx),
		"checkout" => checkout(cmd, ctx),
		"diff" => CommandOutput::success(),
		"remote" => remote(cmd, ctx),
		"stash" => stash(cmd, ctx),
		"pull" => CommandOutput::ok("Already up to date."),
		"push" => push(ctx),
		other => CommandOutput::err(format!("git: '{other}' is not a git command"), 1),
	}
}

fn status(ctx: &CommandContext) -> CommandOutput {
	let mut out = format!("On branch {}\n", ctx.git.branch);
	if ctx.git.staged.is_empty() && ctx.git.modified.is_empty() {
		out.push_str("nothing to commit, working tree clean");
		return CommandOutput::ok(out);
	}
	if !ctx.git.staged.is_empty() {
		out.push_str("Changes to be committed:\n");
		for f in &ctx.git.staged {
			out.push_str(&format!("\tmodified:   {f}\n"));
		}
	}
	if !ctx.git.modified.is_empty() {
		out.push_str("Changes not staged for commit:\n");
		for f in &ctx.git.modified {
			out.push_str(&format!("\tmodified:   {f}\n"));
		}
	}
	CommandOutput::ok(out.trim_end().to_string())
}

fn add(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	if cmd.args.len() < 2 {
		return CommandOutput::err("Nothing specified, nothing added.", 1);
	}
	for path in &cmd.args[1..] {
		if path == "." {
			let modified = std::mem::take(&mut ctx.git.modified);
			ctx.git.staged.extend(modified);
		} else if let Some(pos) = ctx.git.modified.iter().position(|m| m == path) {
			ctx.git.staged.push(ctx.git.modified.remove(pos));
		} else if !ctx.git.staged.contains(path) {
			ctx.git.staged.push(path.clone());
		}
	}
	CommandOutput::success()
}

fn commit(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	if ctx.git.staged.is_empty() {
		return CommandOutput::err("nothing to commit, working tree clean", 1);
	}
	let (raw_message, _) = crate::parser::take_flag_value(&cmd.raw_args, "-m");
	let Some(message) = cmd.flag_str("m").map(str::to_string).or(raw_message) else {
		return CommandOutput::err("Aborting commit due to empty commit message.", 1);
	};
	let hash = next_hash(&ctx.git);
	let count = ctx.git.staged.len();
	ctx.git.commits.push(Commit {
		hash: hash.clone(),
		message: message.to_string(),
	});
	ctx.git.staged.clear();
	CommandOutput::ok(format!(
		"[{} {}] {}\n {} file(s) changed",
		ctx.git.branch, &hash[..7.min(hash.len())], message, count
	))
}

fn log(cmd: &ParsedCommand, ctx: &CommandContext) -> CommandOutput {
	if ctx.git.commits.is_empty() {
		return CommandOutput::err("fatal: your current branch does not have any commits yet", 1);
	}
	let oneline = cmd.flag_bool("oneline");
	let lines: Vec<String> = ctx
		.git
		.commits
		.iter()
		.rev()
		.map(|c| {
			if oneline {
				format!("{} {}", &c.hash[..7.min(c.hash.len())], c.message)
			} else {
				format!("commit {}\n\n    {}\n", c.hash, c.message)
			}
		})
		.collect();
	CommandOutput::ok(lines.join("\n"))
}

fn branch(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	match cmd.args.get(1) {
		None => {
			let lines: Vec<String> = ctx
				.git
				.branches
				.iter()
				.map(|b| {
					if *b == ctx.git.branch {
						format!("* {b}")
					} else {
						format!("  {b}")
					}
				})
				.collect();
			CommandOutput::ok(lines.join("\n"))
		}
		Some(name) => {
			if ctx.git.branches.contains(name) {
				return CommandOutput::err(format!("fatal: A branch named '{name}' already exists."), 1);
			}
			ctx.git.branches.push(name.clone());
			CommandOutput::success()
		}
	}
}

fn checkout(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	let creating = cmd.flag_bool("b");
	let Some(name) = cmd.args.get(1) else {
		return CommandOutput::err("git checkout: missing branch name", 1);
	};
	if creating {
		if !ctx.git.branches.contains(name) {
			ctx.git.branches.push(name.clone());
		}
		ctx.git.branch = name.clone();
		return CommandOutput::ok(format!("Switched to a new branch '{name}'"));
	}
	if !ctx.git.branches.contains(name) {
		return CommandOutput::err(format!("error: pathspec '{name}' did not match any file(s) known to git"), 1);
	}
	ctx.git.branch = name.clone();
	CommandOutput::ok(format!("Switched to branch '{name}'"))
}

fn remote(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	match cmd.args.get(1).map(String::as_str) {
		None | Some("-v") => CommandOutput::ok(
			ctx.git
				.remote
				.as_ref()
				.map(|r| format!("origin\t{r} (fetch)\norigin\t{r} (push)"))
				.unwrap_or_default(),
		),
		Some("add") => {
			if let Some(url) = cmd.args.get(3) {
				ctx.git.remote = Some(url.clone());
			}
			CommandOutput::success()
		}
		_ => CommandOutput::err("git remote: unsupported subcommand", 1),
	}
}

fn stash(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	match cmd.args.get(1).map(String::as_str) {
		None | Some("push") => {
			let modified = std::mem::take(&mut ctx.git.modified);
			if modified.is_empty() {
				return CommandOutput::ok("No local changes to save");
			}
			ctx.git.stash.extend(modified);
			CommandOutput::ok("Saved working directory and index state WIP on ".to_string() + &ctx.git.branch)
		}
		Some("pop") => {
			if ctx.git.stash.is_empty() {
				return CommandOutput::err("No stash entries found.", 1);
			}
			ctx.git.modified.extend(std::mem::take(&mut ctx.git.stash));
			CommandOutput::ok("Dropped stash")
		}
		Some("list") => CommandOutput::ok(if ctx.git.stash.is_empty() {
			String::new()
		} else {
			"stash@{0}: WIP".to_string()
		}),
		_ => CommandOutput::err("git stash: unsupported subcommand", 1),
	}
}

fn push(ctx: &CommandContext) -> CommandOutput {
	if ctx.git.remote.is_none() {
		return CommandOutput::err("fatal: No configured push destination.", 1);
	}
	CommandOutput::ok(format!("Everything up-to-date on {}", ctx.git.branch))
}
