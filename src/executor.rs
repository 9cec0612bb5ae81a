//! Pipeline execution: runs a `Pipeline` against a `Registry`, honouring
//! `|`/`&&`/`||`/`;` semantics and redirections.
use crate::context::CommandContext;
use crate::parser::{Operator, ParsedCommand, Pipeline};
use crate::registry::{CommandOutput, Registry};

pub struct Executor<'a> {
	registry: &'a Registry,
}

impl<'a> Executor<'a> {
	pub fn new(registry: &'a Registry) -> Self {
		Self { registry }
	}

	/// Runs every stage of `pipeline`, returning the combined output that
	/// should be presented to the terminal and the final exit code.
	///
	/// `;` always runs the next stage; `&&` only if the previous exit code
	/// was 0; `||` only if it wasn't; `|` always runs, forwarding the
	/// previous stage's stdout as the next stage's stdin. Only the final
	/// stage's redirect takes effect on the terminal-visible output —
	/// earlier stages' redirects still write their file but contribute
	/// nothing to what's echoed (their "stdout" is consumed by the pipe).
	pub fn run(&self, pipeline: &Pipeline, ctx: &mut CommandContext) -> CommandOutput {
		self.run_with_stdin(pipeline, ctx, None)
	}

	/// Like `run`, but seeds the very first stage's stdin with `stdin`
	/// instead of `None` — used for heredoc bodies, which only ever target
	/// the first command of the line they're attached to.
	pub fn run_with_stdin(&self, pipeline: &Pipeline, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
		if pipeline.commands.is_empty() {
			return CommandOutput::success();
		}
		let mut stdin = stdin;
		let mut last = CommandOutput::success();

		for (i, cmd) in pipeline.commands.iter().enumerate() {
			let operator_in = if i == 0 { None } else { pipeline.operators.get(i - 1) };
			let should_run = match operator_in {
				None | Some(Operator::Seq) | Some(Operator::Pipe) => true,
				Some(Operator::And) => last.exit_code == 0,
				Some(Operator::Or) => last.exit_code != 0,
			};
			if !should_run {
				// A skipped stage still breaks any pipe it would have fed.
				stdin = None;
				continue;
			}

			let is_last = i == pipeline.commands.len() - 1;
			let feeds_pipe = !is_last && pipeline.operators.get(i) == Some(&Operator::Pipe);

			let resolved_stdin = resolve_input_redirect(cmd, ctx, stdin.take());
			let output = self.run_one(cmd, ctx, resolved_stdin);
			ctx.last_exit_code = output.exit_code;

			write_output_redirect(cmd, ctx, &output.output);

			stdin = feeds_pipe.then(|| output.output.clone());
			last = output;
		}
		last
	}

	fn run_one(&self, cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
		if !self.registry.contains(&cmd.command) && !is_editor_alias(&cmd.command) {
			return CommandOutput::err(format!("{}: command not found", cmd.command), 127);
		}
		std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
			self.registry.dispatch(cmd, ctx, stdin)
		}))
		.unwrap_or_else(|_| CommandOutput::err(format!("{}: internal error", cmd.command), 1))
	}
}

fn is_editor_alias(name: &str) -> bool {
	matches!(name, "vi" | "vim" | "nano" | "emacs")
}

fn resolve_input_redirect(cmd: &ParsedCommand, ctx: &CommandContext, stdin: Option<String>) -> Option<String> {
	if let Some(path) = &cmd.input_redirect {
		ctx.fs.read_file(path, &ctx.cwd).ok()
	} else {
		stdin
	}
}

fn write_output_redirect(cmd: &ParsedCommand, ctx: &mut CommandContext, output: &str) {
	let Some(redirect) = &cmd.output_redirect else { return };
	let terminated = format!("{output}\n");
	let result = if redirect.append {
		ctx.fs.append_file(&redirect.path, &terminated, &ctx.cwd)
	} else {
		ctx.fs.write_file(&redirect.path, &terminated, &ctx.cwd)
	};
	let _ = result; // a failed redirect leaves the file untouched; exit code already reflects the command itself
}
