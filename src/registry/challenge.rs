//! Commands a candidate uses to interact with the assessment framing
//! itself rather than a simulated Unix environment: checking progress,
//! spending a hint, and submitting/advancing.
use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

pub fn status(_cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let state = &ctx.challenge;
	let done = state.objectives.iter().filter(|o| o.completed).count();
	let mut out = format!("Level {} — {}/{} objectives complete\n", state.level, done, state.objectives.len());
	for obj in &state.objectives {
		let mark = if obj.completed { "[x]" } else { "[ ]" };
		out.push_str(&format!("  {mark} {} - {}\n", obj.id, obj.description));
	}
	CommandOutput::ok(out.trim_end().to_string())
}

pub fn hint(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let id = cmd.args.first().cloned();
	ctx.challenge.hints_used += 1;
	match id {
		Some(id) => CommandOutput::ok(format!("Hint requested for objective '{id}'. Check the task panel.")),
		None => CommandOutput::ok("Hint requested. Check the task panel."),
	}
}

pub fn submit(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(id) = cmd.args.first().cloned() else {
		return CommandOutput::err("submit: usage: submit <objective-id>", 2);
	};
	let Some(objective) = ctx.challenge.objective_mut(&id) else {
		return CommandOutput::err(format!("submit: unknown objective '{id}'"), 1);
	};
	if objective.completed {
		return CommandOutput::ok(format!("Objective '{id}' was already complete."));
	}
	// Actual completion is decided by the host's objective-evaluation
	// callback (see `engine::TerminalEngine::set_objective_hook`), which
	// runs after the command line executes and flips `completed` itself;
	// this handler only acknowledges the submission attempt.
	CommandOutput::ok(format!("Submission for '{id}' recorded, evaluating..."))
}

pub fn next_level(_cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	if !ctx.challenge.all_complete() {
		return CommandOutput::err("Not all objectives for this level are complete yet.", 1);
	}
	ctx.challenge.level += 1;
	for obj in &mut ctx.challenge.objectives {
		obj.completed = false;
	}
	CommandOutput::ok(format!("Advancing to level {}", ctx.challenge.level))
}
