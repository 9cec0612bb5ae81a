use crate::context::{CommandContext, Objective};
use crate::registry::challenge::*;
use crate::vfs::Vfs;

fn ctx_with_objective() -> CommandContext {
	let mut c = CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new());
	c.challenge.objectives.push(Objective {
		id: "find-flag".into(),
		description: "locate the flag file".into(),
		completed: false,
	});
	c
}

#[test]
fn next_level_blocked_until_all_objectives_complete() {
	let mut c = ctx_with_objective();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("next-level"));
	assert_eq!(next_level(&cmd, &mut c, None).exit_code, 1);
	c.challenge.objective_mut("find-flag").unwrap().completed = true;
	let out = next_level(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 0);
	assert_eq!(c.challenge.level, 1);
	assert!(!c.challenge.objectives[0].completed);
}

#[test]
fn submit_unknown_objective_errors() {
	let mut c = ctx_with_objective();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("submit nope"));
	assert_eq!(submit(&cmd, &mut c, None).exit_code, 1);
}
