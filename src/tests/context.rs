use crate::context::*;
use crate::vfs::Vfs;

#[test]
fn display_cwd_abbreviates_home() {
	let mut ctx = CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new());
	assert_eq!(ctx.display_cwd(), "~");
	ctx.set_cwd("/home/candidate/projects");
	assert_eq!(ctx.display_cwd(), "~/projects");
	ctx.set_cwd("/etc");
	assert_eq!(ctx.display_cwd(), "/etc");
}

#[test]
fn challenge_all_complete_requires_nonempty() {
	let mut state = ChallengeState::default();
	assert!(!state.all_complete());
	state.objectives.push(Objective {
		id: "1".into(),
		description: "do a thing".into(),
		completed: false,
	});
	assert!(!state.all_complete());
	state.objective_mut("1").unwrap().completed = true;
	assert!(state.all_complete());
}
