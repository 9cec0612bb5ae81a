use crate::context::CommandContext;
use crate::registry::git::*;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn add_then_commit_clears_staged_and_records_commit() {
	let mut c = ctx();
	c.git.modified.push("src/main.rs".to_string());
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("git add ."));
	git_cmd(&cmd, &mut c, None);
	assert_eq!(c.git.staged, vec!["src/main.rs".to_string()]);
	let cmd = crate::parser::parse_command(&crate::parser::tokenize(r#"git commit -m "initial""#));
	let out = git_cmd(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 0);
	assert!(c.git.staged.is_empty());
	assert_eq!(c.git.commits.len(), 1);
}

#[test]
fn commit_without_message_fails() {
	let mut c = ctx();
	c.git.staged.push("x".to_string());
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("git commit"));
	assert_eq!(git_cmd(&cmd, &mut c, None).exit_code, 1);
}

#[test]
fn checkout_dash_b_creates_and_switches_branch() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("git checkout -b feature"));
	git_cmd(&cmd, &mut c, None);
	assert_eq!(c.git.branch, "feature");
	assert!(c.git.branches.contains(&"feature".to_string()));
}

#[test]
fn push_without_remote_fails() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("git push"));
	assert_eq!(git_cmd(&cmd, &mut c, None).exit_code, 1);
}
