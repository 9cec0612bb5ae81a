use crate::context::CommandContext;
use crate::registry::builtins::*;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn echo_joins_args_with_trailing_newline_stripped_for_output_field() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("echo hi there"));
	assert_eq!(echo(&cmd, &mut c, None).output, "hi there");
}

#[test]
fn echo_expands_set_and_unset_vars() {
	let mut c = ctx();
	c.env.insert("VAR".to_string(), "x".to_string());
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("echo $VAR"));
	assert_eq!(echo(&cmd, &mut c, None).output, "x");
	c.env.remove("VAR");
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("echo $VAR"));
	assert_eq!(echo(&cmd, &mut c, None).output, "");
}

#[test]
fn echo_supports_braced_vars_and_e_flag() {
	let mut c = ctx();
	c.env.insert("VAR".to_string(), "x".to_string());
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("echo ${VAR}y"));
	assert_eq!(echo(&cmd, &mut c, None).output, "xy");
}

#[test]
fn export_sets_env_var() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("export FOO=bar"));
	export(&cmd, &mut c, None);
	assert_eq!(c.env.get("FOO"), Some(&"bar".to_string()));
}

#[test]
fn which_reports_known_and_unknown_commands() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("which ls"));
	assert_eq!(which(&cmd, &mut c, None).exit_code, 0);
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("which nope"));
	assert_eq!(which(&cmd, &mut c, None).exit_code, 1);
}

#[test]
fn sort_and_uniq() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("sort"));
	let out = sort(&cmd, &mut c, Some("b\na\nc".to_string()));
	assert_eq!(out.output, "a\nb\nc");
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("uniq"));
	let out = uniq(&cmd, &mut c, Some("a\na\nb".to_string()));
	assert_eq!(out.output, "a\nb");
}
