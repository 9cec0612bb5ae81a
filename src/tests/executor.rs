use crate::context::CommandContext;
use crate::executor::*;
use crate::parser::parse_pipeline;
use crate::registry::Registry;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn pipe_forwards_stdout_as_stdin() {
	let mut c = ctx();
	c.fs.write_file("/f", "banana\napple\ncherry\n", "/").unwrap();
	let registry = Registry::new();
	let executor = Executor::new(&registry);
	let pipeline = parse_pipeline("cat /f | sort");
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.output, "apple\nbanana\ncherry");
}

#[test]
fn and_short_circuits_on_failure() {
	let mut c = ctx();
	let registry = Registry::new();
	let executor = Executor::new(&registry);
	let pipeline = parse_pipeline("false && echo should-not-run");
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.output, "");
	assert_eq!(out.exit_code, 1);
}

#[test]
fn or_runs_only_after_failure() {
	let mut c = ctx();
	let registry = Registry::new();
	let executor = Executor::new(&registry);
	let pipeline = parse_pipeline("true || echo should-not-run");
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.exit_code, 0);
	assert_eq!(out.output, "");

	let pipeline = parse_pipeline("false || echo recovered");
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.output, "recovered");
}

#[test]
fn seq_runs_regardless_of_prior_status() {
	let mut c = ctx();
	let registry = Registry::new();
	let executor = Executor::new(&registry);
	let pipeline = parse_pipeline("false ; echo after");
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.output, "after");
}

#[test]
fn output_redirect_writes_file_and_still_reports_exit_code() {
	let mut c = ctx();
	let registry = Registry::new();
	let executor = Executor::new(&registry);
	let pipeline = parse_pipeline("echo hello > /tmp/out.txt");
	c.fs.mkdir("/tmp", false, "/").unwrap();
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.exit_code, 0);
	assert_eq!(c.fs.read_file("/tmp/out.txt", "/").unwrap(), "hello\n");
}

#[test]
fn unknown_command_reports_127() {
	let mut c = ctx();
	let registry = Registry::new();
	let executor = Executor::new(&registry);
	let pipeline = parse_pipeline("notarealcommand");
	let out = executor.run(&pipeline, &mut c);
	assert_eq!(out.exit_code, 127);
}
