use crate::context::CommandContext;
use crate::registry::coreutils::*;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn cd_changes_cwd_and_rejects_missing_dir() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("cd /tmp"));
	let out = cd(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 1);
	c.fs.mkdir("/tmp", false, "/").unwrap();
	let out = cd(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 0);
	assert_eq!(c.cwd, "/tmp");
}

#[test]
fn cat_reads_and_joins_multiple_files() {
	let mut c = ctx();
	c.fs.write_file("/a", "one", "/").unwrap();
	c.fs.write_file("/b", "two", "/").unwrap();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("cat /a /b"));
	let out = cat(&cmd, &mut c, None);
	assert_eq!(out.output, "onetwo");
}

#[test]
fn cat_with_no_args_echoes_stdin() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("cat"));
	let out = cat(&cmd, &mut c, Some("piped".to_string()));
	assert_eq!(out.output, "piped");
}

#[test]
fn head_respects_n_flag() {
	let mut c = ctx();
	c.fs.write_file("/f", "a\nb\nc\nd\n", "/").unwrap();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("head -n 2 /f"));
	let out = head(&cmd, &mut c, None);
	assert_eq!(out.output, "a\nb");
}

#[test]
fn grep_formats_file_line_matches() {
	let mut c = ctx();
	c.fs.write_file("/f", "hello\nworld\n", "/").unwrap();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("grep hello /f"));
	let out = grep(&cmd, &mut c, None);
	assert_eq!(out.output, "/f:1:hello");
}

#[test]
fn dirname_and_basename() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("dirname /a/b/c"));
	assert_eq!(dirname(&cmd, &mut c, None).output, "/a/b");
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("basename /a/b/c"));
	assert_eq!(basename(&cmd, &mut c, None).output, "c");
}

#[test]
fn cut_extracts_field_by_delimiter() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("cut -d , -f 2"));
	let out = cut(&cmd, &mut c, Some("a,b,c".to_string()));
	assert_eq!(out.output, "b");
}
