use crate::context::CommandContext;
use crate::registry::devtools::*;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn npm_install_requires_package_json() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("npm install"));
	assert_eq!(npm(&cmd, &mut c, None).exit_code, 1);
	c.fs.write_file("/home/candidate/package.json", "{}", &c.cwd.clone()).unwrap();
	assert_eq!(npm(&cmd, &mut c, None).exit_code, 0);
}

#[test]
fn pip_install_reports_package_name() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("pip install requests"));
	let out = pip(&cmd, &mut c, None);
	assert!(out.output.contains("requests"));
}

#[test]
fn node_e_evaluates_arithmetic() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("node -e 2+2*3"));
	assert_eq!(node(&cmd, &mut c, None).output, "8");
}

#[test]
fn node_e_prints_string_literal() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize(r#"node -e 'console.log("hi")'"#));
	assert_eq!(node(&cmd, &mut c, None).output, "hi");
}

#[test]
fn node_script_detects_express_server() {
	let mut c = ctx();
	c.fs.write_file("/home/candidate/app.js", "const app = require('express')(); app.listen(3000)", &c.cwd.clone()).unwrap();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("node app.js"));
	let out = node(&cmd, &mut c, None);
	assert!(out.output.contains("listening"));
}

#[test]
fn npm_run_dev_returns_canned_output() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("npm run dev"));
	let out = npm(&cmd, &mut c, None);
	assert!(out.output.contains("VITE"));
}

#[test]
fn python_c_evaluates_arithmetic() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("python -c 10/2"));
	assert_eq!(python(&cmd, &mut c, None).output, "5");
}
