use crate::context::CommandContext;
use crate::registry::net::*;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn curl_serves_local_api_routes() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("curl localhost:3000/health"));
	let out = curl(&cmd, &mut c, None);
	assert_eq!(out.output, r#"{"status":"healthy"}"#);
}

#[test]
fn curl_returns_generic_success_for_unrecognized_hosts() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("curl https://example.com"));
	let out = curl(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 0);
	assert_eq!(out.output, "<html>OK</html>");
}

#[test]
fn curl_rejects_unsimulated_local_port() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("curl localhost:9999/foo"));
	let out = curl(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 7);
}

#[test]
fn curl_posts_data_and_defaults_method_to_post() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize(
		r#"curl -d '{"plate":"FL-004"}' localhost:3000/api/v1/vehicles"#,
	));
	let out = curl(&cmd, &mut c, None);
	assert_eq!(out.output, r#"{"id":3,"plate":"FL-003","status":"active"}"#);
}

#[test]
fn curl_404_default_for_unknown_path_still_succeeds() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("curl localhost:3000/nope"));
	let out = curl(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 0);
}
