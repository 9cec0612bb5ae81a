use crate::context::CommandContext;
use crate::registry::docker::*;
use crate::vfs::Vfs;

fn ctx() -> CommandContext {
	CommandContext::new("candidate", "fleetcore", "/home/candidate", Vfs::new())
}

#[test]
fn start_then_ps_shows_running_container() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("docker start fleetcore-api"));
	docker_cmd(&cmd, &mut c, None);
	assert_eq!(c.docker.containers.get("fleetcore-api").unwrap().status, "Up");
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("docker ps"));
	let out = docker_cmd(&cmd, &mut c, None);
	assert!(out.output.contains("fleetcore-api"));
}

#[test]
fn exec_matches_probe_against_targeted_container() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("docker start fleetcore-cache"));
	docker_cmd(&cmd, &mut c, None);
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("docker exec fleetcore-cache redis-cli ping"));
	let out = docker_cmd(&cmd, &mut c, None);
	assert_eq!(out.output, "PONG");
}

#[test]
fn unknown_container_is_an_error() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("docker start ghost"));
	let out = docker_cmd(&cmd, &mut c, None);
	assert_eq!(out.exit_code, 1);
}

#[test]
fn compose_up_starts_everything() {
	let mut c = ctx();
	let cmd = crate::parser::parse_command(&crate::parser::tokenize("docker compose up"));
	docker_cmd(&cmd, &mut c, None);
	assert!(c.docker.containers.values().all(|cont| cont.status == "Up"));
}
