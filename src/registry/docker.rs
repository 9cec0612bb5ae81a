//! A scripted `docker` CLI: enough canned state and subcommand surface for
//! a containers/compose challenge without actually spawning anything.
use std::collections::BTreeMap;

use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

#[derive(Debug, Clone)]
pub struct Container {
	pub name: String,
	pub image: String,
	pub status: String,
	pub ports: String,
}

#[derive(Debug, Clone)]
pub struct DockerState {
	pub containers: BTreeMap<String, Container>,
}

impl Default for DockerState {
	fn default() -> Self {
		let seeds = [
			("fleetcore-api", "fleetcore/api:latest"),
			("fleetcore-db", "postgres:15"),
			("fleetcore-cache", "redis:7"),
		];
		let containers = seeds
			.into_iter()
			.map(|(name, image)| {
				(
					name.to_string(),
					Container {
						name: name.to_string(),
						image: image.to_string(),
						status: "Exited (0)".to_string(),
						ports: String::new(),
					},
				)
			})
			.collect();
		Self { containers }
	}
}

fn ps_table(state: &DockerState, all: bool) -> String {
	let header = "CONTAINER ID   IMAGE          STATUS          PORTS          NAMES";
	let rows: Vec<String> = state
		.containers
		.values()
		.filter(|c| all || c.status.starts_with("Up"))
		.map(|c| {
			format!(
				"{:<14} {:<14} {:<15} {:<14} {}",
				&short_id(&c.name),
				c.image,
				c.status,
				c.ports,
				c.name
			)
		})
		.collect();
	if rows.is_empty() {
		header.to_string()
	} else {
		format!("{header}\n{}", rows.join("\n"))
	}
}

fn short_id(name: &str) -> String {
	format!("{:0>12x}", name.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64)) % 0xffffffffff)
}

pub fn docker_cmd(cmd: &ParsedCommand, ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(sub) = cmd.args.first().map(String::as_str) else {
		if cmd.flag_bool("version") {
			return CommandOutput::ok("Docker version 24.0.0, build 0000000");
		}
		return CommandOutput::err("docker: 'docker' requires a subcommand", 1);
	};
	match sub {
		"ps" => CommandOutput::ok(ps_table(&ctx.docker, cmd.flag_bool("a") || cmd.flag_bool("all"))),
		"images" => CommandOutput::ok("REPOSITORY   TAG       IMAGE ID       SIZE\nnginx        latest    0000000000    150MB"),
		"start" => run_container(ctx, cmd.args.get(1), "Up"),
		"stop" => run_container(ctx, cmd.args.get(1), "Exited (0)"),
		"compose" => compose(cmd, ctx),
		"logs" => container_logs(ctx, cmd.args.get(1)),
		"inspect" => container_inspect(ctx, cmd.args.get(1)),
		"exec" => exec(cmd, ctx),
		"--version" => CommandOutput::ok("Docker version 24.0.0, build 0000000"),
		other => CommandOutput::err(format!("docker: '{other}' is not a docker command"), 1),
	}
}

fn run_container(ctx: &mut CommandContext, name: Option<&String>, status: &str) -> CommandOutput {
	let Some(name) = name else {
		return CommandOutput::err("docker: requires a container name", 1);
	};
	let Some(container) = ctx.docker.containers.get_mut(name) else {
		return CommandOutput::err(format!("Error: No such container: {name}"), 1);
	};
	container.status = status.to_string();
	if status.starts_with("Up") {
		container.ports = "0.0.0.0:80->80/tcp".to_string();
	} else {
		container.ports.clear();
	}
	CommandOutput::ok(name.clone())
}

/// `docker exec [-it] <container> <inner command...>`. The inner command is
/// never actually run — it's pattern-matched against the handful of probes a
/// challenge cares about (`psql`, `pg_isready`, `redis-cli ping`), scoped to
/// the targeted container.
fn exec(cmd: &ParsedCommand, ctx: &CommandContext) -> CommandOutput {
	let Some(container) = cmd.args.iter().find(|a| ctx.docker.containers.contains_key(a.as_str())) else {
		return CommandOutput::err("docker exec: requires a container name", 1);
	};
	let Some(state) = ctx.docker.containers.get(container) else {
		return CommandOutput::err(format!("Error: No such container: {container}"), 1);
	};
	if !state.status.starts_with("Up") {
		return CommandOutput::err(format!("Error response from daemon: container {container} is not running"), 1);
	}
	let inner = cmd.raw_args.as_str();
	if inner.contains("pg_isready") {
		return if container.contains("db") {
			CommandOutput::ok(format!("{container}:5432 - accepting connections"))
		} else {
			CommandOutput::err("pg_isready: command not found", 127)
		};
	}
	if inner.contains("psql") {
		return if container.contains("db") {
			CommandOutput::ok("psql (15.4)\nType \"help\" for help.")
		} else {
			CommandOutput::err("psql: command not found", 127)
		};
	}
	if inner.contains("redis-cli") {
		return if container.contains("cache") && inner.contains("ping") {
			CommandOutput::ok("PONG")
		} else if container.contains("cache") {
			CommandOutput::ok("(error) ERR unknown command")
		} else {
			CommandOutput::err("redis-cli: command not found", 127)
		};
	}
	CommandOutput::success()
}

fn compose(cmd: &ParsedCommand, ctx: &mut CommandContext) -> CommandOutput {
	match cmd.args.get(1).map(String::as_str) {
		Some("up") => {
			for container in ctx.docker.containers.values_mut() {
				container.status = "Up".to_string();
				container.ports = "0.0.0.0:80->80/tcp".to_string();
			}
			CommandOutput::ok("Containers started")
		}
		Some("down") => {
			for container in ctx.docker.containers.values_mut() {
				container.status = "Exited (0)".to_string();
				container.ports.clear();
			}
			CommandOutput::ok("Containers stopped")
		}
		Some("ps") => CommandOutput::ok(ps_table(&ctx.docker, true)),
		_ => CommandOutput::err("docker: 'compose' requires a subcommand", 1),
	}
}

fn container_logs(ctx: &CommandContext, name: Option<&String>) -> CommandOutput {
	let Some(name) = name else {
		return CommandOutput::err("docker: requires a container name", 1);
	};
	if !ctx.docker.containers.contains_key(name) {
		return CommandOutput::err(format!("Error: No such container: {name}"), 1);
	}
	CommandOutput::ok(format!("{name} | starting up...\n{name} | ready"))
}

fn container_inspect(ctx: &CommandContext, name: Option<&String>) -> CommandOutput {
	let Some(name) = name else {
		return CommandOutput::err("docker: requires a container name", 1);
	};
	let Some(container) = ctx.docker.containers.get(name) else {
		return CommandOutput::err(format!("Error: No such container: {name}"), 1);
	};
	CommandOutput::ok(format!(
		"[{{\"Name\":\"/{}\",\"Image\":\"{}\",\"State\":{{\"Status\":\"{}\"}}}}]",
		container.name, container.image, container.status
	))
}
