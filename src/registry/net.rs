//! Scripted network tools. The only "live" endpoint is the canned local
//! API at `localhost:3000`, which a challenge fixture can point `curl` at
//! to exercise JSON parsing/piping without a real network stack.
use crate::context::CommandContext;
use crate::parser::ParsedCommand;
use crate::registry::CommandOutput;

/// `(path, method, body)` for the one simulated service every challenge
/// fixture can point `curl`/`wget` at. Anything else under a recognized
/// local host/port falls through to the 404 default.
const LOCAL_API_ROUTES: &[(&str, &str, &str)] = &[
	("/health", "GET", r#"{"status":"healthy"}"#),
	("/api/v1/vehicles", "GET", r#"[{"id":1,"plate":"FL-001","status":"active"},{"id":2,"plate":"FL-002","status":"idle"}]"#),
	("/api/v1/vehicles", "POST", r#"{"id":3,"plate":"FL-003","status":"active"}"#),
	("/drivers", "GET", r#"[{"id":1,"name":"ada"},{"id":2,"name":"grace"}]"#),
	("/trips", "GET", r#"[{"id":1,"vehicle_id":1,"driver_id":1,"status":"in_progress"}]"#),
];

const LOCAL_HOSTS: &[&str] = &["localhost:3000", "127.0.0.1:3000", "api:3000"];

fn local_route(url: &str, method: &str) -> Option<(&'static str, i32)> {
	for host in LOCAL_HOSTS {
		if let Some(idx) = url.find(host) {
			let path = &url[idx + host.len()..];
			let path = if path.is_empty() { "/" } else { path };
			return Some(
				LOCAL_API_ROUTES
					.iter()
					.find(|(route, m, _)| *route == path && *m == method)
					.map(|(_, _, body)| (*body, 200))
					.unwrap_or((r#"{"error":"not found"}"#, 404)),
			);
		}
	}
	None
}

fn is_known_local_host(url: &str) -> bool {
	url.contains("localhost") || url.contains("127.0.0.1") || url.contains("api:")
}

struct CurlFlags {
	method: String,
	headers: Vec<String>,
	include_headers: bool,
	silent: bool,
	fail_on_error: bool,
}

fn parse_curl_flags(cmd: &ParsedCommand) -> (CurlFlags, Vec<String>) {
	let tokens = crate::parser::tokenize(&cmd.raw_args);
	let (method_flag, rest) = crate::parser::take_flag_value_tokens(&tokens, "-X");
	let (data, rest) = crate::parser::take_flag_value_tokens(&rest, "-d");
	let (data, rest) = if data.is_some() {
		(data, rest)
	} else {
		crate::parser::take_flag_value_tokens(&rest, "--data")
	};
	let mut headers = Vec::new();
	let mut rest2 = Vec::with_capacity(rest.len());
	let mut i = 0;
	while i < rest.len() {
		if rest[i] == "-H" {
			if let Some(h) = rest.get(i + 1) {
				headers.push(h.clone());
			}
			i += 2;
			continue;
		}
		rest2.push(rest[i].clone());
		i += 1;
	}
	let method = method_flag.unwrap_or_else(|| if data.is_some() { "POST".to_string() } else { "GET".to_string() });
	let include_headers = cmd.flag_bool("i") || cmd.flag_bool("I") || cmd.flag_bool("include") || cmd.flag_bool("head");
	let silent = cmd.flag_bool("s") || cmd.flag_bool("silent");
	let fail_on_error = cmd.flag_bool("f") || cmd.flag_bool("fail");
	(
		CurlFlags {
			method: method.to_uppercase(),
			headers,
			include_headers,
			silent,
			fail_on_error,
		},
		rest2,
	)
}

pub fn curl(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let (flags, rest) = parse_curl_flags(cmd);
	let Some(url) = rest.first() else {
		return CommandOutput::err("curl: try 'curl --help' for more information", 2);
	};
	let _ = &flags.headers;
	match local_route(url, &flags.method) {
		Some((body, status)) => {
			let body = if flags.include_headers {
				format!("HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\n\r\n{body}", status_text(status))
			} else {
				body.to_string()
			};
			if status >= 400 && flags.fail_on_error {
				CommandOutput::err(if flags.silent { String::new() } else { body }, 22)
			} else {
				CommandOutput::ok(body)
			}
		}
		None if is_known_local_host(url) => {
			CommandOutput::err(format!("curl: (7) Failed to connect to {url}: Connection refused"), 7)
		}
		None => CommandOutput::ok("<html>OK</html>"),
	}
}

fn status_text(status: i32) -> &'static str {
	match status {
		200 => "OK",
		404 => "Not Found",
		_ => "Unknown",
	}
}

pub fn wget(cmd: &ParsedCommand, ctx: &mut CommandContext, stdin: Option<String>) -> CommandOutput {
	curl(cmd, ctx, stdin)
}

pub fn ping(cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	let Some(host) = cmd.args.first() else {
		return CommandOutput::err("ping: usage error", 2);
	};
	if host == "localhost" || host == "127.0.0.1" {
		return CommandOutput::ok(format!(
			"PING {host} ({host}): 56 data bytes\n64 bytes from {host}: icmp_seq=0 ttl=64 time=0.05 ms"
		));
	}
	CommandOutput::err(format!("ping: cannot resolve {host}: network access is disabled"), 2)
}

pub fn netstat(_cmd: &ParsedCommand, _ctx: &mut CommandContext, _stdin: Option<String>) -> CommandOutput {
	CommandOutput::ok("Proto Recv-Q Send-Q Local Address           Foreign Address         State\ntcp        0      0 0.0.0.0:3000            0.0.0.0:*               LISTEN")
}
