//! The state a command handler sees and can mutate: cwd, environment, the
//! VFS, last exit code, and the challenge/objective tracking the host
//! wires up around a session.
use std::collections::BTreeMap;

use crate::registry::docker::DockerState;
use crate::registry::git::GitState;
use crate::vfs::Vfs;

/// One objective in a challenge's objective list. `evaluate` (owned by the
/// host, not this crate — see `engine::TerminalEngine::set_objective_hook`)
/// decides completion; this struct only tracks the result.
#[derive(Debug, Clone)]
pub struct Objective {
	pub id: String,
	pub description: String,
	pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChallengeState {
	pub level: u32,
	pub objectives: Vec<Objective>,
	pub hints_used: u32,
	pub score: u32,
}

impl ChallengeState {
	pub fn objective_mut(&mut self, id: &str) -> Option<&mut Objective> {
		self.objectives.iter_mut().find(|o| o.id == id)
	}

	pub fn all_complete(&self) -> bool {
		!self.objectives.is_empty() && self.objectives.iter().all(|o| o.completed)
	}
}

/// Everything a command handler reads or mutates. One instance per session;
/// handlers never see anything outside this struct plus their own
/// `ParsedCommand` and stdin.
pub struct CommandContext {
	pub cwd: String,
	pub env: BTreeMap<String, String>,
	pub fs: Vfs,
	pub last_exit_code: i32,
	pub user: String,
	pub hostname: String,
	pub challenge: ChallengeState,
	pub docker: DockerState,
	pub git: GitState,
}

impl CommandContext {
	pub fn new(user: impl Into<String>, hostname: impl Into<String>, home: impl Into<String>, fs: Vfs) -> Self {
		let home = home.into();
		let mut env = BTreeMap::new();
		let user = user.into();
		let hostname = hostname.into();
		env.insert("HOME".to_string(), home.clone());
		env.insert("USER".to_string(), user.clone());
		env.insert("SHELL".to_string(), "/bin/shellcraft".to_string());
		env.insert("PATH".to_string(), "/usr/local/bin:/usr/bin:/bin".to_string());
		env.insert("TERM".to_string(), "xterm-256color".to_string());
		env.insert("NODE_ENV".to_string(), "development".to_string());
		env.insert("PWD".to_string(), home.clone());
		Self {
			cwd: home,
			env,
			fs,
			last_exit_code: 0,
			user,
			hostname,
			challenge: ChallengeState::default(),
			docker: DockerState::default(),
			git: GitState::default(),
		}
	}

	pub fn home(&self) -> String {
		self.env.get("HOME").cloned().unwrap_or_else(|| "/".to_string())
	}

	/// Renders `cwd` the way the prompt does: `~` for home, `~/rest` for a
	/// subtree of home, the raw absolute path otherwise.
	pub fn display_cwd(&self) -> String {
		let home = self.home();
		if self.cwd == home {
			"~".to_string()
		} else if let Some(rest) = self.cwd.strip_prefix(&format!("{home}/")) {
			format!("~/{rest}")
		} else {
			self.cwd.clone()
		}
	}

	pub fn set_cwd(&mut self, path: &str) {
		let old = self.cwd.clone();
		self.cwd = path.to_string();
		self.env.insert("OLDPWD".to_string(), old);
		self.env.insert("PWD".to_string(), path.to_string());
	}

	pub fn oldpwd(&self) -> Option<String> {
		self.env.get("OLDPWD").cloned()
	}
}
