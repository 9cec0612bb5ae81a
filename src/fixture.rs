//! The boundary a host uses to seed a session's VFS from outside this
//! crate. `ShellConfig::fixture` is the concrete JSON-snapshot shape this
//! module implements; `FixtureSource` exists so a host can plug in a
//! different backing store (a database row, a bundled asset) without this
//! crate caring how the bytes got there.
use serde_json::Value;

use crate::vfs::Vfs;

pub trait FixtureSource {
	/// Produces the JSON tree `Vfs::from_snapshot` expects (see
	/// `vfs::FSNode::to_snapshot` for the exact shape).
	fn load(&self) -> Result<Value, String>;
}

/// The simplest possible `FixtureSource`: the snapshot value is already in
/// hand (e.g. deserialized from a challenge definition file by the host).
pub struct StaticFixture(pub Value);

impl FixtureSource for StaticFixture {
	fn load(&self) -> Result<Value, String> {
		Ok(self.0.clone())
	}
}

/// Builds a `Vfs` from any `FixtureSource`, falling back to an empty tree
/// if the source errors — a malformed fixture shouldn't prevent a session
/// from booting, just leave it starting from `/`.
pub fn build_vfs(source: &dyn FixtureSource) -> Vfs {
	match source.load() {
		Ok(value) => Vfs::from_snapshot(&value).unwrap_or_default(),
		Err(_) => Vfs::new(),
	}
}
