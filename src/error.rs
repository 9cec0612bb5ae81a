//! Error kinds shared by the VFS and parser.
//!
//! Nothing in this crate's public handler contract raises these — every
//! command handler converges on `{output, exit_code}` (see `registry`) — but
//! internal plumbing needs a real `Result` to propagate through `?`, so this
//! is the one closed error enum everything below the handler boundary uses.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
	NotFound(String),
	NotADirectory(String),
	IsADirectory(String),
	AlreadyExists(String),
	InvalidPath(String),
	Cycle(String),
	Usage(String),
}

impl fmt::Display for CoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotFound(p) => write!(f, "{p}: No such file or directory"),
			Self::NotADirectory(p) => write!(f, "{p}: Not a directory"),
			Self::IsADirectory(p) => write!(f, "{p}: Is a directory"),
			Self::AlreadyExists(p) => write!(f, "{p}: File exists"),
			Self::InvalidPath(p) => write!(f, "{p}: Invalid path"),
			Self::Cycle(p) => write!(f, "{p}: Too many levels of symbolic links"),
			Self::Usage(msg) => write!(f, "{msg}"),
		}
	}
}

impl std::error::Error for CoreError {}

/// Maps a `CoreError` to a canonical exit code: not-found/permission errors
/// are exit 1, usage errors exit 2.
impl CoreError {
	pub fn exit_code(&self) -> i32 {
		match self {
			Self::Usage(_) => 2,
			_ => 1,
		}
	}
}

pub type CoreResult<T> = Result<T, CoreError>;
