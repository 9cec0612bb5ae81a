//! The in-memory virtual filesystem.
//!
//! `Vfs` owns a tree of `FSNode`s rooted at `/`. Every operation here is pure
//! over the tree plus the `cwd` it's handed — there is no ambient global
//! filesystem state, which is what lets a single process host many
//! concurrent sessions (see `context::CommandContext`).
use std::collections::BTreeMap;
use std::fmt::Write as _;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const MAX_SYMLINK_HOPS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	File,
	Directory,
	Symlink,
}

/// A single node in the tree. Directories keep children in a `BTreeMap` so
/// iteration order is always lexicographic and never observable insertion
/// order, which gives sorted listings for free instead of sorting at every
/// read site.
#[derive(Debug, Clone)]
pub struct FSNode {
	pub name: String,
	pub kind: NodeKind,
	pub content: Option<String>,
	pub target: Option<String>,
	pub permissions: String,
	pub modified: i64,
	pub children: BTreeMap<String, FSNode>,
}

impl FSNode {
	pub fn new_dir(name: impl Into<String>, modified: i64) -> Self {
		Self {
			name: name.into(),
			kind: NodeKind::Directory,
			content: None,
			target: None,
			permissions: "drwxr-xr-x".into(),
			modified,
			children: BTreeMap::new(),
		}
	}

	pub fn new_file(name: impl Into<String>, content: impl Into<String>, modified: i64) -> Self {
		Self {
			name: name.into(),
			kind: NodeKind::File,
			content: Some(content.into()),
			target: None,
			permissions: "-rw-r--r--".into(),
			modified,
			children: BTreeMap::new(),
		}
	}

	pub fn new_symlink(name: impl Into<String>, target: impl Into<String>, modified: i64) -> Self {
		Self {
			name: name.into(),
			kind: NodeKind::Symlink,
			content: None,
			target: Some(target.into()),
			permissions: "lrwxrwxrwx".into(),
			modified,
			children: BTreeMap::new(),
		}
	}

	pub fn is_dir(&self) -> bool {
		self.kind == NodeKind::Directory
	}
	pub fn is_file(&self) -> bool {
		self.kind == NodeKind::File
	}
	pub fn is_symlink(&self) -> bool {
		self.kind == NodeKind::Symlink
	}

	/// Children sorted lexicographically by name, regardless of the
	/// `BTreeMap`'s own order (which already happens to be lexicographic —
	/// this exists so call sites don't need to know that).
	pub fn sorted_children(&self) -> Vec<&FSNode> {
		self.children.values().collect()
	}

	fn to_snapshot(&self) -> serde_json::Value {
		let mut obj = serde_json::Map::new();
		obj.insert("name".into(), self.name.clone().into());
		let kind_str = match self.kind {
			NodeKind::File => "file",
			NodeKind::Directory => "directory",
			NodeKind::Symlink => "symlink",
		};
		obj.insert("type".into(), kind_str.into());
		if let Some(c) = &self.content {
			obj.insert("content".into(), c.clone().into());
		}
		if let Some(t) = &self.target {
			obj.insert("target".into(), t.clone().into());
		}
		obj.insert("permissions".into(), self.permissions.clone().into());
		if self.is_dir() {
			let mut children = serde_json::Map::new();
			for (name, child) in &self.children {
				children.insert(name.clone(), child.to_snapshot());
			}
			obj.insert("children".into(), children.into());
		}
		serde_json::Value::Object(obj)
	}

	fn from_snapshot(name: &str, value: &serde_json::Value, modified: i64) -> CoreResult<Self> {
		let obj = value
			.as_object()
			.ok_or_else(|| CoreError::InvalidPath(name.to_string()))?;
		let kind = match obj.get("type").and_then(|v| v.as_str()) {
			Some("file") => NodeKind::File,
			Some("directory") => NodeKind::Directory,
			Some("symlink") => NodeKind::Symlink,
			_ => return Err(CoreError::InvalidPath(name.to_string())),
		};
		let content = obj
			.get("content")
			.and_then(|v| v.as_str())
			.map(|s| s.to_string());
		let target = obj
			.get("target")
			.and_then(|v| v.as_str())
			.map(|s| s.to_string());
		let permissions = obj
			.get("permissions")
			.and_then(|v| v.as_str())
			.unwrap_or(match kind {
				NodeKind::File => "-rw-r--r--",
				NodeKind::Directory => "drwxr-xr-x",
				NodeKind::Symlink => "lrwxrwxrwx",
			})
			.to_string();
		let mut children = BTreeMap::new();
		if let Some(map) = obj.get("children").and_then(|v| v.as_object()) {
			for (child_name, child_value) in map {
				children.insert(
					child_name.clone(),
					FSNode::from_snapshot(child_name, child_value, modified)?,
				);
			}
		}
		Ok(Self {
			name: name.to_string(),
			kind,
			content,
			target,
			permissions,
			modified,
			children,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrepMatch<'a> {
	pub line_number: usize,
	pub line_text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepHit {
	pub file: String,
	pub line_number: usize,
	pub line_text: String,
}

pub struct Vfs {
	root: FSNode,
	clock: i64,
}

impl Vfs {
	pub fn new() -> Self {
		Self {
			root: FSNode::new_dir("/", 0),
			clock: 0,
		}
	}

	fn tick(&mut self) -> i64 {
		self.clock += 1;
		self.clock
	}

	pub fn root(&self) -> &FSNode {
		&self.root
	}

	/// Pure syntactic resolution of `.`, `..`, `~` is NOT handled here — the
	/// spec scopes `~`/env expansion to the caller that owns `HOME` (the
	/// command context). This normalises `.`/`..`/leading-`/` only.
	pub fn resolve_path(&self, path: &str, cwd: &str) -> String {
		let absolute = if path.starts_with('/') {
			path.to_string()
		} else {
			format!("{}/{}", cwd.trim_end_matches('/'), path)
		};

		let mut parts: Vec<&str> = Vec::new();
		for part in absolute.split('/') {
			match part {
				"" | "." => {}
				".." => {
					parts.pop();
				}
				p => parts.push(p),
			}
		}
		format!("/{}", parts.join("/"))
	}

	fn split(path: &str) -> Vec<&str> {
		path.split('/').filter(|p| !p.is_empty()).collect()
	}

	/// Walks `parts` from the root, following every symlink encountered
	/// (including one named by the final component) up to
	/// `MAX_SYMLINK_HOPS` hops, and returns the fully dereferenced absolute
	/// path as a list of components. `None` on a missing segment, a
	/// non-directory intermediate segment, or a cycle.
	fn canonicalize(&self, parts: &[&str]) -> Option<Vec<String>> {
		self.canonicalize_hops(parts, 0)
	}

	fn canonicalize_hops(&self, parts: &[&str], hops: usize) -> Option<Vec<String>> {
		let mut node = &self.root;
		let mut current: Vec<String> = Vec::new();
		for (i, part) in parts.iter().enumerate() {
			if !node.is_dir() {
				return None;
			}
			let child = node.children.get(*part)?;
			if child.is_symlink() {
				let hops = hops + 1;
				if hops > MAX_SYMLINK_HOPS {
					return None;
				}
				let target = child.target.as_deref().unwrap_or("");
				let target_abs = if target.starts_with('/') {
					target.to_string()
				} else {
					format!("/{}/{}", current.join("/"), target)
				};
				let resolved = self.resolve_path(&target_abs, "/");
				let mut new_parts: Vec<&str> = Self::split(&resolved);
				new_parts.extend_from_slice(&parts[i + 1..]);
				return self.canonicalize_hops(&new_parts, hops);
			}
			node = child;
			current.push((*part).to_string());
		}
		Some(current)
	}

	fn get_plain<'a>(&'a self, parts: &[&str]) -> Option<&'a FSNode> {
		let mut node = &self.root;
		for part in parts {
			node = node.children.get(*part)?;
		}
		Some(node)
	}

	fn get_plain_mut<'a>(&'a mut self, parts: &[&str]) -> Option<&'a mut FSNode> {
		let mut node = &mut self.root;
		for part in parts {
			node = node.children.get_mut(*part)?;
		}
		Some(node)
	}

	/// Walks `parts` from the root, following symlinks transparently
	/// (read-only view used by every non-mutating lookup).
	fn resolve_parts(&self, parts: &[&str]) -> Option<&FSNode> {
		let canon = self.canonicalize(parts)?;
		let refs: Vec<&str> = canon.iter().map(|s| s.as_str()).collect();
		self.get_plain(&refs)
	}

	pub fn resolve(&self, path: &str, cwd: &str) -> Option<&FSNode> {
		let absolute = self.resolve_path(path, cwd);
		let parts = Self::split(&absolute);
		self.resolve_parts(&parts)
	}

	/// Like `resolve`, but doesn't follow a symlink at the final path
	/// component — used by mutators (`rm`, `write_file`) that should act on
	/// the link itself.
	pub fn resolve_no_follow_last(&self, path: &str, cwd: &str) -> Option<&FSNode> {
		let absolute = self.resolve_path(path, cwd);
		let parts = Self::split(&absolute);
		if parts.is_empty() {
			return Some(&self.root);
		}
		let parent = self.resolve_parts(&parts[..parts.len() - 1])?;
		parent.children.get(parts[parts.len() - 1])
	}

	/// Resolves the *parent directory* of `parts`'s final component,
	/// dereferencing every symlink along the way, then returns a mutable
	/// reference to whatever `parts` names inside it. Intermediate
	/// directories are transparently followed; the final component is not
	/// (callers that want the final component followed should dereference
	/// it themselves before mutating, same as a real shell's `install(1)`
	/// vs `rm(1)` distinction).
	fn resolve_parts_mut(&mut self, parts: &[&str]) -> Option<&mut FSNode> {
		let canon = self.canonicalize(parts)?;
		let refs: Vec<&str> = canon.iter().map(|s| s.as_str()).collect();
		self.get_plain_mut(&refs)
	}

	pub fn exists(&self, path: &str, cwd: &str) -> bool {
		self.resolve(path, cwd).is_some()
	}

	pub fn is_file(&self, path: &str, cwd: &str) -> bool {
		self.resolve(path, cwd).is_some_and(|n| n.is_file())
	}

	pub fn is_directory(&self, path: &str, cwd: &str) -> bool {
		self.resolve(path, cwd).is_some_and(|n| n.is_dir())
	}

	pub fn read_file(&self, path: &str, cwd: &str) -> CoreResult<String> {
		let node = self
			.resolve(path, cwd)
			.ok_or_else(|| CoreError::NotFound(path.to_string()))?;
		if node.is_dir() {
			return Err(CoreError::IsADirectory(path.to_string()));
		}
		Ok(node.content.clone().unwrap_or_default())
	}

	pub fn write_file(&mut self, path: &str, content: &str, cwd: &str) -> CoreResult<()> {
		let absolute = self.resolve_path(path, cwd);
		let parts = Self::split(&absolute);
		if parts.is_empty() {
			return Err(CoreError::IsADirectory(path.to_string()));
		}
		let (leaf, parent_parts) = (parts[parts.len() - 1], &parts[..parts.len() - 1]);
		let modified = {
			self.clock += 1;
			self.clock
		};
		let parent = self
			.resolve_parts_mut(parent_parts)
			.ok_or_else(|| CoreError::NotFound(path.to_string()))?;
		if !parent.is_dir() {
			return Err(CoreError::NotADirectory(path.to_string()));
		}
		match parent.children.get_mut(leaf) {
			Some(existing) if existing.is_dir() => {
				return Err(CoreError::IsADirectory(path.to_string()));
			}
			Some(existing) => {
				existing.content = Some(content.to_string());
				existing.modified = modified;
			}
			None => {
				parent.children.insert(
					leaf.to_string(),
					FSNode::new_file(leaf, content, modified),
				);
			}
		}
		Ok(())
	}

	pub fn append_file(&mut self, path: &str, content: &str, cwd: &str) -> CoreResult<()> {
		let existing = self.read_file(path, cwd).unwrap_or_default();
		self.write_file(path, &format!("{existing}{content}"), cwd)
	}

	pub fn mkdir(&mut self, path: &str, recursive: bool, cwd: &str) -> CoreResult<()> {
		let absolute = self.resolve_path(path, cwd);
		let parts = Self::split(&absolute);
		if parts.is_empty() {
			return Ok(()); // mkdir -p / or mkdir / both no-ops on the root
		}
		if !recursive {
			let (leaf, parent_parts) = (parts[parts.len() - 1], &parts[..parts.len() - 1]);
			let modified = self.tick();
			let parent = self
				.resolve_parts_mut(parent_parts)
				.ok_or_else(|| CoreError::NotFound(path.to_string()))?;
			if !parent.is_dir() {
				return Err(CoreError::NotADirectory(path.to_string()));
			}
			if parent.children.contains_key(leaf) {
				return Err(CoreError::AlreadyExists(path.to_string()));
			}
			parent
				.children
				.insert(leaf.to_string(), FSNode::new_dir(leaf, modified));
			return Ok(());
		}

		// Walks plain, not through `canonicalize` — a `-p` creation walk
		// only ever meets symlinks if the path re-enters an existing
		// subtree, which `mkdir -p` has no reason to do.
		let mut node = &mut self.root;
		for (i, part) in parts.iter().enumerate() {
			if !node.is_dir() {
				let built = parts[..i].join("/");
				return Err(CoreError::NotADirectory(format!("/{built}")));
			}
			if !node.children.contains_key(*part) {
				self.clock += 1;
				let modified = self.clock;
				node.children
					.insert(part.to_string(), FSNode::new_dir(*part, modified));
			}
			node = node.children.get_mut(*part).expect("just inserted");
		}
		Ok(())
	}

	pub fn rm(&mut self, path: &str, recursive: bool, cwd: &str) -> CoreResult<()> {
		let absolute = self.resolve_path(path, cwd);
		if absolute == "/" {
			return Err(CoreError::Usage("refusing to remove /".into()));
		}
		let parts = Self::split(&absolute);
		let (leaf, parent_parts) = (parts[parts.len() - 1], &parts[..parts.len() - 1]);
		let parent = self
			.resolve_parts_mut(parent_parts)
			.ok_or_else(|| CoreError::NotFound(path.to_string()))?;
		let target = parent
			.children
			.get(leaf)
			.ok_or_else(|| CoreError::NotFound(path.to_string()))?;
		if target.is_dir() && !target.children.is_empty() && !recursive {
			return Err(CoreError::Usage(format!(
				"cannot remove '{path}': Is a directory"
			)));
		}
		if target.is_dir() && !recursive {
			// empty directory, rm still requires -r per spec ("refuses
			// directory without recursive")
			return Err(CoreError::Usage(format!(
				"cannot remove '{path}': Is a directory"
			)));
		}
		parent.children.remove(leaf);
		Ok(())
	}

	pub fn list_dir(&self, path: &str, cwd: &str) -> CoreResult<Vec<&FSNode>> {
		let node = self
			.resolve(path, cwd)
			.ok_or_else(|| CoreError::NotFound(path.to_string()))?;
		if !node.is_dir() {
			return Err(CoreError::NotADirectory(path.to_string()));
		}
		Ok(node.sorted_children())
	}

	pub fn copy(&mut self, src: &str, dst: &str, cwd: &str) -> CoreResult<()> {
		let node = self
			.resolve(src, cwd)
			.cloned()
			.ok_or_else(|| CoreError::NotFound(src.to_string()))?;
		self.insert_tree(dst, node, cwd)
	}

	pub fn rename(&mut self, src: &str, dst: &str, cwd: &str) -> CoreResult<()> {
		self.copy(src, dst, cwd)?;
		self.rm(src, true, cwd)
	}

	fn insert_tree(&mut self, dst: &str, mut node: FSNode, cwd: &str) -> CoreResult<()> {
		let absolute = self.resolve_path(dst, cwd);
		let parts = Self::split(&absolute);
		if parts.is_empty() {
			return Err(CoreError::IsADirectory(dst.to_string()));
		}
		// If dst names an existing directory, copy *into* it under the
		// source's own name (cp/mv onto a directory target).
		let (leaf, parent_parts, modified) = {
			if let Some(existing) = self.resolve(dst, cwd) {
				if existing.is_dir() {
					let mut into_parts = parts.clone();
					into_parts.push(&node.name);
					let name = node.name.clone();
					(name, into_parts[..into_parts.len() - 1].to_vec(), self.tick())
				} else {
					(
						parts[parts.len() - 1].to_string(),
						parts[..parts.len() - 1].to_vec(),
						self.tick(),
					)
				}
			} else {
				(
					parts[parts.len() - 1].to_string(),
					parts[..parts.len() - 1].to_vec(),
					self.tick(),
				)
			}
		};
		node.name = leaf.clone();
		node.modified = modified;
		let parent = self
			.resolve_parts_mut(&parent_parts)
			.ok_or_else(|| CoreError::NotFound(dst.to_string()))?;
		if !parent.is_dir() {
			return Err(CoreError::NotADirectory(dst.to_string()));
		}
		parent.children.insert(leaf, node);
		Ok(())
	}

	/// Translates a shell glob (`*` -> `.*`, `?` -> `.`, everything else
	/// escaped) into a regex and matches it against bare node *names*,
	/// never full paths.
	pub fn find(&self, base: &str, glob: &str, cwd: &str) -> CoreResult<Vec<String>> {
		let re = glob_to_regex(glob)?;
		let absolute = self.resolve_path(base, cwd);
		let node = self
			.resolve(base, cwd)
			.ok_or_else(|| CoreError::NotFound(base.to_string()))?;
		let mut hits = Vec::new();
		self.find_walk(node, &absolute, &re, &mut hits);
		Ok(hits)
	}

	fn find_walk(&self, node: &FSNode, path: &str, re: &Regex, hits: &mut Vec<String>) {
		if re.is_match(&node.name) {
			hits.push(path.to_string());
		}
		if node.is_dir() {
			for (name, child) in &node.children {
				let child_path = if path == "/" {
					format!("/{name}")
				} else {
					format!("{path}/{name}")
				};
				self.find_walk(child, &child_path, re, hits);
			}
		}
	}

	pub fn grep(
		&self,
		pattern: &str,
		path: &str,
		recursive: bool,
		ignore_case: bool,
		cwd: &str,
	) -> CoreResult<Vec<GrepHit>> {
		let re = if ignore_case {
			Regex::new(&format!("(?i){pattern}"))
		} else {
			Regex::new(pattern)
		}
		.map_err(|e| CoreError::Usage(format!("invalid pattern: {e}")))?;

		let absolute = self.resolve_path(path, cwd);
		let node = self
			.resolve(path, cwd)
			.ok_or_else(|| CoreError::NotFound(path.to_string()))?;

		let mut hits = Vec::new();
		if node.is_dir() {
			if recursive {
				self.grep_walk(node, &absolute, &re, &mut hits);
			}
			// non-recursive grep on a directory yields nothing, per spec
		} else {
			self.grep_file(node, &absolute, &re, &mut hits);
		}
		Ok(hits)
	}

	fn grep_file(&self, node: &FSNode, path: &str, re: &Regex, hits: &mut Vec<GrepHit>) {
		let Some(content) = &node.content else { return };
		for (i, line) in content.lines().enumerate() {
			if re.is_match(line) {
				hits.push(GrepHit {
					file: path.to_string(),
					line_number: i + 1,
					line_text: line.to_string(),
				});
			}
		}
	}

	fn grep_walk(&self, node: &FSNode, path: &str, re: &Regex, hits: &mut Vec<GrepHit>) {
		if node.is_file() {
			self.grep_file(node, path, re, hits);
		} else if node.is_dir() {
			for (name, child) in &node.children {
				let child_path = if path == "/" {
					format!("/{name}")
				} else {
					format!("{path}/{name}")
				};
				self.grep_walk(child, &child_path, re, hits);
			}
		}
	}

	pub fn complete_path(&self, partial: &str, cwd: &str) -> Vec<String> {
		let (dir_part, prefix) = match partial.rfind('/') {
			Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
			None => ("", partial),
		};
		let dir_path = if dir_part.is_empty() { "." } else { dir_part };
		let Some(dir) = self.resolve(dir_path, cwd) else {
			return Vec::new();
		};
		if !dir.is_dir() {
			return Vec::new();
		}
		let mut matches: Vec<String> = dir
			.children
			.values()
			.filter(|c| c.name.starts_with(prefix))
			.map(|c| {
				if c.is_dir() {
					format!("{}/", c.name)
				} else {
					c.name.clone()
				}
			})
			.collect();
		matches.sort();
		matches
	}

	pub fn to_snapshot(&self) -> serde_json::Value {
		self.root.to_snapshot()
	}

	pub fn from_snapshot(value: &serde_json::Value) -> CoreResult<Self> {
		let root = FSNode::from_snapshot("/", value, 0)?;
		Ok(Self { root, clock: 0 })
	}
}

impl Default for Vfs {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
impl Vfs {
	/// Inserts a symlink directly under the root, bypassing the ordinary
	/// mutators (which have no public API for creating one). Test-only.
	pub(crate) fn insert_symlink_at_root(&mut self, name: &str, target: &str) {
		self.root
			.children
			.insert(name.to_string(), FSNode::new_symlink(name, target, 1));
	}
}

/// Converts a shell-style glob into an anchored regex: `*` becomes `.*`,
/// `?` becomes `.`, every other regex metacharacter is escaped so literal
/// dots, brackets, etc. in a filename match literally.
pub fn glob_to_regex(glob: &str) -> CoreResult<Regex> {
	let mut pattern = String::with_capacity(glob.len() * 2 + 2);
	pattern.push('^');
	for ch in glob.chars() {
		match ch {
			'*' => pattern.push_str(".*"),
			'?' => pattern.push('.'),
			c if "\\.+^$()[]{}|".contains(c) => {
				let _ = write!(pattern, "\\{c}");
			}
			c => pattern.push(c),
		}
	}
	pattern.push('$');
	Regex::new(&pattern).map_err(|e| CoreError::Usage(format!("invalid glob: {e}")))
}
