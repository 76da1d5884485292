//! The option registry.
//!
//! Owns one option tree plus the shortcut index derived from it. All reads
//! and writes go through path resolution:
//!
//! 1. If the path names a node exactly, that node is used.
//! 2. Otherwise a dot-free name is looked up in the shortcut index, and used
//!    only if exactly one leaf in the whole tree carries that name.
//! 3. Otherwise the path is unknown.

use crate::error::{NodeKind, OptionError, OptionResult};
use crate::schema::default_schema;
use crate::tree::{Group, Node, OptionDef, Schema};
use crate::value::{RawValue, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Column at which describe output wraps descriptions.
const DESCRIBE_WIDTH: usize = 70;
const DESCRIBE_INDENT: &str = "    ";

#[derive(Debug, Clone)]
pub struct Registry {
    root: Group,
    /// Leaf name -> every full path ending in that name.
    shortcuts: HashMap<String, Vec<String>>,
}

impl Registry {
    /// Build a registry from `schema`, applying environment overrides from
    /// the process environment.
    pub fn new(schema: Schema) -> Self {
        Self::with_env_source(schema, |var| std::env::var(var).ok())
    }

    /// Build a registry whose environment overrides come from `lookup`.
    pub fn with_env_source(schema: Schema, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut root = schema.root;
        root.for_each_leaf_mut(&mut |opt: &mut OptionDef| apply_environ(opt, &lookup));

        let mut shortcuts: HashMap<String, Vec<String>> = HashMap::new();
        for opt in root.leaves() {
            shortcuts
                .entry(opt.name.clone())
                .or_default()
                .push(opt.full_path.clone());
        }

        Self { root, shortcuts }
    }

    /// Registry over the built-in client option tree.
    pub fn with_defaults() -> OptionResult<Self> {
        Ok(Self::new(default_schema()?))
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Map a user-supplied path or shortcut to the full path of a node.
    pub fn resolve(&self, path: &str) -> OptionResult<&str> {
        self.resolve_node(path).map(Node::full_path)
    }

    fn resolve_node(&self, path: &str) -> OptionResult<&Node> {
        if !path.is_empty() {
            if let Some(node) = self.root.find(path) {
                return Ok(node);
            }
        }
        let full = self
            .shortcut(path)
            .ok_or_else(|| OptionError::unknown(path))?;
        self.root.find(full).ok_or_else(|| OptionError::unknown(path))
    }

    fn resolve_node_mut(&mut self, path: &str) -> OptionResult<&mut Node> {
        let full = self.resolve(path)?.to_string();
        self.root
            .find_mut(&full)
            .ok_or_else(|| OptionError::unknown(path))
    }

    /// Full path for a bare leaf name, if the name is unique in the tree.
    pub fn shortcut(&self, name: &str) -> Option<&str> {
        if name.is_empty() || name.contains('.') {
            return None;
        }
        match self.shortcuts.get(name).map(Vec::as_slice) {
            Some([only]) => Some(only.as_str()),
            _ => None,
        }
    }

    /// Whether more than one leaf carries `name`.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.shortcuts.get(name).is_some_and(|paths| paths.len() > 1)
    }

    /// Usable shortcuts as `(name, full_path)`, sorted by name.
    pub fn shortcuts(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .shortcuts
            .iter()
            .filter_map(|(name, paths)| match paths.as_slice() {
                [only] => Some((name.as_str(), only.as_str())),
                _ => None,
            })
            .collect();
        out.sort_unstable();
        out
    }

    pub(crate) fn leaf(&self, path: &str, operation: &'static str) -> OptionResult<&OptionDef> {
        match self.resolve_node(path)? {
            Node::Leaf(opt) => Ok(opt),
            Node::Group(_) => Err(OptionError::wrong_kind(path, operation, NodeKind::Leaf)),
        }
    }

    fn leaf_mut(&mut self, path: &str, operation: &'static str) -> OptionResult<&mut OptionDef> {
        match self.resolve_node_mut(path)? {
            Node::Leaf(opt) => Ok(opt),
            Node::Group(_) => Err(OptionError::wrong_kind(path, operation, NodeKind::Leaf)),
        }
    }

    pub(crate) fn group(&self, path: &str, operation: &'static str) -> OptionResult<&Group> {
        match self.resolve_node(path)? {
            Node::Group(g) => Ok(g),
            Node::Leaf(_) => Err(OptionError::wrong_kind(path, operation, NodeKind::Group)),
        }
    }

    /// Current value of an option.
    pub fn get_option(&self, path: &str) -> OptionResult<Value> {
        Ok(self.leaf(path, "get")?.current.clone())
    }

    /// Validate `value` and make it the option's current value.
    ///
    /// Returns the normalized value that was stored.
    pub fn set_option(&mut self, path: &str, value: impl Into<RawValue>) -> OptionResult<Value> {
        let opt = self.leaf_mut(path, "set")?;
        let stored = opt.assign(value.into())?.clone();
        debug!(option = %opt.full_path, value = %stored, "Option set");
        Ok(stored)
    }

    /// Restore defaults: one option when `path` is given, all of them otherwise.
    pub fn reset_option(&mut self, path: Option<&str>) -> OptionResult<()> {
        match path {
            Some(path) => {
                let opt = self.leaf_mut(path, "reset")?;
                opt.reset();
                debug!(option = %opt.full_path, "Option reset to default");
            }
            None => {
                self.root.for_each_leaf_mut(&mut OptionDef::reset);
                debug!("All options reset to defaults");
            }
        }
        Ok(())
    }

    pub fn get_default(&self, path: &str) -> OptionResult<Value> {
        Ok(self.leaf(path, "get the default of")?.default.clone())
    }

    pub fn get_description(&self, path: &str) -> OptionResult<&str> {
        Ok(self.leaf(path, "describe")?.description())
    }

    /// Immediate children of a group, in declaration order.
    pub fn get_suboptions(&self, path: &str) -> OptionResult<&[Node]> {
        Ok(self.group(path, "list suboptions of")?.children())
    }

    /// Full paths of every option, in tree order.
    pub fn list_options(&self) -> Vec<&str> {
        self.root.leaves().into_iter().map(OptionDef::full_path).collect()
    }

    /// Render descriptions for the whole tree, one option, or one group.
    ///
    /// For a group, `recurse_into_groups` controls whether nested groups are
    /// included or only the group's own options.
    pub fn describe_option(
        &self,
        path: Option<&str>,
        recurse_into_groups: bool,
    ) -> OptionResult<String> {
        let leaves = match path {
            None => self.root.leaves(),
            Some(path) => match self.resolve_node(path)? {
                Node::Leaf(opt) => vec![opt],
                Node::Group(g) if recurse_into_groups => g.leaves(),
                Node::Group(g) => g.children().iter().filter_map(Node::as_leaf).collect(),
            },
        };

        let mut out = String::new();
        for opt in leaves {
            out.push_str(&describe_leaf(opt));
        }
        Ok(out)
    }

    /// Describe several paths in order. An empty list describes everything.
    pub fn describe_options(
        &self,
        paths: &[&str],
        recurse_into_groups: bool,
    ) -> OptionResult<String> {
        if paths.is_empty() {
            return self.describe_option(None, recurse_into_groups);
        }
        let mut out = String::new();
        for path in paths {
            out.push_str(&self.describe_option(Some(path), recurse_into_groups)?);
        }
        Ok(out)
    }
}

fn apply_environ(opt: &mut OptionDef, lookup: &impl Fn(&str) -> Option<String>) {
    let Some(var) = opt.environ.clone() else {
        return;
    };
    let Some(raw) = lookup(&var) else {
        return;
    };
    match opt.validator.validate(raw.as_str()) {
        Ok(value) => {
            info!(option = %opt.full_path, env = %var, "Default taken from environment");
            opt.override_default(value);
        }
        Err(e) => {
            warn!(
                option = %opt.full_path,
                env = %var,
                error = %e,
                "Ignoring invalid environment override"
            );
        }
    }
}

fn describe_leaf(opt: &OptionDef) -> String {
    let mut out = String::new();
    let head = format!("{} : ", opt.full_path);
    let mut lines = wrap(&opt.description, DESCRIBE_WIDTH.saturating_sub(head.len()).max(20));
    if lines.is_empty() {
        lines.push(String::new());
    }

    out.push_str(head.trim_end());
    if !lines[0].is_empty() {
        out.push(' ');
        out.push_str(&lines[0]);
    }
    out.push('\n');
    for line in &lines[1..] {
        out.push_str(DESCRIBE_INDENT);
        out.push_str(line);
        out.push('\n');
    }

    out.push_str(&format!("{}default: {}\n", DESCRIBE_INDENT, opt.default.repr()));
    if opt.current != opt.default {
        out.push_str(&format!("{}currently: {}\n", DESCRIBE_INDENT, opt.current.repr()));
    }
    out.push('\n');
    out
}

/// Greedy word wrap. Words longer than `width` get a line to themselves.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
