//! The option tree: leaves, groups, and the builder that declares them.

use crate::error::{OptionError, OptionResult};
use crate::validators::Validator;
use crate::value::{RawValue, Value};

/// Declaration of a single option, before it is placed in a tree.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: String,
    pub default: RawValue,
    pub validator: Validator,
    pub description: String,
    /// Environment variable that overrides the default when the registry is built.
    pub environ: Option<String>,
}

impl OptionSpec {
    pub fn new(
        name: impl Into<String>,
        default: impl Into<RawValue>,
        validator: impl Into<Validator>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            validator: validator.into(),
            description: description.into(),
            environ: None,
        }
    }

    pub fn environ(mut self, var: impl Into<String>) -> Self {
        self.environ = Some(var.into());
        self
    }
}

/// A leaf of the tree.
#[derive(Debug, Clone)]
pub struct OptionDef {
    pub(crate) name: String,
    pub(crate) full_path: String,
    pub(crate) default: Value,
    pub(crate) current: Value,
    pub(crate) validator: Validator,
    pub(crate) description: String,
    pub(crate) environ: Option<String>,
}

impl OptionDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn current_value(&self) -> &Value {
        &self.current
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn environ(&self) -> Option<&str> {
        self.environ.as_deref()
    }

    /// Validate and store a new current value. The old value is kept on error.
    pub(crate) fn assign(&mut self, value: RawValue) -> OptionResult<&Value> {
        let normalized = self
            .validator
            .validate(value)
            .map_err(|e| e.at_path(&self.full_path))?;
        self.current = normalized;
        Ok(&self.current)
    }

    pub(crate) fn reset(&mut self) {
        self.current = self.default.clone();
    }

    /// Replace the default (and current value) with an already-validated value.
    pub(crate) fn override_default(&mut self, value: Value) {
        self.default = value.clone();
        self.current = value;
    }
}

/// An internal node holding options and nested groups in declaration order.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) full_path: String,
    pub(crate) description: Option<String>,
    pub(crate) children: Vec<Node>,
}

impl Group {
    fn root() -> Self {
        Self {
            name: String::new(),
            full_path: String::new(),
            description: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Immediate children, in declaration order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    /// Walk a relative dotted path down from this group.
    pub fn find(&self, path: &str) -> Option<&Node> {
        let (head, rest) = split_first(path);
        let child = self.child(head)?;
        match (rest, child) {
            (None, node) => Some(node),
            (Some(rest), Node::Group(g)) => g.find(rest),
            (Some(_), Node::Leaf(_)) => None,
        }
    }

    pub(crate) fn find_mut(&mut self, path: &str) -> Option<&mut Node> {
        let (head, rest) = split_first(path);
        let child = self.child_mut(head)?;
        match (rest, child) {
            (None, node) => Some(node),
            (Some(rest), Node::Group(g)) => g.find_mut(rest),
            (Some(_), Node::Leaf(_)) => None,
        }
    }

    /// Every leaf beneath this group, depth-first in declaration order.
    pub fn leaves(&self) -> Vec<&OptionDef> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a OptionDef>) {
        for child in &self.children {
            match child {
                Node::Leaf(opt) => out.push(opt),
                Node::Group(g) => g.collect_leaves(out),
            }
        }
    }

    pub(crate) fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut OptionDef)) {
        for child in &mut self.children {
            match child {
                Node::Leaf(opt) => f(opt),
                Node::Group(g) => g.for_each_leaf_mut(f),
            }
        }
    }
}

fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// A tree node.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf(OptionDef),
    Group(Group),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Leaf(opt) => &opt.name,
            Node::Group(g) => &g.name,
        }
    }

    pub fn full_path(&self) -> &str {
        match self {
            Node::Leaf(opt) => &opt.full_path,
            Node::Group(g) => &g.full_path,
        }
    }

    pub fn kind(&self) -> crate::error::NodeKind {
        match self {
            Node::Leaf(_) => crate::error::NodeKind::Leaf,
            Node::Group(_) => crate::error::NodeKind::Group,
        }
    }

    pub fn as_leaf(&self) -> Option<&OptionDef> {
        match self {
            Node::Leaf(opt) => Some(opt),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Leaf(_) => None,
        }
    }
}

/// A fully declared, validated option tree ready to back a registry.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) root: Group,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            root: GroupBuilder::new(Group::root()),
        }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }
}

/// Declares the top level of a [`Schema`].
pub struct SchemaBuilder {
    root: GroupBuilder,
}

impl SchemaBuilder {
    pub fn option(
        self,
        name: impl Into<String>,
        default: impl Into<RawValue>,
        validator: impl Into<Validator>,
        description: impl Into<String>,
    ) -> Self {
        self.declare(OptionSpec::new(name, default, validator, description))
    }

    pub fn declare(mut self, spec: OptionSpec) -> Self {
        self.root = self.root.declare(spec);
        self
    }

    pub fn group(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        build: impl FnOnce(GroupBuilder) -> GroupBuilder,
    ) -> Self {
        self.root = self.root.group(name, description, build);
        self
    }

    /// Finish the tree, reporting the first declaration problem.
    pub fn build(self) -> OptionResult<Schema> {
        let root = self.root.finish()?;
        Ok(Schema { root })
    }
}

/// Declares the contents of one group.
pub struct GroupBuilder {
    group: Group,
    error: Option<OptionError>,
}

impl GroupBuilder {
    fn new(group: Group) -> Self {
        Self { group, error: None }
    }

    fn child_path(&self, name: &str) -> String {
        if self.group.full_path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.group.full_path, name)
        }
    }

    fn check_name(&self, name: &str) -> OptionResult<()> {
        if name.is_empty() {
            return Err(OptionError::definition(format!(
                "empty name in group '{}'",
                self.group.full_path
            )));
        }
        if name.contains('.') {
            return Err(OptionError::definition(format!(
                "name '{}' must not contain '.'",
                name
            )));
        }
        if self.group.child(name).is_some() {
            return Err(OptionError::definition(format!(
                "duplicate name '{}'",
                self.child_path(name)
            )));
        }
        Ok(())
    }

    pub fn option(
        self,
        name: impl Into<String>,
        default: impl Into<RawValue>,
        validator: impl Into<Validator>,
        description: impl Into<String>,
    ) -> Self {
        self.declare(OptionSpec::new(name, default, validator, description))
    }

    pub fn declare(mut self, spec: OptionSpec) -> Self {
        if self.error.is_some() {
            return self;
        }
        if let Err(e) = self.check_name(&spec.name) {
            self.error = Some(e);
            return self;
        }

        let full_path = self.child_path(&spec.name);
        let default = match spec.validator.validate(spec.default.clone()) {
            Ok(v) => v,
            Err(e) => {
                self.error = Some(OptionError::definition(format!(
                    "default for '{}' is invalid: {}",
                    full_path, e
                )));
                return self;
            }
        };

        self.group.children.push(Node::Leaf(OptionDef {
            name: spec.name,
            full_path,
            current: default.clone(),
            default,
            validator: spec.validator,
            description: spec.description,
            environ: spec.environ,
        }));
        self
    }

    pub fn group(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        build: impl FnOnce(GroupBuilder) -> GroupBuilder,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = name.into();
        if let Err(e) = self.check_name(&name) {
            self.error = Some(e);
            return self;
        }

        let description = description.into();
        let child = GroupBuilder::new(Group {
            full_path: self.child_path(&name),
            name,
            description: (!description.is_empty()).then_some(description),
            children: Vec::new(),
        });
        match build(child).finish() {
            Ok(g) => self.group.children.push(Node::Group(g)),
            Err(e) => self.error = Some(e),
        }
        self
    }

    fn finish(self) -> OptionResult<Group> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.group),
        }
    }
}
