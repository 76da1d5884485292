//! Navigable views over the registry.
//!
//! A [`GroupView`] mirrors one group of the tree. Looking up a name in it
//! first tries the group's own children and then falls back to a shortcut
//! across the whole tree, the same way [`Registry::get_option`] resolves bare
//! names. [`GroupViewMut`] adds writes, each delegated to
//! [`Registry::set_option`] so validation always applies.

use crate::error::{NodeKind, OptionError, OptionResult};
use crate::registry::Registry;
use crate::tree::{Group, Node, OptionDef};
use crate::value::{RawValue, Value};

/// A looked-up node: either a nested group or a single option.
#[derive(Debug, Clone, Copy)]
pub enum NodeView<'r> {
    Group(GroupView<'r>),
    Leaf(LeafView<'r>),
}

impl<'r> NodeView<'r> {
    pub fn path(&self) -> &'r str {
        match self {
            NodeView::Group(g) => g.path(),
            NodeView::Leaf(l) => l.path(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeView::Group(_) => NodeKind::Group,
            NodeView::Leaf(_) => NodeKind::Leaf,
        }
    }
}

/// Read-only view of one group.
#[derive(Debug, Clone, Copy)]
pub struct GroupView<'r> {
    registry: &'r Registry,
    group: &'r Group,
}

impl<'r> GroupView<'r> {
    /// Full path of this group; empty at the root.
    pub fn path(&self) -> &'r str {
        self.group.full_path()
    }

    pub fn description(&self) -> Option<&'r str> {
        self.group.description()
    }

    /// Names of the immediate children, in declaration order.
    pub fn names(&self) -> Vec<&'r str> {
        self.group.children().iter().map(Node::name).collect()
    }

    fn qualify(&self, name: &str) -> String {
        if self.path().is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path(), name)
        }
    }

    /// Look up `name` locally, then as a tree-wide shortcut.
    pub fn node(&self, name: &str) -> OptionResult<NodeView<'r>> {
        let registry = self.registry;
        let node = self
            .group
            .find(name)
            .or_else(|| {
                registry
                    .shortcut(name)
                    .and_then(|full| registry.root().find(full))
            })
            .ok_or_else(|| OptionError::unknown(&self.qualify(name)))?;

        Ok(match node {
            Node::Group(group) => NodeView::Group(GroupView { registry, group }),
            Node::Leaf(opt) => NodeView::Leaf(LeafView { opt }),
        })
    }

    /// Nested group view.
    pub fn group(&self, name: &str) -> OptionResult<GroupView<'r>> {
        match self.node(name)? {
            NodeView::Group(g) => Ok(g),
            NodeView::Leaf(_) => Err(OptionError::wrong_kind(
                &self.qualify(name),
                "open group",
                NodeKind::Group,
            )),
        }
    }

    pub fn leaf(&self, name: &str) -> OptionResult<LeafView<'r>> {
        match self.node(name)? {
            NodeView::Leaf(l) => Ok(l),
            NodeView::Group(_) => Err(OptionError::wrong_kind(
                &self.qualify(name),
                "get",
                NodeKind::Leaf,
            )),
        }
    }

    /// Current value of an option reachable from this group.
    pub fn get(&self, name: &str) -> OptionResult<Value> {
        Ok(self.leaf(name)?.get().clone())
    }

    /// Views of every immediate child.
    pub fn children(&self) -> Vec<NodeView<'r>> {
        let registry = self.registry;
        self.group
            .children()
            .iter()
            .map(|node| match node {
                Node::Group(group) => NodeView::Group(GroupView { registry, group }),
                Node::Leaf(opt) => NodeView::Leaf(LeafView { opt }),
            })
            .collect()
    }
}

/// Read-only view of one option.
#[derive(Debug, Clone, Copy)]
pub struct LeafView<'r> {
    opt: &'r OptionDef,
}

impl<'r> LeafView<'r> {
    pub fn name(&self) -> &'r str {
        self.opt.name()
    }

    pub fn path(&self) -> &'r str {
        self.opt.full_path()
    }

    pub fn get(&self) -> &'r Value {
        self.opt.current_value()
    }

    pub fn default(&self) -> &'r Value {
        self.opt.default_value()
    }

    pub fn description(&self) -> &'r str {
        self.opt.description()
    }

    pub fn type_name(&self) -> &'static str {
        self.opt.validator().type_name()
    }
}

/// Writable view of one group.
pub struct GroupViewMut<'r> {
    registry: &'r mut Registry,
    path: String,
}

impl GroupViewMut<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read-only view of the same group.
    pub fn view(&self) -> OptionResult<GroupView<'_>> {
        let registry = &*self.registry;
        let group = group_at(registry, &self.path)?;
        Ok(GroupView { registry, group })
    }

    pub fn get(&self, name: &str) -> OptionResult<Value> {
        self.view()?.get(name)
    }

    fn leaf_path(&self, name: &str, operation: &'static str) -> OptionResult<String> {
        let view = self.view()?;
        match view.node(name)? {
            NodeView::Leaf(l) => Ok(l.path().to_string()),
            NodeView::Group(_) => Err(OptionError::wrong_kind(
                &view.qualify(name),
                operation,
                NodeKind::Leaf,
            )),
        }
    }

    /// Validate and assign, exactly as [`Registry::set_option`].
    pub fn set(&mut self, name: &str, value: impl Into<RawValue>) -> OptionResult<Value> {
        let full = self.leaf_path(name, "set")?;
        self.registry.set_option(&full, value)
    }

    pub fn reset(&mut self, name: &str) -> OptionResult<()> {
        let full = self.leaf_path(name, "reset")?;
        self.registry.reset_option(Some(&full))
    }

    /// Writable view of a nested group.
    pub fn group(&mut self, name: &str) -> OptionResult<GroupViewMut<'_>> {
        let path = self.view()?.group(name)?.path().to_string();
        Ok(GroupViewMut {
            registry: &mut *self.registry,
            path,
        })
    }
}

fn group_at<'r>(registry: &'r Registry, path: &str) -> OptionResult<&'r Group> {
    if path.is_empty() {
        return Ok(registry.root());
    }
    registry.group(path, "open group")
}

impl Registry {
    /// Read-only view rooted at the top of the tree.
    pub fn options(&self) -> GroupView<'_> {
        GroupView {
            registry: self,
            group: self.root(),
        }
    }

    /// Writable view rooted at the top of the tree.
    pub fn options_mut(&mut self) -> GroupViewMut<'_> {
        GroupViewMut {
            registry: self,
            path: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Schema;
    use crate::validators::{StrValidator, Validator};

    fn registry() -> Registry {
        let schema = Schema::builder()
            .option("local_infile", false, Validator::bool(), "Allow local files")
            .group("results", "Result handling", |g| {
                g.option(
                    "format",
                    "tuple",
                    StrValidator::new().valid_values(["tuple", "dict"]),
                    "Row format",
                )
            })
            .group("cluster_manager", "", |g| {
                g.option("token", "", Validator::str(), "API token")
            })
            .build()
            .unwrap();
        Registry::with_env_source(schema, |_| None)
    }

    #[test]
    fn test_group_view_navigation() {
        let reg = registry();
        let options = reg.options();
        assert_eq!(options.names(), ["local_infile", "results", "cluster_manager"]);

        let results = options.group("results").unwrap();
        assert_eq!(results.path(), "results");
        assert_eq!(results.description(), Some("Result handling"));
        assert_eq!(results.get("format").unwrap(), "tuple");
    }

    #[test]
    fn test_shortcut_falls_back_to_whole_tree() {
        let reg = registry();
        let results = reg.options().group("results").unwrap();
        // token lives under cluster_manager, not results
        assert_eq!(results.get("token").unwrap(), "");
        assert_eq!(reg.options().get("format").unwrap(), "tuple");
    }

    #[test]
    fn test_unknown_name_is_qualified() {
        let reg = registry();
        let err = reg.options().group("results").unwrap().get("foo").unwrap_err();
        assert_eq!(err, OptionError::unknown("results.foo"));
    }

    #[test]
    fn test_get_on_group_is_wrong_kind() {
        let reg = registry();
        assert!(matches!(
            reg.options().get("results"),
            Err(OptionError::WrongKind { .. })
        ));
        assert!(matches!(
            reg.options().group("local_infile"),
            Err(OptionError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_leaf_view_details() {
        let reg = registry();
        let leaf = reg.options().leaf("format").unwrap();
        assert_eq!(leaf.name(), "format");
        assert_eq!(leaf.path(), "results.format");
        assert_eq!(leaf.default(), &Value::from("tuple"));
        assert_eq!(leaf.description(), "Row format");
        assert_eq!(leaf.type_name(), "str");
    }

    #[test]
    fn test_mut_view_sets_through_validation() {
        let mut reg = registry();
        {
            let mut options = reg.options_mut();
            options.set("local_infile", "on").unwrap();
            assert!(matches!(
                options.set("local_infile", 10),
                Err(OptionError::InvalidValue { .. })
            ));
            assert!(matches!(
                options.set("results", "dict"),
                Err(OptionError::WrongKind { .. })
            ));
            options.group("results").unwrap().set("format", "dict").unwrap();
        }
        assert_eq!(reg.get_option("local_infile").unwrap(), true);
        assert_eq!(reg.get_option("results.format").unwrap(), "dict");
    }

    #[test]
    fn test_mut_view_unknown_and_reset() {
        let mut reg = registry();
        let mut results = reg.options_mut();
        let mut results = results.group("results").unwrap();
        assert_eq!(
            results.set("foo", 10).unwrap_err(),
            OptionError::unknown("results.foo")
        );
        results.set("format", "dict").unwrap();
        results.reset("format").unwrap();
        assert_eq!(results.get("format").unwrap(), "tuple");
    }

    #[test]
    fn test_children_views() {
        let reg = registry();
        let kinds: Vec<(&str, NodeKind)> = reg
            .options()
            .children()
            .iter()
            .map(|n| (n.path(), n.kind()))
            .collect();
        assert_eq!(
            kinds,
            [
                ("local_infile", NodeKind::Leaf),
                ("results", NodeKind::Group),
                ("cluster_manager", NodeKind::Group),
            ]
        );
    }
}
