//! The element hierarchy: named group nodes and leaf nodes in an arena.
//!
//! Nodes are owned by a `SlotMap`; parent links and child lists are plain
//! `NodeId` handles. Children of a group stay sorted by name: two text names
//! compare as strings, two numeric names compare as numbers, and a name that
//! is not comparable with a sibling is placed after it. Equal names keep
//! insertion order. A leaf sorts under the name of its element.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use assembly_element::ElementId;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::error::ModelError;

new_key_type! {
    /// Handle to a node of an [`ElementTree`].
    pub struct NodeId;
}

pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Name of a group node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeName {
    Number(i64),
    Text(String),
}

impl NodeName {
    /// Sibling order; `None` when one name is numeric and the other text.
    pub fn sort_cmp(&self, other: &NodeName) -> Option<Ordering> {
        match (self, other) {
            (NodeName::Text(a), NodeName::Text(b)) => Some(a.cmp(b)),
            (NodeName::Number(a), NodeName::Number(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Whether a textual lookup key names this node.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            NodeName::Text(s) => s == key,
            NodeName::Number(n) => key.parse::<i64>().is_ok_and(|k| k == *n),
        }
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeName::Number(n) => write!(f, "{n}"),
            NodeName::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        NodeName::Text(s.to_string())
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        NodeName::Text(s)
    }
}

impl From<i64> for NodeName {
    fn from(n: i64) -> Self {
        NodeName::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group { name: NodeName, attributes: Attributes },
    /// A reference to a registered element. `name` mirrors the element's
    /// name and only drives sibling order.
    Leaf { element: ElementId, name: String },
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn element(&self) -> Option<ElementId> {
        match &self.kind {
            NodeKind::Leaf { element, .. } => Some(*element),
            NodeKind::Group { .. } => None,
        }
    }

    pub fn group_name(&self) -> Option<&NodeName> {
        match &self.kind {
            NodeKind::Group { name, .. } => Some(name),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Display name: the group name, or the element name for a leaf.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Group { name, .. } => name.to_string(),
            NodeKind::Leaf { name, .. } => name.clone(),
        }
    }

    /// Sibling order; `None` between a numeric and a text name.
    pub fn sort_cmp(&self, other: &TreeNode) -> Option<Ordering> {
        match (&self.kind, &other.kind) {
            (NodeKind::Group { name: a, .. }, NodeKind::Group { name: b, .. }) => a.sort_cmp(b),
            (NodeKind::Group { name, .. }, NodeKind::Leaf { name: leaf, .. }) => {
                name.sort_cmp(&NodeName::Text(leaf.clone()))
            }
            (NodeKind::Leaf { name: leaf, .. }, NodeKind::Group { name, .. }) => {
                NodeName::Text(leaf.clone()).sort_cmp(name)
            }
            (NodeKind::Leaf { name: a, .. }, NodeKind::Leaf { name: b, .. }) => Some(a.cmp(b)),
        }
    }
}

/// Key for [`ElementTree::child`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChildKey {
    /// Position among the children.
    Index(usize),
    /// First child whose name matches.
    Name(String),
    /// The child leaf referencing this element.
    Identity(ElementId),
    /// The group directly containing this element, searched anywhere below
    /// the node ("who contains me").
    Element(ElementId),
}

impl From<usize> for ChildKey {
    fn from(i: usize) -> Self {
        ChildKey::Index(i)
    }
}

impl From<&str> for ChildKey {
    fn from(s: &str) -> Self {
        ChildKey::Name(s.to_string())
    }
}

impl From<ElementId> for ChildKey {
    fn from(id: ElementId) -> Self {
        ChildKey::Identity(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeOptions {
    /// Reject a group whose name is already used by a sibling group.
    pub strict_names: bool,
}

#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: SlotMap<NodeId, TreeNode>,
    root: NodeId,
    options: TreeOptions,
}

impl ElementTree {
    pub fn new(root_name: impl Into<NodeName>, options: TreeOptions) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode::new(NodeKind::Group {
            name: root_name.into(),
            attributes: Attributes::new(),
        }));
        Self { nodes, root, options }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root].children.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    fn get(&self, id: NodeId) -> Result<&TreeNode, ModelError> {
        self.nodes.get(id).ok_or(ModelError::UnknownNode { node: id })
    }

    fn require_group(&self, id: NodeId) -> Result<(), ModelError> {
        if self.get(id)?.is_group() {
            Ok(())
        } else {
            Err(ModelError::NotAGroup { node: id })
        }
    }

    fn check_group_name(&self, parent: NodeId, name: &NodeName, ignore: Option<NodeId>) -> Result<(), ModelError> {
        if !self.options.strict_names {
            return Ok(());
        }
        let clash = self.children(parent).iter().any(|&c| {
            Some(c) != ignore && self.nodes[c].group_name() == Some(name)
        });
        if clash {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    // ─── Insertion ──────────────────────────────────────────────────────

    pub fn add_group(
        &mut self,
        parent: NodeId,
        name: impl Into<NodeName>,
        attributes: Attributes,
    ) -> Result<NodeId, ModelError> {
        self.require_group(parent)?;
        let name = name.into();
        self.check_group_name(parent, &name, None)?;
        let id = self.nodes.insert(TreeNode::new(NodeKind::Group { name, attributes }));
        self.insert_sorted(parent, id);
        Ok(id)
    }

    pub fn add_leaf(&mut self, parent: NodeId, element: ElementId, name: &str) -> Result<NodeId, ModelError> {
        self.require_group(parent)?;
        let id = self.nodes.insert(TreeNode::new(NodeKind::Leaf {
            element,
            name: name.to_string(),
        }));
        self.insert_sorted(parent, id);
        Ok(id)
    }

    /// Put `child` before the first comparable sibling that sorts after it.
    fn insert_sorted(&mut self, parent: NodeId, child: NodeId) {
        let pos = {
            let node = &self.nodes[child];
            self.nodes[parent]
                .children
                .iter()
                .position(|&s| self.nodes[s].sort_cmp(node) == Some(Ordering::Greater))
        };
        self.nodes[child].parent = Some(parent);
        let children = &mut self.nodes[parent].children;
        match pos {
            Some(i) => children.insert(i, child),
            None => children.push(child),
        }
    }

    /// Append without sorting; for rebuilding from an already ordered source.
    pub(crate) fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.insert(TreeNode::new(kind));
        self.nodes[id].parent = Some(parent);
        self.nodes[parent].children.push(id);
        id
    }

    // ─── Lookup ─────────────────────────────────────────────────────────

    pub fn child(&self, node: NodeId, key: &ChildKey) -> Option<NodeId> {
        let children = self.children(node);
        match key {
            ChildKey::Index(i) => children.get(*i).copied(),
            ChildKey::Name(name) => children.iter().copied().find(|&c| match &self.nodes[c].kind {
                NodeKind::Group { name: n, .. } => n.matches(name),
                NodeKind::Leaf { name: n, .. } => n == name,
            }),
            ChildKey::Identity(id) => children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].element() == Some(*id)),
            ChildKey::Element(id) => self
                .pre_order_from(node)
                .into_iter()
                .find(|&n| self.nodes[n].element() == Some(*id))
                .and_then(|leaf| self.nodes[leaf].parent),
        }
    }

    /// Follow `keys` from `start`.
    pub fn resolve(&self, start: NodeId, keys: &[ChildKey]) -> Option<NodeId> {
        keys.iter().try_fold(start, |node, key| self.child(node, key))
    }

    /// Group at the end of a name path below the root.
    pub fn find_group(&self, path: &[&str]) -> Option<NodeId> {
        path.iter().try_fold(self.root, |node, name| {
            self.children(node)
                .iter()
                .copied()
                .find(|&c| self.nodes[c].group_name().is_some_and(|n| n.matches(name)))
        })
    }

    pub fn depth(&self, node: NodeId) -> Option<usize> {
        self.nodes.get(node)?;
        Some(self.ancestors(node).len())
    }

    /// Parent first, root last.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            out.push(p);
            cur = self.nodes[p].parent;
        }
        out
    }

    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Labels from the root down to `node`.
    pub fn path_of(&self, node: NodeId) -> Vec<String> {
        if !self.contains(node) {
            return Vec::new();
        }
        let mut path: Vec<String> = self.ancestors(node).iter().map(|&a| self.nodes[a].label()).collect();
        path.reverse();
        path.push(self.nodes[node].label());
        path
    }

    pub fn pre_order(&self) -> Vec<NodeId> {
        self.pre_order_from(self.root)
    }

    pub fn pre_order_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(start) {
            return out;
        }
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n].children.iter().rev());
        }
        out
    }

    /// Leaves in pre-order with the element each references.
    pub fn leaves(&self) -> Vec<(NodeId, ElementId)> {
        self.leaves_under(self.root)
    }

    pub fn leaves_under(&self, node: NodeId) -> Vec<(NodeId, ElementId)> {
        self.pre_order_from(node)
            .into_iter()
            .filter_map(|n| self.nodes[n].element().map(|e| (n, e)))
            .collect()
    }

    pub fn leaf_nodes_of(&self, element: ElementId) -> Vec<NodeId> {
        self.leaves()
            .into_iter()
            .filter(|(_, e)| *e == element)
            .map(|(n, _)| n)
            .collect()
    }

    pub fn groups(&self) -> Vec<NodeId> {
        self.pre_order().into_iter().filter(|&n| self.nodes[n].is_group()).collect()
    }

    // ─── Restructuring ──────────────────────────────────────────────────

    /// Remove `node` and its subtree; returns the elements its leaves
    /// referenced, in pre-order. The root cannot be detached.
    pub(crate) fn detach(&mut self, node: NodeId) -> Vec<ElementId> {
        if node == self.root || !self.contains(node) {
            return Vec::new();
        }
        let subtree = self.pre_order_from(node);
        if let Some(parent) = self.nodes[node].parent {
            self.nodes[parent].children.retain(|&c| c != node);
        }
        subtree
            .into_iter()
            .filter_map(|n| self.nodes.remove(n).and_then(|removed| removed.element()))
            .collect()
    }

    /// Drop `old`'s subtree and insert a node of `kind` under the same
    /// parent, sorted among the remaining siblings.
    pub(crate) fn replace_node(&mut self, old: NodeId, kind: NodeKind) -> Option<(NodeId, Vec<ElementId>)> {
        let parent = self.nodes.get(old)?.parent?;
        self.nodes[parent].children.retain(|&c| c != old);
        self.nodes[old].parent = None;
        let id = self.nodes.insert(TreeNode::new(kind));
        self.insert_sorted(parent, id);
        let subtree = self.pre_order_from(old);
        let released = subtree
            .into_iter()
            .filter_map(|n| self.nodes.remove(n).and_then(|removed| removed.element()))
            .collect();
        Some((id, released))
    }

    /// Move `node` under `new_parent`, re-sorting it among its new siblings.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), ModelError> {
        self.get(node)?;
        self.require_group(new_parent)?;
        if node == self.root || self.is_descendant_of(new_parent, node) {
            return Err(ModelError::CycleAttempt { node });
        }
        if let Some(name) = self.nodes[node].group_name().cloned() {
            self.check_group_name(new_parent, &name, Some(node))?;
        }
        if let Some(old) = self.nodes[node].parent {
            self.nodes[old].children.retain(|&c| c != node);
        }
        self.insert_sorted(new_parent, node);
        Ok(())
    }

    /// Remove every leaf that references `element`; returns how many.
    pub(crate) fn remove_leaves_of(&mut self, element: ElementId) -> usize {
        let leaves = self.leaf_nodes_of(element);
        for &leaf in &leaves {
            self.detach(leaf);
        }
        leaves.len()
    }

    /// Refresh the sort name of every leaf of `element`.
    pub(crate) fn rename_leaves(&mut self, element: ElementId, new_name: &str) {
        for leaf in self.leaf_nodes_of(element) {
            if let NodeKind::Leaf { name, .. } = &mut self.nodes[leaf].kind {
                *name = new_name.to_string();
            }
            if let Some(parent) = self.nodes[leaf].parent {
                self.nodes[parent].children.retain(|&c| c != leaf);
                self.insert_sorted(parent, leaf);
            }
        }
    }

    /// Move every leaf directly under the root and drop every other group.
    /// Leaves are re-inserted in pre-order, so equal names keep that order.
    /// Returns the number of groups removed.
    pub(crate) fn flatten(&mut self) -> usize {
        let root = self.root;
        let leaves: Vec<NodeId> = self.leaves().into_iter().map(|(n, _)| n).collect();
        for &leaf in &leaves {
            if let Some(parent) = self.nodes[leaf].parent {
                self.nodes[parent].children.retain(|&c| c != leaf);
            }
            self.nodes[leaf].parent = None;
        }
        let groups: Vec<NodeId> = self.nodes[root].children.clone();
        let mut removed = 0;
        for g in groups {
            removed += self.pre_order_from(g).len();
            self.detach(g);
        }
        for leaf in leaves {
            self.insert_sorted(root, leaf);
        }
        removed
    }

    /// Remove every group at depth `depth_limit` or deeper (the root is
    /// depth 0 and always survives), hoisting the leaves below each removed
    /// group into its surviving parent. Returns the number of groups removed.
    pub(crate) fn prune(&mut self, depth_limit: usize) -> usize {
        let keep = depth_limit.max(1);
        let doomed: Vec<NodeId> = self
            .groups()
            .into_iter()
            .filter(|&g| self.depth(g) == Some(keep))
            .collect();
        let mut removed = 0;
        for group in doomed {
            let Some(survivor) = self.nodes[group].parent else {
                continue;
            };
            let leaves: Vec<NodeId> = self.leaves_under(group).into_iter().map(|(n, _)| n).collect();
            for leaf in leaves {
                if let Some(old) = self.nodes[leaf].parent {
                    self.nodes[old].children.retain(|&c| c != leaf);
                }
                self.insert_sorted(survivor, leaf);
            }
            removed += self.pre_order_from(group).len();
            self.detach(group);
        }
        removed
    }

    /// Indented outline, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((n, depth)) = stack.pop() {
            let node = &self.nodes[n];
            let _ = match &node.kind {
                NodeKind::Group { name, .. } => writeln!(out, "{}{}/", "  ".repeat(depth), name),
                NodeKind::Leaf { element, name } => writeln!(out, "{}{} <{}>", "  ".repeat(depth), name, element),
            };
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }
}
