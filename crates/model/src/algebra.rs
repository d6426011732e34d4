//! Whole-model restructuring: merge, graft, flatten, prune and copy.

use std::collections::{BTreeSet, HashMap, HashSet};

use assembly_element::ElementId;
use tracing::{info, instrument};

use crate::error::ModelError;
use crate::model::Model;
use crate::tree::{Attributes, NodeId, NodeKind, NodeName};

impl Model {
    /// Graft the children of `other`'s root into this model's root.
    ///
    /// Groups with the same name at the same place are united and their
    /// children merged recursively. Elements already registered here keep
    /// their registered version and their leaves from `other` are skipped.
    /// Edges of `other` are added where this model has none.
    #[instrument(skip_all)]
    pub fn merge(&mut self, other: &Model) -> Result<(), ModelError> {
        let (elements_before, edges_before) = (self.element_count(), self.graph.edge_count());
        self.atomically(|m| {
            let known: HashSet<ElementId> = m.registry.ids().iter().copied().collect();
            let (dst, src) = (m.root(), other.root());
            m.merge_children(other, src, dst, &known)?;
            for element in other.registry.iter() {
                m.register(element.clone());
            }
            for (a, b, payload) in other.graph.edges() {
                if !m.graph.has_edge(a, b) {
                    m.graph.add_edge(a, b, Some(payload.clone()));
                }
            }
            Ok(())
        })?;
        info!(
            elements_added = self.element_count() - elements_before,
            edges_added = self.graph.edge_count() - edges_before,
            "merged model"
        );
        Ok(())
    }

    fn merge_children(
        &mut self,
        other: &Model,
        src: NodeId,
        dst: NodeId,
        known: &HashSet<ElementId>,
    ) -> Result<(), ModelError> {
        for &child in other.tree.children(src) {
            let Some(node) = other.tree.node(child) else {
                continue;
            };
            match &node.kind {
                NodeKind::Group { name, attributes } => {
                    let target = match self.find_child_group(dst, name) {
                        Some(existing) => {
                            self.absorb_attributes(existing, attributes);
                            existing
                        }
                        None => self.tree.add_group(dst, name.clone(), attributes.clone())?,
                    };
                    self.merge_children(other, child, target, known)?;
                }
                NodeKind::Leaf { element, .. } => {
                    if known.contains(element) {
                        continue;
                    }
                    if let Some(e) = other.registry.get(*element) {
                        self.add_leaf(dst, e.clone())?;
                    }
                }
            }
        }
        Ok(())
    }

    fn find_child_group(&self, parent: NodeId, name: &NodeName) -> Option<NodeId> {
        self.tree
            .children(parent)
            .iter()
            .copied()
            .find(|&c| self.tree.node(c).and_then(|n| n.group_name()) == Some(name))
    }

    /// Add keys this group lacks; existing keys win.
    fn absorb_attributes(&mut self, group: NodeId, incoming: &Attributes) {
        if let Some(NodeKind::Group { attributes, .. }) = self.tree.node_mut(group).map(|n| &mut n.kind) {
            for (k, v) in incoming {
                attributes.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
    }

    /// Split every group that directly holds leaves of more than one name.
    ///
    /// Each such leaf moves into a new group named after its element. With
    /// strict names, leaves of the same name share one group (an existing
    /// sibling group of that name is reused). Returns the number of leaves
    /// moved.
    #[instrument(skip_all)]
    pub fn graft(&mut self) -> Result<usize, ModelError> {
        let moved = self.atomically(|m| {
            let strict = m.tree.options().strict_names;
            let mut moved = 0;
            for group in m.tree.groups() {
                let leaves: Vec<(NodeId, String)> = m
                    .tree
                    .children(group)
                    .iter()
                    .filter_map(|&c| {
                        let node = m.tree.node(c)?;
                        node.is_leaf().then(|| (c, node.label()))
                    })
                    .collect();
                let names: BTreeSet<&str> = leaves.iter().map(|(_, n)| n.as_str()).collect();
                if names.len() < 2 {
                    continue;
                }
                for (leaf, name) in &leaves {
                    let group_name = NodeName::Text(name.clone());
                    let existing = if strict {
                        m.find_child_group(group, &group_name)
                    } else {
                        None
                    };
                    let target = match existing {
                        Some(g) => g,
                        None => m.tree.add_group(group, group_name, Attributes::new())?,
                    };
                    m.tree.reparent(*leaf, target)?;
                    moved += 1;
                }
            }
            Ok(moved)
        })?;
        info!(moved, "grafted model");
        Ok(moved)
    }

    /// Put every leaf directly under the root and delete all other groups.
    /// Leaves are taken in pre-order. Returns the number of groups removed.
    #[instrument(skip_all)]
    pub fn flatten(&mut self) -> usize {
        let removed = self.tree.flatten();
        info!(removed, "flattened model");
        removed
    }

    /// Delete every group at depth `depth_limit` or deeper (root at depth
    /// 0), hoisting their leaves into the nearest surviving ancestor.
    /// `prune(0)` behaves like `prune(1)`. Returns the number of groups
    /// removed.
    #[instrument(skip(self))]
    pub fn prune(&mut self, depth_limit: usize) -> usize {
        let removed = self.tree.prune(depth_limit);
        info!(removed, "pruned model");
        removed
    }

    /// Deep copy under fresh identities. Tree shape, sibling order, registry
    /// order and edges (with their interfaces) are reproduced.
    #[instrument(skip_all)]
    pub fn copy(&self) -> Model {
        let mut out = Model::with_options(self.tree.options());
        let mut ids: HashMap<ElementId, ElementId> = HashMap::new();
        for element in self.registry.iter() {
            let fresh = element.copy_with_fresh_identity();
            ids.insert(element.id(), fresh.id());
            out.register(fresh);
        }

        let root = out.root();
        if let (Some(src), Some(dst)) = (self.tree.node(self.root()), out.tree.node_mut(root)) {
            dst.kind = src.kind.clone();
        }
        let mut stack = vec![(self.root(), root)];
        while let Some((src, dst)) = stack.pop() {
            for &child in self.tree.children(src) {
                let Some(node) = self.tree.node(child) else {
                    continue;
                };
                let kind = match &node.kind {
                    NodeKind::Group { .. } => node.kind.clone(),
                    NodeKind::Leaf { element, name } => match ids.get(element) {
                        Some(&fresh) => NodeKind::Leaf {
                            element: fresh,
                            name: name.clone(),
                        },
                        None => continue,
                    },
                };
                let copied = out.tree.push_child(dst, kind);
                stack.push((child, copied));
            }
        }

        for (a, b, payload) in self.graph.edges() {
            if let (Some(&na), Some(&nb)) = (ids.get(&a), ids.get(&b)) {
                out.graph.add_edge(na, nb, Some(payload.clone()));
            }
        }
        info!(elements = out.element_count(), edges = out.graph.edge_count(), "copied model");
        out
    }
}
