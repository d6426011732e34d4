//! The assembly model: one element tree, one registry and one interaction
//! graph, kept consistent by every mutator.
//!
//! - Every leaf references a registered element.
//! - The graph's vertices are exactly the registry's identities.
//! - A mutator that returns an error leaves all three untouched.

use assembly_element::{Element, ElementId, Interface};
use assembly_geometry::{Geometry, Line, Point3d, Transform};
use assembly_spatial::SortedMultiMap;
use tracing::{debug, instrument};

use crate::error::ModelError;
use crate::graph::{Interaction, InteractionGraph};
use crate::registry::Registry;
use crate::tree::{Attributes, ChildKey, ElementTree, NodeId, NodeKind, NodeName, TreeOptions};

/// Name of the root group of every model.
pub const ROOT_NAME: &str = "model";

/// What [`Model::set_child`] puts in place of the old child.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// A leaf referencing this element (registered if new).
    Element(Element),
    /// An empty group.
    Group { name: NodeName, attributes: Attributes },
}

/// Result of [`Model::find_shortest_path`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortestPath {
    pub elements: Vec<ElementId>,
    pub geometry: Option<PathGeometry>,
}

/// Drawable bundle for a path: element centers, the segments joining
/// consecutive centers and each element's simplified geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    pub centers: Vec<Point3d>,
    pub segments: Vec<Line>,
    pub shapes: Vec<Geometry>,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) tree: ElementTree,
    pub(crate) registry: Registry,
    pub(crate) graph: InteractionGraph,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            tree: ElementTree::new(ROOT_NAME, options),
            registry: Registry::new(),
            graph: InteractionGraph::new(),
        }
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Run `f` on a scratch copy and keep the result only if it succeeds.
    pub(crate) fn atomically<T>(
        &mut self,
        f: impl FnOnce(&mut Model) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let mut scratch = self.clone();
        let out = f(&mut scratch)?;
        *self = scratch;
        Ok(out)
    }

    // ─── Groups ─────────────────────────────────────────────────────────

    pub fn add_group(&mut self, name: impl Into<NodeName>) -> Result<NodeId, ModelError> {
        let root = self.root();
        self.add_group_under(root, name, Attributes::new())
    }

    pub fn add_group_under(
        &mut self,
        parent: NodeId,
        name: impl Into<NodeName>,
        attributes: Attributes,
    ) -> Result<NodeId, ModelError> {
        self.tree.add_group(parent, name, attributes)
    }

    pub fn set_group_attribute(
        &mut self,
        group: NodeId,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), ModelError> {
        match self.tree.node_mut(group).map(|n| &mut n.kind) {
            Some(NodeKind::Group { attributes, .. }) => {
                attributes.insert(key.into(), value);
                Ok(())
            }
            Some(NodeKind::Leaf { .. }) => Err(ModelError::NotAGroup { node: group }),
            None => Err(ModelError::UnknownNode { node: group }),
        }
    }

    /// Group at the end of a name path below the root.
    pub fn find_group(&self, path: &[&str]) -> Option<NodeId> {
        self.tree.find_group(path)
    }

    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), ModelError> {
        self.tree.reparent(node, new_parent)
    }

    // ─── Elements ───────────────────────────────────────────────────────

    /// Add `element` as a leaf of the root. No-op if its identity is
    /// already registered.
    pub fn add_element(&mut self, element: Element) -> Result<ElementId, ModelError> {
        let root = self.root();
        self.add_element_under(root, element)
    }

    /// Add `element` as a leaf of `parent`, registering it. No-op if its
    /// identity is already registered.
    #[instrument(skip(self, element), fields(name = %element.name, id = %element.id()))]
    pub fn add_element_under(&mut self, parent: NodeId, element: Element) -> Result<ElementId, ModelError> {
        let id = element.id();
        if self.registry.contains(id) {
            debug!("element already registered");
            return Ok(id);
        }
        self.tree.add_leaf(parent, id, &element.name)?;
        self.register(element);
        debug!("element added");
        Ok(id)
    }

    /// Add each element under the root, in order.
    pub fn add_elements(&mut self, elements: impl IntoIterator<Item = Element>) -> Result<Vec<ElementId>, ModelError> {
        elements.into_iter().map(|e| self.add_element(e)).collect()
    }

    /// Add a leaf for `element` under `parent` even if the element already
    /// has leaves elsewhere. A new identity is registered; a known one keeps
    /// the registered element.
    pub fn add_leaf(&mut self, parent: NodeId, element: Element) -> Result<NodeId, ModelError> {
        let id = element.id();
        let name = match self.registry.get(id) {
            Some(existing) => existing.name.clone(),
            None => element.name.clone(),
        };
        let leaf = self.tree.add_leaf(parent, id, &name)?;
        self.register(element);
        Ok(leaf)
    }

    /// Add another leaf for an already registered element.
    pub fn link_element(&mut self, parent: NodeId, id: ElementId) -> Result<NodeId, ModelError> {
        let name = self.require(id)?.name.clone();
        self.tree.add_leaf(parent, id, &name)
    }

    /// Register without touching the tree. Tree-less elements are legal.
    pub fn insert_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.register(element);
        id
    }

    pub(crate) fn register(&mut self, element: Element) {
        let id = element.id();
        if self.registry.insert(element) {
            self.graph.add_vertex(id);
        }
    }

    fn require(&self, id: ElementId) -> Result<&Element, ModelError> {
        self.registry.get(id).ok_or(ModelError::UnknownElement { id })
    }

    pub fn lookup_element(&self, id: ElementId) -> Option<&Element> {
        self.registry.get(id)
    }

    pub fn contains_element(&self, id: ElementId) -> bool {
        self.registry.contains(id)
    }

    /// Edit a registered element in place. Leaves follow a name change.
    pub fn update_element<R>(&mut self, id: ElementId, f: impl FnOnce(&mut Element) -> R) -> Result<R, ModelError> {
        let element = self.registry.get_mut(id).ok_or(ModelError::UnknownElement { id })?;
        let before = element.name.clone();
        let out = f(element);
        if element.name != before {
            let name = element.name.clone();
            self.tree.rename_leaves(id, &name);
        }
        Ok(out)
    }

    /// Remove the element from the registry, every leaf referencing it and
    /// every interaction touching it.
    #[instrument(skip(self))]
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, ModelError> {
        let element = self.registry.remove(id).ok_or(ModelError::UnknownElement { id })?;
        let leaves = self.tree.remove_leaves_of(id);
        self.graph.remove_vertex(id);
        debug!(leaves, "element removed");
        Ok(element)
    }

    /// Transform one element in place, dropping its cached bounds.
    pub fn transform_element(&mut self, id: ElementId, t: &Transform) -> Result<(), ModelError> {
        self.update_element(id, |e| e.transform(t))
    }

    /// Registered elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.registry.iter()
    }

    pub fn element_count(&self) -> usize {
        self.registry.len()
    }

    pub fn leaf_nodes_of(&self, id: ElementId) -> Vec<NodeId> {
        self.tree.leaf_nodes_of(id)
    }

    /// Group holding the first leaf (pre-order) of `id`.
    pub fn parent_group_of(&self, id: ElementId) -> Option<NodeId> {
        self.tree.child(self.root(), &ChildKey::Element(id))
    }

    /// Element identities grouped by their index path.
    pub fn elements_by_index_path(&self) -> SortedMultiMap<i64, ElementId> {
        self.registry
            .iter()
            .map(|e| (e.index_path.clone(), e.id()))
            .collect()
    }

    // ─── Child access ───────────────────────────────────────────────────

    pub fn child(&self, node: NodeId, key: &ChildKey) -> Option<NodeId> {
        self.tree.child(node, key)
    }

    pub fn resolve(&self, start: NodeId, keys: &[ChildKey]) -> Option<NodeId> {
        self.tree.resolve(start, keys)
    }

    /// Like [`Model::child`] but reports why nothing was found.
    pub fn get_child(&self, node: NodeId, key: &ChildKey) -> Result<NodeId, ModelError> {
        let n = self.tree.node(node).ok_or(ModelError::UnknownNode { node })?;
        if let Some(found) = self.tree.child(node, key) {
            return Ok(found);
        }
        Err(match key {
            ChildKey::Index(index) => ModelError::OutOfRange {
                index: *index,
                len: n.children().len(),
            },
            ChildKey::Name(name) => ModelError::MissingChild { key: name.clone() },
            ChildKey::Identity(id) | ChildKey::Element(id) if self.registry.contains(*id) => {
                ModelError::MissingChild { key: id.to_string() }
            }
            ChildKey::Identity(id) | ChildKey::Element(id) => ModelError::UnknownElement { id: *id },
        })
    }

    /// Element referenced by the leaf at `node`.
    pub fn element_at(&self, node: NodeId) -> Option<&Element> {
        self.tree.node(node)?.element().and_then(|id| self.registry.get(id))
    }

    /// Replace the child of `parent` selected by `key`; the new node is
    /// sorted among its siblings. Elements referenced only from the old
    /// subtree are removed from the model. Returns the new node.
    #[instrument(skip(self, replacement))]
    pub fn set_child(&mut self, parent: NodeId, key: &ChildKey, replacement: Replacement) -> Result<NodeId, ModelError> {
        let old = self.get_child(parent, key)?;
        if self.tree.parent(old) != Some(parent) {
            return Err(ModelError::MissingChild {
                key: format!("{key:?}"),
            });
        }
        let kind = match &replacement {
            Replacement::Element(element) => NodeKind::Leaf {
                element: element.id(),
                name: self
                    .registry
                    .get(element.id())
                    .map_or_else(|| element.name.clone(), |e| e.name.clone()),
            },
            Replacement::Group { name, attributes } => NodeKind::Group {
                name: name.clone(),
                attributes: attributes.clone(),
            },
        };
        if let (Replacement::Group { name, .. }, true) = (&replacement, self.tree.options().strict_names) {
            let clash = self
                .tree
                .children(parent)
                .iter()
                .any(|&c| c != old && self.tree.node(c).and_then(|n| n.group_name()) == Some(name));
            if clash {
                return Err(ModelError::DuplicateName { name: name.to_string() });
            }
        }
        let (new, released) = self
            .tree
            .replace_node(old, kind)
            .ok_or(ModelError::UnknownNode { node: old })?;
        if let Replacement::Element(element) = replacement {
            self.register(element);
        }
        self.release(released);
        Ok(new)
    }

    /// Point the leaf at `index` under `parent` to `element`. A group at
    /// that position is replaced by a leaf.
    pub fn set_child_element(&mut self, parent: NodeId, index: usize, element: Element) -> Result<NodeId, ModelError> {
        self.set_child(parent, &ChildKey::Index(index), Replacement::Element(element))
    }

    /// Drop elements that no leaf references any more.
    fn release(&mut self, released: Vec<ElementId>) {
        for id in released {
            if self.registry.contains(id) && self.tree.leaf_nodes_of(id).is_empty() {
                self.registry.remove(id);
                self.graph.remove_vertex(id);
                debug!(%id, "element released");
            }
        }
    }

    /// Remove `node` and its subtree; elements no longer referenced by any
    /// leaf are removed from the model.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), ModelError> {
        if node == self.root() {
            return Err(ModelError::CycleAttempt { node });
        }
        if !self.tree.contains(node) {
            return Err(ModelError::UnknownNode { node });
        }
        let released = self.tree.detach(node);
        self.release(released);
        Ok(())
    }

    // ─── Interactions ───────────────────────────────────────────────────

    /// Insert the edge `{a, b}`. A supplied interface replaces the stored one.
    pub fn add_interaction(&mut self, a: ElementId, b: ElementId, interface: Option<Interface>) -> Result<(), ModelError> {
        let payload = interface.map(|i| Interaction {
            interface: Some(i),
            interfaces: Vec::new(),
        });
        self.add_interaction_payload(a, b, payload)
    }

    /// Insert the edge `{a, b}` carrying every interface in `interfaces`
    /// (largest first); the first one is the primary interface.
    pub fn add_interaction_with(&mut self, a: ElementId, b: ElementId, interfaces: Vec<Interface>) -> Result<(), ModelError> {
        let payload = (!interfaces.is_empty()).then(|| Interaction::from_interfaces(interfaces));
        self.add_interaction_payload(a, b, payload)
    }

    fn add_interaction_payload(&mut self, a: ElementId, b: ElementId, payload: Option<Interaction>) -> Result<(), ModelError> {
        self.require(a)?;
        self.require(b)?;
        if a == b {
            return Err(ModelError::SelfInteraction { id: a });
        }
        self.graph.add_edge(a, b, payload);
        debug!(%a, %b, "interaction added");
        Ok(())
    }

    pub fn remove_interaction(&mut self, a: ElementId, b: ElementId) -> bool {
        let removed = self.graph.remove_edge(a, b);
        if removed {
            debug!(%a, %b, "interaction removed");
        }
        removed
    }

    pub fn clear_interactions(&mut self) {
        self.graph.clear_edges();
    }

    pub fn has_interaction(&self, a: ElementId, b: ElementId) -> bool {
        self.graph.has_edge(a, b)
    }

    pub fn interaction(&self, a: ElementId, b: ElementId) -> Option<&Interaction> {
        self.graph.edge(a, b)
    }

    /// Every interface on the edge `{a, b}`, primary first.
    pub fn interfaces_of(&self, a: ElementId, b: ElementId) -> Vec<&Interface> {
        self.graph.edge(a, b).map(|i| i.all().collect()).unwrap_or_default()
    }

    pub fn neighbors(&self, id: ElementId) -> Vec<ElementId> {
        self.graph.neighbors(id)
    }

    /// Edges as identity pairs, smaller identity first.
    pub fn get_interactions(&self) -> Vec<(ElementId, ElementId)> {
        self.graph.edges().map(|(a, b, _)| (a, b)).collect()
    }

    /// Edges as segments between element centers.
    pub fn get_interactions_as_lines(&self) -> Vec<Line> {
        self.graph
            .edges()
            .filter_map(|(a, b, _)| {
                let (ea, eb) = (self.registry.get(a)?, self.registry.get(b)?);
                Some(Line::new(ea.center(), eb.center()))
            })
            .collect()
    }

    /// Edges as `"<name> <registry index>"` label pairs.
    pub fn get_interactions_as_readable(&self) -> Vec<(String, String)> {
        self.graph
            .edges()
            .filter_map(|(a, b, _)| Some((self.readable(a)?, self.readable(b)?)))
            .collect()
    }

    fn readable(&self, id: ElementId) -> Option<String> {
        let e = self.registry.get(id)?;
        Some(format!("{} {}", e.name, self.registry.index_of(id)?))
    }

    /// Fewest-interactions path between two elements; see
    /// [`InteractionGraph::shortest_path`] for the tie-break. The geometry
    /// bundle is only built when asked for and the path is non-empty.
    pub fn find_shortest_path(&self, src: ElementId, dst: ElementId, return_geometry: bool) -> ShortestPath {
        let elements = self.graph.shortest_path(src, dst);
        let geometry = (return_geometry && !elements.is_empty()).then(|| {
            let path: Vec<&Element> = elements.iter().filter_map(|&id| self.registry.get(id)).collect();
            let centers: Vec<Point3d> = path.iter().map(|e| e.center()).collect();
            PathGeometry {
                segments: centers.windows(2).map(|w| Line::new(w[0], w[1])).collect(),
                shapes: path.iter().map(|e| e.geometry_simplified().clone()).collect(),
                centers,
            }
        });
        ShortestPath { elements, geometry }
    }

    /// Indented outline of the tree.
    pub fn tree_string(&self) -> String {
        self.tree.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_geometry::{Frame, Vec3};

    fn cube(name: &str, x: f64, y: f64, z: f64) -> Element {
        Element::from_box(name, Frame::world_at(Point3d::new(x, y, z)), 1.0, 1.0, 1.0).unwrap()
    }

    fn assert_consistent(m: &Model) {
        for (_, id) in m.tree.leaves() {
            assert!(m.registry.contains(id), "leaf {id} not registered");
        }
        assert_eq!(m.graph.vertices().len(), m.registry.len());
        for id in m.registry.ids() {
            assert!(m.graph.has_vertex(*id));
        }
    }

    #[test]
    fn test_add_element_is_idempotent() {
        let mut m = Model::new();
        let e = cube("BLOCK", 0.0, 0.0, 0.0);
        let id = m.add_element(e.clone()).unwrap();
        m.add_element(e).unwrap();
        assert_eq!(m.element_count(), 1);
        assert_eq!(m.leaf_nodes_of(id).len(), 1);
        assert_consistent(&m);
    }

    #[test]
    fn test_add_element_under_leaf_fails_cleanly() {
        let mut m = Model::new();
        let id = m.add_element(cube("A", 0.0, 0.0, 0.0)).unwrap();
        let leaf = m.leaf_nodes_of(id)[0];
        let err = m.add_element_under(leaf, cube("B", 1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, ModelError::NotAGroup { node: leaf });
        assert_eq!(m.element_count(), 1);
        assert_consistent(&m);
    }

    #[test]
    fn test_add_interaction_requires_registered_endpoints() {
        let mut m = Model::new();
        let a = m.add_element(cube("A", 0.0, 0.0, 0.0)).unwrap();
        let stranger = ElementId::new();
        assert_eq!(
            m.add_interaction(a, stranger, None).unwrap_err(),
            ModelError::UnknownElement { id: stranger }
        );
        assert_eq!(
            m.add_interaction(a, a, None).unwrap_err(),
            ModelError::SelfInteraction { id: a }
        );
        assert!(m.get_interactions().is_empty());
    }

    #[test]
    fn test_remove_element_propagates() {
        let mut m = Model::new();
        let g = m.add_group("g").unwrap();
        let a = m.add_element_under(g, cube("A", 0.0, 0.0, 0.0)).unwrap();
        let b = m.add_element(cube("B", 1.0, 0.0, 0.0)).unwrap();
        m.link_element(m.root(), a).unwrap();
        m.add_interaction(a, b, None).unwrap();

        m.remove_element(a).unwrap();
        assert!(m.leaf_nodes_of(a).is_empty());
        assert!(m.neighbors(b).is_empty());
        assert!(m.lookup_element(a).is_none());
        assert_consistent(&m);
        assert_eq!(m.remove_element(a).unwrap_err(), ModelError::UnknownElement { id: a });
    }

    #[test]
    fn test_transform_element_invalidates_bounds() {
        let mut m = Model::new();
        let id = m.add_element(cube("A", 0.0, 0.0, 0.0)).unwrap();
        let before = m.lookup_element(id).unwrap().aabb(0.0);
        assert!(m.lookup_element(id).unwrap().has_cached_bounds());
        m.transform_element(id, &Transform::translation(5.0, 0.0, 0.0)).unwrap();
        let e = m.lookup_element(id).unwrap();
        assert!(!e.has_cached_bounds());
        approx::assert_abs_diff_eq!(e.aabb(0.0).min.x, before.min.x + 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_update_element_resorts_leaves() {
        let mut m = Model::new();
        let a = m.add_element(cube("A", 0.0, 0.0, 0.0)).unwrap();
        m.add_element(cube("B", 1.0, 0.0, 0.0)).unwrap();
        m.update_element(a, |e| e.name = "C".into()).unwrap();
        let labels: Vec<String> = m
            .tree()
            .children(m.root())
            .iter()
            .map(|&c| m.tree().node(c).unwrap().label())
            .collect();
        assert_eq!(labels, vec!["B", "C"]);
    }

    #[test]
    fn test_set_child_releases_unreferenced_elements() {
        let mut m = Model::new();
        let g = m.add_group("g").unwrap();
        let a = m.add_element_under(g, cube("A", 0.0, 0.0, 0.0)).unwrap();
        let shared = m.add_element_under(g, cube("S", 1.0, 0.0, 0.0)).unwrap();
        m.link_element(m.root(), shared).unwrap();
        m.add_interaction(a, shared, None).unwrap();

        let root = m.root();
        let new = m
            .set_child(
                root,
                &ChildKey::Name("g".into()),
                Replacement::Group {
                    name: "h".into(),
                    attributes: Attributes::new(),
                },
            )
            .unwrap();
        assert!(m.lookup_element(a).is_none());
        assert!(m.lookup_element(shared).is_some());
        assert!(m.get_interactions().is_empty());
        assert_eq!(m.tree().node(new).unwrap().label(), "h");
        assert_consistent(&m);
    }

    #[test]
    fn test_set_child_element_swaps_leaf() {
        let mut m = Model::new();
        let old = m.add_element(cube("A", 0.0, 0.0, 0.0)).unwrap();
        let root = m.root();
        let replacement = cube("Z", 2.0, 0.0, 0.0);
        let new_id = replacement.id();
        let leaf = m.set_child_element(root, 0, replacement).unwrap();
        assert_eq!(m.element_at(leaf).map(|e| e.id()), Some(new_id));
        assert!(m.lookup_element(old).is_none());
        assert_eq!(
            m.set_child_element(root, 3, cube("Q", 0.0, 0.0, 0.0)).unwrap_err(),
            ModelError::OutOfRange { index: 3, len: 1 }
        );
        assert_consistent(&m);
    }

    #[test]
    fn test_set_child_resorts_replacement() {
        let mut m = Model::new();
        for name in ["A", "B", "C"] {
            m.add_element(cube(name, 0.0, 0.0, 0.0)).unwrap();
        }
        let root = m.root();
        m.set_child(root, &ChildKey::Index(0), Replacement::Element(cube("Z", 0.0, 0.0, 0.0)))
            .unwrap();
        let labels: Vec<String> = m
            .tree()
            .children(root)
            .iter()
            .map(|&c| m.tree().node(c).unwrap().label())
            .collect();
        assert_eq!(labels, vec!["B", "C", "Z"]);
        assert_consistent(&m);
    }

    #[test]
    fn test_get_child_distinguishes_missing_from_unknown() {
        let mut m = Model::new();
        let g = m.add_group("g").unwrap();
        let h = m.add_group("h").unwrap();
        let inside = m.add_element_under(g, cube("A", 0.0, 0.0, 0.0)).unwrap();
        let loose = m.insert_element(cube("L", 1.0, 0.0, 0.0));
        let stranger = ElementId::new();

        assert_eq!(m.get_child(m.root(), &ChildKey::Element(inside)).unwrap(), g);
        assert_eq!(
            m.get_child(h, &ChildKey::Element(inside)).unwrap_err(),
            ModelError::MissingChild { key: inside.to_string() }
        );
        assert_eq!(
            m.get_child(g, &ChildKey::Identity(loose)).unwrap_err(),
            ModelError::MissingChild { key: loose.to_string() }
        );
        assert_eq!(
            m.get_child(g, &ChildKey::Element(stranger)).unwrap_err(),
            ModelError::UnknownElement { id: stranger }
        );
    }

    #[test]
    fn test_readable_and_lines() {
        let mut m = Model::new();
        let a = m.add_element(cube("BLOCK", 0.0, 0.0, 0.0)).unwrap();
        let b = m.add_element(cube("BLOCK", 1.0, 0.0, 0.0)).unwrap();
        m.add_interaction(a, b, None).unwrap();
        let readable = m.get_interactions_as_readable();
        assert_eq!(readable.len(), 1);
        let (x, y) = &readable[0];
        let mut labels = vec![x.as_str(), y.as_str()];
        labels.sort_unstable();
        assert_eq!(labels, vec!["BLOCK 0", "BLOCK 1"]);
        let lines = m.get_interactions_as_lines();
        approx::assert_abs_diff_eq!(lines[0].length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shortest_path_geometry() {
        let mut m = Model::new();
        let ids: Vec<ElementId> = (0..3)
            .map(|i| m.add_element(cube("BLOCK", i as f64, 0.0, 0.0)).unwrap())
            .collect();
        m.add_interaction(ids[0], ids[1], None).unwrap();
        m.add_interaction(ids[1], ids[2], None).unwrap();
        let path = m.find_shortest_path(ids[0], ids[2], true);
        assert_eq!(path.elements, ids);
        let geometry = path.geometry.unwrap();
        assert_eq!(geometry.segments.len(), 2);
        assert_eq!(geometry.shapes.len(), 3);

        let lone = m.insert_element(cube("LONE", 9.0, 0.0, 0.0));
        let none = m.find_shortest_path(ids[0], lone, true);
        assert!(none.elements.is_empty());
        assert!(none.geometry.is_none());
    }

    #[test]
    fn test_elements_by_index_path() {
        let mut m = Model::new();
        let a = m.add_element(cube("A", 0.0, 0.0, 0.0).with_index_path(vec![1, 0])).unwrap();
        let b = m.add_element(cube("B", 1.0, 0.0, 0.0).with_index_path(vec![0, 2])).unwrap();
        let c = m.add_element(cube("C", 2.0, 0.0, 0.0).with_index_path(vec![0, 2])).unwrap();
        let map = m.elements_by_index_path();
        assert_eq!(map.get(&[0, 2]), Some(&[b, c][..]));
        assert_eq!(map.get(&[1, 0]), Some(&[a][..]));
    }

    #[test]
    fn test_interfaces_of_orders_primary_first() {
        use assembly_geometry::Polygon;
        let square = |s: f64| {
            Polygon::new(vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(s, 0.0, 0.0),
                Point3d::new(s, s, 0.0),
                Point3d::new(0.0, s, 0.0),
            ])
        };
        let mut m = Model::new();
        let a = m.add_element(cube("A", 0.0, 0.0, 0.0)).unwrap();
        let b = m.add_element(cube("B", 0.0, 0.0, 1.0)).unwrap();
        m.add_interaction_with(
            a,
            b,
            vec![Interface::new(square(2.0), Vec3::Z), Interface::new(square(1.0), Vec3::Z)],
        )
        .unwrap();
        let areas: Vec<f64> = m.interfaces_of(b, a).iter().map(|i| i.area).collect();
        assert_eq!(areas.len(), 2);
        assert!(areas[0] > areas[1]);
    }
}
