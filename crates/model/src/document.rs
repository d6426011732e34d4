//! Nested JSON document for a whole model.
//!
//! ```json
//! { "tree": { "kind": "group", "name": "model", "attributes": {}, "children": [...] },
//!   "registry": [ <Element>, ... ],
//!   "graph": { "edges": [ { "a": "...", "b": "...", "interface": {...} } ] } }
//! ```
//!
//! Unknown keys are ignored. Loading checks that every leaf and every edge
//! endpoint names a registered element.

use std::collections::HashSet;

use assembly_element::{Element, ElementId, Interface};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::ModelError;
use crate::graph::Interaction;
use crate::model::Model;
use crate::tree::{Attributes, ElementTree, NodeId, NodeKind, NodeName, TreeOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    pub tree: NodeDocument,
    #[serde(default)]
    pub registry: Vec<Element>,
    #[serde(default)]
    pub graph: GraphDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeDocument {
    Group {
        name: NodeName,
        #[serde(default)]
        attributes: Attributes,
        #[serde(default)]
        children: Vec<NodeDocument>,
    },
    Leaf {
        element_identity: ElementId,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub a: ElementId,
    pub b: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<Interface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
}

fn reject(reason: impl Into<String>) -> ModelError {
    let err = ModelError::malformed(reason);
    warn!(%err, "rejecting model document");
    err
}

impl Model {
    pub fn to_document(&self) -> ModelDocument {
        ModelDocument {
            tree: self.node_document(self.root()),
            registry: self.registry.iter().cloned().collect(),
            graph: GraphDocument {
                edges: self
                    .graph
                    .edges()
                    .map(|(a, b, payload)| EdgeDocument {
                        a,
                        b,
                        interface: payload.interface.clone(),
                        interfaces: payload.interfaces.clone(),
                    })
                    .collect(),
            },
        }
    }

    fn node_document(&self, node: NodeId) -> NodeDocument {
        match self.tree.node(node).map(|n| &n.kind) {
            Some(NodeKind::Leaf { element, .. }) => NodeDocument::Leaf {
                element_identity: *element,
            },
            Some(NodeKind::Group { name, attributes }) => NodeDocument::Group {
                name: name.clone(),
                attributes: attributes.clone(),
                children: self
                    .tree
                    .children(node)
                    .iter()
                    .map(|&c| self.node_document(c))
                    .collect(),
            },
            None => NodeDocument::Group {
                name: NodeName::Text(String::new()),
                attributes: Attributes::new(),
                children: Vec::new(),
            },
        }
    }

    pub fn from_document(doc: ModelDocument) -> Result<Model, ModelError> {
        Self::from_document_with(doc, TreeOptions::default())
    }

    /// Rebuild a model, keeping the sibling order stored in the document.
    #[instrument(skip(doc), fields(elements = doc.registry.len(), edges = doc.graph.edges.len()))]
    pub fn from_document_with(doc: ModelDocument, options: TreeOptions) -> Result<Model, ModelError> {
        let NodeDocument::Group {
            name,
            attributes,
            children,
        } = doc.tree
        else {
            return Err(reject("tree root must be a group"));
        };

        let mut seen = HashSet::new();
        for e in &doc.registry {
            if !seen.insert(e.id()) {
                return Err(reject(format!("element {} listed twice in registry", e.id())));
            }
        }
        for edge in &doc.graph.edges {
            for end in [edge.a, edge.b] {
                if !seen.contains(&end) {
                    return Err(reject(format!("edge endpoint {end} is not in the registry")));
                }
            }
            if edge.a == edge.b {
                return Err(reject(format!("edge from {} to itself", edge.a)));
            }
        }

        let mut model = Model {
            tree: ElementTree::new(name, options),
            ..Model::new()
        };
        if let Some(root) = model.tree.node_mut(model.tree.root()) {
            if let NodeKind::Group { attributes: a, .. } = &mut root.kind {
                *a = attributes;
            }
        }
        for element in doc.registry {
            model.register(element);
        }
        let root = model.root();
        for child in children {
            model.rebuild_node(root, child)?;
        }
        for edge in doc.graph.edges {
            let payload = Interaction {
                interface: edge.interface,
                interfaces: edge.interfaces,
            };
            model.graph.add_edge(edge.a, edge.b, Some(payload));
        }
        Ok(model)
    }

    fn rebuild_node(&mut self, parent: NodeId, doc: NodeDocument) -> Result<(), ModelError> {
        match doc {
            NodeDocument::Leaf { element_identity } => {
                let name = self
                    .registry
                    .get(element_identity)
                    .map(|e| e.name.clone())
                    .ok_or_else(|| reject(format!("leaf references unknown element {element_identity}")))?;
                self.tree.push_child(
                    parent,
                    NodeKind::Leaf {
                        element: element_identity,
                        name,
                    },
                );
            }
            NodeDocument::Group {
                name,
                attributes,
                children,
            } => {
                let group = self.tree.push_child(parent, NodeKind::Group { name, attributes });
                for child in children {
                    self.rebuild_node(group, child)?;
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_document())
    }

    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_document())
    }

    /// Parse and validate. Any parse failure, including an unknown geometry
    /// type, is reported as `Malformed`.
    pub fn from_json(json: &str) -> Result<Model, ModelError> {
        let doc: ModelDocument = serde_json::from_str(json).map_err(|e| reject(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Model, ModelError> {
        let doc: ModelDocument = serde_json::from_value(value).map_err(|e| reject(e.to_string()))?;
        Self::from_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_geometry::{Frame, Point3d};
    use serde_json::json;

    fn sample() -> (Model, ElementId, ElementId) {
        let mut m = Model::new();
        let g = m.add_group("blocks").unwrap();
        m.set_group_attribute(g, "material", json!("stone")).unwrap();
        let a = m
            .add_element_under(g, Element::from_box("BLOCK", Frame::world(), 1.0, 1.0, 1.0).unwrap())
            .unwrap();
        let b = m
            .add_element_under(
                g,
                Element::from_box("BLOCK", Frame::world_at(Point3d::new(1.0, 0.0, 0.0)), 1.0, 1.0, 1.0).unwrap(),
            )
            .unwrap();
        m.insert_element(Element::from_point("LOOSE", Point3d::new(5.0, 5.0, 5.0)));
        m.find_interactions(&crate::DiscoveryConfig::default());
        (m, a, b)
    }

    #[test]
    fn test_json_round_trip() {
        let (m, a, b) = sample();
        let json = m.to_json().unwrap();
        let back = Model::from_json(&json).unwrap();
        assert_eq!(back.tree_string(), m.tree_string());
        assert_eq!(back.element_count(), 3);
        assert_eq!(back.get_interactions(), m.get_interactions());
        let area = |model: &Model| model.interfaces_of(a, b).iter().map(|i| i.area).sum::<f64>();
        approx::assert_abs_diff_eq!(area(&back), area(&m), epsilon = 1e-9);
        assert!(area(&m) > 0.9);
        let ids: Vec<ElementId> = back.elements().map(|e| e.id()).collect();
        let expected: Vec<ElementId> = m.elements().map(|e| e.id()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_document_shape() {
        let (m, _, _) = sample();
        let v = m.to_json_value().unwrap();
        assert_eq!(v["tree"]["kind"], "group");
        assert_eq!(v["tree"]["name"], "model");
        assert_eq!(v["tree"]["children"][0]["attributes"]["material"], "stone");
        assert_eq!(v["tree"]["children"][0]["children"][0]["kind"], "leaf");
        assert!(v["registry"][0]["identity"].is_string());
        assert_eq!(v["graph"]["edges"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_leaf_is_malformed() {
        let (m, _, _) = sample();
        let mut v = m.to_json_value().unwrap();
        v["tree"]["children"][0]["children"][0]["element_identity"] = json!(ElementId::new().to_string());
        assert!(matches!(Model::from_json_value(v), Err(ModelError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_edge_endpoint_is_malformed() {
        let (m, _, _) = sample();
        let mut v = m.to_json_value().unwrap();
        v["graph"]["edges"][0]["b"] = json!(ElementId::new().to_string());
        assert!(matches!(Model::from_json_value(v), Err(ModelError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_geometry_variant_is_malformed() {
        let (m, _, _) = sample();
        let mut v = m.to_json_value().unwrap();
        v["registry"][0]["geometry_simplified"] = json!({ "type": "Nurbs", "degree": 3 });
        assert!(matches!(Model::from_json_value(v), Err(ModelError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (m, _, _) = sample();
        let mut v = m.to_json_value().unwrap();
        v["comment"] = json!("written by hand");
        v["tree"]["colour"] = json!("red");
        assert!(Model::from_json_value(v).is_ok());
    }
}
