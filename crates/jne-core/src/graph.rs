// Node graph derived from a JSON document.
// - Every object becomes a node whose rows are its members.
// - Primitive array elements and a primitive root become bare-value nodes.
// - Arrays contribute no node: their elements hang off the nearest node above.
// Node ids are RFC 6901 pointers, so they double as stable selection keys
// across rebuilds as long as the structure above the node is unchanged.
use crate::error::{Error, Result};
use crate::node::{NodeSnapshot, fields_of};
use crate::path::{Path, PathSegment};
use crate::store::GraphStore;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct JsonGraph {
    nodes: Vec<NodeSnapshot>,
    edges: Vec<(String, String)>,
    selected: Option<String>,
}

impl JsonGraph {
    pub fn from_text(text: &str) -> Result<Self> {
        let mut graph = Self::default();
        graph.rebuild_from(text)?;
        Ok(graph)
    }

    pub fn nodes(&self) -> &[NodeSnapshot] {
        &self.nodes
    }

    /// Parent -> child pairs of node ids.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn selected(&self) -> Option<&NodeSnapshot> {
        self.selected.as_deref().and_then(|id| self.node(id))
    }

    fn walk(&mut self, value: &Value, path: &mut Path, parent: Option<&str>) {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    self.walk(item, path, parent);
                    path.pop();
                }
            }
            Value::Object(map) => {
                let node = NodeSnapshot::new(path.clone(), fields_of(value));
                let id = node.id.clone();
                self.push(node, parent);
                for (k, v) in map {
                    if v.is_array() || v.is_object() {
                        path.push(PathSegment::Key(k.clone()));
                        self.walk(v, path, Some(&id));
                        path.pop();
                    }
                }
            }
            primitive => {
                let node = NodeSnapshot::new(path.clone(), fields_of(primitive));
                self.push(node, parent);
            }
        }
    }

    fn push(&mut self, node: NodeSnapshot, parent: Option<&str>) {
        if let Some(parent) = parent {
            self.edges.push((parent.to_string(), node.id.clone()));
        }
        self.nodes.push(node);
    }
}

impl GraphStore for JsonGraph {
    fn rebuild_from(&mut self, text: &str) -> Result<()> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        self.nodes.clear();
        self.edges.clear();
        self.walk(&value, &mut Vec::new(), None);
        if self.selected.as_deref().is_some_and(|id| self.node(id).is_none()) {
            self.selected = None;
        }
        log::debug!("graph rebuilt: {} nodes, {} edges", self.nodes.len(), self.edges.len());
        Ok(())
    }

    fn list_nodes(&self) -> Vec<NodeSnapshot> {
        self.nodes.clone()
    }

    fn select_node(&mut self, node: &NodeSnapshot) {
        self.selected = Some(node.id.clone());
    }
}
