//! Springy.js JSON renderer.
//!
//! Flat id array plus `[from, to, {label}]` edge triples; the label
//! object is dropped entirely when the shared label rule yields nothing.
use serde_json::{json, Value};

use crate::mesh::{Mesh, NodeId};
use crate::render::{edge_label, resolved_relations, walk, TreeVisitor};

#[derive(Debug, Default)]
pub struct SpringyRenderer;

struct IdCollector {
    ids: Vec<Value>,
}

impl TreeVisitor for IdCollector {
    fn visit_start(&mut self, mesh: &Mesh, node: NodeId) {
        self.ids.push(json!(mesh.node(node).id));
    }

    fn visit_end(&mut self, _mesh: &Mesh, _node: NodeId) {}
}

impl SpringyRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the mesh as a Springy graph document.
    #[must_use]
    pub fn render(&self, mesh: &Mesh) -> String {
        let mut collector = IdCollector { ids: Vec::new() };
        walk(mesh, &mut collector);

        let edges: Vec<Value> = resolved_relations(mesh)
            .into_iter()
            .filter_map(|rel| {
                let target = rel.target?;
                let from = json!(mesh.node(rel.owner).id);
                let to = json!(mesh.node(target).id);
                let entry = match edge_label(mesh, &rel) {
                    Some(label) => vec![from, to, json!({ "label": label })],
                    None => vec![from, to],
                };
                Some(Value::Array(entry))
            })
            .collect();

        serde_json::to_string_pretty(&json!({ "nodes": collector.ids, "edges": edges }))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{resolver, Node, NodeSpec, RelationTarget};

    fn creator(_: Option<&Node>, seg: &str) -> Option<NodeSpec> {
        Some(NodeSpec::with_id(seg))
    }

    #[test]
    fn flat_ids_and_labeled_triples() {
        let mut mesh = Mesh::new();
        let a1 = mesh.add_node_using_creator(&["a", "a1"], creator).unwrap();
        mesh.add_node_using_creator(&["b"], creator).unwrap();
        mesh.add_relation(a1, "r1", "uses", RelationTarget::Id("b".into()));
        mesh.add_relation(a1, "r2", "", RelationTarget::Id("b".into()));
        resolver::resolve_all(&mut mesh);

        let text = SpringyRenderer::new().render(&mesh);
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["nodes"], json!(["a", "a1", "b"]));

        let edges = doc["edges"].as_array().unwrap();
        assert_eq!(edges[0], json!(["a1", "b", { "label": "uses" }]));
        // No label: two-element entry
        assert_eq!(edges[1], json!(["a1", "b"]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut mesh = Mesh::new();
        let a = mesh.add_node_using_creator(&["a"], creator).unwrap();
        mesh.add_node_using_creator(&["b"], creator).unwrap();
        mesh.add_relation(a, "r1", "uses", RelationTarget::Id("b".into()));
        resolver::resolve_all(&mut mesh);

        let renderer = SpringyRenderer::new();
        assert_eq!(renderer.render(&mesh), renderer.render(&mesh));
    }
}
