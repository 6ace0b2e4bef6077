//! Cytoscape.js JSON renderer.
//!
//! One element record per node; nesting is expressed through a `parent`
//! field instead of nested containers. One element record per relation
//! with `source`, `target` and an optional `label`.
use serde_json::{json, Value};

use crate::mesh::{Mesh, NodeId};
use crate::render::{edge_label, resolved_relations, walk, TreeVisitor};

#[derive(Debug, Default)]
pub struct CytoscapeRenderer;

struct ElementCollector {
    elements: Vec<Value>,
}

impl TreeVisitor for ElementCollector {
    fn visit_start(&mut self, mesh: &Mesh, node: NodeId) {
        let n = mesh.node(node);
        let mut data = json!({ "id": n.id, "label": n.name });
        if let Some(parent) = n.parent {
            data["parent"] = json!(mesh.node(parent).id);
        }
        self.elements.push(json!({ "data": data }));
    }

    fn visit_end(&mut self, _mesh: &Mesh, _node: NodeId) {}
}

impl CytoscapeRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the mesh as a Cytoscape elements document.
    #[must_use]
    pub fn render(&self, mesh: &Mesh) -> String {
        let mut collector = ElementCollector { elements: Vec::new() };
        walk(mesh, &mut collector);

        for rel in resolved_relations(mesh) {
            let Some(target) = rel.target else { continue };
            let mut data = json!({
                "id": format!("{}.{}", mesh.node(rel.owner).id, rel.id),
                "source": mesh.node(rel.owner).id,
                "target": mesh.node(target).id,
            });
            if let Some(label) = edge_label(mesh, &rel) {
                data["label"] = json!(label);
            }
            collector.elements.push(json!({ "data": data }));
        }

        serde_json::to_string_pretty(&json!({ "elements": collector.elements }))
            .unwrap_or_default()
    }
}
