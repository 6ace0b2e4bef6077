//! Sigma.js JSON renderer.
//!
//! Flat node list with layout coordinates in [0, 1000) plus a flat edge
//! list. Coordinates come from a generator seeded from the tree's node
//! ids, so rendering the same tree twice is byte-identical.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::mesh::{Mesh, NodeId};
use crate::render::{edge_label, resolved_relations, walk, TreeVisitor};

#[derive(Debug, Default)]
pub struct SigmaRenderer;

struct NodeCollector {
    nodes: Vec<NodeId>,
}

impl TreeVisitor for NodeCollector {
    fn visit_start(&mut self, _mesh: &Mesh, node: NodeId) {
        self.nodes.push(node);
    }

    fn visit_end(&mut self, _mesh: &Mesh, _node: NodeId) {}
}

fn layout_seed(mesh: &Mesh, nodes: &[NodeId]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for &n in nodes {
        mesh.node(n).id.hash(&mut hasher);
    }
    hasher.finish()
}

impl SigmaRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the mesh as a Sigma graph document.
    #[must_use]
    pub fn render(&self, mesh: &Mesh) -> String {
        let mut collector = NodeCollector { nodes: Vec::new() };
        walk(mesh, &mut collector);

        let mut rng = StdRng::seed_from_u64(layout_seed(mesh, &collector.nodes));
        let nodes: Vec<Value> = collector
            .nodes
            .iter()
            .map(|&n| {
                let node = mesh.node(n);
                let x: f64 = rng.gen_range(0.0..1000.0);
                let y: f64 = rng.gen_range(0.0..1000.0);
                json!({ "id": node.id, "label": node.name, "x": x, "y": y, "size": 1 })
            })
            .collect();

        let edges: Vec<Value> = resolved_relations(mesh)
            .into_iter()
            .filter_map(|rel| {
                let target = rel.target?;
                let mut edge = json!({
                    "id": format!("{}.{}", mesh.node(rel.owner).id, rel.id),
                    "source": mesh.node(rel.owner).id,
                    "target": mesh.node(target).id,
                    "type": "arrow",
                });
                if let Some(label) = edge_label(mesh, &rel) {
                    edge["label"] = json!(label);
                }
                Some(edge)
            })
            .collect();

        serde_json::to_string_pretty(&json!({ "nodes": nodes, "edges": edges }))
            .unwrap_or_default()
    }
}
