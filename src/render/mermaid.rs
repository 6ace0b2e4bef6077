//! Mermaid flowchart renderer.
//!
//! Containers become `subgraph ... end` blocks. Mermaid forbids edge
//! statements that straddle block boundaries, so every edge is buffered
//! and appended after all blocks have closed.
use std::fmt::Write as _;

use crate::mesh::{Mesh, NodeId};
use crate::render::{edge_label, is_container, resolved_relations, sanitize_id, walk, TreeVisitor};

#[derive(Debug, Default)]
pub struct MermaidRenderer;

struct MermaidVisitor {
    out: String,
    depth: usize,
}

impl MermaidVisitor {
    fn indent(&self) -> String {
        "  ".repeat(self.depth + 1)
    }
}

impl TreeVisitor for MermaidVisitor {
    fn visit_start(&mut self, mesh: &Mesh, node: NodeId) {
        let n = mesh.node(node);
        let indent = self.indent();
        let sid = sanitize_id(&n.id);
        if is_container(mesh, node) {
            let _ = writeln!(self.out, "{indent}subgraph {sid}[\"{}\"]", n.name);
            self.depth += 1;
        } else {
            let _ = writeln!(self.out, "{indent}{sid}[\"{}\"]", n.name);
        }
    }

    fn visit_end(&mut self, mesh: &Mesh, node: NodeId) {
        if is_container(mesh, node) {
            self.depth -= 1;
            let _ = writeln!(self.out, "{}end", self.indent());
        }
    }
}

impl MermaidRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the mesh as a Mermaid flowchart.
    #[must_use]
    pub fn render(&self, mesh: &Mesh) -> String {
        let mut s = String::from("flowchart TD\n");
        let mut visitor = MermaidVisitor { out: String::new(), depth: 0 };
        walk(mesh, &mut visitor);
        s.push_str(&visitor.out);

        // Trailing edge buffer, outside every subgraph block
        for rel in resolved_relations(mesh) {
            let Some(target) = rel.target else { continue };
            let from = sanitize_id(&mesh.node(rel.owner).id);
            let to = sanitize_id(&mesh.node(target).id);
            match edge_label(mesh, &rel) {
                Some(label) => {
                    let _ = writeln!(s, "  {from}-->|{label}|{to}");
                }
                None => {
                    let _ = writeln!(s, "  {from}-->{to}");
                }
            }
        }
        s
    }
}
