//! Graphviz/DOT renderer.
//!
//! Containers become `subgraph cluster_<id>` blocks; leaves become node
//! statements. All edges are emitted after the traversal, with
//! `ltail`/`lhead` cluster hints when an endpoint is a container (the
//! graph is marked `compound=true` so Graphviz honors them).
use std::fmt::Write as _;

use crate::mesh::{Mesh, NodeId};
use crate::render::{edge_label, escape_label, is_container, resolved_relations, sanitize_id, walk, TreeVisitor};

#[derive(Debug, Clone, Copy)]
pub enum RankDir {
    LR,
    TB,
}

#[derive(Debug, Clone, Copy)]
pub enum EdgeStyle {
    Curved,
    Ortho,
    Polyline,
}

#[derive(Debug, Clone, Copy)]
pub struct DotOptions {
    pub rankdir: RankDir,
    pub splines: EdgeStyle,
    pub rounded: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self { rankdir: RankDir::LR, splines: EdgeStyle::Curved, rounded: true }
    }
}

#[derive(Debug, Default)]
pub struct DotRenderer {
    opts: DotOptions,
}

struct DotVisitor {
    out: String,
    depth: usize,
}

impl DotVisitor {
    fn indent(&self) -> String {
        "  ".repeat(self.depth + 1)
    }
}

impl TreeVisitor for DotVisitor {
    fn visit_start(&mut self, mesh: &Mesh, node: NodeId) {
        let n = mesh.node(node);
        let indent = self.indent();
        if is_container(mesh, node) {
            let cluster = format!("cluster_{}", sanitize_id(&n.id));
            let _ = write!(
                self.out,
                "{indent}subgraph \"{cluster}\" {{\n{indent}  label=\"{}\";\n",
                escape_label(&n.name)
            );
            self.depth += 1;
        } else {
            let _ = writeln!(
                self.out,
                "{indent}\"{}\" [label=\"{}\"];",
                escape_label(&n.id),
                escape_label(&n.name)
            );
        }
    }

    fn visit_end(&mut self, mesh: &Mesh, node: NodeId) {
        if is_container(mesh, node) {
            self.depth -= 1;
            let _ = writeln!(self.out, "{}}}", self.indent());
        }
    }
}

impl DotRenderer {
    #[must_use]
    pub fn new(opts: DotOptions) -> Self {
        Self { opts }
    }

    /// Serialize the mesh as a DOT digraph.
    #[must_use]
    pub fn render(&self, mesh: &Mesh) -> String {
        let mut s = String::new();
        s.push_str("digraph Mesh\n{\n");
        let rank = match self.opts.rankdir {
            RankDir::LR => "LR",
            RankDir::TB => "TB",
        };
        let splines = match self.opts.splines {
            EdgeStyle::Curved => "curved",
            EdgeStyle::Ortho => "ortho",
            EdgeStyle::Polyline => "polyline",
        };
        let node_style = if self.opts.rounded { "filled,rounded" } else { "filled" };
        let _ = write!(
            s,
            "  compound=true;\n  rankdir={rank};\n  graph [fontname=Helvetica, splines={splines}];\n  node [shape=box, fontsize=10, style={node_style}];\n  edge [fontname=Helvetica, fontsize=9];\n"
        );

        let mut visitor = DotVisitor { out: String::new(), depth: 0 };
        walk(mesh, &mut visitor);
        s.push_str(&visitor.out);

        for rel in resolved_relations(mesh) {
            let Some(target) = rel.target else { continue };
            let from = mesh.node(rel.owner);
            let to = mesh.node(target);
            let mut attrs: Vec<String> = Vec::new();
            if let Some(label) = edge_label(mesh, &rel) {
                attrs.push(format!("label=\"{}\"", escape_label(label)));
            }
            if is_container(mesh, rel.owner) {
                attrs.push(format!("ltail=\"cluster_{}\"", sanitize_id(&from.id)));
            }
            if is_container(mesh, target) {
                attrs.push(format!("lhead=\"cluster_{}\"", sanitize_id(&to.id)));
            }
            if attrs.is_empty() {
                let _ = writeln!(s, "  \"{}\" -> \"{}\";", escape_label(&from.id), escape_label(&to.id));
            } else {
                let _ = writeln!(
                    s,
                    "  \"{}\" -> \"{}\" [{}];",
                    escape_label(&from.id),
                    escape_label(&to.id),
                    attrs.join(", ")
                );
            }
        }

        s.push_str("}\n");
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{resolver, Node, NodeSpec, RelationTarget};
    use crate::projection::{self, Selection};

    fn creator(_: Option<&Node>, seg: &str) -> Option<NodeSpec> {
        Some(NodeSpec::with_id(seg))
    }

    fn source_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        let a1 = mesh.add_node_using_creator(&["a", "a1"], creator).unwrap();
        mesh.add_node_using_creator(&["b", "b1"], creator).unwrap();
        mesh.add_relation(a1, "r1", "uses", RelationTarget::Id("b1".into()));
        resolver::resolve_all(&mut mesh);
        mesh
    }

    #[test]
    fn condensed_edge_carries_cluster_hints() {
        let mesh = source_mesh();
        let condensed = projection::create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
        let dot = DotRenderer::default().render(&condensed);

        assert!(dot.contains("digraph Mesh"));
        assert!(dot.contains("compound=true;"));
        // a and b had children in the source, so both endpoints are clusters
        assert!(dot.contains("subgraph \"cluster_a\""));
        assert!(dot.contains("subgraph \"cluster_b\""));
        assert!(dot.contains("\"a\" -> \"b\" [label=\"uses\", ltail=\"cluster_a\", lhead=\"cluster_b\"];"));
    }

    #[test]
    fn source_tree_renders_leaves_and_nested_clusters() {
        let mesh = source_mesh();
        let dot = DotRenderer::default().render(&mesh);

        assert!(dot.contains("subgraph \"cluster_a\""));
        assert!(dot.contains("\"a1\" [label=\"a1\"];"));
        assert!(dot.contains("\"a1\" -> \"b1\" [label=\"uses\"];"));
        // a1 and b1 are leaves, no cluster hints on the edge
        assert!(!dot.contains("ltail"));
    }

    #[test]
    fn options_are_reflected_in_the_header() {
        let mesh = source_mesh();
        let opts =
            DotOptions { rankdir: RankDir::TB, splines: EdgeStyle::Polyline, rounded: false };
        let dot = DotRenderer::new(opts).render(&mesh);
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("splines=polyline"));
        assert!(dot.contains("style=filled]"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mesh = source_mesh();
        let renderer = DotRenderer::default();
        assert_eq!(renderer.render(&mesh), renderer.render(&mesh));
    }

    #[test]
    fn dangling_relation_is_omitted() {
        let mut mesh = source_mesh();
        let b1 = mesh.find("b1").unwrap();
        mesh.add_relation(b1, "rx", "", RelationTarget::Id("nowhere".into()));
        resolver::resolve_all(&mut mesh);
        let dot = DotRenderer::default().render(&mesh);
        assert!(!dot.contains("nowhere"));
    }
}
