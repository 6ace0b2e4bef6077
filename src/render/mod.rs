//! Renderers for source and condensed meshes.
//!
//! All five output formats share one traversal contract (`TreeVisitor` +
//! `walk`): `visit_start` before a node's children, `visit_end` after
//! them, and `do_break` to prune a subtree. Renderers are pure functions
//! of the mesh they are given; they never mutate it and accumulate into a
//! private buffer returned at the end.
use crate::mesh::{resolver, Mesh, NodeId, Relation};

pub mod cytoscape;
pub mod graphviz;
pub mod mermaid;
pub mod sigma;
pub mod springy;

/// Traversal contract shared by every renderer.
pub trait TreeVisitor {
    fn visit_start(&mut self, mesh: &Mesh, node: NodeId);
    fn visit_end(&mut self, mesh: &Mesh, node: NodeId);
    /// Return true to skip the node's children; `visit_end` still runs.
    fn do_break(&mut self, _mesh: &Mesh, _node: NodeId) -> bool {
        false
    }
}

/// Depth-first walk over all roots in insertion order.
pub fn walk<V: TreeVisitor + ?Sized>(mesh: &Mesh, visitor: &mut V) {
    for &root in mesh.roots() {
        walk_node(mesh, root, visitor);
    }
}

fn walk_node<V: TreeVisitor + ?Sized>(mesh: &Mesh, node: NodeId, visitor: &mut V) {
    visitor.visit_start(mesh, node);
    if !visitor.do_break(mesh, node) {
        for &child in &mesh.node(node).children {
            walk_node(mesh, child, visitor);
        }
    }
    visitor.visit_end(mesh, node);
}

/// Every relation in the whole tree whose target resolved, in preorder.
/// Relations with an absent target are omitted from every format.
#[must_use]
pub(crate) fn resolved_relations(mesh: &Mesh) -> Vec<Relation> {
    mesh.roots()
        .iter()
        .flat_map(|r| resolver::collect_relations(mesh, *r))
        .filter(|r| r.target.is_some())
        .collect()
}

/// Shared label rule: emit a label only if the relation's name is
/// non-empty and differs from the target node's declared id.
#[must_use]
pub(crate) fn edge_label<'a>(mesh: &'a Mesh, rel: &'a Relation) -> Option<&'a str> {
    if rel.name.is_empty() {
        return None;
    }
    let target = rel.target?;
    if mesh.node(target).id == rel.name {
        None
    } else {
        Some(&rel.name)
    }
}

/// Containers become subgraph/cluster blocks in the nesting formats.
#[must_use]
pub(crate) fn is_container(mesh: &Mesh, node: NodeId) -> bool {
    let n = mesh.node(node);
    n.is_subgraph || !n.children.is_empty()
}

pub(crate) fn sanitize_id(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect()
}

pub(crate) fn escape_label(s: &str) -> String {
    s.replace('"', "\\\"")
}
