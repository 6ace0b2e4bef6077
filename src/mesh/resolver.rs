//! Relation resolution pass.
//!
//! Resolution runs once, after the whole tree has been built: every node
//! that could be a relation target must already be registered in the mesh
//! cache. Re-running is harmless; already-bound targets are left alone.
use crate::mesh::{Mesh, NodeId, Relation};

/// Bind every unresolved relation target via the mesh cache.
///
/// Walks the tree depth-first from the roots. Lookups that miss are
/// logged and left absent; nothing downstream treats that as fatal
/// (renderers simply omit such edges). Returns the number of relations
/// that remain unresolved.
pub fn resolve_all(mesh: &mut Mesh) -> usize {
    let mut unresolved = 0usize;
    for node in mesh.preorder() {
        for idx in 0..mesh.node(node).relations.len() {
            if mesh.node(node).relations[idx].target.is_some() {
                continue;
            }
            let target_id = mesh.node(node).relations[idx].target_id.clone();
            match mesh.find(&target_id) {
                Some(target) => mesh.node_mut(node).relations[idx].target = Some(target),
                None => {
                    unresolved += 1;
                    log::warn!(
                        "unresolved relation '{}' on node '{}': no node with id '{}'",
                        mesh.node(node).relations[idx].id,
                        mesh.node(node).id,
                        target_id
                    );
                }
            }
        }
    }
    unresolved
}

/// Union of every relation owned by any node within the subtree rooted at
/// `subtree_root`, in preorder.
#[must_use]
pub fn collect_relations(mesh: &Mesh, subtree_root: NodeId) -> Vec<Relation> {
    let mut out = Vec::new();
    let mut stack = vec![subtree_root];
    while let Some(n) = stack.pop() {
        out.extend(mesh.node(n).relations.iter().cloned());
        for c in mesh.node(n).children.iter().rev() {
            stack.push(*c);
        }
    }
    out
}
