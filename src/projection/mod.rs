//! Level-based subsystem projection.
//!
//! Collapses a deep mesh to a chosen ancestor depth: relations between
//! deeply nested nodes are re-attributed to their level ancestors, and a
//! new, independent condensed mesh is assembled from shallow copies of
//! those ancestors. Iteration order is preorder/insertion order
//! throughout so that renderer output is reproducible across runs.
use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::errors::MeshError;
use crate::mesh::{resolver, Mesh, NodeId, NodeSpec, Relation, RelationTarget};

/// Externally supplied filter restricting which relations survive
/// projection. Empty means "no filter".
#[derive(Debug, Clone, Default)]
pub struct Selection {
    members: Vec<NodeId>,
}

impl Selection {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_nodes(members: Vec<NodeId>) -> Self {
        Self { members }
    }

    /// Resolve regex patterns over declared node ids into a selection,
    /// in preorder.
    ///
    /// # Errors
    /// `MeshError::Selection` when a pattern fails to compile.
    pub fn from_patterns(mesh: &Mesh, patterns: &[String]) -> Result<Self, MeshError> {
        let compiled: Vec<Regex> =
            patterns.iter().map(|p| Regex::new(p)).collect::<Result<_, _>>()?;
        let members = mesh
            .preorder()
            .into_iter()
            .filter(|n| compiled.iter().any(|re| re.is_match(&mesh.node(*n).id)))
            .collect();
        Ok(Self { members })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }
}

/// A relation re-attributed to a pair of base nodes in the source mesh.
#[derive(Debug, Clone)]
pub struct ProjectedRelation {
    pub from: NodeId,
    pub to: NodeId,
    pub relation: Relation,
}

/// Ancestor of `node` at depth `level` (roots have depth 1).
///
/// Walks the parent chain upward; level 0 yields the root, and a node
/// shallower than `level` is returned unchanged.
#[must_use]
pub fn ancestor_at_level(mesh: &Mesh, node: NodeId, level: usize) -> NodeId {
    let chain = mesh.path_to_root(node);
    let idx = level.saturating_sub(1);
    chain.get(idx).copied().unwrap_or(node)
}

/// Every relation owned within each base node's subtree, computed once
/// per base node for the duration of one projection call.
///
/// The map is call-scoped by design: allocate a fresh one per projection
/// request, never cache it across selections or levels.
#[must_use]
pub fn relations_for_base_set(mesh: &Mesh, base: &[NodeId]) -> HashMap<NodeId, Vec<Relation>> {
    let mut map = HashMap::with_capacity(base.len());
    for &node in base {
        map.entry(node).or_insert_with(|| resolver::collect_relations(mesh, node));
    }
    map
}

/// Base nodes for `level`: the distinct level ancestors of every node,
/// in preorder.
#[must_use]
pub fn base_set(mesh: &Mesh, level: usize) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for node in mesh.preorder() {
        let ancestor = ancestor_at_level(mesh, node, level);
        if seen.insert(ancestor) {
            out.push(ancestor);
        }
    }
    out
}

/// For every ordered pair of distinct base nodes `(from, to)`, every
/// relation in `from`'s subtree whose resolved target has `to` as its
/// level ancestor.
///
/// Duplicates are not suppressed: a relation is emitted once per matching
/// pair, so parallel edges between the same pair of base nodes survive.
/// Callers relying on set semantics must dedupe themselves.
#[must_use]
pub fn eval_relations(mesh: &Mesh, level: usize) -> Vec<ProjectedRelation> {
    let base = base_set(mesh, level);
    let owned = relations_for_base_set(mesh, &base);
    let mut out = Vec::new();
    for &from in &base {
        for &to in &base {
            if from == to {
                continue;
            }
            for rel in &owned[&from] {
                let Some(target) = rel.target else { continue };
                if ancestor_at_level(mesh, target, level) == to {
                    out.push(ProjectedRelation { from, to, relation: rel.clone() });
                }
            }
        }
    }
    out
}

/// True when `selection` is empty, or when either endpoint equals a
/// selected node or has one as an ancestor.
#[must_use]
pub fn is_in_selection_range(
    mesh: &Mesh,
    selection: &Selection,
    from: NodeId,
    to: NodeId,
) -> bool {
    if selection.is_empty() {
        return true;
    }
    in_range(mesh, selection, from) || in_range(mesh, selection, to)
}

fn in_range(mesh: &Mesh, selection: &Selection, node: NodeId) -> bool {
    mesh.path_to_root(node).into_iter().any(|n| selection.contains(n))
}

/// Assemble the condensed subsystem mesh for `level`.
///
/// Every surviving relation contributes the id-paths of its two level
/// ancestors, copied into the output mesh through the shared builder so
/// that ancestors of multiple relations appear exactly once. Copies carry
/// identity fields only (id, name, description, subgraph hint); the
/// subgraph hint is set whenever the source ancestor is a container, so
/// renderers still emit cluster blocks for collapsed subsystems.
///
/// The result is fully independent of the source mesh: new nodes, new
/// relations, already resolved.
///
/// # Errors
/// Propagates builder construction errors.
pub fn create_system_tree(
    mesh: &Mesh,
    level: usize,
    selection: &Selection,
) -> Result<Mesh, MeshError> {
    let mut out = Mesh::new();
    for projected in eval_relations(mesh, level) {
        let owner = projected.relation.owner;
        let Some(target) = projected.relation.target else { continue };
        if !is_in_selection_range(mesh, selection, owner, target) {
            continue;
        }
        let from_copy = copy_ancestor_path(mesh, &mut out, projected.from)?;
        let to_copy = copy_ancestor_path(mesh, &mut out, projected.to)?;
        // Owner id + relation id is unique mesh-wide, so replace-by-id on
        // the copy never merges distinct source relations.
        let rel_id = format!("{}.{}", mesh.node(owner).id, projected.relation.id);
        out.add_relation(from_copy, &rel_id, &projected.relation.name, RelationTarget::Node(to_copy));
    }
    Ok(out)
}

/// Create-or-reuse a structural copy of `ancestor`'s id-path in `out`.
fn copy_ancestor_path(mesh: &Mesh, out: &mut Mesh, ancestor: NodeId) -> Result<NodeId, MeshError> {
    let chain = mesh.path_to_root(ancestor);
    let ids: Vec<&str> = chain.iter().map(|n| mesh.node(*n).id.as_str()).collect();
    out.add_node_using_creator(&ids, |_parent, segment| {
        // Ids are unique along the chain, so the segment identifies the
        // source node to copy.
        let source = chain.iter().map(|n| mesh.node(*n)).find(|n| n.id == segment)?;
        Some(NodeSpec {
            id: source.id.clone(),
            name: source.name.clone(),
            description: source.description.clone(),
            is_list: false,
            is_subgraph: source.is_subgraph || !source.children.is_empty(),
            user_data: None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Node;

    fn creator(_: Option<&Node>, seg: &str) -> Option<NodeSpec> {
        Some(NodeSpec::with_id(seg))
    }

    /// a -> a1 -> a2, b -> b1, relation a2 -"uses"-> b1.
    fn deep_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        let a2 = mesh.add_node_using_creator(&["a", "a1", "a2"], creator).unwrap();
        mesh.add_node_using_creator(&["b", "b1"], creator).unwrap();
        mesh.add_relation(a2, "r1", "uses", RelationTarget::Id("b1".into()));
        resolver::resolve_all(&mut mesh);
        mesh
    }

    #[test]
    fn ancestor_walks_to_requested_depth() {
        let mesh = deep_mesh();
        let a = mesh.find("a").unwrap();
        let a1 = mesh.find("a1").unwrap();
        let a2 = mesh.find("a2").unwrap();

        assert_eq!(ancestor_at_level(&mesh, a2, 1), a);
        assert_eq!(ancestor_at_level(&mesh, a2, 2), a1);
        assert_eq!(ancestor_at_level(&mesh, a2, 3), a2);
        // Tree shallower than level: node itself
        assert_eq!(ancestor_at_level(&mesh, a2, 9), a2);
        // Level 0 stops at the root
        assert_eq!(ancestor_at_level(&mesh, a2, 0), a);
    }

    #[test]
    fn level_projection_condenses_to_top_level() {
        let mesh = deep_mesh();
        let condensed = create_system_tree(&mesh, 1, &Selection::empty()).unwrap();

        // Exactly two top-level nodes, a and b, regardless of source depth
        assert_eq!(condensed.roots().len(), 2);
        let ids: Vec<_> =
            condensed.roots().iter().map(|r| condensed.node(*r).id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        // Exactly one relation, re-attributed a -> b and already resolved
        let a = condensed.find("a").unwrap();
        let b = condensed.find("b").unwrap();
        let rels = &condensed.node(a).relations;
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].name, "uses");
        assert_eq!(rels[0].target, Some(b));
        assert!(condensed.node(b).relations.is_empty());
    }

    #[test]
    fn condensed_tree_is_independent_shallow_copy() {
        let mesh = deep_mesh();
        let condensed = create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
        let a = condensed.find("a").unwrap();
        // Identity copy only: no children carried over, container hint set
        assert!(condensed.node(a).children.is_empty());
        assert!(condensed.node(a).is_subgraph);
        assert_eq!(condensed.len(), 2);
    }

    #[test]
    fn selection_filters_unrelated_branches() {
        let mut mesh = Mesh::new();
        let a1 = mesh.add_node_using_creator(&["a", "a1"], creator).unwrap();
        mesh.add_node_using_creator(&["b", "b1"], creator).unwrap();
        let c1 = mesh.add_node_using_creator(&["c", "c1"], creator).unwrap();
        mesh.add_relation(a1, "r1", "hits", RelationTarget::Id("b1".into()));
        mesh.add_relation(c1, "r2", "skips", RelationTarget::Id("b1".into()));
        resolver::resolve_all(&mut mesh);

        // Select branch a only: the c1 -> b1 relation has no endpoint in a
        let selection = Selection::from_nodes(vec![mesh.find("a").unwrap()]);
        let condensed = create_system_tree(&mesh, 1, &selection).unwrap();

        let ids: Vec<_> =
            condensed.preorder().iter().map(|n| condensed.node(*n).id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let a = condensed.find("a").unwrap();
        assert_eq!(condensed.node(a).relations.len(), 1);
        assert_eq!(condensed.node(a).relations[0].name, "hits");
    }

    #[test]
    fn selection_by_pattern_matches_ids() {
        let mesh = deep_mesh();
        let selection = Selection::from_patterns(&mesh, &["^a$".to_string()]).unwrap();
        assert!(!selection.is_empty());
        assert!(selection.contains(mesh.find("a").unwrap()));
        assert!(!selection.contains(mesh.find("b").unwrap()));

        assert!(Selection::from_patterns(&mesh, &["[".to_string()]).is_err());
    }

    #[test]
    fn parallel_relations_are_not_deduplicated() {
        let mut mesh = Mesh::new();
        let a1 = mesh.add_node_using_creator(&["a", "a1"], creator).unwrap();
        let a2 = mesh.add_node_using_creator(&["a", "a2"], creator).unwrap();
        mesh.add_node_using_creator(&["b", "b1"], creator).unwrap();
        mesh.add_relation(a1, "r1", "first", RelationTarget::Id("b1".into()));
        mesh.add_relation(a2, "r1", "second", RelationTarget::Id("b1".into()));
        resolver::resolve_all(&mut mesh);

        let condensed = create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
        let a = condensed.find("a").unwrap();
        // Both a1.r1 and a2.r1 survive as parallel a -> b edges
        let names: Vec<_> =
            condensed.node(a).relations.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn unresolved_relations_never_project() {
        let mut mesh = Mesh::new();
        let a1 = mesh.add_node_using_creator(&["a", "a1"], creator).unwrap();
        mesh.add_node_using_creator(&["b", "b1"], creator).unwrap();
        mesh.add_relation(a1, "r1", "ghost", RelationTarget::Id("gone".into()));
        resolver::resolve_all(&mut mesh);

        let condensed = create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
        assert!(condensed.is_empty());
    }

    #[test]
    fn memo_map_is_fresh_per_call() {
        let mesh = deep_mesh();
        let base = base_set(&mesh, 1);
        let first = relations_for_base_set(&mesh, &base);
        let second = relations_for_base_set(&mesh, &base);
        let a = mesh.find("a").unwrap();
        assert_eq!(first[&a].len(), second[&a].len());
    }
}
