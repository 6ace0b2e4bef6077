//! Mesh model and builder for the crate.
//!
//! This module defines the core data structures for a relation mesh
//! (`Mesh`, `Node`, `Relation`) and the path-based builder used to grow
//! the tree. Nodes live in an arena owned by the `Mesh` and are addressed
//! by stable `NodeId` handles; parent/child links and relation targets
//! reference handles, never direct pointers.
//!
//! You typically construct a mesh via `crate::parser::DefinitionParser`
//! and then pass it to `crate::projection` and `crate::render`.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod resolver;

/// Stable handle into a `Mesh` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A directed, named edge owned by a node.
///
/// `target_id` holds the textual id from the definition; `target` is bound
/// exactly once by `resolver::resolve_all` and stays absent when the id is
/// unknown to the owning mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub id: String,
    pub name: String,
    pub owner: NodeId,
    pub target_id: String,
    pub target: Option<NodeId>,
}

/// Ordered tree entity: identity, display fields, structure and relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Declared id, unique across the whole owning mesh.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Synthetic grouping node produced from an array-valued definition key.
    pub is_list: bool,
    /// Rendering hint: emit this node as a subgraph/cluster block.
    pub is_subgraph: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Insertion-ordered relation set keyed by relation id; inserting a
    /// duplicate id replaces the prior relation in place.
    pub relations: Vec<Relation>,
    /// Opaque payload carried through from the definition.
    pub user_data: Option<serde_json::Value>,
}

/// Identity fields for a node about to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_list: bool,
    pub is_subgraph: bool,
    pub user_data: Option<serde_json::Value>,
}

impl NodeSpec {
    /// Minimal spec with `name` defaulting to the id.
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        Self { id: id.to_string(), name: id.to_string(), ..Default::default() }
    }
}

/// Relation target known at insertion time: a textual id to be resolved
/// later, or a handle that is already resolved.
#[derive(Debug, Clone)]
pub enum RelationTarget {
    Id(String),
    Node(NodeId),
}

/// Registry owning the node arena, the ordered root list and the flat
/// id -> handle cache used for `find` and relation resolution.
///
/// Roots are the children of a conceptual super-root that is never
/// materialized; a root node has depth 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    cache: HashMap<String, NodeId>,
}

impl Mesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// O(1) lookup of a node by its declared id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.cache.get(id).copied()
    }

    /// Register a new root node and seed the cache with it.
    pub fn add_root(&mut self, spec: NodeSpec) -> NodeId {
        self.insert(None, spec)
    }

    /// Structurally append a child under `parent` and register it in the cache.
    pub fn add_node(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        self.insert(Some(parent), spec)
    }

    fn insert(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        let node = Node {
            id: spec.id,
            name: spec.name,
            description: spec.description,
            is_list: spec.is_list,
            is_subgraph: spec.is_subgraph,
            parent,
            children: Vec::new(),
            relations: Vec::new(),
            user_data: spec.user_data,
        };
        // First registration wins; a duplicate declared id would make
        // relation resolution ambiguous.
        if let Some(prior) = self.cache.get(&node.id) {
            log::warn!("duplicate node id '{}' (keeping handle {:?})", node.id, prior);
        } else {
            self.cache.insert(node.id.clone(), id);
        }
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Store a relation on `owner`, keyed by `rel_id`.
    ///
    /// A `RelationTarget::Node` is stored already resolved; a
    /// `RelationTarget::Id` stays unresolved until `resolver::resolve_all`
    /// runs. Inserting with a duplicate `rel_id` replaces the prior
    /// relation in place, preserving its position.
    pub fn add_relation(&mut self, owner: NodeId, rel_id: &str, name: &str, target: RelationTarget) {
        let (target_id, resolved) = match target {
            RelationTarget::Id(id) => (id, None),
            RelationTarget::Node(n) => (self.nodes[n.0].id.clone(), Some(n)),
        };
        let rel = Relation {
            id: rel_id.to_string(),
            name: name.to_string(),
            owner,
            target_id,
            target: resolved,
        };
        let relations = &mut self.nodes[owner.0].relations;
        match relations.iter_mut().find(|r| r.id == rel_id) {
            Some(slot) => *slot = rel,
            None => relations.push(rel),
        }
    }

    /// Walk or extend the tree along `path`, reusing shared prefixes.
    ///
    /// For each segment, the current node's children (or the root list) are
    /// searched for a node whose declared id equals the segment; missing
    /// nodes are produced by `create(parent, segment)` and appended in
    /// insertion order. Returns the node reached at the final segment.
    ///
    /// Calling this twice with the same path never creates duplicate
    /// siblings, which makes it usable both for definition-time
    /// construction and for assembling condensed projection trees.
    ///
    /// # Errors
    /// `MeshError::EmptyPath` for an empty path; `MeshError::Construction`
    /// when the creator yields no node for a missing segment.
    pub fn add_node_using_creator<F>(
        &mut self,
        path: &[&str],
        mut create: F,
    ) -> Result<NodeId, crate::errors::MeshError>
    where
        F: FnMut(Option<&Node>, &str) -> Option<NodeSpec>,
    {
        if path.is_empty() {
            return Err(crate::errors::MeshError::EmptyPath);
        }
        let mut current: Option<NodeId> = None;
        for segment in path {
            let siblings = match current {
                Some(n) => self.nodes[n.0].children.as_slice(),
                None => self.roots.as_slice(),
            };
            let found = siblings.iter().copied().find(|c| self.nodes[c.0].id == *segment);
            let next = match found {
                Some(existing) => existing,
                None => {
                    let spec = create(current.map(|c| &self.nodes[c.0]), segment).ok_or_else(
                        || crate::errors::MeshError::Construction {
                            path: path.join("/"),
                            segment: (*segment).to_string(),
                        },
                    )?;
                    match current {
                        Some(p) => self.add_node(p, spec),
                        None => self.add_root(spec),
                    }
                }
            };
            current = Some(next);
        }
        // Loop ran at least once, so current is set.
        current.ok_or(crate::errors::MeshError::EmptyPath)
    }

    /// Preorder traversal over all roots in insertion order.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            for c in self.nodes[n.0].children.iter().rev() {
                stack.push(*c);
            }
        }
        out
    }

    /// Chain of handles from the root down to `node`, inclusive.
    #[must_use]
    pub fn path_to_root(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut cur = node;
        while let Some(p) = self.nodes[cur.0].parent {
            chain.push(p);
            cur = p;
        }
        chain.reverse();
        chain
    }

    /// Depth of `node`, with roots at depth 1.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> usize {
        self.path_to_root(node).len()
    }
}
