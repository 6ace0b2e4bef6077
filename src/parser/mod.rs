//! Definition parser.
//!
//! Consumes a generic nested JSON definition and grows a `Mesh` from it
//! through the path-based builder. Node fields are mapped by a pluggable
//! `NodeCreator`; every other object-valued key becomes a child node, an
//! array-valued key becomes a synthetic `is_list` grouping node, and
//! leftover scalar fields are kept as opaque `user_data`.
//!
//! Parsing is two-phase: the whole tree is built first, then relation
//! targets are bound in one resolver pass.
use serde_json::Value;
use std::path::Path;

use crate::errors::MeshError;
use crate::mesh::{resolver, Mesh, Node, NodeSpec, RelationTarget};

/// Definition fields consumed by the default creator; everything else is
/// either a child node or opaque payload.
const RESERVED_FIELDS: [&str; 6] = ["id", "name", "description", "isList", "isSubgraph", "relation"];

/// Maps one definition entry to the identity fields of a node.
pub trait NodeCreator {
    /// Produce the spec for the node declared under `key`.
    ///
    /// # Errors
    /// `MeshError::Definition` for malformed entries.
    fn create(&self, parent: Option<&Node>, key: &str, value: &Value) -> Result<NodeSpec, MeshError>;
}

/// Default field mapping: `id` (falls back to the key), `name` (falls
/// back to the id), `description`, `isList`, `isSubgraph`; unrecognized
/// scalar fields are preserved as `user_data`.
#[derive(Debug, Default)]
pub struct DefinitionCreator;

impl NodeCreator for DefinitionCreator {
    fn create(
        &self,
        _parent: Option<&Node>,
        key: &str,
        value: &Value,
    ) -> Result<NodeSpec, MeshError> {
        let obj = value.as_object().ok_or_else(|| {
            MeshError::Definition(format!("definition for '{key}' must be an object"))
        })?;
        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(MeshError::Definition(format!("field 'id' of '{key}' must be a string")))
            }
            None => key.to_string(),
        };
        let name = string_field(obj, "name", key)?.unwrap_or_else(|| id.clone());
        let description = string_field(obj, "description", key)?.unwrap_or_default();
        let is_list = bool_field(obj, "isList", key)?.unwrap_or(false);
        let is_subgraph = bool_field(obj, "isSubgraph", key)?.unwrap_or(false);

        let mut extra = serde_json::Map::new();
        for (k, v) in obj {
            if !RESERVED_FIELDS.contains(&k.as_str()) && !v.is_object() && !v.is_array() {
                extra.insert(k.clone(), v.clone());
            }
        }
        let user_data = if extra.is_empty() { None } else { Some(Value::Object(extra)) };

        Ok(NodeSpec { id, name, description, is_list, is_subgraph, user_data })
    }
}

fn string_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    key: &str,
) -> Result<Option<String>, MeshError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => {
            Err(MeshError::Definition(format!("field '{field}' of '{key}' must be a string")))
        }
    }
}

fn bool_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    key: &str,
) -> Result<Option<bool>, MeshError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => {
            Err(MeshError::Definition(format!("field '{field}' of '{key}' must be a boolean")))
        }
    }
}

/// Parses a nested definition into a resolved `Mesh`.
#[derive(Debug, Default)]
pub struct DefinitionParser<C: NodeCreator = DefinitionCreator> {
    creator: C,
}

impl DefinitionParser<DefinitionCreator> {
    #[must_use]
    pub fn new() -> Self {
        Self { creator: DefinitionCreator }
    }
}

impl<C: NodeCreator> DefinitionParser<C> {
    pub fn with_creator(creator: C) -> Self {
        Self { creator }
    }

    /// Parse a definition from a JSON string.
    ///
    /// # Errors
    /// `MeshError::Json` for invalid JSON, `MeshError::Definition` for a
    /// well-formed document that is not a valid definition.
    pub fn parse_str(&self, data: &str) -> Result<Mesh, MeshError> {
        let value: Value = serde_json::from_str(data)?;
        self.parse_value(&value)
    }

    /// Parse a definition from a file.
    ///
    /// # Errors
    /// IO, JSON and definition errors as in `parse_str`.
    pub fn parse_file(&self, path: &Path) -> Result<Mesh, MeshError> {
        let data = std::fs::read_to_string(path)?;
        self.parse_str(&data)
    }

    /// Parse an already-deserialized definition value.
    ///
    /// # Errors
    /// `MeshError::Definition` when the top level is not an object of
    /// node entries, or any nested entry is malformed.
    pub fn parse_value(&self, value: &Value) -> Result<Mesh, MeshError> {
        let obj = value
            .as_object()
            .ok_or_else(|| MeshError::Definition("top-level definition must be an object".into()))?;
        let mut mesh = Mesh::new();
        for (key, entry) in obj {
            self.parse_entry(&mut mesh, &[], key, entry)?;
        }
        resolver::resolve_all(&mut mesh);
        Ok(mesh)
    }

    fn parse_entry(
        &self,
        mesh: &mut Mesh,
        parent_path: &[String],
        key: &str,
        value: &Value,
    ) -> Result<(), MeshError> {
        match value {
            Value::Object(_) => self.parse_node(mesh, parent_path, key, value),
            Value::Array(items) => self.parse_list(mesh, parent_path, key, items),
            _ => Err(MeshError::Definition(format!(
                "entry '{key}' must be an object or an array of objects"
            ))),
        }
    }

    fn parse_node(
        &self,
        mesh: &mut Mesh,
        parent_path: &[String],
        key: &str,
        value: &Value,
    ) -> Result<(), MeshError> {
        let obj = value.as_object().ok_or_else(|| {
            MeshError::Definition(format!("definition for '{key}' must be an object"))
        })?;
        let spec = {
            let parent = parent_path
                .last()
                .and_then(|id| mesh.find(id))
                .map(|handle| mesh.node(handle));
            self.creator.create(parent, key, value)?
        };
        let id = spec.id.clone();
        let node = insert_along_path(mesh, parent_path, spec)?;

        if let Some(rel) = obj.get("relation") {
            self.parse_relations(mesh, node, &id, rel)?;
        }

        let mut own_path: Vec<String> = parent_path.to_vec();
        own_path.push(id);
        for (k, v) in obj {
            if RESERVED_FIELDS.contains(&k.as_str()) {
                continue;
            }
            match v {
                Value::Object(_) => self.parse_node(mesh, &own_path, k, v)?,
                Value::Array(items) => self.parse_list(mesh, &own_path, k, items)?,
                _ => {} // scalar, already captured as user_data
            }
        }
        Ok(())
    }

    /// An array-valued key becomes a synthetic grouping node with the
    /// elements as its children.
    fn parse_list(
        &self,
        mesh: &mut Mesh,
        parent_path: &[String],
        key: &str,
        items: &[Value],
    ) -> Result<(), MeshError> {
        let spec = NodeSpec {
            id: key.to_string(),
            name: key.to_string(),
            is_list: true,
            ..Default::default()
        };
        insert_along_path(mesh, parent_path, spec)?;

        let mut list_path: Vec<String> = parent_path.to_vec();
        list_path.push(key.to_string());
        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(MeshError::Definition(format!(
                    "element {idx} of list '{key}' must be an object"
                )));
            }
            let default_key = format!("{key}_{idx}");
            self.parse_node(mesh, &list_path, &default_key, item)?;
        }
        Ok(())
    }

    fn parse_relations(
        &self,
        mesh: &mut Mesh,
        owner: crate::mesh::NodeId,
        owner_id: &str,
        value: &Value,
    ) -> Result<(), MeshError> {
        match value {
            Value::Object(_) => self.parse_relation(mesh, owner, owner_id, value),
            Value::Array(items) => {
                for item in items {
                    self.parse_relation(mesh, owner, owner_id, item)?;
                }
                Ok(())
            }
            _ => Err(MeshError::Definition(format!(
                "field 'relation' of '{owner_id}' must be an object or an array of objects"
            ))),
        }
    }

    fn parse_relation(
        &self,
        mesh: &mut Mesh,
        owner: crate::mesh::NodeId,
        owner_id: &str,
        value: &Value,
    ) -> Result<(), MeshError> {
        let obj = value.as_object().ok_or_else(|| {
            MeshError::Definition(format!("relation of '{owner_id}' must be an object"))
        })?;
        let rel_id = string_field(obj, "id", owner_id)?.ok_or_else(|| {
            MeshError::Definition(format!("relation of '{owner_id}' is missing field 'id'"))
        })?;
        let target = string_field(obj, "target", owner_id)?.ok_or_else(|| {
            MeshError::Definition(format!("relation '{rel_id}' of '{owner_id}' is missing field 'target'"))
        })?;
        let name = string_field(obj, "name", owner_id)?.unwrap_or_default();
        mesh.add_relation(owner, &rel_id, &name, RelationTarget::Id(target));
        Ok(())
    }
}

/// Insert a prepared spec at `parent_path`/spec.id via the shared builder.
fn insert_along_path(
    mesh: &mut Mesh,
    parent_path: &[String],
    spec: NodeSpec,
) -> Result<crate::mesh::NodeId, MeshError> {
    let id = spec.id.clone();
    let mut path: Vec<&str> = parent_path.iter().map(String::as_str).collect();
    path.push(&id);
    let mut slot = Some(spec);
    mesh.add_node_using_creator(&path, |_parent, segment| {
        // Parents were inserted by earlier recursion; only the final
        // segment may be missing.
        if segment == id {
            slot.take()
        } else {
            None
        }
    })
}
