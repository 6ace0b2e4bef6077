//! relation-mesh — Hierarchical Relation Mesh Engine
//!
//! Build a tree of named nodes with cross-cutting, id-addressed relations,
//! project it down to a chosen ancestor level ("subsystem view"), and render
//! the result in several diagramming formats.
//!
//! # Features
//! - Two-phase construction: build the whole tree first, then resolve
//!   relation targets through the mesh-wide id cache
//! - Path-based builder with shared-prefix reuse (used both for parsing
//!   definitions and for assembling condensed projection trees)
//! - Level projection with relation re-attribution and selection filtering
//! - Five renderers over one traversal contract: Graphviz/DOT, Mermaid,
//!   Cytoscape JSON, Sigma JSON, Springy JSON
//!
//! # Quickstart (Library)
//! ```
//! use relation_mesh::parser::DefinitionParser;
//! use relation_mesh::projection::{self, Selection};
//! use relation_mesh::render::graphviz::DotRenderer;
//!
//! let def = r#"{
//!   "a": { "a1": { "relation": { "id": "r1", "name": "uses", "target": "b1" } } },
//!   "b": { "b1": {} }
//! }"#;
//! let mesh = DefinitionParser::new().parse_str(def).expect("parse definition");
//! let condensed = projection::create_system_tree(&mesh, 1, &Selection::empty())
//!     .expect("project");
//! let dot = DotRenderer::default().render(&condensed);
//! assert!(dot.contains("\"a\" -> \"b\""));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! relation-mesh render --input system.json --level 1 --format mermaid
//! relation-mesh tree --input system.json
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod mesh;
pub mod parser;
pub mod projection;
pub mod render;
pub mod utils;
