//! Library-level scenarios: parse, project, render.
use relation_mesh::parser::DefinitionParser;
use relation_mesh::projection::{self, Selection};
use relation_mesh::render::graphviz::DotRenderer;
use relation_mesh::render::mermaid::MermaidRenderer;

const DEFINITION: &str = r#"{
    "acquisition": {
        "name": "Acquisition",
        "ingest": {
            "relation": { "id": "r1", "name": "feeds", "target": "store" }
        },
        "decode": {
            "relation": { "id": "r1", "target": "store" }
        }
    },
    "storage": {
        "name": "Storage",
        "store": {},
        "index": {
            "relation": { "id": "r1", "name": "reads", "target": "store" }
        }
    }
}"#;

#[test]
fn level_one_reattributes_deep_relations_to_roots() {
    let mesh = DefinitionParser::new().parse_str(DEFINITION).unwrap();
    let condensed = projection::create_system_tree(&mesh, 1, &Selection::empty()).unwrap();

    let ids: Vec<_> =
        condensed.roots().iter().map(|r| condensed.node(*r).id.clone()).collect();
    assert_eq!(ids, vec!["acquisition", "storage"]);

    // Both ingest.r1 and decode.r1 become parallel acquisition -> storage
    // edges; index.r1 stays inside storage and is dropped (same base node).
    let acq = condensed.find("acquisition").unwrap();
    let storage = condensed.find("storage").unwrap();
    assert_eq!(condensed.node(acq).relations.len(), 2);
    assert!(condensed.node(acq).relations.iter().all(|r| r.target == Some(storage)));
    assert!(condensed.node(storage).relations.is_empty());
}

#[test]
fn level_two_keeps_the_intermediate_layer() {
    let mesh = DefinitionParser::new().parse_str(DEFINITION).unwrap();
    let condensed = projection::create_system_tree(&mesh, 2, &Selection::empty()).unwrap();

    // At level 2 the leaves themselves are the base nodes, nested under
    // their roots.
    let ingest = condensed.find("ingest").unwrap();
    let store = condensed.find("store").unwrap();
    assert_eq!(condensed.node(ingest).relations[0].target, Some(store));
    let acq = condensed.find("acquisition").unwrap();
    assert!(condensed.node(ingest).parent == Some(acq));
}

#[test]
fn condensed_dot_carries_cluster_endpoints() {
    let mesh = DefinitionParser::new().parse_str(DEFINITION).unwrap();
    let condensed = projection::create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
    let dot = DotRenderer::default().render(&condensed);

    assert!(dot.contains("compound=true;"));
    assert!(dot.contains(
        "\"acquisition\" -> \"storage\" [label=\"feeds\", ltail=\"cluster_acquisition\", lhead=\"cluster_storage\"];"
    ));
    // The unnamed relation renders without a label
    assert!(dot.contains(
        "\"acquisition\" -> \"storage\" [ltail=\"cluster_acquisition\", lhead=\"cluster_storage\"];"
    ));
}

#[test]
fn condensed_mermaid_uses_display_names_in_blocks() {
    let mesh = DefinitionParser::new().parse_str(DEFINITION).unwrap();
    let condensed = projection::create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
    let text = MermaidRenderer::new().render(&condensed);

    assert!(text.contains("subgraph acquisition[\"Acquisition\"]"));
    assert!(text.contains("acquisition-->|feeds|storage"));
    assert!(text.contains("acquisition-->storage"));
}

#[test]
fn projection_is_stable_across_repeated_runs() {
    let mesh = DefinitionParser::new().parse_str(DEFINITION).unwrap();
    let first = projection::create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
    let second = projection::create_system_tree(&mesh, 1, &Selection::empty()).unwrap();
    assert_eq!(
        DotRenderer::default().render(&first),
        DotRenderer::default().render(&second)
    );
}

#[test]
fn selection_patterns_drop_foreign_relations() {
    let mesh = DefinitionParser::new().parse_str(
        r#"{
            "a": { "a1": { "relation": { "id": "r1", "name": "hits", "target": "b1" } } },
            "b": { "b1": {} },
            "c": { "c1": { "relation": { "id": "r1", "name": "skips", "target": "b1" } } }
        }"#,
    )
    .unwrap();
    let selection = Selection::from_patterns(&mesh, &["^a$".to_string()]).unwrap();
    let condensed = projection::create_system_tree(&mesh, 1, &selection).unwrap();

    assert!(condensed.find("a").is_some());
    assert!(condensed.find("b").is_some());
    assert!(condensed.find("c").is_none());
}
