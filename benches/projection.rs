use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relation_mesh::mesh::{resolver, Mesh, Node, NodeSpec, RelationTarget};
use relation_mesh::projection::{self, Selection};
use relation_mesh::render::graphviz::DotRenderer;

fn creator(_: Option<&Node>, segment: &str) -> Option<NodeSpec> {
    Some(NodeSpec::with_id(segment))
}

/// `roots` top-level subsystems, each with `depth` nested layers and a
/// relation from every leaf to the next subsystem's leaf.
fn synthetic_mesh(roots: usize, depth: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let mut leaves = Vec::with_capacity(roots);
    for r in 0..roots {
        let path: Vec<String> = (0..depth).map(|d| format!("s{r}_d{d}")).collect();
        let refs: Vec<&str> = path.iter().map(String::as_str).collect();
        let leaf = mesh
            .add_node_using_creator(&refs, creator)
            .expect("synthetic path");
        leaves.push(leaf);
    }
    for (r, &leaf) in leaves.iter().enumerate() {
        let next = (r + 1) % roots;
        let target = format!("s{next}_d{}", depth - 1);
        mesh.add_relation(leaf, "link", "links", RelationTarget::Id(target));
    }
    resolver::resolve_all(&mut mesh);
    mesh
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    for &(roots, depth) in &[(10usize, 4usize), (50, 6), (200, 8)] {
        let mesh = synthetic_mesh(roots, depth);
        group.bench_function(format!("create_system_tree/{roots}x{depth}"), |b| {
            b.iter(|| {
                projection::create_system_tree(black_box(&mesh), 1, &Selection::empty())
                    .expect("projection")
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let mesh = synthetic_mesh(100, 6);
    let condensed =
        projection::create_system_tree(&mesh, 1, &Selection::empty()).expect("projection");
    group.bench_function("dot/source", |b| {
        b.iter(|| DotRenderer::default().render(black_box(&mesh)));
    });
    group.bench_function("dot/condensed", |b| {
        b.iter(|| DotRenderer::default().render(black_box(&condensed)));
    });
    group.finish();
}

criterion_group!(benches, bench_projection, bench_render);
criterion_main!(benches);
