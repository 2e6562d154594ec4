use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kinfolk_layout::core::{
    Expansion, LayoutConfig, Member, Relationship, RelationshipType, Snapshot,
};
use kinfolk_layout::{LayoutOptions, layout_tree, list_view};
use std::hint::black_box;
use std::time::Duration;

/// A descendant tree: every couple has `fanout` children, for `depth` generations below the
/// primary, plus a short line of ancestors above.
fn build_family(depth: usize, fanout: usize) -> Snapshot {
    let mut members: Vec<Member> = vec![Member::new("p", "Primary").primary()];
    let mut rels: Vec<Relationship> = Vec::new();

    let mut child = "p".to_string();
    for i in 0..4 {
        let id = format!("anc{i}");
        members.push(Member::new(id.clone(), id.clone()));
        rels.push(Relationship::new(id.clone(), child, RelationshipType::Parent));
        child = id;
    }

    let mut frontier = vec!["p".to_string()];
    let mut next_id = 0usize;
    for _ in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for parent in &frontier {
            let spouse = format!("sp{next_id}");
            next_id += 1;
            members.push(Member::new(spouse.clone(), spouse.clone()));
            rels.push(Relationship::new(
                parent.clone(),
                spouse.clone(),
                RelationshipType::Spouse,
            ));
            for k in 0..fanout {
                let id = format!("d{next_id}");
                next_id += 1;
                members.push(Member::new(id.clone(), id.clone()));
                rels.push(Relationship::new(parent.clone(), id.clone(), RelationshipType::Parent));
                rels.push(Relationship::new(spouse.clone(), id.clone(), RelationshipType::Parent));
                if k > 0 {
                    rels.push(Relationship::new(
                        format!("d{}", next_id - 2),
                        id.clone(),
                        RelationshipType::Sibling,
                    ));
                }
                next.push(id);
            }
        }
        frontier = next;
    }

    Snapshot::from_records(members, &rels)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_tree");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("d3_f3", 3usize, 3usize), ("d4_f4", 4, 4), ("d5_f3", 5, 3)];
    let options = LayoutOptions::new(LayoutConfig::default()).with_expansion(Expansion::all());

    for (name, depth, fanout) in cases {
        let snap = build_family(depth, fanout);
        group.bench_with_input(BenchmarkId::new("expanded", name), &snap, |b, snap| {
            b.iter(|| {
                let layout = layout_tree(black_box(snap), &options);
                black_box(layout.nodes.len());
            })
        });
        group.bench_with_input(BenchmarkId::new("list_view", name), &snap, |b, snap| {
            b.iter(|| {
                let view = list_view(black_box(snap), Expansion::all(), &options.config);
                black_box(view.generations.len());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
