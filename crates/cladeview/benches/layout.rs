use cladeview::render::{LayoutOptions, layout_phylogeny};
use cladeview::{Clade, Phylogeny};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Balanced binary tree with `2^depth` leaves and uneven branch lengths.
fn balanced(depth: u32) -> Phylogeny {
    let mut tree = Phylogeny::new(Clade::new());
    let mut frontier = vec![tree.root()];
    for level in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for (i, parent) in frontier.into_iter().enumerate() {
            for side in 0..2usize {
                let length = 0.05 + ((i + side) % 7) as f64 * 0.01;
                let clade = if level + 1 == depth {
                    Clade::leaf(format!("taxon_{i}_{side}"))
                } else {
                    Clade::new().with_confidence(((i * 13) % 100) as f64, None)
                };
                next.push(tree.add_child(parent, clade.with_branch_length(length)));
            }
        }
        frontier = next;
    }
    tree
}

fn bench_layout(c: &mut Criterion) {
    let tree = balanced(12);
    let options = LayoutOptions {
        column_width: 5550,
        x_scale: 2.0,
        ..LayoutOptions::default()
    };

    let mut group = c.benchmark_group("layout");
    group.sample_size(20);
    group.bench_function("balanced_4096_leaves", |b| {
        b.iter(|| {
            let layout = layout_phylogeny(black_box(&tree), &options).expect("layout");
            black_box(layout.nodes.len() ^ layout.edges.len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
