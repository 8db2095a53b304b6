use std::time::Duration;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use random_art::prelude::{presets, synthesize, Node};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// A classic-grammar tree with at least `min_nodes` nodes, found by scanning seeds.
#[allow(dead_code)]
pub fn classic_tree(min_nodes: usize, depth: i32) -> Node {
    let grammar = presets::classic();
    let mut best = presets::gradient();
    for seed in 0..256u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let Ok(tree) = synthesize(&grammar, "E", depth, &mut rng) else {
            continue;
        };
        if tree.node_count() >= min_nodes {
            return tree;
        }
        if tree.node_count() > best.node_count() {
            best = tree;
        }
    }
    best
}
