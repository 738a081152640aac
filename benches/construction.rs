use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};

use fragment_tree::{GeneralizedSuffixTree, Options};

// Token streams of parsed files use a few hundred node types, but most of
// them come from a small core.
const ALPHABET: u64 = 40;
const SEQUENCE_COUNT: usize = 20;
const LENGTHS: [usize; 4] = [250, 500, 1000, 2000];

fn generate_input(len: usize) -> Vec<Vec<u64>> {
    let mut rngo = StdRng::seed_from_u64(len as u64);
    let tokens = Uniform::new_inclusive(1, ALPHABET);
    let mut sequences: Vec<Vec<u64>> = (0..SEQUENCE_COUNT)
        .map(|_| (&mut rngo).sample_iter(&tokens).take(len).collect())
        .collect();

    // Plant a copied block in every other sequence so there is something to find.
    let block: Vec<u64> = sequences[0][..len / 4].to_vec();
    for sequence in sequences.iter_mut().skip(1).step_by(2) {
        let at = rngo.gen_range(0..len - block.len());
        sequence[at..at + block.len()].copy_from_slice(&block);
    }
    sequences
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build over 20 sequences");
    for len in LENGTHS {
        group.bench_with_input(BenchmarkId::new("sequence length", len), &generate_input(len), |b, input| {
            b.iter(|| GeneralizedSuffixTree::new(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn bench_analyse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyse 20 sequences");
    let options = Options::default().with_min_maximal_pair_length(10);
    for len in LENGTHS {
        let tree = GeneralizedSuffixTree::build(&generate_input(len), options).unwrap();
        group.bench_with_input(BenchmarkId::new("sequence length", len), &tree, |b, tree| {
            b.iter(|| black_box(tree).analyse())
        });
    }
    group.finish();
}

criterion_group!(construction, bench_build, bench_analyse);
criterion_main!(construction);
