//! Fixtures and slow reference implementations shared by the unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{MaximalPair, Token};

/// Turns each string into its bytes, one token per byte.
pub(crate) fn tokens(strings: &[&str]) -> Vec<Vec<Token>> {
    strings
        .iter()
        .map(|s| s.bytes().map(Token::from).collect())
        .collect()
}

/// `count` sequences of `len` tokens drawn from `1..=alphabet`.
pub(crate) fn random_sequences(seed: u64, count: usize, len: usize, alphabet: Token) -> Vec<Vec<Token>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..len).map(|_| rng.gen_range(1..=alphabet)).collect())
        .collect()
}

/// Longest common substring length by dynamic programming.
pub(crate) fn lcs_length(a: &[Token], b: &[Token]) -> usize {
    let mut best = 0;
    let mut prev = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        let mut cur = vec![0; b.len() + 1];
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                cur[j] = prev[j - 1] + 1;
                best = best.max(cur[j]);
            }
        }
        prev = cur;
    }
    best
}

/// Maximal pairs between `a` and `b` by comparing every pair of positions.
pub(crate) fn maximal_pairs_naive(a: &[Token], b: &[Token], min_length: usize) -> Vec<MaximalPair> {
    let mut pairs = Vec::new();
    for p in 0..a.len() {
        for q in 0..b.len() {
            if p > 0 && q > 0 && a[p - 1] == b[q - 1] {
                continue;
            }
            let length = a[p..].iter().zip(&b[q..]).take_while(|(x, y)| x == y).count();
            if length > 0 && length >= min_length {
                pairs.push(MaximalPair {
                    start1: p,
                    start2: q,
                    length,
                });
            }
        }
    }
    pairs.sort_unstable();
    pairs
}
