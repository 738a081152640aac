use bitvec::prelude::*;
use log::debug;

use crate::{GeneralizedSuffixTree, PairResultTable};

/// The pairwise results of one pass over the maximal pairs of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Length of the longest maximal pair between two sequences, 0 if none.
    pub longest_fragments: PairResultTable<usize>,

    /// Share of the tokens of two sequences covered by their maximal pairs,
    /// between 0 and 1.
    pub similarities: PairResultTable<f64>,
}

impl Analysis {
    /// One `(first, second, similarity, longest_fragment)` row per pair of
    /// sequences with `first < second`.
    pub fn rows(&self) -> impl Iterator<Item = (usize, usize, f64, usize)> + '_ {
        self.similarities
            .iter()
            .zip(self.longest_fragments.iter())
            .map(|(((i, j), &similarity), (_, &longest))| (i, j, similarity, longest))
    }
}

/// Positions of two sequences covered by at least one maximal pair.
struct Coverage {
    first: BitVec,
    second: BitVec,
}

impl Coverage {
    fn new(first_len: usize, second_len: usize) -> Self {
        Self {
            first: bitvec![0; first_len],
            second: bitvec![0; second_len],
        }
    }
}

impl GeneralizedSuffixTree {
    /// Computes the longest fragment and the similarity of every pair of
    /// sequences in a single enumeration of the maximal pairs.
    ///
    /// The similarity of two sequences is the number of their positions
    /// covered by maximal pairs between them, divided by their combined length.
    #[must_use]
    pub fn analyse(&self) -> Analysis {
        let count = self.sequence_count();
        let mut longest_fragments = PairResultTable::new(count, 0);
        let mut coverages: PairResultTable<Option<Coverage>> = PairResultTable::from_fn(count, || None);

        self.for_each_maximal_pair(|first, second, length| {
            let longest = longest_fragments.get_mut(first.sequence, second.sequence);
            *longest = (*longest).max(length);

            let coverage = coverages.get_mut(first.sequence, second.sequence).get_or_insert_with(|| {
                Coverage::new(
                    self.sequences[first.sequence].len(),
                    self.sequences[second.sequence].len(),
                )
            });
            coverage.first[first.start..first.start + length].fill(true);
            coverage.second[second.start..second.start + length].fill(true);
        });

        let similarities = coverages.map(|(i, j), coverage| {
            let Some(coverage) = coverage else {
                return 0.0;
            };
            // Both stored sequences carry a terminal symbol.
            let total = self.sequences[i].len() + self.sequences[j].len() - 2;
            if total == 0 {
                return 0.0;
            }
            let covered = coverage.first.count_ones() + coverage.second.count_ones();
            covered as f64 / total as f64
        });
        debug!("Analysed {} pairs of sequences", similarities.len());

        Analysis {
            longest_fragments,
            similarities,
        }
    }
}
