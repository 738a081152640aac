//! Maximal pairs between sequences.
//!
//! Two occurrences of the same token string in different sequences form a
//! maximal pair when neither end can be extended: the tokens right after
//! them differ (they lie below different children of the node spelling the
//! string, or one of them ends its sequence) and the tokens right before
//! them differ. An occurrence at the very start of its sequence has no token
//! before it and pairs with anything.
//!
//! Occurrences are collected bottom-up, grouped by the token to their left,
//! so only groups with different left tokens have to be combined at a node.

use std::collections::HashMap;

use log::debug;

use crate::{GeneralizedSuffixTree, NodeId, PairResultTable, Token, ROOT};

/// A pair of matching fragments of `length` tokens, starting at `start1` in
/// the lower-indexed sequence and at `start2` in the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaximalPair {
    pub start1: usize,
    pub start2: usize,
    pub length: usize,
}

/// Where a suffix of one sequence begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub(crate) sequence: usize,
    pub(crate) start: usize,
}

/// Occurrences keyed by the token preceding them; `None` at sequence start.
type LeftContexts = HashMap<Option<Token>, Vec<Occurrence>>;

/// A node on the traversal stack.
struct Frame {
    node: NodeId,
    /// String depth at the end of the node's edge, terminal excluded.
    depth: usize,
    /// Children not visited yet.
    children: Vec<NodeId>,
    /// Occurrences handed up by the children already finished.
    groups: Vec<LeftContexts>,
}

impl GeneralizedSuffixTree {
    /// All maximal pairs of at least the configured minimal length, grouped
    /// by the pair of sequences they connect and sorted within each group.
    #[must_use]
    pub fn maximal_pairs(&self) -> PairResultTable<Vec<MaximalPair>> {
        let mut table: PairResultTable<Vec<MaximalPair>> = PairResultTable::from_fn(self.sequence_count(), Vec::new);
        self.for_each_maximal_pair(|first, second, length| {
            table.get_mut(first.sequence, second.sequence).push(MaximalPair {
                start1: first.start,
                start2: second.start,
                length,
            });
        });
        let mut found = 0;
        for (_, pairs) in table.iter_mut() {
            pairs.sort_unstable();
            found += pairs.len();
        }
        debug!("Found {found} maximal pairs");
        table
    }

    /// Calls `emit` once per maximal pair, with the occurrence in the lower
    /// indexed sequence first.
    ///
    /// The tree is walked in post-order from an explicit stack: a node is
    /// finished once all of its children have handed up their occurrences.
    pub(crate) fn for_each_maximal_pair<F>(&self, mut emit: F)
    where
        F: FnMut(Occurrence, Occurrence, usize),
    {
        let min_length = self.options().min_maximal_pair_length;
        let mut stack = vec![self.frame(ROOT, 0)];
        while let Some(mut frame) = stack.pop() {
            if let Some(child) = frame.children.pop() {
                let child = self.frame(child, frame.depth);
                stack.push(frame);
                stack.push(child);
                continue;
            }

            let node = self.node(frame.node);
            // Below a leaf every listed sequence ends with the same suffix, so
            // each of its occurrences forms a group of its own.
            let groups: Vec<LeftContexts> = if node.is_leaf() {
                node.inputs()
                    .iter()
                    .map(|&sequence| {
                        let occurrence = self.leaf_occurrence(sequence, frame.depth);
                        let key = self.left_context(occurrence);
                        HashMap::from([(key, vec![occurrence])])
                    })
                    .collect()
            } else {
                frame.groups
            };

            if frame.depth >= min_length {
                pair_groups(&groups, frame.depth, &mut emit);
            }
            let merged = merge_groups(groups);
            match stack.last_mut() {
                Some(parent) => parent.groups.push(merged),
                None => break,
            }
        }
    }

    fn frame(&self, node_id: NodeId, depth: usize) -> Frame {
        let node = self.node(node_id);
        Frame {
            node: node_id,
            depth: depth + node.text_len(),
            children: node.children().values().copied().collect(),
            groups: Vec::new(),
        }
    }

    /// The occurrence of the suffix of `sequence` with `depth` tokens before
    /// the terminal symbol.
    fn leaf_occurrence(&self, sequence: usize, depth: usize) -> Occurrence {
        let len = self.sequences[sequence].len();
        let start = match len.checked_sub(depth + 1) {
            Some(start) => start,
            None => panic!("Leaf of depth {depth} does not fit sequence {sequence} of length {len}"),
        };
        Occurrence { sequence, start }
    }

    fn left_context(&self, occurrence: Occurrence) -> Option<Token> {
        match occurrence.start {
            0 => None,
            start => Some(self.sequences[occurrence.sequence][start - 1]),
        }
    }
}

/// Pairs the occurrences of every two groups whose left tokens differ.
fn pair_groups<F>(groups: &[LeftContexts], length: usize, emit: &mut F)
where
    F: FnMut(Occurrence, Occurrence, usize),
{
    for (i, left) in groups.iter().enumerate() {
        for right in &groups[i + 1..] {
            for (left_key, left_occurrences) in left {
                for (right_key, right_occurrences) in right {
                    if left_key.is_some() && left_key == right_key {
                        continue;
                    }
                    for &a in left_occurrences {
                        for &b in right_occurrences {
                            if a.sequence < b.sequence {
                                emit(a, b, length);
                            } else if b.sequence < a.sequence {
                                emit(b, a, length);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn merge_groups(groups: Vec<LeftContexts>) -> LeftContexts {
    let mut groups = groups.into_iter();
    let mut merged = groups.next().unwrap_or_default();
    for group in groups {
        for (key, mut occurrences) in group {
            let target = merged.entry(key).or_default();
            if target.len() < occurrences.len() {
                std::mem::swap(target, &mut occurrences);
            }
            target.append(&mut occurrences);
        }
    }
    merged
}
