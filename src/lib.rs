//! A generalized suffix tree over token sequences, built with Ukkonen's algorithm.
//!
//! The tree indexes many sequences of positive integer tokens at once (for
//! example the syntax node types of parsed source files) and answers:
//!
//! - whether a token string occurs in, or is a suffix of, any sequence,
//! - the longest common substring of any two sequences,
//! - the *maximal pairs* of matching fragments between sequences, and a
//!   coverage-based similarity score derived from them.
//!
//! The tree is built once and is read-only afterwards.
//!
//! # Examples
//!
//! ```
//! use fragment_tree::GeneralizedSuffixTree;
//! let tree = GeneralizedSuffixTree::new(&[vec![1, 2, 3, 4, 5, 6, 7, 8, 9], vec![7, 8, 9, 10, 11]]).unwrap();
//! assert!(tree.has_suffix(&[7, 8, 9]));
//! assert_eq!(tree.longest_common_substring(0, 1).unwrap(), 3);
//! ```
mod builder;
mod error;
mod lcs;
mod maximal_pairs;
mod node;
mod pair_table;
mod query;
mod similarity;
#[cfg(test)]
mod testing;

use std::fmt;

use log::debug;

pub use error::{Error, Result};
pub use maximal_pairs::MaximalPair;
pub use node::Node;
pub use pair_table::PairResultTable;
pub use similarity::Analysis;

/// Handle of a node in the tree's node storage.
pub type NodeId = usize;

/// A token code. Codes must be positive; `0` is the terminal symbol.
pub type Token = u64;

/// The terminal symbol appended to every stored sequence.
pub const TERMINAL: Token = 0;

/// The root node.
pub const ROOT: NodeId = 0;

/// Tunables for the analyses run on a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Shortest fragment, in tokens, reported as a maximal pair.
    pub min_maximal_pair_length: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_maximal_pair_length: 1,
        }
    }
}

impl Options {
    #[must_use]
    pub fn with_min_maximal_pair_length(mut self, length: usize) -> Self {
        self.min_maximal_pair_length = length;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.min_maximal_pair_length == 0 {
            return Err(Error::InvalidMinimalPairLength);
        }
        Ok(())
    }
}

/// A suffix tree over several token sequences.
///
/// Edges that several sequences have in common are stored once, and every
/// node records which sequences have a suffix passing through it.
///
/// # Examples
///
/// ```
/// use fragment_tree::{GeneralizedSuffixTree, Options};
/// let options = Options::default().with_min_maximal_pair_length(2);
/// let tree = GeneralizedSuffixTree::build(&[[5, 1, 2, 6], [7, 1, 2, 8]], options).unwrap();
/// let analysis = tree.analyse();
/// assert_eq!(analysis.longest_fragments[(0, 1)], 2);
/// assert_eq!(analysis.similarities[(0, 1)], 0.5);
/// ```
#[derive(Debug)]
pub struct GeneralizedSuffixTree {
    node_storage: Vec<Node>,

    /// The indexed sequences, each followed by the terminal symbol.
    sequences: Vec<Vec<Token>>,
    options: Options,
}

impl GeneralizedSuffixTree {
    /// Builds a tree over `sequences` with the default options.
    pub fn new<S: AsRef<[Token]>>(sequences: &[S]) -> Result<Self> {
        Self::build(sequences, Options::default())
    }

    /// Builds a tree over `sequences`.
    ///
    /// Every sequence is checked before construction starts, so a sequence
    /// containing the reserved token `0` fails the whole build.
    pub fn build<S: AsRef<[Token]>>(sequences: &[S], options: Options) -> Result<Self> {
        options.validate()?;
        for (sequence, s) in sequences.iter().enumerate() {
            Self::validate_sequence(sequence, s.as_ref())?;
        }

        let sequences: Vec<Vec<Token>> = sequences
            .iter()
            .map(|s| {
                let s = s.as_ref();
                let mut terminated = Vec::with_capacity(s.len() + 1);
                terminated.extend_from_slice(s);
                terminated.push(TERMINAL);
                terminated
            })
            .collect();

        let node_storage = builder::Builder::new(&sequences).run();
        debug!(
            "Built suffix tree over {} sequences with {} nodes",
            sequences.len(),
            node_storage.len()
        );
        Ok(Self {
            node_storage,
            sequences,
            options,
        })
    }

    fn validate_sequence(sequence: usize, s: &[Token]) -> Result<()> {
        match s.iter().position(|&token| token == TERMINAL) {
            Some(position) => Err(Error::ReservedToken { sequence, position }),
            None => Ok(()),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn root(&self) -> &Node {
        self.node(ROOT)
    }

    pub fn node(&self, node_id: NodeId) -> &Node {
        &self.node_storage[node_id]
    }

    pub fn node_count(&self) -> usize {
        self.node_storage.len()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// The `index`-th sequence as it was given, without the terminal symbol.
    pub fn sequence(&self, index: usize) -> Result<&[Token]> {
        self.check_sequence(index)?;
        let s = &self.sequences[index];
        Ok(&s[..s.len() - 1])
    }

    /// The tokens on the edge into `node_id`, terminal symbol included. The
    /// root has an empty label.
    pub fn label(&self, node_id: NodeId) -> &[Token] {
        let node = self.node(node_id);
        if node.is_empty() {
            return &[];
        }
        &self.sequences[node.sequence][node.start..node.end()]
    }

    /// The tokens on the edge into `node_id` that count towards a match.
    pub(crate) fn text_label(&self, node_id: NodeId) -> &[Token] {
        let label = self.label(node_id);
        &label[..self.node(node_id).text_len().min(label.len())]
    }

    pub(crate) fn check_sequence(&self, index: usize) -> Result<()> {
        if index >= self.sequences.len() {
            return Err(Error::SequenceOutOfRange {
                index,
                count: self.sequences.len(),
            });
        }
        Ok(())
    }

    /// Children of `node` in token order.
    fn sorted_children(&self, node: NodeId) -> Vec<NodeId> {
        let mut children: Vec<(&Token, &NodeId)> = self.node(node).children.iter().collect();
        children.sort_unstable();
        children.into_iter().map(|(_, &child)| child).collect()
    }
}

/// Writes one edge label per line, indented by depth and followed by the
/// inputs of the node below it.
impl fmt::Display for GeneralizedSuffixTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack: Vec<(NodeId, usize)> = self.sorted_children(ROOT).into_iter().rev().map(|c| (c, 0)).collect();
        while let Some((node, indent)) = stack.pop() {
            writeln!(
                f,
                "{:indent$}{:?} {:?}",
                "",
                self.label(node),
                self.node(node).inputs(),
                indent = indent
            )?;
            stack.extend(self.sorted_children(node).into_iter().rev().map(|c| (c, indent + 4)));
        }
        Ok(())
    }
}
