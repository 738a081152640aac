use std::collections::HashMap;

use crate::{NodeId, Token};

/// The end of an edge label.
///
/// Leaves created while a sequence is being inserted all share the builder's
/// single current-end counter, which extends every one of them at once when
/// it advances. They are frozen to a `Fixed` end as soon as that sequence's
/// insertion completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeEnd {
    Fixed(usize),
    Open,
}

/// A node in the tree, together with the edge leading into it.
///
/// `start..end` is a half-open range into the sequence with index
/// `sequence`, i.e. the sequence whose insertion created the edge. The
/// children are keyed by the first token of their edge label; the terminal
/// symbol is a regular key.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) start: usize,
    pub(crate) end: EdgeEnd,
    pub(crate) sequence: usize,
    pub(crate) children: HashMap<Token, NodeId>,
    pub(crate) suffix_link: Option<NodeId>,

    /// Sorted indices of the sequences with a suffix passing through this node.
    pub(crate) inputs: Vec<usize>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self {
            start: 0,
            end: EdgeEnd::Fixed(0),
            sequence: 0,
            children: HashMap::new(),
            suffix_link: None,
            inputs: Vec::new(),
        }
    }

    pub(crate) fn leaf(sequence: usize, start: usize) -> Self {
        Self {
            start,
            end: EdgeEnd::Open,
            sequence,
            children: HashMap::new(),
            suffix_link: None,
            inputs: vec![sequence],
        }
    }

    pub(crate) fn internal(sequence: usize, start: usize, end: usize) -> Self {
        Self {
            start,
            end: EdgeEnd::Fixed(end),
            sequence,
            children: HashMap::new(),
            suffix_link: None,
            inputs: Vec::new(),
        }
    }

    /// Index of the first token of the edge label.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index one past the last token of the edge label.
    pub fn end(&self) -> usize {
        match self.end {
            EdgeEnd::Fixed(end) => end,
            EdgeEnd::Open => panic!("Open edge outside of construction"),
        }
    }

    /// Index of the sequence the edge label points into.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Number of tokens on the edge, terminal symbol included.
    pub fn len(&self) -> usize {
        self.end() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tokens on the edge that count towards a match. The terminal
    /// symbol closing a leaf edge is left out.
    pub fn text_len(&self) -> usize {
        if self.is_leaf() {
            self.len().saturating_sub(1)
        } else {
            self.len()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &HashMap<Token, NodeId> {
        &self.children
    }

    pub fn child(&self, token: Token) -> Option<NodeId> {
        self.children.get(&token).copied()
    }

    pub fn suffix_link(&self) -> Option<NodeId> {
        self.suffix_link
    }

    /// Indices of all sequences that have a suffix running through this node,
    /// in ascending order.
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    pub fn contains_input(&self, sequence: usize) -> bool {
        self.inputs.binary_search(&sequence).is_ok()
    }

    pub(crate) fn add_input(&mut self, sequence: usize) {
        if let Err(pos) = self.inputs.binary_search(&sequence) {
            self.inputs.insert(pos, sequence);
        }
    }

    pub(crate) fn union_inputs(&mut self, other: &[usize]) {
        for &sequence in other {
            self.add_input(sequence);
        }
    }
}
