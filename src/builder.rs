//! Generalized Ukkonen construction.
//!
//! Sequences are inserted one after another into a single tree. Every stored
//! sequence already ends with the terminal symbol, and since all sequences
//! share that symbol, identical suffixes of different sequences end in the
//! same leaf; the leaf then lists every one of those sequences in its inputs.

use log::{debug, trace};

use crate::node::{EdgeEnd, Node};
use crate::{NodeId, Token, ROOT, TERMINAL};

/// The point from which the next extension resumes: `length` tokens along
/// the edge leaving `node` whose first token is the one at index `edge` of
/// the sequence being inserted.
#[derive(Debug, Clone, Copy)]
struct ActivePoint {
    node: NodeId,
    edge: usize,
    length: usize,
}

impl ActivePoint {
    const fn new() -> Self {
        Self {
            node: ROOT,
            edge: 0,
            length: 0,
        }
    }
}

pub(crate) struct Builder<'s> {
    sequences: &'s [Vec<Token>],
    nodes: Vec<Node>,
    active: ActivePoint,

    /// Suffixes of the current phase that still have to be made explicit.
    remaining: usize,

    /// End shared by all open leaves of the sequence being inserted.
    open_end: usize,
    open_leaves: Vec<NodeId>,
}

impl<'s> Builder<'s> {
    pub(crate) fn new(sequences: &'s [Vec<Token>]) -> Self {
        let mut root = Node::root();
        root.suffix_link = Some(ROOT);
        Self {
            sequences,
            nodes: vec![root],
            active: ActivePoint::new(),
            remaining: 0,
            open_end: 0,
            open_leaves: Vec::new(),
        }
    }

    /// Inserts every sequence, computes the inputs of every node and hands
    /// back the finished node storage.
    pub(crate) fn run(mut self) -> Vec<Node> {
        for sequence in 0..self.sequences.len() {
            self.insert(sequence);
            debug!(
                "Inserted sequence {sequence} ({} tokens), tree has {} nodes",
                self.sequences[sequence].len() - 1,
                self.nodes.len()
            );
        }
        self.propagate_inputs();
        self.nodes
    }

    fn insert(&mut self, sequence: usize) {
        assert!(sequence < self.sequences.len(), "Sequence {sequence} out of range");
        self.active = ActivePoint::new();
        self.remaining = 0;
        self.open_end = 0;

        let len = self.sequences[sequence].len();
        for phase in 0..len {
            self.extend(sequence, phase);
        }
        assert_eq!(self.remaining, 0, "Sequence {sequence} left suffixes behind");

        for leaf in self.open_leaves.drain(..) {
            self.nodes[leaf].end = EdgeEnd::Fixed(len);
        }
    }

    /// Runs the phase that adds the token at `phase` to every suffix still
    /// pending.
    fn extend(&mut self, sequence: usize, phase: usize) {
        let sequences = self.sequences;
        let text = &sequences[sequence];
        let token = text[phase];
        let terminal = token == TERMINAL;

        self.open_end = phase + 1;
        self.remaining += 1;
        let mut pending: Option<NodeId> = None;

        while self.remaining > 0 {
            if self.active.length == 0 {
                self.active.edge = phase;
            }
            let edge_token = text[self.active.edge];

            match self.nodes[self.active.node].child(edge_token) {
                None => {
                    let leaf = self.create_leaf(sequence, phase);
                    self.set_transition(self.active.node, edge_token, leaf);
                    if let Some(node) = pending.take() {
                        self.set_suffix_link(node, self.active.node);
                    }
                }
                Some(next) => {
                    if self.walk_down(next) {
                        continue;
                    }
                    let owner = self.nodes[next].sequence;
                    let split_index = self.nodes[next].start + self.active.length;
                    let ref_token = sequences[owner][split_index];

                    if ref_token == token {
                        if split_index + 1 == self.edge_end(next) {
                            self.nodes[next].add_input(sequence);
                        }
                        if let Some(node) = pending.take() {
                            self.set_suffix_link(node, self.active.node);
                        }
                        if !terminal {
                            self.active.length += 1;
                            break;
                        }
                    } else {
                        let start = self.nodes[next].start;
                        let split = self.create_node(Node::internal(owner, start, split_index));
                        self.set_transition(self.active.node, edge_token, split);

                        let leaf = self.create_leaf(sequence, phase);
                        self.set_transition(split, token, leaf);
                        self.nodes[next].start = split_index;
                        self.set_transition(split, ref_token, next);
                        trace!("Split edge of node {next} at {split_index} into node {split}");

                        if let Some(node) = pending.replace(split) {
                            self.set_suffix_link(node, split);
                        }
                    }
                }
            }

            self.remaining -= 1;
            if self.active.node == ROOT && self.active.length > 0 {
                self.active.length -= 1;
                self.active.edge = phase + 1 - self.remaining;
            } else if self.active.node != ROOT {
                let link = self.nodes[self.active.node].suffix_link;
                self.active.node = match link {
                    Some(link) => link,
                    None => panic!("Invalid suffix link on node {}", self.active.node),
                };
            }
        }
    }

    /// Moves the active point onto `next` when the active length covers its
    /// whole edge.
    fn walk_down(&mut self, next: NodeId) -> bool {
        let len = self.edge_len(next);
        if self.active.length < len {
            return false;
        }
        self.active.edge += len;
        self.active.length -= len;
        self.active.node = next;
        true
    }

    /// After all sequences are in, makes every node list the union of its
    /// children's inputs.
    ///
    /// Nodes are visited in pre-order from an explicit stack and folded into
    /// their parents in reverse, so every child is complete before its parent
    /// reads it.
    fn propagate_inputs(&mut self) {
        let mut order: Vec<(NodeId, NodeId)> = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(node) = stack.pop() {
            for &child in self.nodes[node].children.values() {
                order.push((child, node));
                stack.push(child);
            }
        }
        for &(child, parent) in order.iter().rev() {
            let inputs = std::mem::take(&mut self.nodes[child].inputs);
            self.nodes[parent].union_inputs(&inputs);
            self.nodes[child].inputs = inputs;
        }
    }

    fn edge_end(&self, node: NodeId) -> usize {
        match self.nodes[node].end {
            EdgeEnd::Fixed(end) => end,
            EdgeEnd::Open => self.open_end,
        }
    }

    fn edge_len(&self, node: NodeId) -> usize {
        self.edge_end(node) - self.nodes[node].start
    }

    fn create_leaf(&mut self, sequence: usize, start: usize) -> NodeId {
        let leaf = self.create_node(Node::leaf(sequence, start));
        self.open_leaves.push(leaf);
        leaf
    }

    fn create_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn set_transition(&mut self, node: NodeId, token: Token, target: NodeId) {
        self.nodes[node].children.insert(token, target);
    }

    fn set_suffix_link(&mut self, node: NodeId, target: NodeId) {
        self.nodes[node].suffix_link = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::testing::{random_sequences, tokens};
    use crate::{GeneralizedSuffixTree, NodeId, Token, ROOT, TERMINAL};

    fn edge(tree: &GeneralizedSuffixTree, node: NodeId, token: Token) -> NodeId {
        tree.node(node).child(token).expect("missing edge")
    }

    fn range(tree: &GeneralizedSuffixTree, node: NodeId) -> (usize, usize) {
        (tree.node(node).start(), tree.node(node).end())
    }

    #[test]
    fn single_token() {
        let tree = GeneralizedSuffixTree::new(&[[1]]).unwrap();
        let root = tree.node(ROOT);
        assert_eq!(root.children().len(), 2);
        assert_eq!(range(&tree, edge(&tree, ROOT, 1)), (0, 2));
        assert_eq!(range(&tree, edge(&tree, ROOT, TERMINAL)), (1, 2));
    }

    #[test]
    fn distinct_tokens() {
        let tree = GeneralizedSuffixTree::new(&[[1, 2, 3]]).unwrap();
        assert_eq!(tree.node(ROOT).children().len(), 4);
        assert_eq!(range(&tree, edge(&tree, ROOT, 1)), (0, 4));
        assert_eq!(range(&tree, edge(&tree, ROOT, 2)), (1, 4));
        assert_eq!(range(&tree, edge(&tree, ROOT, 3)), (2, 4));
        assert_eq!(range(&tree, edge(&tree, ROOT, TERMINAL)), (3, 4));
    }

    #[test]
    fn repeated_token_splits() {
        let tree = GeneralizedSuffixTree::new(&[[1, 1]]).unwrap();
        assert_eq!(tree.node(ROOT).children().len(), 2);

        let internal = edge(&tree, ROOT, 1);
        assert_eq!(range(&tree, internal), (0, 1));
        assert_eq!(tree.node(internal).children().len(), 2);
        assert_eq!(range(&tree, edge(&tree, internal, 1)), (1, 3));
        assert_eq!(range(&tree, edge(&tree, internal, TERMINAL)), (2, 3));
        assert_eq!(tree.node(internal).suffix_link(), Some(ROOT));
        assert_eq!(range(&tree, edge(&tree, ROOT, TERMINAL)), (2, 3));
    }

    #[test]
    fn single_tokens_of_two_sequences() {
        let tree = GeneralizedSuffixTree::new(&[[1], [2]]).unwrap();
        let root = tree.node(ROOT);
        assert_eq!(root.children().len(), 3);

        let first = tree.node(edge(&tree, ROOT, 1));
        assert_eq!((first.sequence(), first.start(), first.end()), (0, 0, 2));
        let second = tree.node(edge(&tree, ROOT, 2));
        assert_eq!((second.sequence(), second.start(), second.end()), (1, 0, 2));

        // Both sequences end in the same terminal leaf.
        let terminal = tree.node(edge(&tree, ROOT, TERMINAL));
        assert_eq!((terminal.sequence(), terminal.start(), terminal.end()), (0, 1, 2));
        assert_eq!(terminal.inputs(), &[0, 1]);
    }

    #[test]
    fn shared_prefix_gets_an_internal_node() {
        let tree = GeneralizedSuffixTree::new(&tokens(&["abc", "abd"])).unwrap();
        let root = tree.node(ROOT);
        let token_edges = root.children().keys().filter(|&&t| t != TERMINAL).count();
        assert_eq!(token_edges, 4);
        assert_eq!(root.children().len(), 5);

        let ab = edge(&tree, ROOT, u64::from(b'a'));
        assert!(!tree.node(ab).is_leaf());
        assert_eq!(tree.label(ab), &tokens(&["ab"])[0][..]);
        assert_eq!(tree.node(ab).inputs(), &[0, 1]);
        assert_eq!(tree.node(ab).children().len(), 2);

        let c = tree.node(edge(&tree, ab, u64::from(b'c')));
        assert_eq!((c.sequence(), c.start(), c.end()), (0, 2, 4));
        let d = tree.node(edge(&tree, ab, u64::from(b'd')));
        assert_eq!((d.sequence(), d.start(), d.end()), (1, 2, 4));
    }

    #[test]
    fn overlapping_substrings() {
        let tree = GeneralizedSuffixTree::new(&[[1, 2, 3], [4, 2, 1]]).unwrap();
        let one = edge(&tree, ROOT, 1);
        assert_eq!(range(&tree, one), (0, 1));
        let tail = tree.node(edge(&tree, one, TERMINAL));
        assert_eq!((tail.sequence(), tail.start(), tail.end()), (1, 3, 4));

        let two = edge(&tree, ROOT, 2);
        assert_eq!(range(&tree, two), (1, 2));
        assert_eq!(tree.node(two).children().len(), 2);
        let four = tree.node(edge(&tree, ROOT, 4));
        assert_eq!((four.sequence(), four.start(), four.end()), (1, 0, 4));
    }

    #[test]
    fn every_internal_node_has_a_suffix_link() {
        let sequences = random_sequences(11, 20, 60, 3);
        let tree = GeneralizedSuffixTree::new(&sequences).unwrap();
        for id in 0..tree.node_count() {
            let node = tree.node(id);
            if !node.is_leaf() {
                assert!(node.suffix_link().is_some(), "node {id} has no suffix link");
            }
        }
    }

    #[test]
    fn inputs_are_the_union_of_children() {
        let sequences = random_sequences(5, 10, 40, 4);
        let tree = GeneralizedSuffixTree::new(&sequences).unwrap();
        for id in 0..tree.node_count() {
            let node = tree.node(id);
            if node.is_leaf() {
                assert!(!node.inputs().is_empty());
                continue;
            }
            let mut union: Vec<usize> = node
                .children()
                .values()
                .flat_map(|&child| tree.node(child).inputs().iter().copied())
                .collect();
            union.sort_unstable();
            union.dedup();
            assert_eq!(node.inputs(), &union[..], "node {id}");
        }
    }

    #[test]
    fn leaves_count_every_suffix() {
        let sequences = random_sequences(3, 8, 30, 2);
        let tree = GeneralizedSuffixTree::new(&sequences).unwrap();
        let suffixes: usize = (0..tree.node_count())
            .map(|id| tree.node(id))
            .filter(|node| node.is_leaf())
            .map(|node| node.inputs().len())
            .sum();
        let expected: usize = sequences.iter().map(|s| s.len() + 1).sum();
        assert_eq!(suffixes, expected);
    }
}
