use log::debug;

use crate::{GeneralizedSuffixTree, NodeId, PairResultTable, Result, Token, ROOT, TERMINAL};

impl GeneralizedSuffixTree {
    /// Length of the longest token string that occurs in both sequence
    /// `first` and sequence `second`.
    pub fn longest_common_substring(&self, first: usize, second: usize) -> Result<usize> {
        self.check_sequence(first)?;
        self.check_sequence(second)?;

        // Only nodes listing both sequences spell a common substring, and
        // their parents list both as well.
        let mut longest = 0;
        let mut stack = vec![(ROOT, 0)];
        while let Some((node_id, depth)) = stack.pop() {
            let node = self.node(node_id);
            if !node.contains_input(first) || !node.contains_input(second) {
                continue;
            }
            let depth = depth + node.text_len();
            longest = longest.max(depth);
            stack.extend(node.children().values().map(|&child| (child, depth)));
        }
        Ok(longest)
    }

    /// Longest common substring length of every pair of sequences, computed
    /// in a single traversal.
    #[must_use]
    pub fn all_longest_common_substrings(&self) -> PairResultTable<usize> {
        let mut table = PairResultTable::new(self.sequence_count(), 0);
        let mut stack = vec![(ROOT, 0)];
        while let Some((node_id, depth)) = stack.pop() {
            let node = self.node(node_id);
            let depth = depth + node.text_len();
            let inputs = node.inputs();
            for (k, &first) in inputs.iter().enumerate() {
                for &second in &inputs[k + 1..] {
                    let best = table.get_mut(first, second);
                    if depth > *best {
                        *best = depth;
                    }
                }
            }
            stack.extend(node.children().values().map(|&child| (child, depth)));
        }
        table
    }

    /// Find the longest token string common to every sequence in the tree.
    #[must_use]
    pub fn longest_common_substring_all(&self) -> Vec<Token> {
        let count = self.sequence_count();
        let mut parents: Vec<NodeId> = vec![ROOT; self.node_count()];
        let mut longest = (ROOT, 0);

        let mut stack = vec![(ROOT, 0)];
        while let Some((node_id, depth)) = stack.pop() {
            if depth > longest.1 {
                longest = (node_id, depth);
            }
            for &child in self.node(node_id).children().values() {
                let target = self.node(child);
                if target.inputs().len() != count {
                    continue;
                }
                parents[child] = node_id;
                stack.push((child, depth + target.text_len()));
            }
        }
        debug!("Longest substring common to all sequences has {} tokens", longest.1);

        let mut path = Vec::new();
        let mut node = longest.0;
        while node != ROOT {
            path.push(node);
            node = parents[node];
        }
        path.iter()
            .rev()
            .flat_map(|&node| self.text_label(node).iter().copied())
            .collect()
    }

    /// Find the longest slice of `query` that occurs in any sequence of the
    /// tree, without adding `query` to it.
    ///
    /// The query is scanned once. After a mismatch the match is shortened by
    /// one token from the front through the suffix link of the deepest node
    /// on the matched path, and the part already known to match is skipped
    /// over edge by edge rather than compared again.
    #[must_use]
    pub fn longest_common_substring_with<'a>(&self, query: &'a [Token]) -> &'a [Token] {
        let mut longest_start = 0;
        let mut longest_len = 0;

        // query[start..start + matched] occurs in the tree. `node` lies on its
        // path at string depth `depth`.
        let mut node = ROOT;
        let mut depth = 0;
        let mut matched = 0;

        for start in 0..query.len() {
            while depth < matched {
                let child = self.expect_child(node, query[start + depth]);
                let len = self.node(child).len();
                if depth + len > matched {
                    break;
                }
                node = child;
                depth += len;
            }

            while start + matched < query.len() {
                let token = query[start + matched];
                let edge = if matched == depth {
                    match self.node(node).child(token) {
                        Some(edge) => edge,
                        None => break,
                    }
                } else {
                    self.expect_child(node, query[start + depth])
                };
                let label = self.label(edge);
                let offset = matched - depth;
                if token == TERMINAL || label[offset] != token {
                    break;
                }
                matched += 1;
                if offset + 1 == label.len() {
                    node = edge;
                    depth = matched;
                }
            }

            if matched > longest_len {
                longest_len = matched;
                longest_start = start;
            }
            if matched == 0 {
                continue;
            }

            matched -= 1;
            if node != ROOT {
                node = match self.node(node).suffix_link() {
                    Some(link) => link,
                    None => panic!("Invalid suffix link on node {node}"),
                };
                depth -= 1;
            }
        }
        &query[longest_start..longest_start + longest_len]
    }

    fn expect_child(&self, node: NodeId, token: Token) -> NodeId {
        match self.node(node).child(token) {
            Some(child) => child,
            None => panic!("Matched path leaves node {node} without an edge for {token}"),
        }
    }
}
