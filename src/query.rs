use crate::{GeneralizedSuffixTree, Token, ROOT, TERMINAL};

impl GeneralizedSuffixTree {
    /// Checks whether `query` is a suffix of any of the sequences in the tree.
    /// The empty query is a suffix of every sequence.
    #[must_use]
    pub fn has_suffix(&self, query: &[Token]) -> bool {
        self.is_suffix_or_substr(query, false)
    }

    /// Checks whether `query` occurs anywhere in any of the sequences in the
    /// tree. A query containing the terminal symbol never matches.
    #[must_use]
    pub fn has_substring(&self, query: &[Token]) -> bool {
        self.is_suffix_or_substr(query, true)
    }

    fn is_suffix_or_substr(&self, query: &[Token], check_substr: bool) -> bool {
        if query.contains(&TERMINAL) {
            return false;
        }
        let mut node = ROOT;
        let mut index = 0;
        while index < query.len() {
            let Some(target) = self.node(node).child(query[index]) else {
                return false;
            };
            for &token in self.label(target) {
                if index == query.len() {
                    // The query ends inside this edge.
                    return check_substr || token == TERMINAL;
                }
                if token != query[index] {
                    return false;
                }
                index += 1;
            }
            node = target;
        }
        check_substr || self.node(node).child(TERMINAL).is_some()
    }
}
