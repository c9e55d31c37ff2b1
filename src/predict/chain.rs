//! Order-N Markov chain over transcript tokens.
//!
//! Every training sequence is bracketed by reserved sentinels: N start
//! sentinels in front, one end sentinel behind. Prediction is deterministic,
//! so the emitter's alignment inputs stay stable across a run.

use std::collections::BTreeMap;

/// Reserved token marking the start of a training sequence. Prefixes shorter
/// than the chain order are left-padded with it.
pub const START_TOKEN: &str = "^";

/// Reserved token marking the end of a training sequence.
pub const END_TOKEN: &str = "$";

/// Transition-counting Markov chain of fixed order.
pub struct Chain {
    order: usize,
    transitions: BTreeMap<Vec<String>, BTreeMap<String, u32>>,
}

impl Chain {
    /// Creates an empty chain of the given n-gram order.
    ///
    /// # Panics
    /// Panics if `order` is zero.
    pub fn new(order: usize) -> Self {
        assert!(order > 0, "chain order must be at least 1");
        Self {
            order,
            transitions: BTreeMap::new(),
        }
    }

    /// Returns the n-gram order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Adds one token sequence to the chain's transition counts.
    ///
    /// The sequence is bracketed with `order` start sentinels and one end
    /// sentinel, then every adjacent (prefix, successor) pair is counted.
    pub fn train(&mut self, tokens: &[String]) {
        let mut seq: Vec<String> = Vec::with_capacity(self.order + tokens.len() + 1);
        seq.extend(std::iter::repeat_n(START_TOKEN.to_string(), self.order));
        seq.extend(tokens.iter().cloned());
        seq.push(END_TOKEN.to_string());

        for window in seq.windows(self.order + 1) {
            let prefix = window[..self.order].to_vec();
            let successor = window[self.order].clone();
            *self
                .transitions
                .entry(prefix)
                .or_default()
                .entry(successor)
                .or_insert(0) += 1;
        }
    }

    /// Returns the deterministic continuation of `prefix`, or `None` when the
    /// prefix was never observed.
    ///
    /// The choice rule is the first successor in lexicographic order, the
    /// fixed-choice equivalent of driving the chain with a zero RNG. The end
    /// sentinel sorts before every sanitized token, so a prefix that can end
    /// the sequence does.
    pub fn next(&self, prefix: &[String]) -> Option<String> {
        self.transitions
            .get(prefix)
            .and_then(|successors| successors.keys().next().cloned())
    }
}

/// Left-pads `tokens` with `pad` up to `len`. Returns `tokens` unchanged when
/// already long enough.
pub fn pad_left(tokens: &[String], pad: &str, len: usize) -> Vec<String> {
    if tokens.len() >= len {
        return tokens.to_vec();
    }

    let mut padded = Vec::with_capacity(len);
    padded.extend(std::iter::repeat_n(pad.to_string(), len - tokens.len()));
    padded.extend(tokens.iter().cloned());
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_chain_predicts_trained_sequence() {
        let mut chain = Chain::new(2);
        chain.train(&toks("the quick brown fox"));

        let start = pad_left(&[], START_TOKEN, 2);
        assert_eq!(chain.next(&start), Some("the".to_string()));
        assert_eq!(
            chain.next(&toks(&format!("{} the", START_TOKEN))),
            Some("quick".to_string())
        );
        assert_eq!(chain.next(&toks("the quick")), Some("brown".to_string()));
        assert_eq!(chain.next(&toks("brown fox")), Some(END_TOKEN.to_string()));
    }

    #[test]
    fn test_chain_unknown_prefix_is_none() {
        let mut chain = Chain::new(2);
        chain.train(&toks("a b c"));
        assert_eq!(chain.next(&toks("x y")), None);
    }

    #[test]
    fn test_chain_prediction_is_deterministic() {
        let mut chain = Chain::new(1);
        chain.train(&toks("go west"));
        chain.train(&toks("go east"));
        chain.train(&toks("go east"));

        // "east" < "west" lexicographically; the same answer every time.
        for _ in 0..5 {
            assert_eq!(chain.next(&toks("go")), Some("east".to_string()));
        }
    }

    #[test]
    fn test_chain_end_sentinel_sorts_first() {
        let mut chain = Chain::new(1);
        chain.train(&toks("stop"));
        chain.train(&toks("stop again"));

        // "stop" can end the sequence or continue with "again"; ending wins.
        assert_eq!(chain.next(&toks("stop")), Some(END_TOKEN.to_string()));
    }

    #[test]
    fn test_chain_short_sequence() {
        let mut chain = Chain::new(3);
        chain.train(&toks("hi"));

        let start = pad_left(&[], START_TOKEN, 3);
        assert_eq!(chain.next(&start), Some("hi".to_string()));
        let prefix = pad_left(&toks("hi"), START_TOKEN, 3);
        assert_eq!(chain.next(&prefix), Some(END_TOKEN.to_string()));
    }

    #[test]
    #[should_panic(expected = "order must be at least 1")]
    fn test_zero_order_panics() {
        Chain::new(0);
    }

    #[test]
    fn test_pad_left_shorter() {
        let padded = pad_left(&toks("a b"), START_TOKEN, 4);
        assert_eq!(padded, toks("^ ^ a b"));
    }

    #[test]
    fn test_pad_left_exact_and_longer() {
        assert_eq!(pad_left(&toks("a b"), START_TOKEN, 2), toks("a b"));
        assert_eq!(pad_left(&toks("a b c"), START_TOKEN, 2), toks("a b c"));
    }
}
