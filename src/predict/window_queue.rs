//! Window history with one Markov chain per window.

use crate::predict::chain::Chain;
use crate::streaming::queue::OverwriteQueue;

/// One transcribed window and the chain trained while it was resident.
pub struct WindowRecord {
    pub tokens: Vec<String>,
    pub chain: Chain,
}

/// Ring of the last `depth` windows, each carrying its own chain.
///
/// Every incoming window's tokens are trained into every resident chain, so
/// the oldest window has accumulated statistics from all windows that arrived
/// during its lifetime, and the newest has been trained at least on itself.
pub struct WindowQ {
    q: OverwriteQueue<WindowRecord>,
    order: usize,
}

impl WindowQ {
    /// Creates a window queue of the given depth and n-gram order.
    pub fn new(depth: usize, order: usize) -> Self {
        Self {
            q: OverwriteQueue::new(depth),
            order,
        }
    }

    /// Number of resident windows.
    pub fn len(&self) -> usize {
        self.q.len()
    }

    /// True when no window has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// True once `depth` windows are resident.
    pub fn full(&self) -> bool {
        self.q.full()
    }

    /// Inserts a new window, evicting the oldest when full, then trains every
    /// resident chain on the new tokens, oldest window first.
    pub fn push_window(&mut self, tokens: Vec<String>) {
        self.q.push(WindowRecord {
            tokens: tokens.clone(),
            chain: Chain::new(self.order),
        });

        self.q.for_each_mut(|window| window.chain.train(&tokens));
    }

    /// Asks the newest window's chain for the continuation of `prefix`.
    /// Returns `None` when the queue is empty or the prefix is unknown.
    pub fn predict_next(&self, prefix: &[String]) -> Option<String> {
        self.q
            .peek_newest()
            .and_then(|window| window.chain.next(prefix))
    }
}
