//! Fixed-capacity queue that overwrites its oldest element when full.
//!
//! Backs the window history used for chain training: pushing the newest
//! window evicts the oldest once capacity is reached, so memory stays
//! constant no matter how long the session runs.

/// Constant-memory queue that overwrites the oldest element when full.
pub struct OverwriteQueue<T> {
    buf: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> OverwriteQueue<T> {
    /// Creates a queue with the given capacity.
    ///
    /// # Panics
    /// Panics if `cap` is zero.
    pub fn new(cap: usize) -> Self {
        assert!(cap > 0, "queue capacity must be positive");
        Self {
            buf: (0..cap).map(|_| None).collect(),
            head: cap - 1,
            len: 0,
        }
    }

    /// Returns the fixed capacity.
    pub fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of resident elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no element has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true once `len() == cap()`.
    pub fn full(&self) -> bool {
        self.len == self.cap()
    }

    /// Adds an element to the queue. If the queue is at capacity, the oldest
    /// element is overwritten and dropped.
    pub fn push(&mut self, el: T) {
        self.head = (self.head + 1) % self.cap();

        if self.len < self.cap() {
            self.len += 1;
        }

        self.buf[self.head] = Some(el);
    }

    /// Returns the most recently pushed element, or `None` when empty.
    pub fn peek_newest(&self) -> Option<&T> {
        self.buf[self.head].as_ref()
    }

    /// Index of the oldest resident element.
    fn oldest(&self) -> usize {
        (self.head + self.cap() - self.len + 1) % self.cap()
    }

    /// Calls `f` for every resident element in temporal order, oldest first.
    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        let start = self.oldest();
        for i in 0..self.len {
            if let Some(el) = &self.buf[(start + i) % self.cap()] {
                f(el);
            }
        }
    }

    /// Like [`for_each`](Self::for_each), with mutable access.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let start = self.oldest();
        let cap = self.cap();
        for i in 0..self.len {
            if let Some(el) = &mut self.buf[(start + i) % cap] {
                f(el);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(q: &OverwriteQueue<u32>) -> Vec<u32> {
        let mut out = Vec::new();
        q.for_each(|&el| out.push(el));
        out
    }

    #[test]
    fn test_new_queue_is_empty() {
        let q = OverwriteQueue::<u32>::new(3);
        assert_eq!(q.len(), 0);
        assert_eq!(q.cap(), 3);
        assert!(q.is_empty());
        assert!(!q.full());
        assert!(q.peek_newest().is_none());
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_panics() {
        OverwriteQueue::<u32>::new(0);
    }

    #[test]
    fn test_len_is_min_of_pushes_and_cap() {
        let mut q = OverwriteQueue::new(3);
        for k in 1..=5u32 {
            q.push(k);
            assert_eq!(q.len(), (k as usize).min(3));
        }
        assert!(q.full());
    }

    #[test]
    fn test_peek_newest_is_last_push() {
        let mut q = OverwriteQueue::new(3);
        for k in 1..=5u32 {
            q.push(k);
            assert_eq!(q.peek_newest(), Some(&k));
        }
    }

    #[test]
    fn test_for_each_partial_fill_temporal_order() {
        let mut q = OverwriteQueue::new(4);
        q.push(10);
        q.push(20);
        assert_eq!(collect(&q), vec![10, 20]);
    }

    #[test]
    fn test_for_each_full_temporal_order() {
        let mut q = OverwriteQueue::new(3);
        for k in [1, 2, 3, 4, 5] {
            q.push(k);
        }
        // 1 and 2 were overwritten; oldest resident first.
        assert_eq!(collect(&q), vec![3, 4, 5]);
    }

    #[test]
    fn test_overwrite_drops_oldest() {
        let mut q = OverwriteQueue::new(2);
        q.push("a");
        q.push("b");
        q.push("c");
        let mut out = Vec::new();
        q.for_each(|el| out.push(*el));
        assert_eq!(out, vec!["b", "c"]);
        assert_eq!(q.peek_newest(), Some(&"c"));
    }

    #[test]
    fn test_for_each_mut_updates_in_place() {
        let mut q = OverwriteQueue::new(3);
        q.push(1);
        q.push(2);
        q.for_each_mut(|el| *el += 100);
        assert_eq!(collect(&q), vec![101, 102]);
    }

    #[test]
    fn test_capacity_one() {
        let mut q = OverwriteQueue::new(1);
        q.push(7);
        assert!(q.full());
        q.push(8);
        assert_eq!(q.len(), 1);
        assert_eq!(collect(&q), vec![8]);
    }
}
