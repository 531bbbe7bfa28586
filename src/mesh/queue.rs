//! Refinement priority queue.
//!
//! A binary max-heap of triangles keyed by their cached approximation error.
//! Every triangle slot tracks where it currently is ([`QueueState`]), so a
//! triangle can be removed from the middle of the heap in O(log n) when
//! retriangulation destroys it.
//!
//! Freshly created triangles are not evaluated right away. They are parked
//! on a pending list and evaluated as one batch by [`RefinementQueue::flush`],
//! which may fan the (read-only) evaluation out over a thread pool.

use rayon::prelude::*;

use crate::geometry::GridPoint;
use crate::heightmap::Candidate;

use super::index::TriangleId;

/// Where a triangle slot currently sits in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueState {
    /// Not tracked: retired, popped, or never created.
    #[default]
    Absent,
    /// Waiting for evaluation at the given index of the pending list.
    Pending(usize),
    /// In the heap at the given slot.
    Queued(usize),
}

/// Max-heap over triangle errors with removal by identity.
#[derive(Debug, Clone, Default)]
pub struct RefinementQueue {
    heap: Vec<TriangleId>,
    pending: Vec<TriangleId>,
    states: Vec<QueueState>,
    candidates: Vec<GridPoint>,
    errors: Vec<f32>,
}

impl RefinementQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of triangles awaiting evaluation.
    #[inline]
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    /// Triangles awaiting evaluation, in creation order.
    #[inline]
    pub fn pending(&self) -> &[TriangleId] {
        &self.pending
    }

    /// Current state of a triangle slot.
    #[inline]
    pub fn state(&self, t: TriangleId) -> QueueState {
        self.states.get(t.index()).copied().unwrap_or_default()
    }

    /// Cached error of a triangle (valid once it has been flushed).
    #[inline]
    pub fn error(&self, t: TriangleId) -> f32 {
        self.errors[t.index()]
    }

    /// Cached candidate point of a triangle (valid once it has been flushed).
    #[inline]
    pub fn candidate(&self, t: TriangleId) -> GridPoint {
        self.candidates[t.index()]
    }

    /// The triangle with the largest error, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<TriangleId> {
        self.heap.first().copied()
    }

    /// Error of the worst triangle, or zero when the heap is empty.
    #[inline]
    pub fn max_error(&self) -> f32 {
        self.peek().map_or(0.0, |t| self.error(t))
    }

    /// Iterate over queued triangles in heap order.
    pub fn iter(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.heap.iter().copied()
    }

    /// Park a new triangle on the pending list.
    ///
    /// # Panics
    ///
    /// Panics if the triangle is already pending or queued.
    pub fn mark_pending(&mut self, t: TriangleId) {
        self.grow(t);
        assert_eq!(self.state(t), QueueState::Absent, "{:?} is already tracked", t);
        self.states[t.index()] = QueueState::Pending(self.pending.len());
        self.pending.push(t);
    }

    /// Insert an evaluated triangle into the heap.
    ///
    /// # Panics
    ///
    /// Panics if the triangle is already pending or queued.
    pub fn push(&mut self, t: TriangleId, candidate: Candidate) {
        self.grow(t);
        assert_eq!(self.state(t), QueueState::Absent, "{:?} is already tracked", t);
        self.candidates[t.index()] = candidate.point;
        self.errors[t.index()] = candidate.error;

        let i = self.heap.len();
        self.states[t.index()] = QueueState::Queued(i);
        self.heap.push(t);
        self.up(i);
    }

    /// Remove and return the triangle with the largest error.
    pub fn pop(&mut self) -> Option<TriangleId> {
        if self.heap.is_empty() {
            return None;
        }
        let n = self.heap.len() - 1;
        self.swap(0, n);
        self.down(0, n);
        self.pop_back()
    }

    /// Drop a triangle from the heap or the pending list.
    ///
    /// Returns false if the triangle was not tracked.
    pub fn remove(&mut self, t: TriangleId) -> bool {
        match self.state(t) {
            QueueState::Absent => false,
            QueueState::Pending(i) => {
                self.pending.swap_remove(i);
                if let Some(&moved) = self.pending.get(i) {
                    self.states[moved.index()] = QueueState::Pending(i);
                }
                self.states[t.index()] = QueueState::Absent;
                true
            }
            QueueState::Queued(i) => {
                let n = self.heap.len() - 1;
                if i != n {
                    self.swap(i, n);
                    if !self.down(i, n) {
                        self.up(i);
                    }
                }
                self.pop_back();
                true
            }
        }
    }

    /// Evaluate every pending triangle and move it into the heap.
    ///
    /// `evaluate` must be pure: with `parallel` set it runs concurrently on
    /// the rayon pool. Results are pushed in pending order either way, so
    /// the heap layout does not depend on `parallel`.
    ///
    /// Returns the number of triangles flushed.
    pub fn flush<F>(&mut self, parallel: bool, evaluate: F) -> usize
    where
        F: Fn(TriangleId) -> Candidate + Sync + Send,
    {
        let mut pending = std::mem::take(&mut self.pending);
        let n = pending.len();

        if parallel && n > 1 {
            let candidates: Vec<Candidate> = pending.par_iter().map(|&t| evaluate(t)).collect();
            for (&t, candidate) in pending.iter().zip(candidates) {
                self.states[t.index()] = QueueState::Absent;
                self.push(t, candidate);
            }
        } else {
            for &t in &pending {
                let candidate = evaluate(t);
                self.states[t.index()] = QueueState::Absent;
                self.push(t, candidate);
            }
        }

        pending.clear();
        self.pending = pending;
        n
    }

    /// Check the max-heap property and the slot back-references.
    pub fn is_heap(&self) -> bool {
        let n = self.heap.len();
        for i in 0..n {
            if self.state(self.heap[i]) != QueueState::Queued(i) {
                return false;
            }
            for j in [2 * i + 1, 2 * i + 2] {
                if j < n && self.less(j, i) {
                    return false;
                }
            }
        }
        self.pending
            .iter()
            .enumerate()
            .all(|(i, &t)| self.state(t) == QueueState::Pending(i))
    }

    fn grow(&mut self, t: TriangleId) {
        let n = t.index() + 1;
        if self.states.len() < n {
            self.states.resize(n, QueueState::Absent);
            self.candidates.resize(n, GridPoint::origin());
            self.errors.resize(n, 0.0);
        }
    }

    /// Heap order: larger errors come first.
    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.errors[self.heap[i].index()] > self.errors[self.heap[j].index()]
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.states[self.heap[i].index()] = QueueState::Queued(i);
        self.states[self.heap[j].index()] = QueueState::Queued(j);
    }

    fn pop_back(&mut self) -> Option<TriangleId> {
        let t = self.heap.pop()?;
        self.states[t.index()] = QueueState::Absent;
        Some(t)
    }

    fn up(&mut self, mut j: usize) {
        while j > 0 {
            let i = (j - 1) / 2;
            if !self.less(j, i) {
                break;
            }
            self.swap(i, j);
            j = i;
        }
    }

    /// Sift down within the first `n` slots; returns true if the element moved.
    fn down(&mut self, i0: usize, n: usize) -> bool {
        let mut i = i0;
        loop {
            let j1 = 2 * i + 1;
            if j1 >= n {
                break;
            }
            let j2 = j1 + 1;
            let j = if j2 < n && self.less(j2, j1) { j2 } else { j1 };
            if !self.less(j, i) {
                break;
            }
            self.swap(i, j);
            i = j;
        }
        i > i0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(error: f32) -> Candidate {
        Candidate {
            point: GridPoint::new(1, 1),
            error,
        }
    }

    fn t(i: usize) -> TriangleId {
        TriangleId::new(i)
    }

    #[test]
    fn test_pop_order() {
        let mut queue = RefinementQueue::new();
        for (i, e) in [0.3, 0.9, 0.1, 0.5, 0.7].into_iter().enumerate() {
            queue.push(t(i), candidate(e));
        }
        assert!(queue.is_heap());
        assert_eq!(queue.max_error(), 0.9);

        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|t| t.index()).collect();
        assert_eq!(order, vec![1, 4, 3, 0, 2]);
        assert!(queue.is_empty());
        assert_eq!(queue.max_error(), 0.0);
    }

    #[test]
    fn test_equal_errors_keep_first_on_top() {
        let mut queue = RefinementQueue::new();
        queue.push(t(0), candidate(0.5));
        queue.push(t(1), candidate(0.5));
        assert_eq!(queue.peek(), Some(t(0)));
    }

    #[test]
    fn test_remove_from_heap() {
        let mut queue = RefinementQueue::new();
        for i in 0..20 {
            queue.push(t(i), candidate(((i * 7919) % 23) as f32));
        }
        assert!(queue.remove(t(5)));
        assert!(queue.remove(t(0)));
        assert!(!queue.remove(t(5)));
        assert_eq!(queue.len(), 18);
        assert_eq!(queue.state(t(5)), QueueState::Absent);
        assert!(queue.is_heap());

        let mut last = f32::INFINITY;
        while let Some(tri) = queue.pop() {
            assert!(tri != t(5) && tri != t(0));
            assert!(queue.error(tri) <= last);
            last = queue.error(tri);
        }
    }

    #[test]
    fn test_remove_pending() {
        let mut queue = RefinementQueue::new();
        for i in 0..4 {
            queue.mark_pending(t(i));
        }
        assert!(queue.remove(t(1)));
        assert_eq!(queue.num_pending(), 3);
        assert_eq!(queue.state(t(1)), QueueState::Absent);
        // The last entry was moved into the vacated position.
        assert_eq!(queue.state(t(3)), QueueState::Pending(1));
        assert!(queue.is_heap());
    }

    #[test]
    fn test_flush_moves_pending_into_heap() {
        let mut queue = RefinementQueue::new();
        for i in 0..6 {
            queue.mark_pending(t(i));
        }
        queue.remove(t(2));

        let flushed = queue.flush(false, |tri| candidate(tri.index() as f32));
        assert_eq!(flushed, 5);
        assert_eq!(queue.num_pending(), 0);
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek(), Some(t(5)));
        assert_eq!(queue.state(t(2)), QueueState::Absent);
        assert!(queue.is_heap());
    }

    #[test]
    fn test_parallel_flush_matches_sequential() {
        let eval = |tri: TriangleId| Candidate {
            point: GridPoint::new(tri.index() as i32, 0),
            error: ((tri.index() * 31) % 17) as f32,
        };

        let mut a = RefinementQueue::new();
        let mut b = RefinementQueue::new();
        for i in 0..100 {
            a.mark_pending(t(i));
            b.mark_pending(t(i));
        }
        a.flush(false, eval);
        b.flush(true, eval);

        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
        assert_eq!(b.candidate(t(42)), GridPoint::new(42, 0));
    }

    #[test]
    #[should_panic]
    fn test_double_pending_panics() {
        let mut queue = RefinementQueue::new();
        queue.mark_pending(t(0));
        queue.mark_pending(t(0));
    }
}
