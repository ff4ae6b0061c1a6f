//! Binary min-heap used to build the Huffman tree.
//!
//! The heap orders elements by their `Ord` implementation, smallest first.
//! It makes no tie-break decisions of its own: callers that need a
//! reproducible pop order must give every element a distinct key. The tree
//! builder does this by pairing each frequency with an insertion sequence.

/// Minimum priority queue backed by a vector.
#[derive(Debug, Clone)]
pub struct PriorityHeap<T> {
    elements: Vec<T>,
}

impl<T: Ord> PriorityHeap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Create an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements in the heap.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Insert an element. O(log n).
    pub fn push(&mut self, element: T) {
        self.elements.push(element);
        self.sift_up(self.elements.len() - 1);
    }

    /// Remove and return the minimum element. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        self.sift_down(0);
        min
    }

    /// The minimum element, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Move the element at `pos` toward the root while it is strictly
    /// smaller than its parent.
    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.elements[pos] >= self.elements[parent] {
                break;
            }
            self.elements.swap(pos, parent);
            pos = parent;
        }
    }

    /// Move the element at `pos` toward the leaves until both children are
    /// no smaller than it.
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.elements.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;

            if left < len && self.elements[left] < self.elements[smallest] {
                smallest = left;
            }
            if right < len && self.elements[right] < self.elements[smallest] {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.elements.swap(pos, smallest);
            pos = smallest;
        }
    }

    /// Check the heap property over every parent/child pair.
    pub fn is_valid(&self) -> bool {
        (1..self.elements.len()).all(|i| self.elements[(i - 1) / 2] <= self.elements[i])
    }
}

impl<T: Ord> Default for PriorityHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for PriorityHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut heap = PriorityHeap::with_capacity(iter.size_hint().0);
        for element in iter {
            heap.push(element);
        }
        heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_heap() {
        let mut heap: PriorityHeap<u32> = PriorityHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_pop_order() {
        let mut heap: PriorityHeap<u32> = [5, 3, 9, 1, 7, 1, 4].into_iter().collect();
        assert_eq!(heap.len(), 7);
        assert!(heap.is_valid());

        let mut drained = Vec::new();
        while let Some(v) = heap.pop() {
            assert!(heap.is_valid());
            drained.push(v);
        }
        assert_eq!(drained, vec![1, 1, 3, 4, 5, 7, 9]);
    }

    #[test]
    fn test_peek_tracks_minimum() {
        let mut heap = PriorityHeap::new();
        heap.push(10);
        assert_eq!(heap.peek(), Some(&10));
        heap.push(4);
        assert_eq!(heap.peek(), Some(&4));
        heap.push(6);
        assert_eq!(heap.peek(), Some(&4));
        heap.pop();
        assert_eq!(heap.peek(), Some(&6));
    }

    #[test]
    fn test_tuple_keys_give_stable_order() {
        // (frequency, sequence): equal frequencies pop in sequence order.
        let mut heap = PriorityHeap::new();
        for (seq, freq) in [2u64, 1, 2, 1, 1].into_iter().enumerate() {
            heap.push((freq, seq));
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop()).map(|(_, s)| s).collect();
        assert_eq!(order, vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut heap = PriorityHeap::new();
        heap.push(8);
        heap.push(2);
        assert_eq!(heap.pop(), Some(2));
        heap.push(5);
        heap.push(1);
        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.pop(), Some(5));
        assert_eq!(heap.pop(), Some(8));
        assert!(heap.is_empty());
    }
}
