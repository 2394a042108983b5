use hashbrown::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A min-ordered binary heap over arbitrary payloads, extended with a
/// by-value index so that `contains`, `remove` and `update` do not require
/// a linear scan.
///
/// Payloads are stored by value (`V: Clone`) both in the heap array and as
/// keys of the side index; this is the natural shape for vertex identities,
/// which this codebase treats as small, cheaply-cloned values (coordinate
/// tuples, interned ids) rather than as dense integers. A dense-id heap
/// could index the side table with a plain array, but an arbitrary
/// `Hash + Eq` vertex type rules that out, so the index here is a
/// `HashMap`.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<V, K> {
    heap: Vec<(V, K)>,
    index: HashMap<V, usize>,
}

impl<V, K> Default for IndexedPriorityQueue<V, K>
where
    V: Eq + Hash + Clone,
    K: Ord + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, K> IndexedPriorityQueue<V, K>
where
    V: Eq + Hash + Clone,
    K: Ord + Copy,
{
    pub fn new() -> Self {
        IndexedPriorityQueue {
            heap: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, v: &V) -> bool {
        self.index.contains_key(v)
    }

    /// The minimum payload, without removing it.
    pub fn peek(&self) -> Option<&V> {
        self.heap.first().map(|(v, _)| v)
    }

    /// The key of the minimum payload, without removing it.
    pub fn peek_key(&self) -> Option<K> {
        self.heap.first().map(|(_, k)| *k)
    }

    /// Inserts `v` with the given key. The caller is responsible for not
    /// inserting a payload that is already present; duplicates are not
    /// checked in release builds.
    pub fn add(&mut self, v: V, key: K) {
        debug_assert!(!self.contains(&v), "duplicate insert into IndexedPriorityQueue");
        let place = self.heap.len();
        self.index.insert(v.clone(), place);
        self.heap.push((v, key));
        self.sift_up(place);
    }

    /// Removes and returns the minimum payload, if any.
    pub fn poll(&mut self) -> Option<V> {
        if self.heap.is_empty() {
            return None;
        }
        let (v, _) = self.heap.swap_remove(0);
        self.index.remove(&v);
        if !self.heap.is_empty() {
            // the element swapped into the root needs its index entry updated
            let moved = self.heap[0].0.clone();
            self.index.insert(moved, 0);
            self.sift_down(0);
        }
        Some(v)
    }

    /// Removes the unique entry equal to `v`, if present. Returns whether
    /// something was removed.
    pub fn remove(&mut self, v: &V) -> bool {
        let Some(place) = self.index.remove(v) else {
            return false;
        };
        let last = self.heap.len() - 1;
        if place != last {
            self.heap.swap(place, last);
            let moved = self.heap[place].0.clone();
            self.index.insert(moved, place);
        }
        self.heap.pop();
        if place < self.heap.len() {
            self.sift_down(place);
            self.sift_up(place);
        }
        true
    }

    /// Re-sorts `v` after its key has changed to `new_key`.
    ///
    /// Returns `false` if `v` is not currently enqueued.
    pub fn update(&mut self, v: &V, new_key: K) -> bool {
        let Some(&place) = self.index.get(v) else {
            return false;
        };
        self.heap[place].1 = new_key;
        self.sift_down(place);
        self.sift_up(place);
        true
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
    }

    /// Rebuilds heap order in O(n), for use after a batch of key changes
    /// applied directly to stored keys without going through `update`.
    pub fn heapify(&mut self) {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i);
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (v, _)) in self.heap.iter().enumerate() {
            self.index.insert(v.clone(), i);
        }
    }

    fn parent(i: usize) -> Option<usize> {
        if i == 0 {
            None
        } else {
            Some((i - 1) / 2)
        }
    }

    fn children(i: usize) -> (usize, usize) {
        (2 * i + 1, 2 * i + 2)
    }

    fn sift_up(&mut self, mut i: usize) {
        while let Some(p) = Self::parent(i) {
            if self.heap[p].1 <= self.heap[i].1 {
                break;
            }
            self.swap(p, i);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let (l, r) = Self::children(i);
            let mut smallest = i;
            if l < len && self.heap[l].1 < self.heap[smallest].1 {
                smallest = l;
            }
            if r < len && self.heap[r].1 < self.heap[smallest].1 {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.index.insert(self.heap[i].0.clone(), i);
        self.index.insert(self.heap[j].0.clone(), j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn is_sorted_poll_order(items: Vec<(i64, i64)>) -> Vec<i64> {
        let mut q = IndexedPriorityQueue::new();
        for (v, k) in items {
            q.add(v, k);
        }
        let mut out = Vec::new();
        while let Some(v) = q.poll() {
            out.push(v);
        }
        out
    }

    #[test]
    fn basic_ordering() {
        let out = is_sorted_poll_order(vec![(3, 3), (1, 1), (2, 2), (0, 0)]);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut q = IndexedPriorityQueue::new();
        q.add("a", 5);
        q.add("b", 1);
        assert_eq!(q.peek(), Some(&"b"));
        assert_eq!(q.size(), 2);
        assert_eq!(q.poll(), Some("b"));
        assert_eq!(q.poll(), Some("a"));
        assert_eq!(q.poll(), None);
    }

    #[test]
    fn contains_and_remove() {
        let mut q = IndexedPriorityQueue::new();
        for v in 0..10 {
            q.add(v, v);
        }
        assert!(q.contains(&5));
        assert!(q.remove(&5));
        assert!(!q.contains(&5));
        assert!(!q.remove(&5));
        assert_eq!(q.size(), 9);
        let mut out = Vec::new();
        while let Some(v) = q.poll() {
            out.push(v);
        }
        assert_eq!(out, vec![0, 1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn clear_empties_both_structures() {
        let mut q = IndexedPriorityQueue::new();
        for v in 0..5 {
            q.add(v, v);
        }
        q.clear();
        assert!(q.is_empty());
        assert!(!q.contains(&0));
        assert_eq!(q.poll(), None);
    }

    /// Random insert order, randomized `update` calls, polling in sequence
    /// yields the sorted order.
    #[test]
    fn random_insert_then_update_then_poll_in_order() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut order: Vec<i64> = (0..1000).collect();
        order.shuffle(&mut rng);

        let mut q = IndexedPriorityQueue::new();
        for &v in &order {
            q.add(v, v);
        }

        // pick 200 random pairs and swap their keys, calling `update` on each.
        for _ in 0..200 {
            let a = rng.gen_range(0..1000);
            let b = rng.gen_range(0..1000);
            if a == b {
                continue;
            }
            let ka = q.key_for_test(&a);
            let kb = q.key_for_test(&b);
            q.update(&a, kb);
            q.update(&b, ka);
        }

        let mut out = Vec::new();
        while let Some(v) = q.poll() {
            out.push(v);
        }
        assert_eq!(out, (0..1000).collect::<Vec<_>>());
    }

    /// Bulk key mutation without per-swap `update`, followed by a single
    /// `heapify`.
    #[test]
    fn heapify_after_bulk_key_mutation() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut order: Vec<i64> = (0..1000).collect();
        order.shuffle(&mut rng);

        let mut q = IndexedPriorityQueue::new();
        for &v in &order {
            q.add(v, v);
        }

        for _ in 0..200 {
            let a = rng.gen_range(0..1000);
            let b = rng.gen_range(0..1000);
            q.swap_keys_for_test(&a, &b);
        }
        q.heapify();

        let mut out = Vec::new();
        while let Some(v) = q.poll() {
            out.push(v);
        }
        assert_eq!(out, (0..1000).collect::<Vec<_>>());
    }

    impl<V, K> IndexedPriorityQueue<V, K>
    where
        V: Eq + Hash + Clone,
        K: Ord + Copy,
    {
        fn key_for_test(&self, v: &V) -> K {
            let place = self.index[v];
            self.heap[place].1
        }

        fn swap_keys_for_test(&mut self, a: &V, b: &V) {
            let pa = self.index[a];
            let pb = self.index[b];
            let ka = self.heap[pa].1;
            let kb = self.heap[pb].1;
            self.heap[pa].1 = kb;
            self.heap[pb].1 = ka;
        }
    }
}
