//! Bounded Top-K selection over a score stream.
//!
//! A min-heap of capacity `k` keeps the best entries seen so far; each push
//! costs O(log k). The same collector serves float classifier outputs and
//! quantized 8-bit outputs through [`RankScore`].

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Score types that can be ranked by [`TopK`].
pub trait RankScore: Copy {
    /// Total order used for ranking; greater ranks higher.
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl RankScore for f32 {
    #[inline]
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl RankScore for i8 {
    #[inline]
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl RankScore for u8 {
    #[inline]
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// A score together with its position in the input stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ranked<S> {
    /// Position of the score in the input.
    pub index: usize,
    /// The score itself.
    pub score: S,
}

impl<S: RankScore> Ranked<S> {
    /// Higher score ranks higher; equal scores rank the lower index higher.
    fn rank(&self, other: &Self) -> Ordering {
        self.score
            .rank_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

struct HeapEntry<S>(Ranked<S>);

impl<S: RankScore> PartialEq for HeapEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: RankScore> Eq for HeapEntry<S> {}

impl<S: RankScore> PartialOrd for HeapEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: RankScore> Ord for HeapEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank(&other.0)
    }
}

/// Top-K collector with O(log k) insertion cost.
pub struct TopK<S> {
    k: usize,
    heap: BinaryHeap<Reverse<HeapEntry<S>>>,
}

impl<S: RankScore> TopK<S> {
    /// Creates a collector that keeps at most `k` entries.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1)),
        }
    }

    /// Maximum number of retained entries.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pushes a score, evicting the lowest-ranked entry once over capacity.
    pub fn push(&mut self, index: usize, score: S) {
        if self.k == 0 {
            return;
        }
        self.heap.push(Reverse(HeapEntry(Ranked { index, score })));
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    /// Drops all retained entries, keeping the heap allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Returns the retained entries from highest to lowest rank.
    pub fn into_sorted_desc(self) -> Vec<Ranked<S>> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(HeapEntry(ranked))| ranked)
            .collect()
    }

    /// Appends the retained entries to `out` from highest to lowest rank and
    /// leaves the collector empty for reuse.
    pub fn drain_sorted_desc_into(&mut self, out: &mut Vec<Ranked<S>>) {
        let start = out.len();
        while let Some(Reverse(HeapEntry(ranked))) = self.heap.pop() {
            out.push(ranked);
        }
        out[start..].reverse();
    }
}

/// Returns up to `k` entries of `scores`, highest first.
pub fn select_top_k_ranked<S: RankScore>(scores: &[S], k: usize) -> Vec<Ranked<S>> {
    let mut topk = TopK::new(k.min(scores.len()));
    for (index, &score) in scores.iter().enumerate() {
        topk.push(index, score);
    }
    topk.into_sorted_desc()
}

/// Returns the indices of the `k` highest scores, highest first.
///
/// If `k >= scores.len()` every index is returned. Equal scores keep their
/// input order.
pub fn select_top_k<S: RankScore>(scores: &[S], k: usize) -> Vec<usize> {
    select_top_k_ranked(scores, k)
        .into_iter()
        .map(|ranked| ranked.index)
        .collect()
}
