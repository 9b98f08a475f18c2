use super::assembly::LigandAlignmentAssembly;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// An assembly paired with its total score.
///
/// Ordered by score, then by fewer missing ligands, so "greater" always means "better".
#[derive(Debug, Clone)]
pub struct ScoredAssembly {
    pub score: f64,
    pub assembly: LigandAlignmentAssembly,
}

impl ScoredAssembly {
    pub fn new(assembly: LigandAlignmentAssembly, score: f64) -> Self {
        Self { score, assembly }
    }
}

impl PartialEq for ScoredAssembly {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ScoredAssembly {}

impl PartialOrd for ScoredAssembly {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredAssembly {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score).then_with(|| {
            other
                .assembly
                .missing_ligands_count()
                .cmp(&self.assembly.missing_ligands_count())
        })
    }
}

/// Keeps the best `capacity` starting assemblies seen so far.
///
/// A min-heap on [`ScoredAssembly`]'s ordering: the worst kept candidate sits on top and is
/// evicted when a strictly better one arrives while the pool is full.
#[derive(Debug)]
pub struct StartingAssemblyPool {
    capacity: usize,
    heap: BinaryHeap<Reverse<ScoredAssembly>>,
}

impl StartingAssemblyPool {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "starting assembly pool needs a positive capacity");
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Offers a candidate; returns whether it was kept.
    pub fn offer(&mut self, candidate: ScoredAssembly) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return true;
        }
        let improves = self
            .heap
            .peek()
            .is_some_and(|Reverse(worst)| candidate > *worst);
        if !improves {
            return false;
        }
        self.heap.pop();
        self.heap.push(Reverse(candidate));
        true
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drains the pool into a list ordered best first.
    pub fn into_ranked(self) -> Vec<ScoredAssembly> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(candidate)| candidate)
            .collect()
    }
}
