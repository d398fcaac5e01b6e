/// Ordered set of selected vertex indices
use std::collections::HashSet;

/// Selected vertex indices in insertion order.
///
/// Duplicates are kept: an additive pick of an already selected vertex
/// appends it again, and the editor moves it once per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    indices: Vec<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    pub fn extend<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        self.indices.extend(indices);
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Number of distinct vertices selected
    pub fn unique_count(&self) -> usize {
        self.indices.iter().collect::<HashSet<_>>().len()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}
