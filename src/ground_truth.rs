use std::collections::HashSet;

/// Exact record of every key handed to a filter, for measuring its error.
///
/// Never consulted by [`crate::BloomFilter::add`] or
/// [`crate::BloomFilter::check`].
#[derive(Debug, Default, Clone)]
pub struct GroundTruthSet {
    keys: HashSet<Vec<u8>>,
}

impl GroundTruthSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &[u8]) {
        if !self.keys.contains(key) {
            self.keys.insert(key.to_vec());
        }
    }

    /// Exact membership; unseen keys are simply absent.
    pub fn check_non_hash(&self, key: &[u8]) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct keys recorded.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
