use crate::config::{FilterConfig, FilterParams};
use crate::error::{BloomError, Result};
use crate::hash::{
    HashFunction, default_hash_function, theoretical_false_positive_rate,
};
use bitvec::{bitvec, order::Lsb0, slice::BitSlice, vec::BitVec};
use tracing::debug;

/// A fixed-size bit-array Bloom filter.
///
/// Bits are only ever set, so a key that was added is reported present for
/// the lifetime of the filter. Keys that were never added may be reported
/// present with a probability governed by the size, the projection count and
/// the number of insertions.
pub struct BloomFilter {
    size: usize,
    hash_count: usize,
    hash_function: HashFunction,
    bits: BitVec<usize, Lsb0>,
    insert_count: usize,
}

impl BloomFilter {
    /// Creates an empty filter of `size` bits using `hash_count` SHA-256
    /// projections per key.
    pub fn new(size: usize, hash_count: usize) -> Result<Self> {
        Self::with_hash_function(size, hash_count, default_hash_function)
    }

    pub fn with_hash_function(
        size: usize,
        hash_count: usize,
        hash_function: HashFunction,
    ) -> Result<Self> {
        if size == 0 {
            return Err(BloomError::invalid("Bit array size must be > 0"));
        }
        if hash_count == 0 {
            return Err(BloomError::invalid("Hash count must be > 0"));
        }

        debug!(size, hash_count, "Allocating bloom filter");

        Ok(Self {
            size,
            hash_count,
            hash_function,
            bits: bitvec![usize, Lsb0; 0; size],
            insert_count: 0,
        })
    }

    /// Sizes the filter for `config.capacity` elements at
    /// `config.false_positive_rate`.
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        let params = FilterParams::try_from(config)?;
        debug!(
            capacity = config.capacity,
            false_positive_rate = config.false_positive_rate,
            bit_vector_size = params.bit_vector_size,
            num_hashes = params.num_hashes,
            "Derived filter parameters"
        );
        Self::with_hash_function(
            params.bit_vector_size,
            params.num_hashes,
            config.hash_function,
        )
    }

    /// The `hash_count` bit positions probed for `key`.
    pub fn hash_indices(&self, key: &[u8]) -> Vec<usize> {
        (self.hash_function)(key, self.hash_count, self.size)
    }

    pub fn add(&mut self, key: &[u8]) {
        for idx in self.hash_indices(key) {
            self.bits.set(idx, true);
        }
        self.insert_count += 1;
    }

    pub fn check(&self, key: &[u8]) -> bool {
        self.hash_indices(key).into_iter().all(|idx| self.bits[idx])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    /// Number of `add` calls, duplicates included.
    pub fn insert_count(&self) -> usize {
        self.insert_count
    }

    pub fn bits(&self) -> &BitSlice<usize, Lsb0> {
        &self.bits
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / self.size as f64
    }

    /// Formula estimate treating every `add` as a distinct key.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        theoretical_false_positive_rate(
            self.size,
            self.hash_count,
            self.insert_count,
        )
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ size: {}, hash_count: {}, insert_count: {}, bits_set: {} }}",
            self.size,
            self.hash_count,
            self.insert_count,
            self.count_ones()
        )
    }
}
