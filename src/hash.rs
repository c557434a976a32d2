use crate::error::{BloomError, Result};
use fnv::FnvHasher;
use murmur3::murmur3_32;
use sha2::{Digest, Sha256};
use std::f64::consts::LN_2;
use std::fmt;
use std::hash::Hasher;
use std::io::Cursor;
use std::str::FromStr;

/// A type alias for the index derivation used by the Bloom filter.
///
/// **Parameters:**
///
/// - `item: &[u8]`
///   - A byte slice representing the key to be hashed.
/// - `num_hashes: usize`
///   - The number of indices (hash projections) to derive for the key.
/// - `size: usize`
///   - The length of the bit array. Every returned index is in `[0, size)`,
///     so `size` must be at least 1.
///
/// **Returns:**
///
/// - `Vec<usize>`
///   - One index per projection, in projection order.
///
/// Implementations must be deterministic: the same key, projection count and
/// size always yield the same indices, in this process and any other.
pub type HashFunction = fn(&[u8], usize, usize) -> Vec<usize>;

/// Derives indices from SHA-256 over `item ++ decimal(i)` for each projection
/// `i`, reading the digest as a big-endian unsigned integer modulo `size`.
///
/// # Panics
///
/// Panics if `size` is 0 and `num_hashes` is not.
pub fn sha256_hash_function(
    item: &[u8],
    num_hashes: usize,
    size: usize,
) -> Vec<usize> {
    debug_assert!(size > 0 || num_hashes == 0, "bit array size must be > 0");
    let mut keyed = Sha256::new();
    keyed.update(item);

    (0..num_hashes)
        .map(|i| {
            let mut hasher = keyed.clone();
            hasher.update(i.to_string().as_bytes());
            reduce_digest(&hasher.finalize(), size)
        })
        .collect()
}

/// Reduces a big-endian byte string modulo `modulus` without materializing the
/// full integer.
fn reduce_digest(digest: &[u8], modulus: usize) -> usize {
    let m = modulus as u128;
    digest
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | byte as u128) % m) as usize
}

pub(crate) fn hash_murmur32(key: &[u8]) -> u32 {
    let mut cursor = Cursor::new(key);
    murmur3_32(&mut cursor, 0).expect("Failed to compute Murmur3 hash")
}

pub(crate) fn hash_fnv64(key: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish()
}

/// Non-cryptographic double hashing: `h1 + i * h2 mod size`.
///
/// Much cheaper than [`sha256_hash_function`]. The observed false positive
/// rate tracks the same formula for practical sizes, but the indices are not
/// compatible with the digest scheme.
///
/// # Panics
///
/// Panics if `size` is 0 and `num_hashes` is not.
pub fn fast_hash_function(
    item: &[u8],
    num_hashes: usize,
    size: usize,
) -> Vec<usize> {
    debug_assert!(size > 0 || num_hashes == 0, "bit array size must be > 0");
    let h1 = hash_murmur32(item) as u64;
    let h2 = hash_fnv64(item);
    (0..num_hashes)
        .map(|i| {
            (h1.wrapping_add((i as u64).wrapping_mul(h2)) % size as u64)
                as usize
        })
        .collect()
}

pub fn default_hash_function(
    item: &[u8],
    num_hashes: usize,
    size: usize,
) -> Vec<usize> {
    sha256_hash_function(item, num_hashes, size)
}

/// Named index schemes, for selecting a [`HashFunction`] from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashKind {
    #[default]
    Sha256,
    Fast,
}

impl HashKind {
    pub fn function(self) -> HashFunction {
        match self {
            HashKind::Sha256 => sha256_hash_function,
            HashKind::Fast => fast_hash_function,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashKind::Sha256 => "sha256",
            HashKind::Fast => "fast",
        }
    }
}

impl FromStr for HashKind {
    type Err = BloomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashKind::Sha256),
            "fast" | "murmur" => Ok(HashKind::Fast),
            _ => Err(BloomError::UnknownHashFunction(s.to_string())),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Smallest bit count satisfying `m = ceil(-n * ln(p) / (ln 2)^2)`.
///
/// `capacity` accepts any integer type so that negative counts coming from a
/// caller are rejected here rather than wrapped.
pub fn compute_bit_count<C>(capacity: C, error_rate: f64) -> Result<usize>
where
    C: TryInto<usize> + Copy + fmt::Display,
{
    let n = match capacity.try_into() {
        Ok(n) if n > 0 => n,
        _ => {
            return Err(BloomError::invalid(format!(
                "capacity must be > 0, got {capacity}"
            )));
        }
    };
    // Written this way so NaN is rejected too.
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(BloomError::invalid(format!(
            "error rate must be between 0 and 1 (exclusive), got {error_rate}"
        )));
    }

    let bits = ((-(n as f64) * error_rate.ln()) / (LN_2 * LN_2)).ceil();
    if !bits.is_finite() || bits >= usize::MAX as f64 {
        return Err(BloomError::invalid(format!(
            "bit array for capacity {n} at error rate {error_rate} does not fit in memory"
        )));
    }
    Ok((bits as usize).max(1))
}

/// Optimal projection count `k = round((m / n) * ln 2)`, never less than 1.
pub fn compute_hash_count(bits: usize, capacity: usize) -> usize {
    let n = capacity.max(1) as f64;
    ((bits as f64 / n) * LN_2).round().max(1.0) as usize
}

/// Expected false positive probability `(1 - e^(-kn/m))^k` after `inserted`
/// distinct insertions.
pub fn theoretical_false_positive_rate(
    bits: usize,
    hash_count: usize,
    inserted: usize,
) -> f64 {
    if bits == 0 {
        return 1.0;
    }
    let k = hash_count as f64;
    let exponent = -k * inserted as f64 / bits as f64;
    (1.0 - exponent.exp()).powf(k)
}
