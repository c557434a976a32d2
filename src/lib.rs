//! Bit-array Bloom filter with optimal sizing and a ground-truth evaluator.
//!
//! HowTo:
//!    * Sizing: for `n` expected keys and a target false positive rate `p`,
//!      the bit array holds `m = ceil(-n ln p / (ln 2)^2)` bits and every key
//!      is projected onto `k = round(m/n ln 2)` of them.
//!    * Projections: projection `i` of a key is SHA-256 over the key bytes
//!      followed by the decimal digits of `i`, reduced modulo `m`.
//!
//! Insertion:
//!     * Set the `k` bits derived from the key. Inserting twice changes nothing.
//! Query:
//!     * The key is possibly present iff all `k` bits are set, and definitely
//!       absent otherwise.
//! Evaluation:
//!     * Load one key stream into both the filter and an exact set, query a
//!       second stream against both, and count true/false positives/negatives.
//!
//! Obvious problems:
//!     * No deletion: clearing a bit could forget other keys.
//!     * The false positive rate only holds while the number of distinct keys
//!       stays at or below the capacity the filter was sized for.

pub mod common;
mod config;
mod error;
pub mod evaluator;
mod filter;
mod ground_truth;
mod hash;
mod source;

pub use config::{
    ConfigOverrides, ENV_CAPACITY, ENV_FALSE_POSITIVE_RATE, ENV_HASH,
    FilterConfig, FilterConfigBuilder, FilterConfigBuilderError, FilterParams,
};
pub use error::{BloomError, Result};
pub use evaluator::{OutcomeTally, evaluate, load, try_evaluate, try_load};
pub use filter::BloomFilter;
pub use ground_truth::GroundTruthSet;
pub use hash::{
    HashFunction, HashKind, compute_bit_count, compute_hash_count,
    default_hash_function, fast_hash_function, sha256_hash_function,
    theoretical_false_positive_rate,
};
pub use source::{KeyLines, read_keys};
