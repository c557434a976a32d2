use crate::error::{BloomError, Result};
use crate::hash::{
    HashFunction, HashKind, compute_bit_count, compute_hash_count,
    default_hash_function,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Environment variable holding the expected element count.
pub const ENV_CAPACITY: &str = "BLOOM_CAPACITY";
/// Environment variable holding the target false positive rate.
pub const ENV_FALSE_POSITIVE_RATE: &str = "BLOOM_FALSE_POSITIVE_RATE";
/// Environment variable naming the index scheme (`sha256` or `fast`).
pub const ENV_HASH: &str = "BLOOM_HASH";

/// Sizing inputs for a [`crate::BloomFilter`].
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Expected number of elements
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Target false positive rate (0.0 to 1.0, exclusive)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,

    /// Index derivation
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(BloomError::invalid("Capacity must be > 0"));
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(BloomError::invalid("FPR must be between 0 and 1"));
        }
        Ok(())
    }

    /// Reads `BLOOM_CAPACITY`, `BLOOM_FALSE_POSITIVE_RATE` and `BLOOM_HASH`,
    /// falling back to the builder defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        ConfigOverrides::from_env()?.into_config()
    }
}

/// Sizing values that may or may not be set, layered over the builder
/// defaults. Produced from the environment or from command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub capacity: Option<usize>,
    pub false_positive_rate: Option<f64>,
    pub hash: Option<HashKind>,
}

impl ConfigOverrides {
    /// Parses the `BLOOM_*` variables that are set. Values are not range
    /// checked here so a later layer can still replace them.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            capacity: lookup(ENV_CAPACITY)
                .map(|v| parse_var(ENV_CAPACITY, &v))
                .transpose()?,
            false_positive_rate: lookup(ENV_FALSE_POSITIVE_RATE)
                .map(|v| parse_var(ENV_FALSE_POSITIVE_RATE, &v))
                .transpose()?,
            hash: lookup(ENV_HASH)
                .map(|v| parse_var(ENV_HASH, &v))
                .transpose()?,
        })
    }

    /// Values set in `top` win, the rest come from `self`.
    pub fn overridden_by(self, top: ConfigOverrides) -> Self {
        Self {
            capacity: top.capacity.or(self.capacity),
            false_positive_rate: top
                .false_positive_rate
                .or(self.false_positive_rate),
            hash: top.hash.or(self.hash),
        }
    }

    pub fn hash_kind(&self) -> HashKind {
        self.hash.unwrap_or_default()
    }

    /// Builds and validates the final configuration.
    pub fn into_config(self) -> Result<FilterConfig> {
        let mut builder = FilterConfigBuilder::default()
            .hash_function(self.hash_kind().function());
        if let Some(capacity) = self.capacity {
            builder = builder.capacity(capacity);
        }
        if let Some(rate) = self.false_positive_rate {
            builder = builder.false_positive_rate(rate);
        }

        let config = builder
            .build()
            .map_err(|e| BloomError::invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T>(var_name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| BloomError::EnvParseError {
            var_name: var_name.to_string(),
            value: value.to_string(),
            error: e.to_string(),
        })
}

/// Derived parameters calculated from FilterConfig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub bit_vector_size: usize,
    pub num_hashes: usize,
}

impl FilterParams {
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        let bit_vector_size = compute_bit_count(capacity, false_positive_rate)?;
        let num_hashes = compute_hash_count(bit_vector_size, capacity);

        Ok(Self {
            bit_vector_size,
            num_hashes,
        })
    }
}

impl TryFrom<&FilterConfig> for FilterParams {
    type Error = BloomError;

    fn try_from(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.false_positive_rate)
    }
}
