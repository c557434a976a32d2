//! Measures a filter against the exact set of keys it was built from.
//!
//! [`load`] feeds one key stream into both a [`BloomFilter`] and a
//! [`GroundTruthSet`]; [`evaluate`] then runs a second stream through both and
//! sorts every answer into one of four outcomes.
use crate::error::Result;
use crate::filter::BloomFilter;
use crate::ground_truth::GroundTruthSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use tracing::{info, warn};

/// Counts of each outcome for one evaluation run.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct OutcomeTally {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    /// Always zero for a correct filter.
    pub false_negative: usize,
}

impl OutcomeTally {
    pub fn record(&mut self, in_filter: bool, in_truth: bool) {
        match (in_filter, in_truth) {
            (true, true) => self.true_positive += 1,
            (false, false) => self.true_negative += 1,
            (true, false) => self.false_positive += 1,
            (false, true) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive
            + self.true_negative
            + self.false_positive
            + self.false_negative
    }

    /// `fp / (fp + tn)`: the share of absent keys the filter let through.
    pub fn observed_false_positive_rate(&self) -> f64 {
        let negatives = self.false_positive + self.true_negative;
        if negatives == 0 {
            0.0
        } else {
            self.false_positive as f64 / negatives as f64
        }
    }

    pub fn has_false_negatives(&self) -> bool {
        self.false_negative > 0
    }
}

impl fmt::Display for OutcomeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "True Positives:     {}", self.true_positive)?;
        writeln!(f, "True Negatives:     {}", self.true_negative)?;
        writeln!(f, "False Positives:    {}", self.false_positive)?;
        write!(f, "False Negatives:    {}", self.false_negative)
    }
}

fn insert_key(engine: &mut BloomFilter, truth: &mut GroundTruthSet, key: &[u8]) {
    engine.add(key);
    truth.record(key);
}

fn classify_key(
    tally: &mut OutcomeTally,
    engine: &BloomFilter,
    truth: &GroundTruthSet,
    key: &[u8],
) {
    tally.record(engine.check(key), truth.check_non_hash(key));
}

fn report(tally: &OutcomeTally) {
    info!(
        true_positive = tally.true_positive,
        true_negative = tally.true_negative,
        false_positive = tally.false_positive,
        false_negative = tally.false_negative,
        observed_fpr = tally.observed_false_positive_rate(),
        "Evaluation finished"
    );
    if tally.has_false_negatives() {
        warn!(
            false_negative = tally.false_negative,
            "Filter reported inserted keys as absent; bits were cleared or keys were encoded differently"
        );
    }
}

/// Inserts every key into both structures and returns how many were consumed.
pub fn load<I, K>(
    engine: &mut BloomFilter,
    truth: &mut GroundTruthSet,
    keys: I,
) -> usize
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let mut loaded = 0;
    for key in keys {
        insert_key(engine, truth, key.as_ref());
        loaded += 1;
    }
    info!(loaded, distinct = truth.len(), "Loaded keys");
    loaded
}

/// Like [`load`], stopping at the first read error.
///
/// Keys consumed before the error stay inserted.
pub fn try_load<I, K>(
    engine: &mut BloomFilter,
    truth: &mut GroundTruthSet,
    keys: I,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<K>>,
    K: AsRef<[u8]>,
{
    let mut loaded = 0;
    for key in keys {
        insert_key(engine, truth, key?.as_ref());
        loaded += 1;
    }
    info!(loaded, distinct = truth.len(), "Loaded keys");
    Ok(loaded)
}

pub fn evaluate<I, K>(
    engine: &BloomFilter,
    truth: &GroundTruthSet,
    keys: I,
) -> OutcomeTally
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let mut tally = OutcomeTally::default();
    for key in keys {
        classify_key(&mut tally, engine, truth, key.as_ref());
    }
    report(&tally);
    tally
}

pub fn try_evaluate<I, K>(
    engine: &BloomFilter,
    truth: &GroundTruthSet,
    keys: I,
) -> Result<OutcomeTally>
where
    I: IntoIterator<Item = io::Result<K>>,
    K: AsRef<[u8]>,
{
    let mut tally = OutcomeTally::default();
    for key in keys {
        classify_key(&mut tally, engine, truth, key?.as_ref());
    }
    report(&tally);
    Ok(tally)
}
