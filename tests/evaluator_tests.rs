mod common;

use bloomcheck::{
    BloomFilter, FilterConfigBuilder, GroundTruthSet, OutcomeTally, evaluate,
    load, read_keys, try_evaluate, try_load,
};
use common::{TestFile, generate_random_string, generate_test_items};
use std::collections::HashSet;

fn sized_filter(capacity: usize, fpr: f64) -> BloomFilter {
    let config = FilterConfigBuilder::default()
        .capacity(capacity)
        .false_positive_rate(fpr)
        .build()
        .expect("Failed to build test config");
    BloomFilter::from_config(&config).expect("Failed to create test filter")
}

#[cfg(test)]
mod in_memory_tests {
    use super::*;

    #[test]
    fn test_load_set_yields_only_true_positives() {
        let mut filter = sized_filter(500, 0.01);
        let mut truth = GroundTruthSet::new();
        let keys = generate_test_items("word", 500);

        assert_eq!(load(&mut filter, &mut truth, &keys), 500);

        let tally = evaluate(&filter, &truth, &keys);
        assert_eq!(
            tally,
            OutcomeTally {
                true_positive: 500,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_disjoint_set_yields_only_negatives_and_false_positives() {
        let mut filter = sized_filter(1_000, 0.05);
        let mut truth = GroundTruthSet::new();
        load(&mut filter, &mut truth, generate_test_items("inside", 1_000));

        let probes = generate_test_items("outside", 2_000);
        let tally = evaluate(&filter, &truth, &probes);

        assert_eq!(tally.true_positive, 0);
        assert_eq!(tally.false_negative, 0);
        assert_eq!(tally.true_negative + tally.false_positive, 2_000);
        assert!(
            tally.observed_false_positive_rate() < 0.1,
            "{}",
            tally.observed_false_positive_rate()
        );
    }

    #[test]
    fn test_mixed_queries() {
        let mut filter = sized_filter(100, 0.01);
        let mut truth = GroundTruthSet::new();
        let members = generate_test_items("member", 100);
        load(&mut filter, &mut truth, &members);

        let mut queries = members[..50].to_vec();
        queries.extend(generate_test_items("stranger", 50));

        let tally = evaluate(&filter, &truth, &queries);
        assert_eq!(tally.true_positive, 50);
        assert_eq!(tally.true_negative + tally.false_positive, 50);
        assert_eq!(tally.total(), 100);
    }

    #[test]
    fn test_random_strings_never_miss() {
        let mut filter = sized_filter(2_000, 0.01);
        let mut truth = GroundTruthSet::new();
        let keys: HashSet<String> =
            (0..2_000).map(|_| generate_random_string(24)).collect();

        load(&mut filter, &mut truth, &keys);
        let tally = evaluate(&filter, &truth, &keys);

        assert_eq!(tally.true_positive, keys.len());
        assert!(!tally.has_false_negatives());
    }

    #[test]
    fn test_evaluate_does_not_mutate() {
        let mut filter = sized_filter(100, 0.01);
        let mut truth = GroundTruthSet::new();
        load(&mut filter, &mut truth, ["x", "y", "z"]);

        let bits_before = filter.bits().to_bitvec();
        let first = evaluate(&filter, &truth, ["x", "q", "z"]);
        let second = evaluate(&filter, &truth, ["x", "q", "z"]);

        assert_eq!(first, second);
        assert_eq!(filter.bits(), bits_before.as_bitslice());
        assert_eq!(truth.len(), 3);
    }

    #[test]
    fn test_mismatched_streams_surface_false_negatives() {
        // Filter and truth populated from different streams: an implementation
        // bug the tally must expose instead of hiding.
        let mut filter = sized_filter(1_000, 0.001);
        let mut truth = GroundTruthSet::new();
        let mut scratch = GroundTruthSet::new();

        load(&mut filter, &mut scratch, ["alpha"]);
        truth.record(b"alpha");
        truth.record(b"omega");

        let tally = evaluate(&filter, &truth, ["alpha", "omega"]);
        assert_eq!(tally.true_positive, 1);
        assert_eq!(tally.false_negative + tally.false_positive, 1);
    }
}

#[cfg(test)]
mod file_source_tests {
    use super::*;

    #[test]
    fn test_load_and_evaluate_from_files() {
        let loader = TestFile::with_lines(
            "eval_loader",
            &["apple", "banana ", "  cherry", "apple"],
        );
        let dictionary = TestFile::with_lines(
            "eval_dictionary",
            &["apple", "banana", "cherry", "durian", "elderberry"],
        );

        let mut filter = sized_filter(10, 0.01);
        let mut truth = GroundTruthSet::new();

        let loaded =
            try_load(&mut filter, &mut truth, read_keys(loader.path()).unwrap())
                .expect("Loading should succeed");
        assert_eq!(loaded, 4);
        assert_eq!(truth.len(), 3);

        let tally =
            try_evaluate(&filter, &truth, read_keys(dictionary.path()).unwrap())
                .expect("Evaluation should succeed");
        assert_eq!(tally.true_positive, 3);
        assert_eq!(tally.false_negative, 0);
        assert_eq!(tally.true_negative + tally.false_positive, 2);
    }

    #[test]
    fn test_latin1_keys_match_across_files() {
        let loader = TestFile::with_bytes("latin1_loader", b"caf\xe9\nna\xefve\r\n");
        let dictionary =
            TestFile::with_bytes("latin1_dictionary", b"na\xefve\ncaf\xe9\n");

        let mut filter = sized_filter(10, 0.01);
        let mut truth = GroundTruthSet::new();
        try_load(&mut filter, &mut truth, read_keys(loader.path()).unwrap())
            .unwrap();

        let tally =
            try_evaluate(&filter, &truth, read_keys(dictionary.path()).unwrap())
                .unwrap();
        assert_eq!(tally.true_positive, 2);
        assert!(truth.check_non_hash(b"caf\xe9"));
    }

    #[test]
    fn test_missing_query_file() {
        assert!(read_keys("no/such/dictionary.txt").is_err());
    }
}
