#![allow(clippy::uninlined_format_args)]

use bloomcheck::{
    BloomFilter, FilterConfigBuilder, GroundTruthSet, HashKind, evaluate,
    load, theoretical_false_positive_rate,
};
use colored::Colorize;
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use rand::{Rng, distr::Alphanumeric};
use std::collections::HashSet;

// Test configuration
const FILL_RATIO: f64 = 1.0; // Fill the filter up to its capacity
const TEST_SAMPLES: usize = 10_000; // Number of unknown elements to test for FPR

fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn generate_test_data(count: usize) -> Vec<String> {
    (0..count).map(|_| generate_random_string(32)).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║         Bloom Filter - False Positive Rate Tester         ║");
    println!("╚═══════════════════════════════════════════════════════════╝\n");

    println!("Configuration:");
    println!("  • Fill Ratio: {}%", FILL_RATIO * 100.0);
    println!("  • Test Samples: {}", TEST_SAMPLES);

    // Configurations to test
    let capacities = [1_000, 10_000, 100_000];
    let target_fprs = [0.01, 0.05, 0.1];
    let kinds = [HashKind::Sha256, HashKind::Fast];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Hash").set_alignment(CellAlignment::Center),
            Cell::new("Capacity").set_alignment(CellAlignment::Center),
            Cell::new("Target FPR").set_alignment(CellAlignment::Center),
            Cell::new("Bits / Hashes").set_alignment(CellAlignment::Center),
            Cell::new("Known Positives").set_alignment(CellAlignment::Center),
            Cell::new("False Positives").set_alignment(CellAlignment::Center),
            Cell::new("Observed FPR").set_alignment(CellAlignment::Center),
            Cell::new("Theoretical").set_alignment(CellAlignment::Center),
            Cell::new("Deviation").set_alignment(CellAlignment::Center),
        ]);

    let mut any_false_negatives = false;

    for kind in kinds {
        for &capacity in &capacities {
            for &target_fpr in &target_fprs {
                let insert_count = (capacity as f64 * FILL_RATIO) as usize;

                let config = FilterConfigBuilder::default()
                    .capacity(capacity)
                    .false_positive_rate(target_fpr)
                    .hash_function(kind.function())
                    .build()?;

                let mut filter = BloomFilter::from_config(&config)?;
                let mut truth = GroundTruthSet::new();

                print!(
                    "Testing hash={}, capacity={}, target_fpr={:.2}%: ",
                    kind,
                    capacity,
                    target_fpr * 100.0
                );
                print!("Generating data... ");
                let known_elements = generate_test_data(insert_count);
                let known_set: HashSet<&String> = known_elements.iter().collect();

                print!("Inserting... ");
                load(&mut filter, &mut truth, &known_elements);

                print!("Testing FPR... ");
                let known = evaluate(&filter, &truth, &known_elements);

                // Skip anything we accidentally generated twice
                let unknown: Vec<String> = generate_test_data(TEST_SAMPLES)
                    .into_iter()
                    .filter(|s| !known_set.contains(s))
                    .collect();
                let probe = evaluate(&filter, &truth, &unknown);

                any_false_negatives |= known.has_false_negatives();

                let observed_fpr = probe.observed_false_positive_rate();
                let expected = theoretical_false_positive_rate(
                    filter.size(),
                    filter.hash_count(),
                    truth.len(),
                );
                let deviation = (observed_fpr - target_fpr) / target_fpr * 100.0;

                println!("Done!");

                let deviation_text = format!("{:+.2}%", deviation);
                let deviation_text = if deviation.abs() > 50.0 {
                    deviation_text.red().to_string()
                } else {
                    deviation_text.green().to_string()
                };

                table.add_row(vec![
                    Cell::new(kind.as_str()),
                    Cell::new(format!("{}", capacity)),
                    Cell::new(format!("{:.2}%", target_fpr * 100.0)),
                    Cell::new(format!(
                        "{} / {}",
                        filter.size(),
                        filter.hash_count()
                    )),
                    Cell::new(format!(
                        "{}/{}",
                        known.true_positive,
                        known_elements.len()
                    )),
                    Cell::new(format!("{}/{}", probe.false_positive, unknown.len())),
                    Cell::new(format!("{:.4}%", observed_fpr * 100.0)),
                    Cell::new(format!("{:.4}%", expected * 100.0)),
                    Cell::new(deviation_text),
                ]);
            }
        }
    }

    println!("\nResults:");
    println!("{}", table);

    println!("\nSummary:");
    if any_false_negatives {
        println!(
            "{}",
            "False negatives were observed. The filter is broken.".red().bold()
        );
    } else {
        println!("No false negatives: every inserted element was found.");
    }
    println!(
        "Observed rates should sit close to the theoretical column. Smaller"
    );
    println!("capacities show more variance.");

    Ok(())
}
