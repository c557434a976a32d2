use bloomcheck::{
    BloomFilter, ConfigOverrides, FilterConfig, FilterParams, GroundTruthSet,
    HashKind, OutcomeTally, common::bits2hr, read_keys,
    theoretical_false_positive_rate, try_evaluate, try_load,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bit array size and hash count derived for a capacity
    Params {
        #[command(flatten)]
        sizing: SizingArgs,
    },

    /// Load one key file into a filter and classify every key of another
    Evaluate {
        /// Keys to insert, one per line
        #[arg(short, long)]
        load: PathBuf,

        /// Keys to query, one per line
        #[arg(short, long)]
        query: PathBuf,

        #[command(flatten)]
        sizing: SizingArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SizingArgs {
    /// Expected number of elements (overrides BLOOM_CAPACITY)
    #[arg(short, long)]
    capacity: Option<usize>,

    /// False positive rate between 0 and 1 (overrides BLOOM_FALSE_POSITIVE_RATE)
    #[arg(short, long)]
    fpr: Option<f64>,

    /// Index scheme: sha256 or fast (overrides BLOOM_HASH)
    #[arg(long)]
    hash: Option<HashKind>,
}

impl SizingArgs {
    /// Builder defaults, then environment, then flags; validated once.
    fn resolve(&self) -> bloomcheck::Result<(FilterConfig, HashKind)> {
        let flags = ConfigOverrides {
            capacity: self.capacity,
            false_positive_rate: self.fpr,
            hash: self.hash,
        };
        let layered = ConfigOverrides::from_env()?.overridden_by(flags);
        let kind = layered.hash_kind();
        Ok((layered.into_config()?, kind))
    }
}

#[derive(Serialize)]
struct Report {
    capacity: usize,
    false_positive_rate: f64,
    hash: &'static str,
    params: FilterParams,
    loaded: usize,
    distinct: usize,
    #[serde(flatten)]
    tally: OutcomeTally,
    observed_false_positive_rate: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Params { sizing } => {
            let (config, kind) = sizing.resolve()?;
            let params = FilterParams::try_from(&config)?;

            println!("Bloom Filter Parameters:");
            println!("  Capacity: {}", config.capacity);
            println!("  False positive rate: {:.4}", config.false_positive_rate);
            println!("  Hash function: {kind}");
            println!("  Bit vector size: {}", params.bit_vector_size);
            println!("  Number of hash functions: {}", params.num_hashes);
            println!("  Memory: {}", bits2hr(params.bit_vector_size));
            println!(
                "  Expected FPR at capacity: {:.6}",
                theoretical_false_positive_rate(
                    params.bit_vector_size,
                    params.num_hashes,
                    config.capacity,
                )
            );
        }
        Commands::Evaluate {
            load,
            query,
            sizing,
            json,
        } => {
            let (config, kind) = sizing.resolve()?;
            let params = FilterParams::try_from(&config)?;

            let mut filter = BloomFilter::from_config(&config)?;
            let mut truth = GroundTruthSet::new();
            let loaded = try_load(&mut filter, &mut truth, read_keys(load)?)?;
            let tally = try_evaluate(&filter, &truth, read_keys(query)?)?;

            if *json {
                let report = Report {
                    capacity: config.capacity,
                    false_positive_rate: config.false_positive_rate,
                    hash: kind.as_str(),
                    params,
                    loaded,
                    distinct: truth.len(),
                    tally,
                    observed_false_positive_rate: tally
                        .observed_false_positive_rate(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Loaded {loaded} keys ({} distinct) from {}",
                    truth.len(),
                    load.display()
                );
                println!(
                    "Filter: {} bits, {} hashes ({kind}), {:.2}% full",
                    filter.size(),
                    filter.hash_count(),
                    filter.fill_ratio() * 100.0
                );
                println!();
                println!("{tally}");
                println!(
                    "Observed FPR:       {:.6} (target {})",
                    tally.observed_false_positive_rate(),
                    config.false_positive_rate
                );
            }

            if tally.has_false_negatives() {
                eprintln!(
                    "Warning: {} inserted keys were reported absent. The filter is broken.",
                    tally.false_negative
                );
            }
        }
    }

    Ok(())
}
