use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use fsfinder::{FinderConfig, FusionSplitFinder};

/// Parse a proportion in [0, 1]
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|e| format!("Invalid number: {e}"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("Value {value} must be between 0 and 1"));
    }

    Ok(value)
}

/// Parse the sub-locus delimiter: exactly one character
fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("Delimiter must be a single character, got '{s}'")),
    }
}

/// fsfinder - Chromosome fusion and split finder
///
/// Compares the BUSCO full tables of a reference and a query genome and
/// classifies each query chromosome as ancestral, split, fusion or unassigned
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// BUSCO full_table.tsv of the reference species
    #[clap(short = 'r', long = "reference", value_name = "PATH")]
    reference_table: String,

    /// BUSCO full_table.tsv of the query species
    #[clap(short = 'q', long = "query", value_name = "PATH")]
    query_table: String,

    /// Minimum proportion of markers on one chromosome to call it ancestral
    #[clap(short = 'm', long = "ancestral-threshold", default_value = "0.9", value_parser = parse_fraction)]
    ancestral_threshold: f64,

    /// Minimum proportion for a destination to be listed in split/fusion breakdowns
    #[clap(short = 'p', long = "report-threshold", default_value = "0.05", value_parser = parse_fraction)]
    report_threshold: f64,

    /// Output prefix (may include a directory)
    #[clap(short = 'o', long = "prefix", default_value = "fsf")]
    prefix: String,

    /// Delimiter separating chromosome name from sub-locus in the sequence column
    #[clap(short = 'd', long = "delimiter", default_value = ":", value_parser = parse_delimiter)]
    delimiter: char,

    /// Quiet mode (warnings and errors only)
    #[clap(long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = FinderConfig::default()
        .with_ancestral_threshold(args.ancestral_threshold)
        .with_report_threshold(args.report_threshold)
        .with_prefix(args.prefix)
        .with_locus_delimiter(args.delimiter);

    FusionSplitFinder::new(config).run(&args.reference_table, &args.query_table)?;

    Ok(())
}
