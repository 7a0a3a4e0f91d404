use anyhow::{ensure, Result};
use std::path::PathBuf;

/// Run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub ancestral_threshold: f64, // -m/--ancestral-threshold
    pub report_threshold: f64,    // -p/--report-threshold
    pub prefix: String,           // -o/--prefix
    pub locus_delimiter: char,    // -d/--delimiter
}

impl Default for FinderConfig {
    fn default() -> Self {
        FinderConfig {
            ancestral_threshold: 0.9,
            report_threshold: 0.05,
            prefix: "fsf".to_string(),
            locus_delimiter: ':',
        }
    }
}

impl FinderConfig {
    pub fn with_ancestral_threshold(mut self, threshold: f64) -> Self {
        self.ancestral_threshold = threshold;
        self
    }

    pub fn with_report_threshold(mut self, threshold: f64) -> Self {
        self.report_threshold = threshold;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_locus_delimiter(mut self, delimiter: char) -> Self {
        self.locus_delimiter = delimiter;
        self
    }

    /// Reject thresholds outside [0, 1] and an empty prefix
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("ancestral threshold", self.ancestral_threshold),
            ("report threshold", self.report_threshold),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must be between 0 and 1, got {value}"
            );
        }
        ensure!(!self.prefix.is_empty(), "output prefix must not be empty");
        Ok(())
    }

    pub fn split_path(&self) -> PathBuf {
        self.output_path("split_chromosomes.tsv")
    }

    pub fn fused_path(&self) -> PathBuf {
        self.output_path("fused_chromosomes.tsv")
    }

    pub fn assignments_path(&self) -> PathBuf {
        self.output_path("chromosome_assignments.tsv")
    }

    fn output_path(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}_{}", self.prefix, suffix))
    }
}
