use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::classify::{classify, Classification};
use crate::config::FinderConfig;
use crate::marker::{load_table, GenomeMarkers};
use crate::reciprocal::{resolve, ReciprocalAssignments};
use crate::report::{
    build_assignments, log_assignment_summary, log_classification_summary, write_assignments,
    write_breakdown, AssignmentRow, AssignmentSummary,
};

/// Everything computed for one reference/query comparison
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Reference chromosomes whose markers spread over several query chromosomes
    pub splits: Classification,
    /// Query chromosomes built from several reference chromosomes
    pub fusions: Classification,
    pub reciprocal: ReciprocalAssignments,
    pub assignments: Vec<AssignmentRow>,
    pub summary: AssignmentSummary,
}

/// Paths of the files written by [`FusionSplitFinder::write_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub split: PathBuf,
    pub fused: PathBuf,
    pub assignments: PathBuf,
}

pub struct FusionSplitFinder {
    config: FinderConfig,
}

impl FusionSplitFinder {
    pub fn new(config: FinderConfig) -> Self {
        FusionSplitFinder { config }
    }

    /// Load both tables, compare them and write all outputs.
    ///
    /// Both tables are parsed before anything is written, so a malformed
    /// table leaves no partial output behind.
    pub fn run<P: AsRef<Path>>(&self, reference_path: P, query_path: P) -> Result<Comparison> {
        self.config.validate()?;

        let reference = load_table(reference_path.as_ref(), self.config.locus_delimiter)
            .context("Failed to load reference table")?;
        let query = load_table(query_path.as_ref(), self.config.locus_delimiter)
            .context("Failed to load query table")?;

        let comparison = self.compare(&reference, &query);
        self.write_outputs(&comparison)?;
        Ok(comparison)
    }

    /// Classify splits and fusions and resolve reciprocal assignments
    pub fn compare(&self, reference: &GenomeMarkers, query: &GenomeMarkers) -> Comparison {
        let ancestral = self.config.ancestral_threshold;
        let report = self.config.report_threshold;

        let splits = classify(reference.membership(), query.markers(), ancestral, report);
        log_classification_summary("split", &splits);

        let fusions = classify(query.membership(), reference.markers(), ancestral, report);
        log_classification_summary("fused", &fusions);

        let reciprocal = resolve(
            query.membership(),
            reference.markers(),
            reference.membership(),
            query.markers(),
            ancestral,
        );

        let assignments = build_assignments(
            query.membership(),
            reference.markers(),
            &splits,
            &fusions,
            &reciprocal,
        );
        let summary = AssignmentSummary::from_rows(&assignments, &reciprocal);
        log_assignment_summary(&summary);

        Comparison {
            splits,
            fusions,
            reciprocal,
            assignments,
            summary,
        }
    }

    pub fn write_outputs(&self, comparison: &Comparison) -> Result<OutputFiles> {
        let files = OutputFiles {
            split: self.config.split_path(),
            fused: self.config.fused_path(),
            assignments: self.config.assignments_path(),
        };

        let mut out = create_output(&files.split)?;
        write_breakdown(&mut out, &comparison.splits, "reference_chr", "query_chrs")
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write {}", files.split.display()))?;

        let mut out = create_output(&files.fused)?;
        write_breakdown(&mut out, &comparison.fusions, "query_chr", "reference_chrs")
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write {}", files.fused.display()))?;

        let mut out = create_output(&files.assignments)?;
        write_assignments(&mut out, &comparison.assignments)
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write {}", files.assignments.display()))?;

        log::info!(
            "Successfully written {} chromosomes to {}",
            comparison.assignments.len(),
            files.assignments.display()
        );

        Ok(files)
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
