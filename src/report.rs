//! Per-chromosome status rows and the TSV writers for all three outputs.

use crate::classify::{Classification, DestinationCounts, DominantMatch};
use crate::marker::{MarkerMap, Membership};
use crate::reciprocal::ReciprocalAssignments;
use log::{info, warn};
use std::fmt;
use std::io::{self, Write};

/// Final status of a query chromosome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromosomeStatus {
    Ancestral,
    Split,
    Fusion,
    Unassigned,
}

impl ChromosomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChromosomeStatus::Ancestral => "ancestral",
            ChromosomeStatus::Split => "split",
            ChromosomeStatus::Fusion => "fusion",
            ChromosomeStatus::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for ChromosomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the chromosome assignment table
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub query_chromosome: String,
    pub status: ChromosomeStatus,
    /// Reference match, only for ancestral rows
    pub assignment: Option<DominantMatch>,
    /// Markers of the query chromosome present in the reference genome
    pub total_markers: usize,
}

/// Status counts over the assignment table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentSummary {
    pub ancestral: usize,
    pub split: usize,
    pub fusion: usize,
    pub unassigned: usize,
    /// Unassigned rows that had a dominant match without a reciprocal one
    pub unreciprocated: usize,
}

impl AssignmentSummary {
    pub fn from_rows(rows: &[AssignmentRow], reciprocal: &ReciprocalAssignments) -> Self {
        let mut summary = AssignmentSummary::default();
        for row in rows {
            match row.status {
                ChromosomeStatus::Ancestral => summary.ancestral += 1,
                ChromosomeStatus::Split => summary.split += 1,
                ChromosomeStatus::Fusion => summary.fusion += 1,
                ChromosomeStatus::Unassigned => {
                    summary.unassigned += 1;
                    if reciprocal.best_match(&row.query_chromosome).is_some() {
                        summary.unreciprocated += 1;
                    }
                }
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.ancestral + self.split + self.fusion + self.unassigned
    }
}

/// Merge split/fusion flags with the reciprocal assignments.
///
/// Precedence: split destination > fusion key > confirmed reciprocal > unassigned.
pub fn build_assignments(
    query_membership: &Membership,
    reference_markers: &MarkerMap,
    splits: &Classification,
    fusions: &Classification,
    reciprocal: &ReciprocalAssignments,
) -> Vec<AssignmentRow> {
    query_membership
        .iter()
        .map(|(query_chromosome, markers)| {
            let total_markers = DestinationCounts::collect(markers, reference_markers).total();

            let status = if splits.is_destination(query_chromosome) {
                ChromosomeStatus::Split
            } else if fusions.is_flagged(query_chromosome) {
                ChromosomeStatus::Fusion
            } else if reciprocal.is_confirmed(query_chromosome) {
                ChromosomeStatus::Ancestral
            } else {
                ChromosomeStatus::Unassigned
            };

            let assignment = match status {
                ChromosomeStatus::Ancestral => reciprocal.assignment(query_chromosome).cloned(),
                _ => None,
            };

            if status == ChromosomeStatus::Unassigned {
                if let Some(best) = reciprocal.best_match(query_chromosome) {
                    warn!(
                        "{} best matches {} ({}/{} markers) but the match is not reciprocal, leaving it unassigned",
                        query_chromosome, best.chromosome, best.count, best.total
                    );
                }
            }

            AssignmentRow {
                query_chromosome: query_chromosome.clone(),
                status,
                assignment,
                total_markers,
            }
        })
        .collect()
}

/// Round to 2 decimals, always keeping a fractional part ("1.0", "0.6", "0.33")
pub fn format_proportion(proportion: f64) -> String {
    let rounded = (proportion * 100.0).round() / 100.0;
    let text = rounded.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Write a split or fusion table: source chromosome and `dest:count:proportion` triples
pub fn write_breakdown<W: Write>(
    out: &mut W,
    classification: &Classification,
    source_label: &str,
    destination_label: &str,
) -> io::Result<()> {
    writeln!(out, "{source_label}\t{destination_label}")?;
    for (chromosome, destinations) in &classification.non_ancestral {
        let triples: Vec<String> = destinations
            .iter()
            .map(|d| format!("{}:{}:{}", d.chromosome, d.count, format_proportion(d.proportion)))
            .collect();
        writeln!(out, "{}\t{}", chromosome, triples.join(","))?;
    }
    Ok(())
}

/// Write the six-column chromosome assignment table
pub fn write_assignments<W: Write>(out: &mut W, rows: &[AssignmentRow]) -> io::Result<()> {
    writeln!(
        out,
        "query_chr\tstatus\tassigned_ref_chr\tassigned_ref_BUSCOs\ttotal_BUSCOs\tprop_BUSCOs"
    )?;
    for row in rows {
        match &row.assignment {
            Some(assignment) => writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}",
                row.query_chromosome,
                row.status,
                assignment.chromosome,
                assignment.count,
                row.total_markers,
                format_proportion(assignment.proportion)
            )?,
            None => writeln!(
                out,
                "{}\t{}\t-\t-\t{}\t-",
                row.query_chromosome, row.status, row.total_markers
            )?,
        }
    }
    Ok(())
}

/// Summary line for one directional classification run
pub fn log_classification_summary(kind: &str, classification: &Classification) {
    info!(
        "Identified {} {} chromosomes ({} ancestral, {} skipped with no shared markers)",
        classification.num_flagged(),
        kind,
        classification.ancestral.len(),
        classification.skipped.len()
    );
}

pub fn log_assignment_summary(summary: &AssignmentSummary) {
    info!(
        "Assigned {} query chromosomes: {} ancestral, {} split, {} fusion, {} unassigned ({} unreciprocated)",
        summary.total(),
        summary.ancestral,
        summary.split,
        summary.fusion,
        summary.unassigned,
        summary.unreciprocated
    );
}
