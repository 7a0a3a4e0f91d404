//! Reciprocal best-match assignment between query and reference chromosomes.
//!
//! A one-directional best match would happily assign several query
//! chromosomes to the same reference chromosome. A pair is only confirmed
//! when the majority vote agrees in both directions.

use crate::classify::{DestinationCounts, DominantMatch};
use crate::marker::{MarkerMap, Membership};
use indexmap::{IndexMap, IndexSet};
use log::debug;

/// Best-match maps in both directions plus the mutually confirmed query chromosomes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReciprocalAssignments {
    pub query_to_reference: IndexMap<String, DominantMatch>,
    pub reference_to_query: IndexMap<String, DominantMatch>,
    pub confirmed: IndexSet<String>,
}

impl ReciprocalAssignments {
    pub fn is_confirmed(&self, query_chromosome: &str) -> bool {
        self.confirmed.contains(query_chromosome)
    }

    /// Reference match of a confirmed query chromosome
    pub fn assignment(&self, query_chromosome: &str) -> Option<&DominantMatch> {
        if self.is_confirmed(query_chromosome) {
            self.query_to_reference.get(query_chromosome)
        } else {
            None
        }
    }

    /// Unidirectional best match of a query chromosome, confirmed or not
    pub fn best_match(&self, query_chromosome: &str) -> Option<&DominantMatch> {
        self.query_to_reference.get(query_chromosome)
    }
}

/// Dominant destination of every source chromosome, kept only when its
/// proportion reaches `threshold`.
pub fn best_matches(
    source: &Membership,
    target: &MarkerMap,
    threshold: f64,
) -> IndexMap<String, DominantMatch> {
    source
        .iter()
        .filter_map(|(chromosome, markers)| {
            let top = DestinationCounts::collect(markers, target).dominant()?;
            (top.proportion >= threshold).then(|| (chromosome.clone(), top))
        })
        .collect()
}

/// Resolve reciprocal best matches between the query and reference genomes.
pub fn resolve(
    query_membership: &Membership,
    reference_markers: &MarkerMap,
    reference_membership: &Membership,
    query_markers: &MarkerMap,
    threshold: f64,
) -> ReciprocalAssignments {
    let query_to_reference = best_matches(query_membership, reference_markers, threshold);
    let reference_to_query = best_matches(reference_membership, query_markers, threshold);

    let confirmed: IndexSet<String> = query_to_reference
        .iter()
        .filter(|(query_chromosome, forward)| {
            reference_to_query
                .get(&forward.chromosome)
                .is_some_and(|backward| &backward.chromosome == *query_chromosome)
        })
        .map(|(query_chromosome, _)| query_chromosome.clone())
        .collect();

    debug!(
        "Reciprocal assignment: {} query best matches, {} reference best matches, {} confirmed",
        query_to_reference.len(),
        reference_to_query.len(),
        confirmed.len()
    );

    ReciprocalAssignments {
        query_to_reference,
        reference_to_query,
        confirmed,
    }
}
