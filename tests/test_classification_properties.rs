/// Property-based tests for classification invariants
///
/// Uses proptest over randomly shuffled karyotypes to verify invariants that
/// must ALWAYS hold, whatever the marker layout.
use fsfinder::{
    classify, resolve, ChromosomeStatus, FinderConfig, FusionSplitFinder, GenomeMarkers,
};
use proptest::prelude::*;

use test_utils::genome;

/// Per marker: reference chromosome, query chromosome, and whether it is
/// present in each genome.
type MarkerLayout = Vec<(usize, usize, bool, bool)>;

fn layout_strategy() -> impl Strategy<Value = MarkerLayout> {
    prop::collection::vec(
        (
            0usize..5,
            0usize..5,
            prop::bool::weighted(0.9),
            prop::bool::weighted(0.9),
        ),
        1..80,
    )
}

fn genomes(layout: &MarkerLayout) -> (GenomeMarkers, GenomeMarkers) {
    let mut reference: Vec<(String, String)> = Vec::new();
    let mut query: Vec<(String, String)> = Vec::new();
    for (i, &(ref_chr, query_chr, in_ref, in_query)) in layout.iter().enumerate() {
        let id = format!("{i}at7088");
        if in_ref {
            reference.push((format!("ref{ref_chr}"), id.clone()));
        }
        if in_query {
            query.push((format!("qry{query_chr}"), id));
        }
    }
    (build(&reference), build(&query))
}

fn build(rows: &[(String, String)]) -> GenomeMarkers {
    let entries: Vec<(&str, &str)> = rows
        .iter()
        .map(|(c, id)| (c.as_str(), id.as_str()))
        .collect();
    genome(&entries)
}

proptest! {
    /// Property: every membership entry maps back to its own chromosome
    #[test]
    fn prop_membership_round_trip(layout in layout_strategy()) {
        let (reference, query) = genomes(&layout);
        for genome in [&reference, &query] {
            for (chromosome, ids) in genome.membership() {
                prop_assert!(!ids.is_empty());
                for id in ids {
                    prop_assert_eq!(&genome.get(id).unwrap().chromosome, chromosome);
                }
            }
        }
    }

    /// Property: identical inputs give identical classifications
    #[test]
    fn prop_classify_deterministic(layout in layout_strategy(), threshold in 0.5f64..1.0) {
        let (reference, query) = genomes(&layout);
        let first = classify(reference.membership(), query.markers(), threshold, 0.05);
        let second = classify(reference.membership(), query.markers(), threshold, 0.05);
        prop_assert_eq!(first, second);
    }

    /// Property: reported proportions respect both thresholds and are name-sorted
    #[test]
    fn prop_reported_proportions_within_thresholds(
        layout in layout_strategy(),
        ancestral in 0.5f64..1.0,
        report in 0.0f64..0.5,
    ) {
        let (reference, query) = genomes(&layout);
        let result = classify(query.membership(), reference.markers(), ancestral, report);

        for (chromosome, destinations) in &result.non_ancestral {
            prop_assert!(!result.skipped.contains(chromosome));
            for d in destinations {
                prop_assert!(d.proportion >= report);
                prop_assert!(d.proportion < ancestral);
            }
            let names: Vec<&String> = destinations.iter().map(|d| &d.chromosome).collect();
            let mut sorted = names.clone();
            sorted.sort();
            prop_assert_eq!(names, sorted);
        }
    }

    /// Property: reciprocal confirmation holds under swapped argument order
    #[test]
    fn prop_reciprocal_symmetric(layout in layout_strategy(), threshold in 0.3f64..1.0) {
        let (reference, query) = genomes(&layout);
        let forward = resolve(
            query.membership(),
            reference.markers(),
            reference.membership(),
            query.markers(),
            threshold,
        );
        let backward = resolve(
            reference.membership(),
            query.markers(),
            query.membership(),
            reference.markers(),
            threshold,
        );

        for q in &forward.confirmed {
            let r = &forward.query_to_reference[q].chromosome;
            prop_assert!(backward.is_confirmed(r));
            prop_assert_eq!(&backward.query_to_reference[r].chromosome, q);
        }
        prop_assert_eq!(forward.confirmed.len(), backward.confirmed.len());
    }

    /// Property: a split destination is never reported ancestral
    #[test]
    fn prop_split_destination_never_ancestral(
        layout in layout_strategy(),
        threshold in 0.5f64..1.0,
    ) {
        let (reference, query) = genomes(&layout);
        let config = FinderConfig::default().with_ancestral_threshold(threshold);
        let finder = FusionSplitFinder::new(config);
        let comparison = finder.compare(&reference, &query);

        prop_assert_eq!(comparison.assignments.len(), query.num_chromosomes());
        for row in &comparison.assignments {
            if comparison.splits.is_destination(&row.query_chromosome) {
                prop_assert_eq!(row.status, ChromosomeStatus::Split);
            }
            if row.status == ChromosomeStatus::Ancestral {
                prop_assert!(row.assignment.is_some());
            }
        }
    }
}
