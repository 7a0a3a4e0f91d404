//! Majority-vote classification of chromosomes against another genome.
//!
//! Every marker on a source chromosome votes for the chromosome that hosts
//! the same marker in the target genome. A chromosome whose leading
//! destination holds at least the ancestral threshold of the votes is
//! ancestral; any other chromosome is reported with the breakdown of its
//! destinations. Run reference->query this finds splits, query->reference it
//! finds fusions.

use crate::marker::{MarkerMap, Membership};
use indexmap::IndexMap;
use log::{debug, warn};

/// One component of a non-ancestral chromosome
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub chromosome: String,
    pub proportion: f64,
    pub count: usize,
}

/// The leading destination of a chromosome's marker votes
#[derive(Debug, Clone, PartialEq)]
pub struct DominantMatch {
    pub chromosome: String,
    pub count: usize,
    /// Markers of the source chromosome that exist in the target genome
    pub total: usize,
    pub proportion: f64,
}

/// Destination multiset of one source chromosome, kept as counts in
/// first-encountered order.
#[derive(Debug, Clone, Default)]
pub struct DestinationCounts<'a> {
    counts: IndexMap<&'a str, usize>,
    total: usize,
}

impl<'a> DestinationCounts<'a> {
    /// Look each marker up in the target genome. Markers absent there are dropped.
    pub fn collect(markers: &[String], target: &'a MarkerMap) -> Self {
        let mut counts: IndexMap<&'a str, usize> = IndexMap::new();
        let mut total = 0;
        for marker in markers {
            if let Some(record) = target.get(marker) {
                *counts.entry(record.chromosome.as_str()).or_insert(0) += 1;
                total += 1;
            }
        }
        DestinationCounts { counts, total }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Size of the multiset
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn proportion(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }

    /// Mode of the multiset. On ties the destination encountered first wins.
    pub fn dominant(&self) -> Option<DominantMatch> {
        let mut best: Option<(&str, usize)> = None;
        for (&chromosome, &count) in &self.counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((chromosome, count)),
            }
        }

        best.map(|(chromosome, count)| DominantMatch {
            chromosome: chromosome.to_string(),
            count,
            total: self.total,
            proportion: self.proportion(count),
        })
    }

    /// Destinations holding at least `min_proportion` of the votes, sorted by name
    pub fn breakdown(&self, min_proportion: f64) -> Vec<Destination> {
        let mut destinations: Vec<Destination> = self
            .counts
            .iter()
            .map(|(&chromosome, &count)| Destination {
                chromosome: chromosome.to_string(),
                proportion: self.proportion(count),
                count,
            })
            .filter(|d| d.proportion >= min_proportion)
            .collect();
        destinations.sort_by(|a, b| a.chromosome.cmp(&b.chromosome));
        destinations
    }
}

/// Result of one directional classification run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Source chromosome -> destination breakdown, only for non-ancestral chromosomes
    pub non_ancestral: IndexMap<String, Vec<Destination>>,
    /// Source chromosomes with a dominant destination
    pub ancestral: Vec<String>,
    /// Source chromosomes whose markers are all missing from the target genome
    pub skipped: Vec<String>,
}

impl Classification {
    pub fn is_flagged(&self, chromosome: &str) -> bool {
        self.non_ancestral.contains_key(chromosome)
    }

    /// True if `chromosome` is a component of any non-ancestral entry
    pub fn is_destination(&self, chromosome: &str) -> bool {
        self.non_ancestral
            .values()
            .any(|destinations| destinations.iter().any(|d| d.chromosome == chromosome))
    }

    pub fn num_flagged(&self) -> usize {
        self.non_ancestral.len()
    }
}

/// Classify every chromosome of `source` by where its markers land in `target`.
///
/// Chromosomes are visited in membership order, so identical inputs always
/// produce identical output.
pub fn classify(
    source: &Membership,
    target: &MarkerMap,
    ancestral_threshold: f64,
    report_threshold: f64,
) -> Classification {
    let mut classification = Classification::default();

    for (chromosome, markers) in source {
        let counts = DestinationCounts::collect(markers, target);

        let Some(top) = counts.dominant() else {
            warn!("All markers from {chromosome} are missing in the other genome, skipping it");
            classification.skipped.push(chromosome.clone());
            continue;
        };

        if top.proportion >= ancestral_threshold {
            debug!(
                "{} is ancestral: {}/{} markers on {}",
                chromosome, top.count, top.total, top.chromosome
            );
            classification.ancestral.push(chromosome.clone());
            continue;
        }

        classification
            .non_ancestral
            .insert(chromosome.clone(), counts.breakdown(report_threshold));
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{MarkerRecord, MarkerStatus};

    fn marker_map(entries: &[(&str, &str)]) -> MarkerMap {
        entries
            .iter()
            .map(|&(id, chromosome)| {
                (
                    id.to_string(),
                    MarkerRecord {
                        id: id.to_string(),
                        status: MarkerStatus::Complete,
                        chromosome: chromosome.to_string(),
                        start: 0,
                        stop: 1,
                    },
                )
            })
            .collect()
    }

    /// Marker ids are given space-separated: ("X", "m1 m2 m3")
    fn membership(entries: &[(&str, &str)]) -> Membership {
        entries
            .iter()
            .map(|&(chromosome, ids)| {
                (
                    chromosome.to_string(),
                    ids.split_whitespace().map(|id| id.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_fusion_breakdown() {
        let query = membership(&[("X", "m1 m2 m3 m4 m5")]);
        let reference = marker_map(&[
            ("m1", "A"),
            ("m2", "A"),
            ("m3", "A"),
            ("m4", "B"),
            ("m5", "B"),
        ]);

        let result = classify(&query, &reference, 0.9, 0.05);

        assert_eq!(
            result.non_ancestral["X"],
            vec![
                Destination {
                    chromosome: "A".into(),
                    proportion: 0.6,
                    count: 3,
                },
                Destination {
                    chromosome: "B".into(),
                    proportion: 0.4,
                    count: 2,
                },
            ]
        );
        assert!(result.ancestral.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let ids: Vec<String> = (0..10).map(|i| format!("m{i}")).collect();
        let source: Membership = [("A".to_string(), ids.clone())].into_iter().collect();
        let target: MarkerMap = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let chromosome = if i == 0 { "Z" } else { "Y" };
                (
                    id.clone(),
                    MarkerRecord {
                        id: id.clone(),
                        status: MarkerStatus::Complete,
                        chromosome: chromosome.to_string(),
                        start: 0,
                        stop: 1,
                    },
                )
            })
            .collect();

        let result = classify(&source, &target, 0.9, 0.05);
        assert_eq!(result.ancestral, vec!["A".to_string()]);
        assert!(result.non_ancestral.is_empty());
    }

    #[test]
    fn test_missing_markers_are_dropped_from_denominator() {
        let source = membership(&[("A", "m1 m2 m3 gone1 gone2")]);
        let target = marker_map(&[("m1", "Y"), ("m2", "Y"), ("m3", "Y")]);

        let result = classify(&source, &target, 0.9, 0.05);
        assert_eq!(result.ancestral, vec!["A".to_string()]);
    }

    #[test]
    fn test_all_missing_chromosome_is_skipped() {
        let source = membership(&[("A", "gone1 gone2"), ("B", "m1")]);
        let target = marker_map(&[("m1", "Y")]);

        let result = classify(&source, &target, 0.9, 0.05);
        assert_eq!(result.skipped, vec!["A".to_string()]);
        assert!(!result.non_ancestral.contains_key("A"));
        assert!(!result.ancestral.contains(&"A".to_string()));
    }

    #[test]
    fn test_report_threshold_filters_minor_destinations() {
        let source = membership(&[("A", "m1 m2 m3 m4 m5 m6 m7 m8 m9 m10")]);
        let target = marker_map(&[
            ("m1", "Y"),
            ("m2", "Y"),
            ("m3", "Y"),
            ("m4", "Y"),
            ("m5", "Y"),
            ("m6", "X"),
            ("m7", "X"),
            ("m8", "X"),
            ("m9", "X"),
            ("m10", "W"),
        ]);

        let result = classify(&source, &target, 0.9, 0.2);
        let names: Vec<&str> = result.non_ancestral["A"]
            .iter()
            .map(|d| d.chromosome.as_str())
            .collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_breakdown_sorted_by_name() {
        let source = membership(&[("A", "m1 m2 m3")]);
        let target = marker_map(&[("m1", "chr9"), ("m2", "chr10"), ("m3", "chr1")]);

        let result = classify(&source, &target, 0.9, 0.05);
        let names: Vec<&str> = result.non_ancestral["A"]
            .iter()
            .map(|d| d.chromosome.as_str())
            .collect();
        assert_eq!(names, vec!["chr1", "chr10", "chr9"]);
    }

    #[test]
    fn test_dominant_tie_goes_to_first_encountered() {
        let target = marker_map(&[("m1", "B"), ("m2", "A"), ("m3", "A"), ("m4", "B")]);
        let markers: Vec<String> = ["m1", "m2", "m3", "m4"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let top = DestinationCounts::collect(&markers, &target).dominant().unwrap();
        assert_eq!(top.chromosome, "B");
        assert_eq!((top.count, top.total), (2, 4));
        assert_eq!(top.proportion, 0.5);
    }

    #[test]
    fn test_destination_lookup() {
        let source = membership(&[("A", "m1 m2"), ("B", "m3 m4")]);
        let target = marker_map(&[("m1", "X"), ("m2", "Y"), ("m3", "X"), ("m4", "X")]);

        let result = classify(&source, &target, 0.9, 0.05);
        assert!(result.is_flagged("A"));
        assert!(!result.is_flagged("B"));
        assert!(result.is_destination("X"));
        assert!(result.is_destination("Y"));
        assert!(!result.is_destination("A"));
        assert_eq!(result.num_flagged(), 1);
    }
}
