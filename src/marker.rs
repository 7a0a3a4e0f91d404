use crate::error::TableError;
use flate2::read::MultiGzDecoder;
use indexmap::{IndexMap, IndexSet};
use log::{info, warn};
use noodles::bgzf;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Marker identifier -> marker record, for point lookups
pub type MarkerMap = HashMap<String, MarkerRecord>;

/// Chromosome -> marker identifiers located there, in first-seen order
pub type Membership = IndexMap<String, Vec<String>>;

/// BUSCO completeness status of a marker row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStatus {
    Complete,
    Duplicated,
    Fragmented,
    Missing,
}

impl MarkerStatus {
    /// Parse the status column. Unknown labels yield `None` and are ignored by the loader.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Complete" => Some(MarkerStatus::Complete),
            "Duplicated" => Some(MarkerStatus::Duplicated),
            "Fragmented" => Some(MarkerStatus::Fragmented),
            "Missing" => Some(MarkerStatus::Missing),
            _ => None,
        }
    }
}

/// A single-copy marker gene anchored on one chromosome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRecord {
    pub id: String,
    pub status: MarkerStatus,
    pub chromosome: String,
    pub start: u64,
    pub stop: u64,
}

/// Row counts collected while loading one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub complete: usize,
    pub duplicated: usize,
    pub ignored: usize,
}

/// Marker locations of one genome.
///
/// Built once by [`parse_table`] or [`load_table`] and read-only afterwards.
/// Every identifier listed under a chromosome in [`GenomeMarkers::membership`]
/// has a record in [`GenomeMarkers::markers`] on that same chromosome, and
/// every chromosome in the membership map holds at least one marker.
#[derive(Debug, Clone, Default)]
pub struct GenomeMarkers {
    markers: MarkerMap,
    membership: Membership,
    orphans: Vec<String>,
    stats: LoadStats,
}

impl GenomeMarkers {
    pub fn markers(&self) -> &MarkerMap {
        &self.markers
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Chromosomes seen in the table that carry no complete marker
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn get(&self, marker_id: &str) -> Option<&MarkerRecord> {
        self.markers.get(marker_id)
    }

    pub fn num_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn num_chromosomes(&self) -> usize {
        self.membership.len()
    }
}

/// Open a table by extension, returning a boxed BufRead.
///
/// `.bgz` goes through the BGZF reader. `.gz` may be plain gzip or bgzip
/// output, so it is read as multi-member gzip, which covers both.
pub fn open_table_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TableError::io(e, path))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("bgz") => Ok(Box::new(BufReader::new(bgzf::io::reader::Reader::new(file)))),
        Some("gz") => Ok(Box::new(BufReader::new(MultiGzDecoder::new(file)))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// Strip a sub-locus suffix: "chr1:region2" -> "chr1"
pub fn chromosome_name(locus: &str, delimiter: char) -> &str {
    locus.split_once(delimiter).map_or(locus, |(chromosome, _)| chromosome)
}

/// Load a marker table from disk (plain, gzip or bgzip)
pub fn load_table<P: AsRef<Path>>(path: P, delimiter: char) -> Result<GenomeMarkers, TableError> {
    let path = path.as_ref();
    let reader = open_table_input(path)?;
    let genome = parse_table(reader, path, delimiter)?;

    info!(
        "Loaded {} complete markers on {} chromosomes from {} ({} duplicated, {} other rows, {} chromosomes without complete markers)",
        genome.num_markers(),
        genome.num_chromosomes(),
        path.display(),
        genome.stats.duplicated,
        genome.stats.ignored,
        genome.orphans.len()
    );

    Ok(genome)
}

/// Parse a BUSCO-style table.
///
/// `path` is only used to label errors and warnings.
pub fn parse_table<R: BufRead>(
    reader: R,
    path: &Path,
    delimiter: char,
) -> Result<GenomeMarkers, TableError> {
    let mut markers = MarkerMap::new();
    let mut membership = Membership::new();
    let mut known_chromosomes: IndexSet<String> = IndexSet::new();
    let mut stats = LoadStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| TableError::io(e, path))?;

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(parse_error(path, line_no, "missing status column", &line));
        }

        match MarkerStatus::from_label(fields[1]) {
            Some(status @ MarkerStatus::Complete) => {
                if fields.len() < 5 {
                    return Err(parse_error(path, line_no, "expected at least 5 fields", &line));
                }
                let chromosome = locus_chromosome(fields[2], delimiter, path, line_no, &line)?;
                let start = parse_offset(fields[3], "start", path, line_no, &line)?;
                let stop = parse_offset(fields[4], "stop", path, line_no, &line)?;

                let id = fields[0].to_string();
                if markers.contains_key(&id) {
                    return Err(parse_error(
                        path,
                        line_no,
                        &format!("marker {id} is listed as Complete more than once"),
                        &line,
                    ));
                }

                membership
                    .entry(chromosome.to_string())
                    .or_default()
                    .push(id.clone());
                known_chromosomes.insert(chromosome.to_string());
                markers.insert(
                    id.clone(),
                    MarkerRecord {
                        id,
                        status,
                        chromosome: chromosome.to_string(),
                        start,
                        stop,
                    },
                );
                stats.complete += 1;
            }
            Some(MarkerStatus::Duplicated) => {
                if fields.len() < 5 {
                    return Err(parse_error(path, line_no, "expected at least 5 fields", &line));
                }
                let chromosome = locus_chromosome(fields[2], delimiter, path, line_no, &line)?;
                parse_offset(fields[3], "start", path, line_no, &line)?;
                parse_offset(fields[4], "stop", path, line_no, &line)?;
                known_chromosomes.insert(chromosome.to_string());
                stats.duplicated += 1;
            }
            _ => stats.ignored += 1,
        }
    }

    let orphans: Vec<String> = known_chromosomes
        .into_iter()
        .filter(|chromosome| !membership.contains_key(chromosome))
        .collect();
    for chromosome in &orphans {
        warn!(
            "{}: chromosome {} has no complete markers and will be omitted from all outputs",
            path.display(),
            chromosome
        );
    }

    Ok(GenomeMarkers {
        markers,
        membership,
        orphans,
        stats,
    })
}

fn locus_chromosome<'a>(
    locus: &'a str,
    delimiter: char,
    path: &Path,
    line_no: usize,
    line: &str,
) -> Result<&'a str, TableError> {
    let chromosome = chromosome_name(locus, delimiter);
    if chromosome.is_empty() {
        return Err(parse_error(path, line_no, "empty chromosome name", line));
    }
    Ok(chromosome)
}

fn parse_offset(
    field: &str,
    column: &str,
    path: &Path,
    line_no: usize,
    line: &str,
) -> Result<u64, TableError> {
    field.parse().map_err(|_| {
        parse_error(
            path,
            line_no,
            &format!("invalid {column} coordinate '{field}'"),
            line,
        )
    })
}

fn parse_error(path: &Path, line_no: usize, reason: &str, line: &str) -> TableError {
    TableError::Parse {
        path: path.to_path_buf(),
        line: line_no,
        reason: reason.to_string(),
        content: line.to_string(),
    }
}
