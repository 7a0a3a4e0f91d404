// Library exports for fsfinder
pub mod classify;
pub mod config;
pub mod error;
pub mod marker;
pub mod pipeline;
pub mod reciprocal;
pub mod report;

pub use classify::{classify, Classification, Destination, DominantMatch};
pub use config::FinderConfig;
pub use error::TableError;
pub use marker::{load_table, parse_table, GenomeMarkers, MarkerRecord, MarkerStatus};
pub use pipeline::{Comparison, FusionSplitFinder, OutputFiles};
pub use reciprocal::{resolve, ReciprocalAssignments};
pub use report::{AssignmentRow, ChromosomeStatus};
