//! Ground truth and dataset discovery.

mod annotation;
mod discovery;
mod parser;

pub use annotation::{Annotation, Coordinates, GroundTruth};
pub use discovery::{DatasetInfo, DatasetType, dataset_info, load_dataset_infos};
pub use parser::{load_ground_truth, parse_ground_truth};
