//! Persistence implementations

mod ground_truth;
mod local_file_writer;

pub use ground_truth::{GroundTruthError, read_ground_truth, write_ground_truth};
pub use local_file_writer::LocalFileWriter;
