//! The JSON artifact the dashboard reads, and its dataset checksum.

pub mod checksum;
pub mod writer;

pub use checksum::{calculate_checksum, dataset_checksum};
pub use writer::{read_document, to_json_string, write_document};
