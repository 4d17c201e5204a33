//! File domain entities.

pub mod model;
pub mod size;

pub use model::{File, FilePlacement, NewFile};
pub use size::{format_file_size, parse_file_size};
