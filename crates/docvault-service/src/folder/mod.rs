//! Folder management.

pub mod service;

pub use service::{FolderImport, FolderService};
