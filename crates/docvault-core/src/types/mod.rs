//! Core type definitions used across the DocVault workspace.

pub mod id;
pub mod sorting;

pub use id::{FileId, FolderId};
pub use sorting::{FileSort, FileSortKey, SortDirection};
