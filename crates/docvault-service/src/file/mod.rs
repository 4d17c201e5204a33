//! File services: upload and delete.

pub mod service;
pub mod upload;

pub use service::FileService;
pub use upload::{FolderUploadReport, UploadItem, UploadOutcome, UploadService};
