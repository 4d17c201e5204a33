//! # docvault-service
//!
//! Organizer services for DocVault. Each service is built over the
//! [`Catalog`](docvault_database::Catalog) and
//! [`BlobStore`](docvault_core::traits::BlobStore) it is given; the
//! [`Organizer`] wires them all together.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod file;
pub mod folder;
pub mod listing;
pub mod naming;
pub mod organizer;
pub mod transfer;

pub use context::{Actor, RequestContext};
pub use file::{FileService, UploadItem, UploadService};
pub use folder::FolderService;
pub use listing::{FileQuery, ListingService};
pub use naming::{NameSnapshot, disambiguate};
pub use organizer::Organizer;
pub use transfer::{
    BulkController, BulkError, BulkOperation, BulkReport, BulkRequest, TransferOrchestrator,
};
