//! Folder and file listings.

pub mod query;
pub mod service;

pub use query::FileQuery;
pub use service::ListingService;
