//! # docvault-storage
//!
//! Blob store providers for DocVault. Both providers implement
//! [`docvault_core::traits::BlobStore`] and derive public URLs through
//! [`PublicUrls`].

pub mod factory;
pub mod paths;
pub mod providers;

pub use factory::build_blob_store;
pub use paths::PublicUrls;
pub use providers::{LocalBlobStore, MemoryBlobStore};
