//! # docvault-database
//!
//! Catalog store clients for DocVault. The [`Catalog`] trait is the seam the
//! service layer talks to; [`PgCatalog`] backs it with PostgreSQL and
//! [`MemoryCatalog`] keeps everything in process for tests and local runs.

pub mod catalog;
pub mod connection;
pub mod factory;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;

pub use catalog::Catalog;
pub use connection::DatabasePool;
pub use factory::build_catalog;
pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;
