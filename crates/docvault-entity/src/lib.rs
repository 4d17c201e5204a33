//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate represents
//! a catalog row or a domain value object. Catalog rows additionally derive
//! `sqlx::FromRow`.

pub mod file;
pub mod folder;
