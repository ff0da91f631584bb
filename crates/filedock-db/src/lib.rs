//! Filedock metadata persistence
//!
//! Upload records are read, inserted and deleted through the
//! [`MetadataStore`] trait. PostgreSQL backs it in deployments; the
//! in-memory store serves tests and database-less runs.

pub mod db;

pub use db::{InMemoryMetadataStore, MetadataStore, PgUploadRepository};
