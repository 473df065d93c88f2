//! Foundation types for arbor.
//!
//! Every other arbor crate depends on `arbor-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (BLAKE3 hash)
//! - [`RepositoryId`] -- Stable name of a repository in a catalog

pub mod error;
pub mod object;
pub mod repository;

pub use error::TypeError;
pub use object::ObjectId;
pub use repository::RepositoryId;
