//! Content hashing for arbor objects.
//!
//! Object ids are BLAKE3 digests prefixed with a per-kind domain tag, so a
//! blob and a tree with identical bytes never share an id.

pub mod hasher;

pub use hasher::ContentHasher;
