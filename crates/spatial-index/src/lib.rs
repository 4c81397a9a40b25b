//! Bounding-volume hierarchy over 2D-bounded elements.
//!
//! The index is built once from a fixed element set and is immutable
//! afterwards, so a built [`Bvh`] can be shared between threads and queried
//! concurrently without locking. Rebuild and swap to change its contents.

pub mod bvh;

pub use bvh::Bvh;
