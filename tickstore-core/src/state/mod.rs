//! State
//!
//! The data the store distributes: immutable versioned snapshots and the
//! patches that produce them.
//!
//! Every applied patch produces a brand new [`CanonicalState`] whose version
//! is exactly one greater than its predecessor. Readers that hold an older
//! snapshot, such as a flush in progress, keep seeing exactly what they
//! started with.

mod patch;
mod snapshot;

pub use patch::Patch;
pub use snapshot::CanonicalState;
