//! Domain Services - Pure functions for Kademlia operations
//!
//! All functions in this module are pure (no I/O, no state mutation)
//! and deterministic (same inputs → same outputs).

// Semantic submodules
mod distance;
mod hashing;
mod sorting;

// Re-export public API
pub use distance::{compare_distance, mask_from_prefix, within_sentinel, xor_distance};
pub use hashing::hash_key;
pub use sorting::{select_k_nearest, sort_contacts_by_distance};
