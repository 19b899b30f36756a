//! Domain Layer - Pure business logic with no I/O
//!
//! This module contains the identifier and metric layer:
//! - 224-bit node identifiers, contacts and buckets
//! - SHA3-224 key hashing
//! - XOR distance, distance comparison and bucket-id masking
//! - Bounded k-nearest contact selection

pub mod services;
/// Core domain types (entities, values, errors)
pub mod types;

pub use services::*;
pub use types::*;
