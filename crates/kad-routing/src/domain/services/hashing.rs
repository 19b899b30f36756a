//! Identifier derivation.

use sha3::{Digest, Sha3_224};

use crate::domain::{NodeId, ID_LENGTH};

/// Hash arbitrary bytes into the 224-bit identifier space (SHA3-224).
///
/// Total and deterministic: any byte string, including the empty one, is a
/// valid input.
pub fn hash_key(data: &[u8]) -> NodeId {
    let digest = Sha3_224::digest(data);
    let mut bytes = [0u8; ID_LENGTH];
    bytes.copy_from_slice(&digest[..ID_LENGTH]);
    NodeId::new(bytes)
}
