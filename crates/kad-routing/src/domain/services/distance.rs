//! Kademlia distance calculations and bucket-id masking.

use std::cmp::Ordering;

use crate::domain::{Distance, NodeId, ID_LENGTH};

/// Calculate the XOR distance between two NodeIds
///
/// # Properties
/// - Symmetric: `xor_distance(a, b) == xor_distance(b, a)`
/// - Self is zero: `xor_distance(a, a) == Distance::zero()`
/// - Involution: `xor(xor(a, b), b) == a`
pub fn xor_distance(a: &NodeId, b: &NodeId) -> Distance {
    let mut out = [0u8; ID_LENGTH];
    for (o, (x, y)) in out.iter_mut().zip(a.as_bytes().iter().zip(b.as_bytes())) {
        *o = x ^ y;
    }
    Distance::new(out)
}

/// Compare two distances (or identifiers) byte-by-byte from the most
/// significant byte.
///
/// Equivalent to big-endian unsigned comparison over 224 bits.
pub fn compare_distance(a: &[u8; ID_LENGTH], b: &[u8; ID_LENGTH]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Check the lookup filter: is `distance` strictly below the all-ones sentinel?
///
/// Only an exact all-ones distance fails.
#[inline]
pub fn within_sentinel(distance: &Distance) -> bool {
    compare_distance(distance.as_bytes(), Distance::max().as_bytes()) == Ordering::Less
}

/// Derive the bucket identifier of `id` at `level`.
///
/// The mask keeps the `level` trailing (least significant) bytes and zeroes
/// the rest: byte `i` survives when its index from the end, `ID_LENGTH - 1 - i`,
/// is below `level`.
///
/// - `level == 0` yields the zero id for every input
/// - `level == 1` keeps only the final byte
/// - `level >= ID_LENGTH` keeps the whole id
pub fn mask_from_prefix(id: &NodeId, level: usize) -> NodeId {
    let src = id.as_bytes();
    let mut out = [0u8; ID_LENGTH];
    for (i, byte) in out.iter_mut().enumerate() {
        let from_end = ID_LENGTH - 1 - i;
        if from_end < level {
            *byte = src[i];
        }
    }
    NodeId::new(out)
}
