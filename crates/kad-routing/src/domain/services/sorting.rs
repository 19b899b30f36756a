//! Contact sorting and bounded k-nearest selection.

use std::collections::{BinaryHeap, HashSet};

use super::distance::xor_distance;
use crate::domain::{Contact, Distance, NodeId};

/// Sort contacts by XOR distance to `target` (closest first).
pub fn sort_contacts_by_distance(contacts: &[Contact], target: &NodeId) -> Vec<Contact> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_key(|c| xor_distance(&c.id, target));
    sorted
}

/// Entry in the bounded candidate heap. Ordered by distance, then by arrival
/// so that equal distances keep the earliest contact.
struct Candidate {
    distance: Distance,
    seq: usize,
    contact: Contact,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.seq == other.seq
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Find the k contacts closest to `target`.
///
/// Keeps a max-heap of at most `k` candidates and evicts the farthest when a
/// closer contact arrives, so memory stays O(k) regardless of input size.
/// Contacts with an id already selected are skipped.
///
/// # Returns
/// Up to k contacts sorted by distance (closest first)
pub fn select_k_nearest<'a, I>(contacts: I, target: &NodeId, k: usize) -> Vec<Contact>
where
    I: IntoIterator<Item = &'a Contact>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
    let mut seen: HashSet<NodeId> = HashSet::new();

    for (seq, contact) in contacts.into_iter().enumerate() {
        if !seen.insert(contact.id) {
            continue;
        }
        let candidate = Candidate {
            distance: xor_distance(&contact.id, target),
            seq,
            contact: contact.clone(),
        };

        if heap.len() < k {
            heap.push(candidate);
        } else if let Some(farthest) = heap.peek() {
            if candidate < *farthest {
                heap.pop();
                heap.push(candidate);
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|c| c.contact)
        .collect()
}
