//! Routing table reads and writes.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::core::DhtNode;
use crate::domain::{
    hash_key, mask_from_prefix, select_k_nearest, within_sentinel, xor_distance, Bucket, Contact,
    DhtError, NodeId, RoutingTableStats,
};

impl DhtNode {
    /// Identifiers of the buckets worth querying for `key`.
    ///
    /// Looks up the bucket list under the level-0 id of `hash(key)` and keeps
    /// every bucket whose id is below the all-ones distance from the hash.
    /// Each id appears once, collapsing the repeats the append-only table
    /// keeps for re-added contacts. When nothing qualifies, returns this node's own
    /// id so the caller always has somewhere to start.
    pub async fn find_k_closest_buckets(&self, key: &[u8]) -> Result<Vec<NodeId>, DhtError> {
        let hashed = hash_key(key);
        let target = mask_from_prefix(&hashed, 0);

        let mut seen = HashSet::new();
        let closest: Vec<NodeId> = self
            .routing_table
            .search(target)
            .await?
            .unwrap_or_default()
            .into_iter()
            .filter(|bucket| within_sentinel(&xor_distance(&hashed, &bucket.id)))
            .map(|bucket| bucket.id)
            .filter(|id| seen.insert(*id))
            .collect();

        if closest.is_empty() {
            trace!(key = %hashed, "no candidate buckets, falling back to self");
            return Ok(vec![self.id]);
        }

        trace!(key = %hashed, buckets = closest.len(), "closest buckets");
        Ok(closest)
    }

    /// `"ip:port"` of every contact in the buckets stored under `bucket_id`
    /// whose id is below the all-ones distance from `hash(key)`.
    ///
    /// Endpoints are listed once, in the order first recorded, even though the
    /// table keeps one bucket per re-add. An unknown
    /// bucket id yields an empty list.
    pub async fn find_closest_nodes(
        &self,
        key: &[u8],
        bucket_id: NodeId,
    ) -> Result<Vec<String>, DhtError> {
        let hashed = hash_key(key);
        let Some(buckets) = self.routing_table.search(bucket_id).await? else {
            trace!(bucket = %bucket_id, "bucket id not in routing table");
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let nodes: Vec<String> = buckets
            .iter()
            .flat_map(|bucket| bucket.contacts.iter())
            .filter(|contact| within_sentinel(&xor_distance(&hashed, &contact.id)))
            .map(Contact::endpoint)
            .filter(|endpoint| seen.insert(endpoint.clone()))
            .collect();

        trace!(key = %hashed, bucket = %bucket_id, nodes = nodes.len(), "closest nodes");
        Ok(nodes)
    }

    /// Record `contact` at every bucket level.
    ///
    /// For each level `0..replication_factor` a fresh bucket is appended to
    /// the list under `mask_from_prefix(contact.id, level)`; the level-0
    /// bucket holds the contact, the others start empty. Existing buckets are
    /// never merged or replaced. Returns once every append is queued.
    pub fn add_or_update_node(&self, contact: Contact) -> Result<(), DhtError> {
        for level in 0..self.replication_factor {
            let bucket_id = mask_from_prefix(&contact.id, level);
            let bucket = if level == 0 {
                Bucket::with_contact(bucket_id, contact.clone())
            } else {
                Bucket::new(bucket_id)
            };

            self.routing_table.update(bucket_id, move |current| {
                let mut buckets = current.unwrap_or_default();
                buckets.push(bucket);
                Some(buckets)
            })?;
        }

        debug!(
            contact = %contact.endpoint(),
            contact_id = %contact.id,
            levels = self.replication_factor,
            "contact recorded"
        );
        Ok(())
    }

    /// First bucket under `hash(key)` holding a contact within the all-ones
    /// distance of the bucket id. `None` when the key is unknown.
    pub async fn get(&self, key: &[u8]) -> Result<Option<Bucket>, DhtError> {
        let hashed = hash_key(key);
        let found = self
            .routing_table
            .search(hashed)
            .await?
            .and_then(|buckets| {
                buckets.into_iter().find(|bucket| {
                    bucket
                        .contacts
                        .iter()
                        .any(|contact| within_sentinel(&xor_distance(&bucket.id, &contact.id)))
                })
            });

        trace!(key = %hashed, found = found.is_some(), "bucket lookup");
        Ok(found)
    }

    /// Up to `k` known contacts closest to `hash(key)` by XOR distance,
    /// closest first, each id at most once.
    pub async fn k_nearest_contacts(&self, key: &[u8], k: usize) -> Result<Vec<Contact>, DhtError> {
        let target = hash_key(key);
        let entries = self.routing_table.snapshot().await?;

        let contacts = entries
            .iter()
            .flat_map(|(_, buckets)| buckets.iter())
            .flat_map(|bucket| bucket.contacts.iter());
        Ok(select_k_nearest(contacts, &target, k))
    }

    /// Bucket and contact counts over a snapshot of the whole table.
    pub async fn stats(&self) -> Result<RoutingTableStats, DhtError> {
        let entries = self.routing_table.snapshot().await?;

        let mut stats = RoutingTableStats {
            bucket_ids: entries.len(),
            ..RoutingTableStats::default()
        };
        let mut distinct = HashSet::new();
        for bucket in entries.iter().flat_map(|(_, buckets)| buckets.iter()) {
            stats.buckets += 1;
            stats.contacts += bucket.len();
            distinct.extend(bucket.contacts.iter().map(|c| c.id));
        }
        stats.distinct_contacts = distinct.len();
        Ok(stats)
    }
}
