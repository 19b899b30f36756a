use async_trait::async_trait;

use crate::domain::{Bucket, Contact, DhtError, NodeId, RoutingTableStats};
use crate::ports::RoutingTableApi;
use crate::service::DhtNode;

#[async_trait]
impl RoutingTableApi for DhtNode {
    async fn find_k_closest_buckets(&self, key: &[u8]) -> Result<Vec<NodeId>, DhtError> {
        DhtNode::find_k_closest_buckets(self, key).await
    }

    async fn find_closest_nodes(
        &self,
        key: &[u8],
        bucket_id: NodeId,
    ) -> Result<Vec<String>, DhtError> {
        DhtNode::find_closest_nodes(self, key, bucket_id).await
    }

    async fn add_or_update_node(&self, contact: Contact) -> Result<(), DhtError> {
        DhtNode::add_or_update_node(self, contact)
    }

    async fn get(&self, key: &[u8]) -> Result<Option<Bucket>, DhtError> {
        DhtNode::get(self, key).await
    }

    async fn k_nearest_contacts(&self, key: &[u8], k: usize) -> Result<Vec<Contact>, DhtError> {
        DhtNode::k_nearest_contacts(self, key, k).await
    }

    async fn stats(&self) -> Result<RoutingTableStats, DhtError> {
        DhtNode::stats(self).await
    }
}
