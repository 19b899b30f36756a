//! Tests for DhtNode and Bootstrapper

use super::bootstrap::parse_endpoint;
use super::*;
use crate::adapters::StaticContactResolver;
use crate::domain::{
    hash_key, mask_from_prefix, Contact, DhtConfig, DhtError, NodeAddress, NodeId,
};
use crate::ports::RoutingTableApi;
use crate::store::StoreError;
use tokio::sync::watch;

fn local_node() -> DhtNode {
    DhtNode::with_defaults("127.0.0.1", 50051).unwrap()
}

#[tokio::test]
async fn test_new_node_seeds_self_bucket() {
    let node = local_node();
    assert_eq!(node.id(), hash_key(b"127.0.0.1:50051"));
    assert_eq!(node.replication_factor(), 3);

    let buckets = node.routing_table.search(node.id()).await.unwrap().unwrap();
    assert_eq!(buckets.len(), 3);
    for (level, bucket) in buckets.iter().enumerate() {
        assert_eq!(bucket.id, mask_from_prefix(&node.id(), level));
    }
    assert_eq!(buckets[0].contacts, vec![node.contact().clone()]);
    assert!(buckets[1].is_empty());
    assert!(buckets[2].is_empty());
}

#[tokio::test]
async fn test_get_own_address_returns_level_zero_bucket() {
    let node = local_node();
    let bucket = node.get(b"127.0.0.1:50051").await.unwrap().unwrap();
    assert_eq!(bucket.id, NodeId::zero());
    assert_eq!(bucket.contacts.len(), 1);
    assert_eq!(bucket.contacts[0].endpoint(), "127.0.0.1:50051");
}

#[tokio::test]
async fn test_get_unknown_key_is_none() {
    let node = local_node();
    assert_eq!(node.get(b"never stored").await.unwrap(), None);
}

#[tokio::test]
async fn test_find_k_closest_buckets_falls_back_to_self() {
    let node = local_node();
    let buckets = node.find_k_closest_buckets(b"10.0.2.35").await.unwrap();
    assert_eq!(buckets, vec![node.id()]);
}

#[tokio::test]
async fn test_add_or_update_node_appends_one_bucket_per_level() {
    let node = local_node();
    let peer = Contact::new("10.0.1.77", 50051);
    node.add_or_update_node(peer.clone()).unwrap();

    for level in 0..3 {
        let key = mask_from_prefix(&peer.id, level);
        let buckets = node.routing_table.search(key).await.unwrap().unwrap();
        assert_eq!(buckets.len(), 1, "level {}", level);
        assert_eq!(buckets[0].id, key);
        if level == 0 {
            assert_eq!(buckets[0].contacts, vec![peer.clone()]);
        } else {
            assert!(buckets[0].is_empty());
        }
    }
}

#[tokio::test]
async fn test_add_or_update_node_appends_without_merging() {
    let node = local_node();
    let peer = Contact::new("10.0.1.77", 50051);
    node.add_or_update_node(peer.clone()).unwrap();
    node.add_or_update_node(peer.clone()).unwrap();

    let buckets = node
        .routing_table
        .search(NodeId::zero())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(buckets.len(), 2);

    // Repeated contacts are reported once
    let bucket_ids = node.find_k_closest_buckets(b"anything").await.unwrap();
    assert_eq!(bucket_ids, vec![NodeId::zero()]);
    let nodes = node
        .find_closest_nodes(b"anything", NodeId::zero())
        .await
        .unwrap();
    assert_eq!(nodes, vec!["10.0.1.77:50051".to_string()]);
}

#[tokio::test]
async fn test_bucket_ids_spread_across_store_workers() {
    let node = local_node();
    for host in 0..100u32 {
        let contact = Contact::new(format!("10.0.{}.{}", host / 256, host % 256), 50051);
        node.add_or_update_node(contact).unwrap();
    }

    let entries = node.routing_table.snapshot().await.unwrap();
    let workers = node.routing_table.concurrency();
    let mut per_shard = vec![0usize; workers];
    for (key, _) in &entries {
        per_shard[node.routing_table.shard_of(key)] += 1;
    }
    assert_eq!(workers, 3);
    assert!(
        per_shard.iter().all(|&count| count > 0),
        "unbalanced {:?}",
        per_shard
    );
}

#[tokio::test]
async fn test_find_closest_nodes_unknown_bucket_is_empty() {
    let node = local_node();
    let nodes = node
        .find_closest_nodes(b"key", hash_key(b"no such bucket"))
        .await
        .unwrap();
    assert!(nodes.is_empty());
}

#[tokio::test]
async fn test_find_closest_nodes_lists_contacts_in_arrival_order() {
    let node = local_node();
    let peers: Vec<Contact> = (1..=4).map(|i| Contact::new(format!("10.0.0.{}", i), 4000)).collect();
    for peer in &peers {
        node.add_or_update_node(peer.clone()).unwrap();
    }

    let nodes = node
        .find_closest_nodes(b"lookup", NodeId::zero())
        .await
        .unwrap();
    let expected: Vec<String> = peers.iter().map(Contact::endpoint).collect();
    assert_eq!(nodes, expected);
}

#[tokio::test]
async fn test_k_nearest_contacts_orders_by_distance() {
    let node = local_node();
    for i in 0..20 {
        node.add_or_update_node(Contact::new(format!("10.1.0.{}", i), 50051))
            .unwrap();
    }

    let target = hash_key(b"lookup target");
    let nearest = node.k_nearest_contacts(b"lookup target", 5).await.unwrap();
    assert_eq!(nearest.len(), 5);
    for pair in nearest.windows(2) {
        assert!(
            crate::domain::xor_distance(&pair[0].id, &target)
                <= crate::domain::xor_distance(&pair[1].id, &target)
        );
    }

    // Self plus the 20 peers, each once
    let all = node.k_nearest_contacts(b"lookup target", 100).await.unwrap();
    assert_eq!(all.len(), 21);
}

#[tokio::test]
async fn test_stats_count_buckets_and_contacts() {
    let node = local_node();
    node.add_or_update_node(Contact::new("10.0.1.77", 50051)).unwrap();
    node.add_or_update_node(Contact::new("10.0.1.77", 50051)).unwrap();

    let stats = node.stats().await.unwrap();
    // Self list, plus level 0 (shared), level 1 and level 2 keys of the peer
    assert_eq!(stats.bucket_ids, 4);
    assert_eq!(stats.buckets, 3 + 2 * 3);
    assert_eq!(stats.contacts, 3);
    assert_eq!(stats.distinct_contacts, 2);
}

#[tokio::test]
async fn test_zero_replication_factor_rejected() {
    let result = DhtNode::new("127.0.0.1", 50051, 0);
    assert!(matches!(result, Err(DhtError::InvalidReplicationFactor(0))));
}

#[tokio::test]
async fn test_zero_concurrency_rejected() {
    let (_tx, rx) = watch::channel(false);
    let config = DhtConfig {
        concurrency: 0,
        ..DhtConfig::default()
    };
    let result = DhtNode::from_config(&NodeAddress::default(), &config, rx);
    assert!(matches!(
        result,
        Err(DhtError::Store(StoreError::InvalidConcurrency(0)))
    ));
}

#[tokio::test]
async fn test_operations_after_close_fail() {
    let node = local_node();
    node.close().await.unwrap();

    assert_eq!(
        node.add_or_update_node(Contact::new("10.0.1.77", 50051)),
        Err(DhtError::Store(StoreError::Closed))
    );
    assert_eq!(
        node.get(b"127.0.0.1:50051").await,
        Err(DhtError::Store(StoreError::Closed))
    );
}

#[tokio::test]
async fn test_cancel_signal_closes_routing_table() {
    let (tx, rx) = watch::channel(false);
    let node = DhtNode::from_config(&NodeAddress::default(), &DhtConfig::for_testing(), rx).unwrap();
    tx.send(true).unwrap();

    assert!(matches!(
        node.find_k_closest_buckets(b"key").await,
        Err(DhtError::Store(StoreError::Closed))
    ));
}

#[tokio::test]
async fn test_node_usable_through_api_trait() {
    async fn first_hop<T: RoutingTableApi>(api: &T, key: &[u8]) -> Vec<String> {
        let buckets = api.find_k_closest_buckets(key).await.unwrap();
        api.find_closest_nodes(key, buckets[0]).await.unwrap()
    }

    let node = local_node();
    RoutingTableApi::add_or_update_node(&node, Contact::new("10.0.1.77", 50051))
        .await
        .unwrap();
    assert_eq!(
        first_hop(&node, b"10.0.2.35").await,
        vec!["10.0.1.77:50051".to_string()]
    );
}

// ============================================================================
// Bootstrap
// ============================================================================

#[tokio::test]
async fn test_bootstrap_records_seed_and_returned_contacts() {
    let node = local_node();
    let returned = vec![
        Contact::new("10.0.3.1", 50051),
        Contact::new("10.0.3.2", 50051),
        node.contact().clone(),
    ];
    let resolver = StaticContactResolver::new().with_answer("10.0.1.77:50051", returned);

    let bootstrapper = Bootstrapper::new(
        resolver,
        vec!["10.0.1.77:50051".to_string(), "10.0.9.9:50051".to_string()],
    );
    let report = bootstrapper.run(&node).await.unwrap();

    assert_eq!(report.queried, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.answered(), 1);
    // Seed plus two contacts; self is skipped
    assert_eq!(report.added, 3);

    let nodes = node
        .find_closest_nodes(b"anything", NodeId::zero())
        .await
        .unwrap();
    assert_eq!(nodes.len(), 3);
    assert!(nodes.contains(&"10.0.1.77:50051".to_string()));
    assert!(!nodes.contains(&"127.0.0.1:50051".to_string()));
}

#[tokio::test]
async fn test_bootstrap_deduplicates_across_seeds() {
    let node = local_node();
    let shared = Contact::new("10.0.3.1", 50051);
    let resolver = StaticContactResolver::new()
        .with_answer("10.0.1.1:50051", vec![shared.clone()])
        .with_answer("10.0.1.2:50051", vec![shared.clone()]);

    let report = Bootstrapper::new(
        resolver,
        vec!["10.0.1.1:50051".to_string(), "10.0.1.2:50051".to_string()],
    )
    .with_parallelism(1)
    .run(&node)
    .await
    .unwrap();

    assert_eq!(report.failed, 0);
    assert_eq!(report.added, 3);
}

#[tokio::test]
async fn test_bootstrap_without_seeds_is_empty() {
    let node = local_node();
    let report = Bootstrapper::new(StaticContactResolver::new(), Vec::new())
        .run(&node)
        .await
        .unwrap();
    assert_eq!(report, BootstrapReport::default());
}

#[test]
fn test_parse_endpoint() {
    assert_eq!(
        parse_endpoint("10.0.1.77:50051"),
        Some(Contact::new("10.0.1.77", 50051))
    );
    assert_eq!(parse_endpoint("[::1]:50051"), Some(Contact::new("::1", 50051)));
    assert_eq!(parse_endpoint("no-port"), None);
    assert_eq!(parse_endpoint("host:notaport"), None);
    assert_eq!(parse_endpoint(":50051"), None);
}
