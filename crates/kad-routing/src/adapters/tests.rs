//! Tests for adapters

use super::*;
use crate::domain::{hash_key, Contact, DhtConfig, NodeAddress};
use crate::ports::{ConfigProvider, ContactResolver, ResolverError};

#[test]
fn test_static_config_provider_defaults() {
    let provider = StaticConfigProvider::new();
    assert_eq!(provider.node_address(), NodeAddress::new("127.0.0.1", 50051));
    assert!(provider.seed_nodes().is_empty());
    assert_eq!(provider.dht_config(), DhtConfig::default());
}

#[test]
fn test_static_config_provider_builder() {
    let provider = StaticConfigProvider::new()
        .with_address(NodeAddress::new("10.0.0.5", 7000))
        .with_seeds(vec!["10.0.1.77:50051".into()])
        .with_config(DhtConfig::for_testing());

    assert_eq!(provider.node_address().to_string(), "10.0.0.5:7000");
    assert_eq!(provider.seed_nodes(), vec!["10.0.1.77:50051".to_string()]);
    assert_eq!(provider.dht_config().concurrency, 1);
}

#[cfg(feature = "config")]
mod toml_provider {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let provider = TomlConfigProvider::parse(
            r#"
            [node]
            ip = "10.0.2.35"
            port = 6000

            [dht]
            replication_factor = 5
            concurrency = 8

            [bootstrap]
            seeds = ["10.0.1.77:50051", "  ", "[::1]:50051"]
            "#,
        )
        .unwrap();

        assert_eq!(provider.node_address(), NodeAddress::new("10.0.2.35", 6000));
        assert_eq!(provider.dht_config().replication_factor, 5);
        assert_eq!(provider.dht_config().concurrency, 8);
        assert_eq!(
            provider.seed_nodes(),
            vec!["10.0.1.77:50051".to_string(), "[::1]:50051".to_string()]
        );
    }

    #[test]
    fn test_parse_empty_file_uses_defaults() {
        let provider = TomlConfigProvider::parse("").unwrap();
        assert_eq!(provider.node_address(), NodeAddress::default());
        assert_eq!(provider.dht_config(), DhtConfig::default());
        assert!(provider.seed_nodes().is_empty());
    }

    #[test]
    fn test_parse_rejects_zero_replication_factor() {
        let result = TomlConfigProvider::parse("[dht]\nreplication_factor = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_zero_concurrency() {
        let result = TomlConfigProvider::parse("[dht]\nconcurrency = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let result = TomlConfigProvider::parse("[node\nip = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_section() {
        let result = TomlConfigProvider::parse("[kademlia]\nk = 20\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = TomlConfigProvider::load("/nonexistent/kad.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, "/nonexistent/kad.toml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("kad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[node]\nport = 50052\n").unwrap();

        let provider = TomlConfigProvider::load(&path).unwrap();
        assert_eq!(provider.node_address().port, 50052);

        std::fs::remove_file(&path).ok();
    }
}

#[tokio::test]
async fn test_static_resolver_answers_registered_remote() {
    let peer = Contact::new("10.0.1.77", 50051);
    let resolver =
        StaticContactResolver::new().with_answer("10.0.0.1:50051", vec![peer.clone()]);
    let sender = Contact::new("127.0.0.1", 50051);

    let contacts = resolver
        .find_node("10.0.0.1:50051", &hash_key(b"target"), &sender)
        .await
        .unwrap();
    assert_eq!(contacts, vec![peer]);
}

#[tokio::test]
async fn test_static_resolver_unknown_remote_is_unreachable() {
    let resolver = StaticContactResolver::new();
    let sender = Contact::new("127.0.0.1", 50051);

    let result = resolver
        .find_node("10.9.9.9:1", &sender.id, &sender)
        .await;
    assert_eq!(result, Err(ResolverError::Unreachable("10.9.9.9:1".into())));
}

#[tokio::test]
async fn test_static_resolver_remove_makes_remote_unreachable() {
    let resolver = StaticContactResolver::new().with_answer("10.0.0.1:1", Vec::new());
    let sender = Contact::new("127.0.0.1", 50051);
    assert!(resolver.find_node("10.0.0.1:1", &sender.id, &sender).await.is_ok());

    resolver.remove("10.0.0.1:1");
    assert!(resolver.find_node("10.0.0.1:1", &sender.id, &sender).await.is_err());
}
