//! Initial population of the routing table from seed nodes.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::core::DhtNode;
use crate::domain::{Contact, DhtError};
use crate::ports::ContactResolver;

/// Seeds queried at once unless overridden.
pub const DEFAULT_BOOTSTRAP_PARALLELISM: usize = 3;

/// Outcome of one bootstrap round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Seeds asked for contacts
    pub queried: usize,
    /// Seeds that failed to answer
    pub failed: usize,
    /// Distinct contacts recorded (answering seeds included)
    pub added: usize,
}

impl BootstrapReport {
    pub fn answered(&self) -> usize {
        self.queried - self.failed
    }
}

/// Asks every seed for the contacts closest to the local node and records
/// the answers.
pub struct Bootstrapper<R> {
    resolver: R,
    seeds: Vec<String>,
    parallelism: usize,
}

impl<R: ContactResolver> Bootstrapper<R> {
    pub fn new(resolver: R, seeds: Vec<String>) -> Self {
        Self {
            resolver,
            seeds,
            parallelism: DEFAULT_BOOTSTRAP_PARALLELISM,
        }
    }

    /// Limit on seeds queried concurrently (minimum 1).
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Query every seed once.
    ///
    /// A seed that answers is itself recorded, followed by every contact it
    /// returned. The local node is never recorded. Seeds that fail are
    /// counted and logged; only routing table errors abort the round.
    pub async fn run(&self, node: &DhtNode) -> Result<BootstrapReport, DhtError> {
        let target = node.id();
        let sender = node.contact();

        info!(
            seeds = self.seeds.len(),
            parallelism = self.parallelism,
            "bootstrap started"
        );

        let answers: Vec<_> = stream::iter(self.seeds.iter())
            .map(|seed| async move {
                let result = self.resolver.find_node(seed, &target, sender).await;
                (seed, result)
            })
            .buffer_unordered(self.parallelism)
            .collect()
            .await;

        let mut report = BootstrapReport {
            queried: self.seeds.len(),
            ..BootstrapReport::default()
        };
        let mut recorded = HashSet::new();
        recorded.insert(target);

        for (seed, result) in answers {
            let contacts = match result {
                Ok(contacts) => contacts,
                Err(e) => {
                    warn!(seed = %seed, error = %e, "seed did not answer");
                    report.failed += 1;
                    continue;
                }
            };
            debug!(seed = %seed, returned = contacts.len(), "seed answered");

            let seed_contact = parse_endpoint(seed);
            for contact in seed_contact.into_iter().chain(contacts) {
                if recorded.insert(contact.id) {
                    node.add_or_update_node(contact)?;
                    report.added += 1;
                }
            }
        }

        info!(
            queried = report.queried,
            failed = report.failed,
            added = report.added,
            "bootstrap finished"
        );
        Ok(report)
    }
}

/// Split `"ip:port"` (or `"[v6]:port"`) into a contact.
pub(crate) fn parse_endpoint(endpoint: &str) -> Option<Contact> {
    let (host, port) = endpoint.rsplit_once(':')?;
    let port = port.parse::<u16>().ok()?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some(Contact::new(host, port))
}
