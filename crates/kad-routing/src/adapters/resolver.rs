use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::domain::{Contact, NodeId};
use crate::ports::{ContactResolver, ResolverError};

/// In-memory [`ContactResolver`] answering from a fixed table.
///
/// Remotes without an entry are reported unreachable. Used by tests and by
/// the node binary when no transport is wired in.
#[derive(Debug, Default)]
pub struct StaticContactResolver {
    answers: RwLock<HashMap<String, Vec<Contact>>>,
}

impl StaticContactResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `remote` answer every query with `contacts`.
    #[must_use]
    pub fn with_answer(self, remote: impl Into<String>, contacts: Vec<Contact>) -> Self {
        self.set_answer(remote, contacts);
        self
    }

    pub fn set_answer(&self, remote: impl Into<String>, contacts: Vec<Contact>) {
        self.answers.write().insert(remote.into(), contacts);
    }

    /// Make `remote` unreachable again.
    pub fn remove(&self, remote: &str) {
        self.answers.write().remove(remote);
    }
}

#[async_trait]
impl ContactResolver for StaticContactResolver {
    async fn find_node(
        &self,
        remote: &str,
        target: &NodeId,
        sender: &Contact,
    ) -> Result<Vec<Contact>, ResolverError> {
        trace!(remote, target = %target, sender = %sender.endpoint(), "static find_node");
        self.answers
            .read()
            .get(remote)
            .cloned()
            .ok_or_else(|| ResolverError::Unreachable(remote.to_string()))
    }
}
