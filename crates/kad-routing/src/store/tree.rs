//! Binary search tree keyed by full 224-bit identifiers.
//!
//! Keys compare as 28-byte big-endian values. The tree is not synchronized;
//! exactly one shard worker owns each instance.

use std::cmp::Ordering;
use std::mem;

use crate::domain::NodeId;

type Link<V> = Option<Box<TreeNode<V>>>;

struct TreeNode<V> {
    key: NodeId,
    value: V,
    left: Link<V>,
    right: Link<V>,
}

impl<V> TreeNode<V> {
    fn new(key: NodeId, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Unbalanced BST. Hashed keys arrive in effectively random order, so the
/// expected height stays logarithmic.
pub(crate) struct Tree<V> {
    root: Link<V>,
    len: usize,
}

impl<V> Tree<V> {
    pub(crate) fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Insert or replace. Returns the previous value for `key`.
    pub(crate) fn insert(&mut self, key: NodeId, value: V) -> Option<V> {
        let replaced = insert_at(&mut self.root, key, value);
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// Key-directed descent.
    pub(crate) fn get(&self, key: &NodeId) -> Option<&V> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Remove `key`, splicing in the in-order successor when the node has two
    /// children.
    pub(crate) fn remove(&mut self, key: &NodeId) -> Option<V> {
        let removed = remove_at(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// In-order (ascending key) traversal.
    pub(crate) fn for_each_in_order<F>(&self, mut f: F)
    where
        F: FnMut(&NodeId, &V),
    {
        let mut stack: Vec<&TreeNode<V>> = Vec::new();
        let mut cur = self.root.as_deref();
        loop {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            match stack.pop() {
                Some(node) => {
                    f(&node.key, &node.value);
                    cur = node.right.as_deref();
                }
                None => break,
            }
        }
    }
}

impl<V: Clone> Tree<V> {
    pub(crate) fn entries(&self) -> Vec<(NodeId, V)> {
        let mut out = Vec::with_capacity(self.len);
        self.for_each_in_order(|k, v| out.push((*k, v.clone())));
        out
    }
}

fn insert_at<V>(link: &mut Link<V>, key: NodeId, value: V) -> Option<V> {
    match link {
        None => {
            *link = Some(TreeNode::new(key, value));
            None
        }
        Some(node) => match key.cmp(&node.key) {
            Ordering::Less => insert_at(&mut node.left, key, value),
            Ordering::Greater => insert_at(&mut node.right, key, value),
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        },
    }
}

fn remove_at<V>(link: &mut Link<V>, key: &NodeId) -> Option<V> {
    let ordering = key.cmp(&link.as_ref()?.key);
    match ordering {
        Ordering::Less => remove_at(&mut link.as_mut()?.left, key),
        Ordering::Greater => remove_at(&mut link.as_mut()?.right, key),
        Ordering::Equal => {
            let mut node = link.take()?;
            *link = match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(only), None) | (None, Some(only)) => Some(only),
                (Some(left), Some(right)) => {
                    let mut right = Some(right);
                    let mut successor = take_min(&mut right)?;
                    successor.left = Some(left);
                    successor.right = right;
                    Some(successor)
                }
            };
            Some(node.value)
        }
    }
}

/// Detach the minimum node of a non-empty subtree, re-linking its right child.
fn take_min<V>(link: &mut Link<V>) -> Option<Box<TreeNode<V>>> {
    if link.as_ref()?.left.is_some() {
        return take_min(&mut link.as_mut()?.left);
    }
    let mut node = link.take()?;
    *link = node.right.take();
    Some(node)
}
