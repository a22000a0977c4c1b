//! In-memory [`TreeStore`] implementation for testing.
//!
//! Holds the whole tree as one `serde_json::Value` behind an `RwLock`.
//! Reads descend the tree by path segment; writes create intermediate
//! objects as needed, mirroring the hosted store's behavior. A
//! `fail_writes` switch lets tests exercise the write-failure path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::TreeStore;

/// In-memory tree store for tests.
pub struct MemoryTreeStore {
    tree: RwLock<Value>,
    fail_writes: AtomicBool,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::with_tree(Value::Object(Map::new()))
    }

    /// Start from a pre-seeded tree.
    pub fn with_tree(tree: Value) -> Self {
        MemoryTreeStore {
            tree: RwLock::new(tree),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// When set, every write and push is rejected. Reads still succeed,
    /// so tests can observe that a failed mutation changed nothing.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Clone of the current whole tree.
    pub fn snapshot(&self) -> Value {
        self.tree.read().unwrap().clone()
    }
}

impl Default for MemoryTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Walk `root` down `path`, `None` if any segment is missing or the
/// parent is not an object.
fn descend<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for seg in segments(path) {
        node = node.as_object()?.get(seg)?;
    }
    Some(node)
}

/// Walk and create: every intermediate segment becomes an object,
/// clobbering non-object values on the way, which is what the hosted
/// store does on a deep write.
fn descend_create<'a>(root: &'a mut Value, path: &str) -> &'a mut Value {
    let mut node = root;
    for seg in segments(path) {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()
            .unwrap()
            .entry(seg.to_string())
            .or_insert(Value::Object(Map::new()));
    }
    node
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        let tree = self.tree.read().unwrap();
        Ok(descend(&tree, path)
            .filter(|v| !v.is_null())
            .cloned())
    }

    async fn write(&self, path: &str, value: Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("store rejected write at {path}");
        }
        let mut tree = self.tree.write().unwrap();
        *descend_create(&mut tree, path) = value;
        Ok(())
    }

    async fn write_many(&self, updates: &[(String, Value)]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("store rejected batch write");
        }
        let mut tree = self.tree.write().unwrap();
        for (path, value) in updates {
            *descend_create(&mut tree, path) = value.clone();
        }
        Ok(())
    }

    async fn push(&self, parent: &str) -> Result<String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("store rejected key allocation under {parent}");
        }
        Ok(uuid::Uuid::new_v4().simple().to_string())
    }
}
