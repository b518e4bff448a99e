//! Schema Registry
//!
//! Thread-safe mapping from reference URI to schema source text. A
//! registry is pure data: registering a schema never touches the native
//! engine. During a compile the resolver consults the registry bound to
//! the calling thread before trying any remote or bundled source.
//!
//! Clones share the same underlying map, so a clone can ride in the
//! thread-local compile context while the caller keeps using (and
//! mutating) the same logical registry elsewhere.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{BlazeError, Result};

/// Pre-registered schema sources, keyed by reference URI
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Arc<RwLock<HashMap<String, String>>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under a URI; a later `register` for the same URI
    /// replaces the earlier entry
    pub fn register(&self, uri: impl Into<String>, schema: impl Into<String>) -> Result<()> {
        let uri = uri.into();
        let schema = schema.into();
        if uri.is_empty() {
            return Err(BlazeError::InvalidArgument("registry URI is empty".into()));
        }
        if schema.is_empty() {
            return Err(BlazeError::InvalidArgument(format!(
                "schema for '{uri}' is empty"
            )));
        }
        self.write().insert(uri, schema);
        Ok(())
    }

    /// Remove a URI; absent entries are not an error
    pub fn unregister(&self, uri: &str) {
        self.write().remove(uri);
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.read().contains_key(uri)
    }

    /// Look up the schema registered for a URI. `None` means the URI is
    /// absent, which is distinct from a registered empty schema (which
    /// `register` rejects anyway).
    pub fn resolve(&self, uri: &str) -> Option<String> {
        self.read().get(uri).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.schemas.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.schemas.write().unwrap_or_else(|e| e.into_inner())
    }
}
