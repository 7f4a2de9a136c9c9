//! Document payload
//!
//! A document resource is one immutable revision. Handles read it without
//! locking; writers install a new revision in the collection instead.

use std::sync::{Arc, Weak};

use reclaim_core::{ReclaimError, ReclaimResult, ResourceKind};
use reclaim_storage::{Handle, Payload, Resource};
use serde_json::Value as JsonValue;

use super::collection::{CollectionData, DocumentMeta};

/// Handle on one document revision
pub type DocumentHandle = Handle<DocumentData>;

/// One revision of a document
pub struct DocumentData {
    key: String,
    revision: u64,
    body: JsonValue,
    collection: Weak<Resource<CollectionData>>,
}

impl DocumentData {
    pub(crate) fn create(
        key: &str,
        revision: u64,
        body: JsonValue,
        collection: Weak<Resource<CollectionData>>,
    ) -> Arc<Resource<Self>> {
        Resource::new(
            DocumentData {
                key: key.to_string(),
                revision,
                body,
                collection,
            },
            0,
        )
    }

    /// Document key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Key and revision
    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            key: self.key.clone(),
            revision: self.revision,
        }
    }

    /// Full JSON body
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    /// Top-level attribute of an object body
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.body.get(field)
    }

    /// Name of the owning collection, if it still exists in memory
    pub fn collection_name(&self) -> Option<String> {
        self.collection
            .upgrade()
            .map(|c| c.payload().name().to_string())
    }

    /// Fetch the current revision of this document from its collection
    ///
    /// Fails with `NotFound` once the collection or the document is gone.
    pub fn refresh(&self) -> ReclaimResult<DocumentHandle> {
        let collection = self.collection.upgrade().ok_or_else(|| {
            ReclaimError::not_found(ResourceKind::Collection, format!("<of {}>", self.key))
        })?;
        collection.payload().document(&self.key)
    }
}

impl Payload for DocumentData {
    const KIND: ResourceKind = ResourceKind::Document;

    fn name(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for DocumentData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentData")
            .field("key", &self.key)
            .field("revision", &self.revision)
            .finish()
    }
}
