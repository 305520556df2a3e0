use mongodb::bson::{self, Document};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::database::{StoreError, StoreResult};

/// A keyed document kind served by the generic CRUD endpoints.
///
/// `Self` is the full field schema required on create; `Patch` is the same
/// schema with every field optional, used for search and update.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Patch: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// MongoDB collection the documents live in
    const COLLECTION: &'static str;
}

/// A stored document as it goes out on the wire: `_id` as a hex string next
/// to the resource fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<R> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: R,
}

impl<R: Resource> Record<R> {
    pub fn from_document(mut document: Document) -> StoreResult<Self> {
        let id = document
            .get_object_id("_id")
            .map_err(|e| StoreError::Decode(format!("_id: {}", e)))?;
        document.remove("_id");

        Ok(Self {
            id: id.to_hex(),
            fields: bson::from_document(document)?,
        })
    }
}

/// Only the fields present in the patch, ready for `$set` or a filter.
pub fn patch_fields<R: Resource>(patch: &R::Patch) -> StoreResult<Document> {
    bson::to_document(patch).map_err(StoreError::from)
}
