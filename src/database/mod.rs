use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use std::fmt;

mod mongo;
#[cfg(test)]
pub mod memory;

pub use mongo::MongoDB;

pub const USERS: &str = "users";

#[derive(Debug)]
pub enum StoreError {
    Backend(String),
    DuplicateKey(String),
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "Database error: {}", msg),
            StoreError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            StoreError::Decode(msg) => write!(f, "Invalid document: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::bson::de::Error> for StoreError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Collection-oriented persistence addressed by filter or by identifier.
///
/// Filters are plain BSON documents: field equality plus a top-level `$or`.
/// Updates take the fields to `$set`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>>;

    /// Inserts the document and returns the identifier the store assigned.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId>;

    /// Returns the number of matched documents.
    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> StoreResult<u64>;

    /// Applies `set` to the first match and returns it as it is after the update.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> StoreResult<Option<Document>>;

    /// Removes the first match and returns it.
    async fn find_one_and_delete(
        &self,
        collection: &str,
        filter: Document,
    ) -> StoreResult<Option<Document>>;

    async fn ping(&self) -> StoreResult<()>;

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> StoreResult<Option<Document>> {
        self.find_one(collection, doc! { "_id": *id }).await
    }
}
