//! In-process `DocumentStore` used by the unit tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{DocumentStore, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Vec<Document>) -> T,
    ) -> StoreResult<T> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(f(collections.entry(name.to_string()).or_default()))
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match (key.as_str(), expected) {
        ("$or", Bson::Array(clauses)) => clauses.iter().any(|clause| match clause {
            Bson::Document(clause) => matches(document, clause),
            _ => false,
        }),
        _ => document.get(key).is_some_and(|actual| values_equal(actual, expected)),
    })
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

fn apply_set(document: &mut Document, set: &Document) {
    for (key, value) in set {
        document.insert(key.clone(), value.clone());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>> {
        self.with_collection(collection, |docs| {
            docs.iter().filter(|d| matches(d, &filter)).cloned().collect()
        })
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        self.with_collection(collection, |docs| docs.iter().find(|d| matches(d, &filter)).cloned())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert("_id", id);
        self.with_collection(collection, |docs| docs.push(document))?;
        Ok(id)
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> StoreResult<u64> {
        self.with_collection(collection, |docs| {
            let mut matched = 0;
            for document in docs.iter_mut().filter(|d| matches(d, &filter)) {
                apply_set(document, &set);
                matched += 1;
            }
            matched
        })
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
    ) -> StoreResult<Option<Document>> {
        self.with_collection(collection, |docs| {
            docs.iter_mut().find(|d| matches(d, &filter)).map(|document| {
                apply_set(document, &set);
                document.clone()
            })
        })
    }

    async fn find_one_and_delete(
        &self,
        collection: &str,
        filter: Document,
    ) -> StoreResult<Option<Document>> {
        self.with_collection(collection, |docs| {
            docs.iter()
                .position(|d| matches(d, &filter))
                .map(|index| docs.remove(index))
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn or_filter_matches_any_clause() {
        let store = MemoryStore::new();
        store.insert_one("letters", doc! { "letter": "A", "frequency": 1.1 }).await.unwrap();
        store.insert_one("letters", doc! { "letter": "B", "frequency": 2.0 }).await.unwrap();

        let found = store
            .find("letters", doc! { "$or": [{ "letter": "A", "frequency": 9.9 }, { "letter": "A" }] })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("letter").unwrap(), "A");

        let everything = store.find("letters", doc! { "$or": [{}] }).await.unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[tokio::test]
    async fn numbers_compare_across_bson_types() {
        let store = MemoryStore::new();
        store.insert_one("letters", doc! { "letter": "C", "frequency": 2 }).await.unwrap();

        let found = store.find_one("letters", doc! { "frequency": 2.0 }).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn update_and_delete_return_the_touched_document() {
        let store = MemoryStore::new();
        let id = store.insert_one("maps", doc! { "title": "Home", "lat": 1.0, "lang": 2.0 }).await.unwrap();

        let updated = store
            .find_one_and_update("maps", doc! { "_id": id }, doc! { "title": "Office" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get_str("title").unwrap(), "Office");
        assert_eq!(updated.get_f64("lat").unwrap(), 1.0);

        let deleted = store.find_one_and_delete("maps", doc! { "_id": id }).await.unwrap();
        assert!(deleted.is_some());
        assert!(store.find_by_id("maps", &id).await.unwrap().is_none());
    }
}
