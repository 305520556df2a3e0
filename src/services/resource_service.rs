//! Store operations behind the `/data`, `/datadate` and `/maps` endpoints.
//!
//! Every function is generic over [`Resource`], so the three collections share
//! one implementation. Identifiers that are not valid ObjectIds can never
//! match a document and are treated as absent.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::database::{DocumentStore, StoreError, StoreResult};
use crate::models::{patch_fields, Record, Resource};

fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn records<R: Resource>(documents: Vec<Document>) -> StoreResult<Vec<Record<R>>> {
    documents.into_iter().map(Record::from_document).collect()
}

/// `$or` of the supplied-field combination and of each supplied field alone.
pub fn search_filter(fields: &Document) -> Document {
    let mut clauses = vec![Bson::Document(fields.clone())];
    if fields.len() > 1 {
        clauses.extend(fields.iter().map(|(key, value)| {
            let mut single = Document::new();
            single.insert(key.clone(), value.clone());
            Bson::Document(single)
        }));
    }
    doc! { "$or": clauses }
}

pub async fn create<R: Resource>(store: &dyn DocumentStore, fields: R) -> StoreResult<Record<R>> {
    let document = mongodb::bson::to_document(&fields).map_err(StoreError::from)?;
    let id = store.insert_one(R::COLLECTION, document).await?;
    Ok(Record {
        id: id.to_hex(),
        fields,
    })
}

pub async fn search<R: Resource>(
    store: &dyn DocumentStore,
    patch: &R::Patch,
) -> StoreResult<Vec<Record<R>>> {
    let filter = search_filter(&patch_fields::<R>(patch)?);
    records(store.find(R::COLLECTION, filter).await?)
}

pub async fn list<R: Resource>(store: &dyn DocumentStore) -> StoreResult<Vec<Record<R>>> {
    records(store.find(R::COLLECTION, doc! {}).await?)
}

pub async fn find_by_id<R: Resource>(
    store: &dyn DocumentStore,
    id: &str,
) -> StoreResult<Option<Record<R>>> {
    let Some(object_id) = parse_id(id) else {
        return Ok(None);
    };
    store
        .find_by_id(R::COLLECTION, &object_id)
        .await?
        .map(Record::from_document)
        .transpose()
}

/// Sets the supplied fields and returns the document after the update.
/// `None` when nothing has that id.
pub async fn update<R: Resource>(
    store: &dyn DocumentStore,
    id: &str,
    patch: &R::Patch,
) -> StoreResult<Option<Record<R>>> {
    let Some(object_id) = parse_id(id) else {
        return Ok(None);
    };

    let set = patch_fields::<R>(patch)?;
    // MongoDB refuses an empty $set
    if set.is_empty() {
        return find_by_id::<R>(store, id).await;
    }

    store
        .find_one_and_update(R::COLLECTION, doc! { "_id": object_id }, set)
        .await?
        .map(Record::from_document)
        .transpose()
}

pub async fn delete<R: Resource>(
    store: &dyn DocumentStore,
    id: &str,
) -> StoreResult<Option<Record<R>>> {
    let Some(object_id) = parse_id(id) else {
        return Ok(None);
    };
    store
        .find_one_and_delete(R::COLLECTION, doc! { "_id": object_id })
        .await?
        .map(Record::from_document)
        .transpose()
}
