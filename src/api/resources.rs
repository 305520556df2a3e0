//! Generic CRUD handlers, mounted once per [`Resource`] kind:
//! `/data` (letters), `/datadate` (date records) and `/maps` (map points).

use actix_web::{web, HttpResponse};

use super::Store;
use crate::models::Resource;
use crate::services::resource_service;
use crate::utils::AppError;

/// Registers the CRUD routes for `R` relative to the enclosing scope.
pub fn routes<R: Resource>(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create::<R>))
        .route("", web::get().to(list::<R>))
        .route("/search", web::post().to(search::<R>))
        .route("/{id}", web::get().to(find::<R>))
        .route("/{id}", web::put().to(update::<R>))
        .route("/{id}", web::delete().to(delete::<R>));
}

/// POST - adds a document
pub async fn create<R: Resource>(
    store: Store,
    body: web::Json<R>,
) -> Result<HttpResponse, AppError> {
    let record = resource_service::create(store.get_ref(), body.into_inner())
        .await
        .map_err(|e| {
            log::error!("❌ Failed to add to {}: {}", R::COLLECTION, e);
            AppError::from(e)
        })?;
    log::info!("✅ Added {} to {}", record.id, R::COLLECTION);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "data have been added",
        "data": record
    })))
}

/// POST /search - OR across the supplied fields
pub async fn search<R: Resource>(
    store: Store,
    body: web::Json<R::Patch>,
) -> Result<HttpResponse, AppError> {
    let found = resource_service::search::<R>(store.get_ref(), &body).await?;
    log::info!("🔍 Search in {} matched {} documents", R::COLLECTION, found.len());

    if found.is_empty() {
        return Err(AppError::NoResults);
    }

    Ok(HttpResponse::Created().json(serde_json::json!({ "data": found })))
}

/// GET - every document, unfiltered
pub async fn list<R: Resource>(store: Store) -> Result<HttpResponse, AppError> {
    let all = resource_service::list::<R>(store.get_ref()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "data": all,
        "message": "success"
    })))
}

/// PUT /{id} - `data` is null when the id matches nothing
pub async fn update<R: Resource>(
    store: Store,
    path: web::Path<String>,
    body: web::Json<R::Patch>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let updated = resource_service::update::<R>(store.get_ref(), &id, &body).await?;
    if updated.is_none() {
        log::warn!("⚠️ Update on {}: no document {}", R::COLLECTION, id);
    }

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "data": updated
    })))
}

/// DELETE /{id} - echoes the removed document (null when absent)
pub async fn delete<R: Resource>(
    store: Store,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let deleted = resource_service::delete::<R>(store.get_ref(), &id).await?;
    log::info!("🗑️ Delete {} from {} (found: {})", id, R::COLLECTION, deleted.is_some());

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "success",
        "data": deleted
    })))
}

/// GET /{id}
pub async fn find<R: Resource>(
    store: Store,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    match resource_service::find_by_id::<R>(store.get_ref(), &path).await? {
        Some(record) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "data found",
            "data": record
        }))),
        None => Err(AppError::NotFound),
    }
}
