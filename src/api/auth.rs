use actix_web::{cookie::Cookie, web, HttpResponse};

use super::Store;
use crate::config::Settings;
use crate::middleware::auth::TOKEN_HEADER;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::auth_service;
use crate::services::token_service::{Claims, TokenService};
use crate::utils::AppError;

/// GET /api/users - smoke test
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Router is alive"))
)]
pub async fn smoke() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "data": "Test" }))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Passwords do not match"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register(
    store: Store,
    tokens: web::Data<TokenService>,
    settings: web::Data<Settings>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users/register - email: {}", request.email);

    let registered =
        auth_service::register(store.get_ref(), &tokens, settings.bcrypt_cost, &request).await;
    match registered {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            Ok(HttpResponse::Created().json(response))
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Password does not match"),
        (status = 404, description = "Email not registered")
    )
)]
pub async fn login(
    store: Store,
    tokens: web::Data<TokenService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /users/login - email: {}", request.email);

    match auth_service::login(store.get_ref(), &tokens, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            Ok(HttpResponse::Created().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/check",
    tag = "Users",
    responses(
        (status = 201, description = "Token belongs to an existing account"),
        (status = 401, description = "Token missing, invalid, expired or for an unknown account")
    ),
    security(("token" = []))
)]
pub async fn check(
    store: Store,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    log::info!("✓ POST /users/check - email: {}", claims.email);

    auth_service::check(store.get_ref(), &claims).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "valid": true,
        "data": claims.into_inner()
    })))
}

/// Logout is client side: the token stays valid until it expires, the
/// response only tells the client to drop its cookie.
#[utoipa::path(
    get,
    path = "/api/users/destroy",
    tag = "Users",
    responses(
        (status = 200, description = "Client should discard its token"),
        (status = 401, description = "Token missing or invalid")
    ),
    security(("token" = []))
)]
pub async fn destroy(claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("👋 GET /users/destroy - email: {}", claims.email);

    let mut cookie = Cookie::new(TOKEN_HEADER, "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "logout": "true" }))
}
