use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Letters Service API",
        version = "1.0.0",
        description = "Accounts plus CRUD over letters (`/api/data`), date records (`/api/datadate`) and map points (`/api/maps`).\n\n**Authentication:** send the token returned by login in the `token` header. Every resource route and `/api/users/check`, `/api/users/destroy` require it."
    ),
    paths(
        // Users
        crate::api::auth::smoke,
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::check,
        crate::api::auth::destroy,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::AccountInfo,
            crate::models::LetterRecord,
            crate::models::DateRecord,
            crate::models::MapPoint,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Registration, login and token checks."),
        (name = "Health", description = "Liveness of the service and its database."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "token",
                    "Token returned by /api/users/login",
                ))),
            );
        }
    }
}
