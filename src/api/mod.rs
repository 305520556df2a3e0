use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::database::DocumentStore;
use crate::middleware::AuthGuard;
use crate::models::{DateRecord, LetterRecord, MapPoint};
use crate::utils::AppError;

/// Builds an in-process app over a fresh `MemoryStore`.
/// Yields `(service, store, token_service)`.
#[cfg(test)]
macro_rules! test_app {
    () => {{
        let store = std::sync::Arc::new(crate::database::memory::MemoryStore::new());
        let shared: std::sync::Arc<dyn crate::database::DocumentStore> = store.clone();
        let settings = crate::config::Settings::for_tests();
        let tokens = settings.token_service();
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(shared))
                .app_data(actix_web::web::Data::new(tokens.clone()))
                .app_data(actix_web::web::Data::new(settings))
                .configure(crate::api::configure),
        )
        .await;
        (app, store, tokens)
    }};
}

/// Registers an account through the API, logs in and returns the token.
#[cfg(test)]
macro_rules! register_and_login {
    ($app:expr, $email:expr, $password:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(serde_json::json!({
                "email": $email,
                "password": $password,
                "retypepassword": $password
            }))
            .to_request();
        let res = actix_web::test::call_service($app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);

        let req = actix_web::test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(serde_json::json!({ "email": $email, "password": $password }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        body["token"].as_str().expect("login returns a token").to_string()
    }};
}

/// Handler extractor for the shared document store.
pub type Store = web::Data<dyn DocumentStore>;

pub mod auth;
pub mod health;
pub mod resources;
pub mod swagger;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️ Rejected JSON body: {}", err);
    AppError::BadRequest(err.to_string()).into()
}

/// Mounts `/health` and every `/api` route.
///
/// Registration and login are public; everything that needs an identity is
/// wrapped in [`AuthGuard`] per route group.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/users")
                        .route("", web::get().to(auth::smoke))
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .service(
                            web::resource("/check")
                                .wrap(AuthGuard)
                                .route(web::post().to(auth::check)),
                        )
                        .service(
                            web::resource("/destroy")
                                .wrap(AuthGuard)
                                .route(web::get().to(auth::destroy)),
                        ),
                )
                .service(
                    web::scope("/data")
                        .wrap(AuthGuard)
                        .configure(resources::routes::<LetterRecord>),
                )
                .service(
                    web::scope("/datadate")
                        .wrap(AuthGuard)
                        .configure(resources::routes::<DateRecord>),
                )
                .service(
                    web::scope("/maps")
                        .wrap(AuthGuard)
                        .configure(resources::routes::<MapPoint>),
                ),
        );
}
