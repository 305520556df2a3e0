use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::token_service::TokenService;
use crate::utils::AppError;

/// Request header carrying the bearer token.
pub const TOKEN_HEADER: &str = "token";

/// Gate for routes that need an identity.
///
/// Reads the `token` header, verifies it and stores the resulting
/// [`Claims`](crate::services::token_service::Claims) in the request
/// extensions for `web::ReqData<Claims>`. Rejections are answered here with
/// the `AppError` response; the wrapped service is never called.
pub struct AuthGuard;

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardService { service }))
    }
}

pub struct AuthGuardService<S> {
    service: S,
}

/// Accepts `<token>` as well as `Bearer <token>`; anything after the first
/// whitespace-separated part is ignored.
fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    value
        .strip_prefix("Bearer ")
        .unwrap_or(value)
        .split_whitespace()
        .next()
}

fn reject<B: 'static>(
    req: ServiceRequest,
    error: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    let response = req.error_response(error).map_into_right_body();
    Box::pin(async move { Ok(response) })
}

impl<S, B> Service<ServiceRequest> for AuthGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(token_from_header)
            .map(str::to_string);

        let Some(token) = token else {
            log::warn!("🔒 {} {} - no token header", req.method(), req.path());
            return reject(req, AppError::MissingToken);
        };

        let Some(tokens) = req.app_data::<web::Data<TokenService>>().cloned() else {
            log::error!("❌ TokenService is not registered as app data");
            return reject(req, AppError::Config("token service unavailable".to_string()));
        };

        match tokens.verify(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                let presented_as = tokens
                    .decode(&token)
                    .map(|claims| claims.email)
                    .unwrap_or_else(|_| "<unreadable>".to_string());
                log::warn!(
                    "🔒 {} {} - rejected token for {}: {}",
                    req.method(),
                    req.path(),
                    presented_as,
                    e
                );
                reject(req, AppError::InvalidToken(e))
            }
        }
    }
}
