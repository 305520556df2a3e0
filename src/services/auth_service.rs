use bcrypt::{hash, verify};
use mongodb::bson::{self, doc};

use crate::database::{DocumentStore, StoreError, USERS};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::services::token_service::{Claims, TokenService};
use crate::utils::AppError;

async fn find_user(store: &dyn DocumentStore, email: &str) -> Result<Option<User>, AppError> {
    match store.find_one(USERS, doc! { "email": email }).await? {
        Some(document) => Ok(Some(
            bson::from_document(document).map_err(StoreError::from)?,
        )),
        None => Ok(None),
    }
}

fn issue(tokens: &TokenService, email: &str) -> Result<String, AppError> {
    tokens.issue(email).map_err(|e| AppError::Token(e.to_string()))
}

// User registration
pub async fn register(
    store: &dyn DocumentStore,
    tokens: &TokenService,
    bcrypt_cost: u32,
    request: &RegisterRequest,
) -> Result<AuthResponse, AppError> {
    if find_user(store, &request.email).await?.is_some() {
        return Err(AppError::EmailExists);
    }

    if request.password != request.retype_password {
        return Err(AppError::PasswordMismatch);
    }

    let password_hash = hash(&request.password, bcrypt_cost)?;
    let token = issue(tokens, &request.email)?;

    let user = User {
        id: None,
        email: request.email.clone(),
        password: password_hash,
        token: Some(token.clone()),
    };
    let document = bson::to_document(&user).map_err(StoreError::from)?;

    // A concurrent registration loses on the unique index: DuplicateKey -> EmailExists
    store.insert_one(USERS, document).await?;

    Ok(AuthResponse::new(user.email, token))
}

// User login
pub async fn login(
    store: &dyn DocumentStore,
    tokens: &TokenService,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let user = find_user(store, &request.email)
        .await?
        .ok_or(AppError::EmailNotFound)?;

    let password_ok = verify(&request.password, &user.password).unwrap_or_else(|e| {
        log::warn!("⚠️  Stored password for {} is not a valid hash: {}", user.email, e);
        false
    });
    if !password_ok {
        return Err(AppError::WrongPassword);
    }

    let token = issue(tokens, &user.email)?;
    store
        .update_many(USERS, doc! { "email": user.email.as_str() }, doc! { "token": token.as_str() })
        .await?;

    Ok(AuthResponse::new(user.email, token))
}

/// Confirms the identity in already-verified claims still has an account.
pub async fn check(store: &dyn DocumentStore, claims: &Claims) -> Result<(), AppError> {
    match find_user(store, &claims.email).await? {
        Some(_) => Ok(()),
        None => Err(AppError::UnknownIdentity),
    }
}
