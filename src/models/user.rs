use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Account document stored in the `users` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// bcrypt hash, never the plaintext
    pub password: String,
    /// Last issued token
    #[serde(default)]
    pub token: Option<String>,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "retypepassword", alias = "retypePassword")]
    pub retype_password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountInfo {
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub data: AccountInfo,
    pub token: String,
}

impl AuthResponse {
    pub fn new(email: String, token: String) -> Self {
        Self {
            data: AccountInfo { email },
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_accepts_both_retype_spellings() {
        let legacy: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.c","password":"1234","retypepassword":"1234"}"#,
        )
        .unwrap();
        let camel: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.c","password":"1234","retypePassword":"1234"}"#,
        )
        .unwrap();
        assert_eq!(legacy.retype_password, "1234");
        assert_eq!(camel.retype_password, "1234");
    }

    #[test]
    fn user_without_token_deserializes() {
        let user: User = mongodb::bson::from_document(mongodb::bson::doc! {
            "email": "a@b.c",
            "password": "$2b$04$hash",
        })
        .unwrap();
        assert!(user.token.is_none());
        assert!(user.id.is_none());
    }
}
