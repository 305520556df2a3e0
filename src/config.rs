use chrono::{Duration, Utc};
use std::env;
use std::ops::RangeInclusive;

use crate::services::token_service::TokenService;
use crate::utils::AppError;

const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Costs the bcrypt crate accepts.
const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Retired signing secrets still accepted when verifying tokens
    pub jwt_previous_secrets: Vec<String>,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("⚠️  JWT_SECRET not set, using the built-in development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            database_url,
            jwt_secret,
            jwt_previous_secrets: list(lookup("JWT_PREVIOUS_SECRETS")),
            token_ttl: token_ttl(parse_or(&lookup, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?)?,
            bcrypt_cost: bcrypt_cost(parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?)?,
            cors_origins: match lookup("CORS_ORIGINS") {
                Some(origins) => list(Some(origins)),
                None => vec!["http://localhost:3000".to_string()],
            },
        })
    }

    pub fn token_service(&self) -> TokenService {
        TokenService::new(
            self.jwt_secret.clone(),
            self.jwt_previous_secrets.clone(),
            self.token_ttl,
        )
    }
}

#[cfg(test)]
impl Settings {
    /// Settings for in-process tests: cheap bcrypt, fixed secret.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "mongodb://localhost:27017/letters_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_previous_secrets: vec![],
            token_ttl: Duration::hours(1),
            bcrypt_cost: 4,
            cors_origins: vec![],
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

/// Tokens must expire in the future, at a time chrono can still represent.
fn token_ttl(hours: i64) -> Result<Duration, AppError> {
    Duration::try_hours(hours)
        .filter(|ttl| *ttl > Duration::zero())
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| AppError::Config(format!("TOKEN_TTL_HOURS is out of range: {}", hours)))
}

fn bcrypt_cost(cost: u32) -> Result<u32, AppError> {
    if BCRYPT_COSTS.contains(&cost) {
        Ok(cost)
    } else {
        Err(AppError::Config(format!(
            "BCRYPT_COST must be between {} and {}: {}",
            BCRYPT_COSTS.start(),
            BCRYPT_COSTS.end(),
            cost
        )))
    }
}

fn list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(settings(&[]), Err(AppError::Config(_))));
    }

    #[test]
    fn defaults_apply() {
        let s = settings(&[("DATABASE_URL", "mongodb://localhost/letters")]).unwrap();
        assert_eq!(s.port, 3000);
        assert_eq!(s.token_ttl, Duration::hours(24));
        assert_eq!(s.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(s.jwt_secret, DEFAULT_JWT_SECRET);
        assert!(s.jwt_previous_secrets.is_empty());
    }

    #[test]
    fn lists_are_comma_separated() {
        let s = settings(&[
            ("DATABASE_URL", "mongodb://localhost/letters"),
            ("JWT_PREVIOUS_SECRETS", "old-1, old-2,,"),
            ("CORS_ORIGINS", "http://a.test,http://b.test"),
        ])
        .unwrap();
        assert_eq!(s.jwt_previous_secrets, vec!["old-1", "old-2"]);
        assert_eq!(s.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let result = settings(&[
            ("DATABASE_URL", "mongodb://localhost/letters"),
            ("PORT", "eighty"),
        ]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn token_ttl_must_be_representable() {
        for hours in ["0", "-5", "10000000000"] {
            let result = settings(&[
                ("DATABASE_URL", "mongodb://localhost/letters"),
                ("TOKEN_TTL_HOURS", hours),
            ]);
            assert!(matches!(result, Err(AppError::Config(_))), "accepted ttl {}", hours);
        }

        let s = settings(&[
            ("DATABASE_URL", "mongodb://localhost/letters"),
            ("TOKEN_TTL_HOURS", "720"),
        ])
        .unwrap();
        assert_eq!(s.token_ttl, Duration::hours(720));
        assert!(s.token_service().issue("a@b.c").is_ok());
    }

    #[test]
    fn bcrypt_cost_must_be_supported() {
        for cost in ["2", "3", "32"] {
            let result = settings(&[
                ("DATABASE_URL", "mongodb://localhost/letters"),
                ("BCRYPT_COST", cost),
            ]);
            assert!(matches!(result, Err(AppError::Config(_))), "accepted cost {}", cost);
        }

        let s = settings(&[
            ("DATABASE_URL", "mongodb://localhost/letters"),
            ("BCRYPT_COST", "4"),
        ])
        .unwrap();
        assert!(bcrypt::hash("1234", s.bcrypt_cost).is_ok());
    }
}
