pub mod auth_service;
pub mod resource_service;
pub mod token_service;
