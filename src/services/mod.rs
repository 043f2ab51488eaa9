pub mod auth;
pub mod password;
pub mod tenants;
pub mod token;
