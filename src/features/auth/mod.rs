//! Bearer token authentication.
//!
//! Every WorldCity route sits behind [`crate::core::middleware::auth_middleware`],
//! which uses [`JwtValidator`] to turn the `Authorization` header into an
//! [`model::AuthenticatedUser`] before any handler runs.

mod jwks;
mod validator;

pub mod model;

pub use validator::JwtValidator;
