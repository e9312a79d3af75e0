pub mod claims;
pub mod error;
pub mod identity_resolver;
pub mod jwt_validator;

pub use claims::Claims;
pub use error::{AuthError, Result};
pub use identity_resolver::{IdentityResolver, extract_bearer_token};
pub use jwt_validator::JwtValidator;

#[cfg(test)]
mod tests;
