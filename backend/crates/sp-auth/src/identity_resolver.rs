use crate::{AuthError, JwtValidator, Result as AuthErrorResult};

use sp_core::UserId;

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use http::HeaderMap;
use http::header::AUTHORIZATION;
use log::trace;

/// Resolves the caller behind a request from its bearer token.
///
/// Cheap to clone. Without a validator every request resolves to no identity.
#[derive(Clone, Default)]
pub struct IdentityResolver {
    validator: Option<Arc<JwtValidator>>,
}

impl IdentityResolver {
    pub fn new(validator: Option<Arc<JwtValidator>>) -> Self {
        Self { validator }
    }

    pub fn with_hs256(secret: &[u8]) -> Self {
        Self::new(Some(Arc::new(JwtValidator::with_hs256(secret))))
    }

    pub fn is_enabled(&self) -> bool {
        self.validator.is_some()
    }

    /// Verify the request's bearer token and return the caller's user id
    #[track_caller]
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthErrorResult<UserId> {
        let validator = self.validator.as_ref().ok_or_else(|| AuthError::NotConfigured {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let token = extract_bearer_token(headers)?;
        let claims = validator.validate(token)?;
        claims.user_id()
    }

    /// Like [`authenticate`](Self::authenticate), but any failure means "anonymous"
    pub fn resolve(&self, headers: &HeaderMap) -> Option<UserId> {
        match self.authenticate(headers) {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                trace!("No caller identity: {e}");
                None
            }
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
#[track_caller]
pub fn extract_bearer_token(headers: &HeaderMap) -> AuthErrorResult<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AuthError::MissingHeader {
            location: ErrorLocation::from(Location::caller()),
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidScheme {
            location: ErrorLocation::from(Location::caller()),
        })
}
