use crate::{AuthError, Result as AuthErrorResult};

use sp_core::UserId;

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// JWT claims issued by the portal's login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: numeric user id, serialized as a string
    pub sub: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Parse the subject into a user id
    #[track_caller]
    pub fn user_id(&self) -> AuthErrorResult<UserId> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub (user_id) cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: format!("sub must be a numeric user id, got '{}'", self.sub),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
