/// Permission evaluation for content requests
use crate::error::{Result, ServerError};
use crate::services::token::TokenService;
use annil_core::CatalogResource;
use std::sync::Arc;

/// Outcome of checking a credential against a requested resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Allowed,
    /// Valid share token, resource outside its scope
    Forbidden,
    /// No credential, or one that failed verification
    Unauthenticated,
}

impl Permission {
    pub fn is_allowed(self) -> bool {
        self == Permission::Allowed
    }

    /// Translate the decision into a handler result
    pub fn into_result(self) -> Result<()> {
        match self {
            Permission::Allowed => Ok(()),
            Permission::Forbidden => Err(ServerError::Forbidden(
                "Resource is outside the share scope".to_string(),
            )),
            Permission::Unauthenticated => {
                Err(ServerError::Auth("Missing or invalid token".to_string()))
            }
        }
    }
}

#[derive(Clone)]
pub struct PermissionEvaluator {
    tokens: Arc<TokenService>,
}

impl PermissionEvaluator {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Decide whether `credential` may read `resource`.
    ///
    /// An account token grants everything and is tried first, so it always
    /// wins over a share token.
    pub async fn evaluate(
        &self,
        credential: Option<&str>,
        resource: &CatalogResource,
    ) -> Permission {
        let Some(token) = credential else {
            return Permission::Unauthenticated;
        };

        if self.tokens.verify_account_token(token).await.is_ok() {
            return Permission::Allowed;
        }

        match self.tokens.verify_share_token(token).await {
            Ok(scope) if scope.permits(resource) => Permission::Allowed,
            Ok(_) => {
                tracing::debug!(resource = %resource, "Share token does not cover resource");
                Permission::Forbidden
            }
            Err(_) => Permission::Unauthenticated,
        }
    }
}
