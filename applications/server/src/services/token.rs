/// Token service - signed account and share credentials
use crate::error::{Result, ServerError};
use annil_core::{AccountDirectory, ShareScope};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Token payload, discriminated by the `type` claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Claims {
    User(AccountClaims),
    Share(ShareClaims),
}

impl Claims {
    fn username(&self) -> &str {
        match self {
            Claims::User(c) => &c.username,
            Claims::Share(c) => &c.username,
        }
    }

    fn issued_at(&self) -> i64 {
        match self {
            Claims::User(c) => c.iat,
            Claims::Share(c) => c.iat,
        }
    }
}

/// Full-account credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountClaims {
    pub username: String,
    pub iat: i64,
    /// Share capability at issuance; informational only
    pub allow_share: bool,
}

/// Scope-restricted credential created by `username`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClaims {
    pub username: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    pub audios: ShareScope,
}

/// Issues and verifies HS256 tokens.
///
/// Verification is revoked per account: a token is rejected once its owner no
/// longer exists or re-registered after the token was issued.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    directory: Arc<dyn AccountDirectory>,
}

impl TokenService {
    pub fn new(secret: &str, directory: Arc<dyn AccountDirectory>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is optional and checked by hand; nothing else is registered
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            directory,
        }
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ServerError::Signing(e.to_string()))
    }

    /// Issue a full-account token for `username`.
    ///
    /// The embedded share capability is looked up now; a failed lookup embeds `false`.
    pub async fn issue_account_token(&self, username: &str) -> Result<String> {
        let allow_share = self
            .directory
            .share_capability(username)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(username, "Share capability lookup failed: {}", e);
                false
            });

        self.sign(&Claims::User(AccountClaims {
            username: username.to_string(),
            iat: Utc::now().timestamp(),
            allow_share,
        }))
    }

    /// Issue a share token for `creator` granting `scope`.
    ///
    /// A non-positive `ttl` yields a token that never expires. An expiry past
    /// the representable range is clamped to the latest instant.
    pub fn issue_share_token(
        &self,
        creator: &str,
        scope: &ShareScope,
        ttl: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = (ttl > Duration::zero()).then(|| {
            now.checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp()
        });

        self.sign(&Claims::Share(ShareClaims {
            username: creator.to_string(),
            iat: now.timestamp(),
            exp,
            audios: scope.clone(),
        }))
    }

    /// Verify an account token and return its username
    pub async fn verify_account_token(&self, token: &str) -> Result<String> {
        match self.verify(token).await? {
            Claims::User(claims) => Ok(claims.username),
            Claims::Share(_) => Err(reject("expected a user token")),
        }
    }

    /// Verify a share token and return the scope it grants
    pub async fn verify_share_token(&self, token: &str) -> Result<ShareScope> {
        match self.verify(token).await? {
            Claims::Share(claims) => {
                if claims
                    .exp
                    .is_some_and(|exp| exp <= Utc::now().timestamp())
                {
                    return Err(reject("share token expired"));
                }
                Ok(claims.audios)
            }
            Claims::User(_) => Err(reject("expected a share token")),
        }
    }

    async fn verify(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| reject(&e.to_string()))?
            .claims;

        let registered_at = self
            .directory
            .registration_time(claims.username())
            .await
            .map_err(|e| reject(&format!("account lookup failed: {e}")))?
            .ok_or_else(|| reject("account does not exist"))?;

        // Second granularity: iat carries no fraction
        if registered_at.timestamp() > claims.issued_at() {
            return Err(reject("token predates account registration"));
        }

        Ok(claims)
    }
}

fn reject(reason: &str) -> ServerError {
    tracing::debug!(reason, "Token rejected");
    ServerError::Auth("Invalid token".to_string())
}
