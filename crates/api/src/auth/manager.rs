//! Token lifecycle manager.
//!
//! One place owns the credential state machine: minting access/refresh
//! pairs, verifying them against the right secret, and blacklisting
//! access tokens until their natural expiry. The revocation store is an
//! injected capability; when it is unreachable, verification degrades to
//! signature-only checks and revocation becomes best-effort -- auth
//! availability never depends on the cache's liveness.

use std::sync::Arc;
use std::time::Duration;

use apiforge_core::error::CoreError;
use apiforge_core::types::DbId;

use crate::auth::jwt::{decode_token, sign_token, JwtConfig};
use crate::auth::revocation::RevocationStore;

/// Key prefix for blacklist entries in the revocation store.
const REVOKED_KEY_PREFIX: &str = "revoked:";

/// The authenticated principal carried by a verified token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: DbId,
    pub email: String,
}

/// A freshly minted access + refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, verifies, and revokes tokens. Stateless with respect to
/// in-process memory: everything lives in the signed tokens themselves,
/// the revocation store, and the refresh-token table.
pub struct TokenManager {
    config: JwtConfig,
    revocation: Arc<dyn RevocationStore>,
}

impl TokenManager {
    pub fn new(config: JwtConfig, revocation: Arc<dyn RevocationStore>) -> Self {
        Self { config, revocation }
    }

    /// Mint an access + refresh pair for the given user.
    ///
    /// No side effects beyond signing; the caller persists the refresh
    /// token digest against the user.
    pub fn issue(&self, user_id: DbId, email: &str) -> Result<TokenPair, CoreError> {
        let access_token = sign_token(
            user_id,
            email,
            &self.config.access_secret,
            self.config.access_expiry_secs(),
        )
        .map_err(|e| CoreError::Internal(format!("Access token signing failed: {e}")))?;

        let refresh_token = sign_token(
            user_id,
            email,
            &self.config.refresh_secret,
            self.config.refresh_expiry_secs(),
        )
        .map_err(|e| CoreError::Internal(format!("Refresh token signing failed: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token only, for the refresh/rotation path.
    ///
    /// The presented refresh token stays valid until explicitly revoked or
    /// naturally expired -- rotation does not replace it.
    pub fn mint_access(&self, user_id: DbId, email: &str) -> Result<String, CoreError> {
        sign_token(
            user_id,
            email,
            &self.config.access_secret,
            self.config.access_expiry_secs(),
        )
        .map_err(|e| CoreError::Internal(format!("Access token signing failed: {e}")))
    }

    /// Verify an access token: signature, expiry, then the blacklist.
    ///
    /// Malformed, forged, expired, and revoked tokens all fail with
    /// `Unauthorized` -- callers must not be able to tell them apart. A
    /// revocation-store error is logged and treated as "no entry"
    /// (fail-open on the infrastructure call, fail-closed on the identity
    /// check).
    pub async fn verify_access(&self, token: &str) -> Result<Identity, CoreError> {
        let claims = decode_token(token, &self.config.access_secret)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired access token".into()))?;

        match self.revocation.get(&revoked_key(token)).await {
            Ok(Some(_)) => {
                return Err(CoreError::Unauthorized("Access token is revoked".into()));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Revocation check skipped; store unreachable");
            }
        }

        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }

    /// Verify a refresh token against the refresh secret.
    ///
    /// Fails with `InvalidRefreshToken`, distinctly from access-token
    /// failures. Never consults the revocation store: refresh tokens are
    /// revoked by removal from the user's stored set, not by blacklist.
    pub fn verify_refresh(&self, token: &str) -> Result<Identity, CoreError> {
        let claims = decode_token(token, &self.config.refresh_secret)
            .map_err(|_| CoreError::InvalidRefreshToken("Invalid refresh token".into()))?;

        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }

    /// Best-effort blacklist of an access token for its remaining
    /// lifetime.
    ///
    /// The TTL is bounded by the configured access-token lifetime, so the
    /// blacklist entry never outlives the token it blocks and the store
    /// self-cleans. Store failures are logged and swallowed; callers must
    /// not assume logout guarantees immediate blacklist effect under a
    /// store outage.
    pub async fn revoke_access(&self, token: &str) {
        // A token that no longer decodes is already unusable.
        let claims = match decode_token(token, &self.config.access_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping revocation of undecodable access token");
                return;
            }
        };

        let remaining = claims.exp - chrono::Utc::now().timestamp();
        let ttl_secs = remaining.clamp(0, self.config.access_expiry_secs());
        if ttl_secs == 0 {
            return;
        }

        if let Err(e) = self
            .revocation
            .set_with_ttl(&revoked_key(token), "true", Duration::from_secs(ttl_secs as u64))
            .await
        {
            tracing::error!(error = %e, "Failed to blacklist access token");
        }
    }
}

/// Blacklist key for a token.
fn revoked_key(token: &str) -> String {
    format!("{REVOKED_KEY_PREFIX}{token}")
}
