//! Bearer token verification.

use std::sync::Arc;

use async_trait::async_trait;
use engine::{Engine, ResultEngine};

/// The authenticated caller. Every engine call is scoped by `user_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

/// Verifies an opaque bearer token.
///
/// Implementations return [`engine::EngineError::Unauthorized`] for unknown
/// or revoked tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> ResultEngine<Identity>;
}

/// Provider backed by the engine's `api_tokens` table.
#[derive(Clone, Debug)]
pub struct EngineIdentityProvider {
    engine: Arc<Engine>,
}

impl EngineIdentityProvider {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl IdentityProvider for EngineIdentityProvider {
    async fn verify(&self, token: &str) -> ResultEngine<Identity> {
        let user_id = self.engine.authenticate(token).await?;
        Ok(Identity { user_id })
    }
}
