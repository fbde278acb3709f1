//! Process-local `TokenRevocationStore`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{TokenRevocationError, TokenRevocationStore};

/// In-memory deny-list of revoked token identifiers.
///
/// Each revocation first drops the entries whose token has already expired,
/// so the map holds at most the tokens that are still live.
pub struct InMemoryTokenRevocationStore {
    revoked: RwLock<HashMap<Uuid, DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTokenRevocationStore {
    /// Create an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create an empty store that judges expiry by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            revoked: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryTokenRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRevocationStore for InMemoryTokenRevocationStore {
    async fn revoke(
        &self,
        jti: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenRevocationError> {
        let now = self.clock.utc();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, until| *until > now);
        revoked.entry(jti).or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, TokenRevocationError> {
        Ok(self.revoked.read().await.contains_key(&jti))
    }
}
