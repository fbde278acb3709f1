//! PostgreSQL-backed `TokenRevocationStore` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{exists, now};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel_async::methods::ExecuteDsl;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TokenRevocationError, TokenRevocationStore};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewRevokedTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::revoked_tokens;

/// Diesel-backed deny-list of revoked refresh token identifiers.
///
/// Rows whose token has expired are deleted on every revocation, using the
/// `expires_at` index.
#[derive(Clone)]
pub struct DieselTokenRevocationStore {
    pool: DbPool,
}

impl DieselTokenRevocationStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenRevocationError {
    map_basic_pool_error(error, TokenRevocationError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenRevocationError {
    map_basic_diesel_error(
        error,
        TokenRevocationError::query,
        TokenRevocationError::connection,
    )
}

/// Rows for tokens that can no longer be presented.
fn expired_revocations() -> impl ExecuteDsl<AsyncPgConnection> + QueryFragment<Pg> + Send + 'static
{
    diesel::delete(revoked_tokens::table.filter(revoked_tokens::expires_at.lt(now)))
}

#[async_trait]
impl TokenRevocationStore for DieselTokenRevocationStore {
    async fn revoke(
        &self,
        jti: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenRevocationError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let purged = expired_revocations()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if purged > 0 {
            debug!(purged, "dropped expired revocations");
        }
        diesel::insert_into(revoked_tokens::table)
            .values(&NewRevokedTokenRow { jti, expires_at })
            .on_conflict(revoked_tokens::jti)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, TokenRevocationError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(revoked_tokens::table.find(jti)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn purge_deletes_rows_past_their_expiry() {
        let sql = diesel::debug_query::<Pg, _>(&expired_revocations()).to_string();

        assert!(sql.starts_with("DELETE FROM \"revoked_tokens\""), "{sql}");
        assert!(
            sql.contains("\"revoked_tokens\".\"expires_at\" < CURRENT_TIMESTAMP"),
            "{sql}"
        );
    }
}
