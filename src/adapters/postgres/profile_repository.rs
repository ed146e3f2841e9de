//! PostgreSQL adapter for ProfileRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::profile::{Profile, SubscriptionStatus, SubscriptionUpdate};
use crate::ports::{ProfileRepository, StoreError, SyncOutcome};

/// PostgreSQL implementation of ProfileRepository.
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a profile from a database row.
    fn from_row(row: &PgRow) -> Result<Profile, StoreError> {
        let status: Option<String> = row
            .try_get("subscription_status")
            .map_err(|e| StoreError::CorruptRecord(e.to_string()))?;

        Ok(Profile {
            id: row
                .try_get("id")
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
            role: row
                .try_get("role")
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
            stripe_customer_id: row
                .try_get("stripe_customer_id")
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
            subscription_id: row
                .try_get("subscription_id")
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
            subscription_status: status.as_deref().map(SubscriptionStatus::parse),
            current_period_end: row
                .try_get("current_period_end")
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?,
        })
    }
}

const PROFILE_COLUMNS: &str =
    "id, role, stripe_customer_id, subscription_id, subscription_status, current_period_end";

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE stripe_customer_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn set_stripe_customer_id(
        &self,
        user_id: Uuid,
        customer_id: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, role, stripe_customer_id)
            VALUES ($1, 'user', $2)
            ON CONFLICT (id) DO UPDATE
            SET stripe_customer_id = EXCLUDED.stripe_customer_id,
                updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(customer_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn apply_subscription_update(
        &self,
        update: &SubscriptionUpdate,
    ) -> Result<SyncOutcome, StoreError> {
        // One conditional statement keyed by the customer id, so concurrent
        // deliveries for the same customer cannot interleave partial writes.
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET subscription_id = $2,
                subscription_status = $3,
                current_period_end = $4,
                updated_at = now()
            WHERE stripe_customer_id = $1
            "#,
        )
        .bind(&update.customer_id)
        .bind(&update.subscription_id)
        .bind(update.status.as_str())
        .bind(update.current_period_end)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            Ok(SyncOutcome::NoMatchingProfile)
        } else {
            Ok(SyncOutcome::Applied)
        }
    }
}
