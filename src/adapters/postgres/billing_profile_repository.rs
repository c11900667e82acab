//! PostgreSQL implementation of BillingProfileRepository.
//!
//! The `version` column backs the optimistic-concurrency guard: updates
//! only land when the stored version matches what the caller read.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::billing::{BillingProfile, SubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UsagePeriod, UserId};
use crate::domain::plan::PlanId;
use crate::ports::{BillingProfileRepository, UpdateResult};

/// PostgreSQL implementation of the BillingProfileRepository port.
pub struct PostgresBillingProfileRepository {
    pool: PgPool,
}

impl PostgresBillingProfileRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a billing profile.
#[derive(Debug, sqlx::FromRow)]
struct BillingProfileRow {
    user_id: String,
    selected_plan: Option<String>,
    subscription_status: Option<String>,
    stripe_customer_id: Option<String>,
    stripe_subscription_id: Option<String>,
    is_trial: bool,
    trial_started_at: Option<DateTime<Utc>>,
    trial_ends_at: Option<DateTime<Utc>>,
    trial_consumed: bool,
    cancellation_date: Option<DateTime<Utc>>,
    subscription_ends_at: Option<DateTime<Utc>>,
    usage: serde_json::Value,
    version: i64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BillingProfileRow> for BillingProfile {
    type Error = DomainError;

    fn try_from(row: BillingProfileRow) -> Result<Self, Self::Error> {
        let selected_plan = row
            .selected_plan
            .as_deref()
            .map(|s| {
                PlanId::parse(s).ok_or_else(|| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid plan value: {}", s))
                })
            })
            .transpose()?;

        let subscription_status = row
            .subscription_status
            .as_deref()
            .map(|s| {
                SubscriptionStatus::parse(s).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid status value: {}", s),
                    )
                })
            })
            .transpose()?;

        let usage: BTreeMap<UsagePeriod, u32> =
            serde_json::from_value(row.usage).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid usage map: {}", e))
            })?;

        Ok(BillingProfile {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            selected_plan,
            subscription_status,
            stripe_customer_id: row.stripe_customer_id,
            stripe_subscription_id: row.stripe_subscription_id,
            is_trial: row.is_trial,
            trial_started_at: row.trial_started_at.map(Timestamp::from_datetime),
            trial_ends_at: row.trial_ends_at.map(Timestamp::from_datetime),
            trial_consumed: row.trial_consumed,
            cancellation_date: row.cancellation_date.map(Timestamp::from_datetime),
            subscription_ends_at: row.subscription_ends_at.map(Timestamp::from_datetime),
            usage,
            version: row.version,
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT user_id, selected_plan, subscription_status, stripe_customer_id,
           stripe_subscription_id, is_trial, trial_started_at, trial_ends_at,
           trial_consumed, cancellation_date, subscription_ends_at, usage,
           version, updated_at
    FROM billing_profiles
"#;

#[async_trait]
impl BillingProfileRepository for PostgresBillingProfileRepository {
    async fn find(&self, user_id: &UserId) -> Result<Option<BillingProfile>, DomainError> {
        let row: Option<BillingProfileRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_COLUMNS))
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find billing profile: {}", e),
                    )
                })?;

        row.map(BillingProfile::try_from).transpose()
    }

    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<BillingProfile>, DomainError> {
        let row: Option<BillingProfileRow> =
            sqlx::query_as(&format!("{} WHERE stripe_customer_id = $1", SELECT_COLUMNS))
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find billing profile: {}", e),
                    )
                })?;

        row.map(BillingProfile::try_from).transpose()
    }

    async fn update(&self, profile: &BillingProfile) -> Result<UpdateResult, DomainError> {
        let usage = serde_json::to_value(&profile.usage).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid usage map: {}", e))
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO billing_profiles (
                user_id, selected_plan, subscription_status, stripe_customer_id,
                stripe_subscription_id, is_trial, trial_started_at, trial_ends_at,
                trial_consumed, cancellation_date, subscription_ends_at, usage,
                version, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13 + 1, $14)
            ON CONFLICT (user_id) DO UPDATE SET
                selected_plan = EXCLUDED.selected_plan,
                subscription_status = EXCLUDED.subscription_status,
                stripe_customer_id = EXCLUDED.stripe_customer_id,
                stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                is_trial = EXCLUDED.is_trial,
                trial_started_at = EXCLUDED.trial_started_at,
                trial_ends_at = EXCLUDED.trial_ends_at,
                trial_consumed = EXCLUDED.trial_consumed,
                cancellation_date = EXCLUDED.cancellation_date,
                subscription_ends_at = EXCLUDED.subscription_ends_at,
                usage = EXCLUDED.usage,
                version = billing_profiles.version + 1,
                updated_at = EXCLUDED.updated_at
            WHERE billing_profiles.version = $13
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(profile.selected_plan.map(|p| p.as_str()))
        .bind(profile.subscription_status.map(|s| s.as_str()))
        .bind(&profile.stripe_customer_id)
        .bind(&profile.stripe_subscription_id)
        .bind(profile.is_trial)
        .bind(profile.trial_started_at.map(|t| *t.as_datetime()))
        .bind(profile.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(profile.trial_consumed)
        .bind(profile.cancellation_date.map(|t| *t.as_datetime()))
        .bind(profile.subscription_ends_at.map(|t| *t.as_datetime()))
        .bind(usage)
        .bind(profile.version)
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update billing profile: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            // The row exists but the version moved on.
            return Ok(UpdateResult::StaleVersion);
        }
        Ok(UpdateResult::Updated)
    }

    async fn clear_customer_id(&self, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE billing_profiles
            SET stripe_customer_id = NULL,
                version = version + 1,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clear customer id: {}", e),
            )
        })?;

        Ok(())
    }
}
