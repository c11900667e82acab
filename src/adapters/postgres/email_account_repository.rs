//! PostgreSQL implementation of EmailAccountRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::email_account::{EmailAccount, EmailProvider};
use crate::domain::foundation::{DomainError, EmailAccountId, ErrorCode, Timestamp, UserId, WorkspaceId};
use crate::ports::EmailAccountRepository;

/// PostgreSQL implementation of the EmailAccountRepository port.
pub struct PostgresEmailAccountRepository {
    pool: PgPool,
}

impl PostgresEmailAccountRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an email account.
#[derive(Debug, sqlx::FromRow)]
struct EmailAccountRow {
    id: Uuid,
    user_id: String,
    workspace_id: Option<Uuid>,
    provider: String,
    address: String,
    is_active: bool,
    connected_at: DateTime<Utc>,
}

impl TryFrom<EmailAccountRow> for EmailAccount {
    type Error = DomainError;

    fn try_from(row: EmailAccountRow) -> Result<Self, Self::Error> {
        let provider = EmailProvider::parse(&row.provider).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid provider: {}", row.provider),
            )
        })?;

        Ok(EmailAccount {
            id: EmailAccountId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            workspace_id: row.workspace_id.map(WorkspaceId::from_uuid),
            provider,
            address: row.address,
            is_active: row.is_active,
            connected_at: Timestamp::from_datetime(row.connected_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl EmailAccountRepository for PostgresEmailAccountRepository {
    async fn insert(&self, account: &EmailAccount) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO email_accounts (
                id, user_id, workspace_id, provider, address, is_active, connected_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.user_id.as_str())
        .bind(account.workspace_id.as_ref().map(|w| *w.as_uuid()))
        .bind(account.provider.as_str())
        .bind(&account.address)
        .bind(account.is_active)
        .bind(account.connected_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert email account", e))?;

        Ok(())
    }

    async fn count_active(&self, user_id: &UserId) -> Result<u32, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM email_accounts WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count email accounts", e))?;

        Ok(count as u32)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<EmailAccount>, DomainError> {
        let rows: Vec<EmailAccountRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, workspace_id, provider, address, is_active, connected_at
            FROM email_accounts
            WHERE user_id = $1
            ORDER BY connected_at ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list email accounts", e))?;

        rows.into_iter().map(EmailAccount::try_from).collect()
    }

    async fn find_by_id(
        &self,
        id: &EmailAccountId,
    ) -> Result<Option<EmailAccount>, DomainError> {
        let row: Option<EmailAccountRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, workspace_id, provider, address, is_active, connected_at
            FROM email_accounts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find email account", e))?;

        row.map(EmailAccount::try_from).transpose()
    }

    async fn deactivate(&self, id: &EmailAccountId) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE email_accounts SET is_active = FALSE WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to deactivate email account", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EmailAccountNotFound,
                "Email account not found",
            ));
        }
        Ok(())
    }
}
