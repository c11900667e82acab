//! PostgreSQL implementation of WorkspaceRepository.
//!
//! Workspace deletion runs inside one transaction, deleting dependents in
//! foreign-key order so a failure rolls everything back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, WorkspaceId};
use crate::domain::workspace::{Workspace, WorkspaceKind};
use crate::ports::WorkspaceRepository;

/// PostgreSQL implementation of the WorkspaceRepository port.
pub struct PostgresWorkspaceRepository {
    pool: PgPool,
}

impl PostgresWorkspaceRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a workspace.
#[derive(Debug, sqlx::FromRow)]
struct WorkspaceRow {
    id: Uuid,
    name: String,
    kind: String,
    owner_id: String,
    is_active: bool,
    logo_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorkspaceRow> for Workspace {
    type Error = DomainError;

    fn try_from(row: WorkspaceRow) -> Result<Self, Self::Error> {
        let kind = WorkspaceKind::parse(&row.kind).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid workspace kind: {}", row.kind),
            )
        })?;

        Ok(Workspace {
            id: WorkspaceId::from_uuid(row.id),
            name: row.name,
            kind,
            owner_id: UserId::new(row.owner_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid owner_id: {}", e))
            })?,
            is_active: row.is_active,
            logo_url: row.logo_url,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, kind, owner_id, is_active, logo_url, created_at
    FROM workspaces
"#;

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    async fn insert(&self, workspace: &Workspace) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO workspaces (id, name, kind, owner_id, is_active, logo_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(workspace.id.as_uuid())
        .bind(&workspace.name)
        .bind(workspace.kind.as_str())
        .bind(workspace.owner_id.as_str())
        .bind(workspace.is_active)
        .bind(&workspace.logo_url)
        .bind(workspace.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert workspace", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DomainError> {
        let row: Option<WorkspaceRow> = sqlx::query_as(&format!(
            "{} WHERE id = $1 AND is_active = TRUE",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find workspace", e))?;

        row.map(Workspace::try_from).transpose()
    }

    async fn find_personal(&self, owner_id: &UserId) -> Result<Option<Workspace>, DomainError> {
        let row: Option<WorkspaceRow> = sqlx::query_as(&format!(
            "{} WHERE owner_id = $1 AND kind = 'personal' AND is_active = TRUE",
            SELECT_COLUMNS
        ))
        .bind(owner_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find personal workspace", e))?;

        row.map(Workspace::try_from).transpose()
    }

    async fn list_owned(&self, owner_id: &UserId) -> Result<Vec<Workspace>, DomainError> {
        let rows: Vec<WorkspaceRow> = sqlx::query_as(&format!(
            "{} WHERE owner_id = $1 AND is_active = TRUE ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list owned workspaces", e))?;

        rows.into_iter().map(Workspace::try_from).collect()
    }

    async fn list_member_of(&self, user_id: &UserId) -> Result<Vec<Workspace>, DomainError> {
        let rows: Vec<WorkspaceRow> = sqlx::query_as(
            r#"
            SELECT w.id, w.name, w.kind, w.owner_id, w.is_active, w.logo_url, w.created_at
            FROM workspaces w
            JOIN workspace_members m ON m.workspace_id = w.id
            WHERE m.user_id = $1
              AND m.status = 'active'
              AND w.is_active = TRUE
              AND w.owner_id <> $1
            ORDER BY w.created_at ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list memberships", e))?;

        rows.into_iter().map(Workspace::try_from).collect()
    }

    async fn count_active_organizations(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM workspaces
            WHERE owner_id = $1 AND kind = 'organization' AND is_active = TRUE
            "#,
        )
        .bind(owner_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count organizations", e))?;

        Ok(count as u32)
    }

    async fn delete_cascade(&self, id: &WorkspaceId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // Dependents first, in foreign-key order.
        sqlx::query("DELETE FROM invoices WHERE workspace_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete invoices", e))?;

        sqlx::query("DELETE FROM email_accounts WHERE workspace_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete email accounts", e))?;

        sqlx::query("DELETE FROM workspace_invites WHERE workspace_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete invites", e))?;

        sqlx::query("DELETE FROM workspace_members WHERE workspace_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete members", e))?;

        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete workspace", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::WorkspaceNotFound,
                "Workspace not found",
            ));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit deletion", e))?;

        Ok(())
    }
}
