//! PostgreSQL implementation of MemberRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, WorkspaceId};
use crate::domain::workspace::{MemberStatus, WorkspaceMember, WorkspaceRole};
use crate::ports::MemberRepository;

/// PostgreSQL implementation of the MemberRepository port.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    workspace_id: Uuid,
    user_id: String,
    role: String,
    status: String,
    invited_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for WorkspaceMember {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let role = WorkspaceRole::parse(&row.role).ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid role: {}", row.role))
        })?;
        let status = MemberStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid member status: {}", row.status),
            )
        })?;

        Ok(WorkspaceMember {
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            role,
            status,
            invited_by: row
                .invited_by
                .map(UserId::new)
                .transpose()
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid inviter: {}", e))
                })?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn insert(&self, member: &WorkspaceMember) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO workspace_members (workspace_id, user_id, role, status, invited_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(member.workspace_id.as_uuid())
        .bind(member.user_id.as_str())
        .bind(member.role.as_str())
        .bind(member.status.as_str())
        .bind(member.invited_by.as_ref().map(|u| u.as_str()))
        .bind(member.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("workspace_members_pkey") {
                    return DomainError::new(
                        ErrorCode::AlreadyMember,
                        "User is already a member of this workspace",
                    )
                    .with_detail("user_id", member.user_id.to_string());
                }
            }
            db_error("Failed to insert member", e)
        })?;

        Ok(())
    }

    async fn find_active(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Option<WorkspaceMember>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT workspace_id, user_id, role, status, invited_by, created_at
            FROM workspace_members
            WHERE workspace_id = $1 AND user_id = $2 AND status = 'active'
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find member", e))?;

        row.map(WorkspaceMember::try_from).transpose()
    }

    async fn list_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceMember>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT workspace_id, user_id, role, status, invited_by, created_at
            FROM workspace_members
            WHERE workspace_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list members", e))?;

        rows.into_iter().map(WorkspaceMember::try_from).collect()
    }

    async fn update_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: WorkspaceRole,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE workspace_members
            SET role = $3
            WHERE workspace_id = $1 AND user_id = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(user_id.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update role", e))?;

        if result.rows_affected() == 0 {
            return Err(
                DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                    .with_detail("user_id", user_id.to_string()),
            );
        }
        Ok(())
    }

    async fn remove(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "DELETE FROM workspace_members WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to remove member", e))?;

        if result.rows_affected() == 0 {
            return Err(
                DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                    .with_detail("user_id", user_id.to_string()),
            );
        }
        Ok(())
    }
}
