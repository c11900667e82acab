//! PostgreSQL implementation of InviteRepository.
//!
//! `complete` consumes the invite and inserts the membership row in one
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, InviteToken, Timestamp, UserId, WorkspaceId};
use crate::domain::workspace::{InviteStatus, WorkspaceInvite, WorkspaceMember, WorkspaceRole};
use crate::ports::InviteRepository;

/// PostgreSQL implementation of the InviteRepository port.
pub struct PostgresInviteRepository {
    pool: PgPool,
}

impl PostgresInviteRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an invite.
#[derive(Debug, sqlx::FromRow)]
struct InviteRow {
    token: String,
    workspace_id: Uuid,
    email: String,
    proposed_role: String,
    status: String,
    expires_at: DateTime<Utc>,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InviteRow> for WorkspaceInvite {
    type Error = DomainError;

    fn try_from(row: InviteRow) -> Result<Self, Self::Error> {
        let proposed_role = WorkspaceRole::parse(&row.proposed_role).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid role: {}", row.proposed_role),
            )
        })?;
        let status = InviteStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid invite status: {}", row.status),
            )
        })?;

        Ok(WorkspaceInvite {
            token: InviteToken::new(row.token).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid token: {}", e))
            })?,
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            email: row.email,
            proposed_role,
            status,
            expires_at: Timestamp::from_datetime(row.expires_at),
            created_by: UserId::new(row.created_by).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid creator: {}", e))
            })?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl InviteRepository for PostgresInviteRepository {
    async fn insert(&self, invite: &WorkspaceInvite) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO workspace_invites (
                token, workspace_id, email, proposed_role, status,
                expires_at, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invite.token.as_str())
        .bind(invite.workspace_id.as_uuid())
        .bind(&invite.email)
        .bind(invite.proposed_role.as_str())
        .bind(invite.status.as_str())
        .bind(invite.expires_at.as_datetime())
        .bind(invite.created_by.as_str())
        .bind(invite.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert invite", e))?;

        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<WorkspaceInvite>, DomainError> {
        let row: Option<InviteRow> = sqlx::query_as(
            r#"
            SELECT token, workspace_id, email, proposed_role, status,
                   expires_at, created_by, created_at
            FROM workspace_invites
            WHERE token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find invite", e))?;

        row.map(WorkspaceInvite::try_from).transpose()
    }

    async fn complete(
        &self,
        invite: &WorkspaceInvite,
        member: &WorkspaceMember,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let consumed = sqlx::query(
            r#"
            UPDATE workspace_invites
            SET status = 'accepted'
            WHERE token = $1 AND status = 'pending'
            "#,
        )
        .bind(invite.token.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to consume invite", e))?;

        if consumed.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Invite has already been accepted",
            ));
        }

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
        .execute(&mut *tx)
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

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit acceptance", e))?;

        Ok(())
    }
}
