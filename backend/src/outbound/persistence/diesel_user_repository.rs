//! PostgreSQL-backed `UserRepository`.
//!
//! Registration writes the user, their default workspace, the owner
//! membership and a starter project inside one transaction. The
//! `users_email_key` unique constraint settles concurrent registrations for
//! the same email.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{NewAccount, StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserId, WorkspaceRole};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    CredentialRow, NewMemberRow, NewProjectRow, NewUserRow, NewWorkspaceRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, users, workspace_members, workspaces};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row.into_user().map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            Ok(StoredCredentials {
                user: row_to_user(row.user)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn register_account(&self, account: &NewAccount) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_user = NewUserRow {
            username: account.username.as_ref(),
            email: account.email.as_ref(),
            password_hash: &account.password_hash,
        };

        let row = conn
            .transaction(|conn| {
                async move {
                    let user: UserRow = diesel::insert_into(users::table)
                        .values(&new_user)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let workspace_id: i64 = diesel::insert_into(workspaces::table)
                        .values(&NewWorkspaceRow {
                            name: account.workspace.name(),
                            description: account.workspace.description(),
                            owner_id: user.id,
                        })
                        .returning(workspaces::id)
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(workspace_members::table)
                        .values(&NewMemberRow {
                            workspace_id,
                            user_id: user.id,
                            role: WorkspaceRole::Owner.as_str(),
                        })
                        .execute(conn)
                        .await?;

                    diesel::insert_into(projects::table)
                        .values(&NewProjectRow {
                            workspace_id,
                            name: &account.project.name,
                            description: &account.project.description,
                            color: &account.project.color,
                        })
                        .execute(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(user)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                if is_unique_violation(&err, EMAIL_CONSTRAINT) {
                    UserRepositoryError::duplicate_email(account.email.as_ref())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_user(row)
    }
}
