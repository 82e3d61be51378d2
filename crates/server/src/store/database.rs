//! SQL-backed credential store.
//!
//! Reads rows of the shape created by the `migration` crate:
//! `id`, `username`, `mail`, `password_hash`, `roles` (JSON array as text).
//! The table name comes from configuration, so queries are built with sea-query
//! rather than a static entity.

use crate::error::StoreError;
use crate::store::{CredentialStore, LoginLookup, User};
use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Cond, Expr, Query, SelectStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult};
use std::sync::Arc;

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: String,
    username: String,
    mail: Option<String>,
    password_hash: String,
    roles: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let roles = match row.roles.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::warn!(user_id = %row.id, error = %e, "Ignoring malformed roles column");
                Vec::new()
            }),
        };
        User {
            id: row.id,
            username: row.username,
            mail: row.mail,
            password_hash: row.password_hash,
            roles,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DbCredentialStore {
    db: Arc<DatabaseConnection>,
    table: String,
    lookup: LoginLookup,
}

impl DbCredentialStore {
    pub fn new(db: Arc<DatabaseConnection>, table: impl Into<String>, lookup: LoginLookup) -> Self {
        Self {
            db,
            table: table.into(),
            lookup,
        }
    }

    fn select(&self) -> SelectStatement {
        Query::select()
            .columns([
                Alias::new("id"),
                Alias::new("username"),
                Alias::new("mail"),
                Alias::new("password_hash"),
                Alias::new("roles"),
            ])
            .from(Alias::new(self.table.as_str()))
            .limit(1)
            .to_owned()
    }

    async fn fetch_one(&self, condition: Cond) -> Result<Option<User>, StoreError> {
        let mut query = self.select();
        query.cond_where(condition);
        let statement = self.db.get_database_backend().build(&query);
        let row = UserRow::find_by_statement(statement)
            .one(self.db.as_ref())
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    #[tracing::instrument(skip(self))]
    async fn find_by_login_name(&self, login_name: &str) -> Result<User, StoreError> {
        let by_username = Expr::col(Alias::new("username")).eq(login_name);
        let condition = match self.lookup {
            LoginLookup::Username => Cond::all().add(by_username),
            LoginLookup::UsernameOrMail => Cond::any()
                .add(by_username)
                .add(Expr::col(Alias::new("mail")).eq(login_name)),
        };
        self.fetch_one(condition)
            .await?
            .ok_or_else(|| StoreError::NotFound(login_name.to_string()))
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.fetch_one(Cond::all().add(Expr::col(Alias::new("id")).eq(id)))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
