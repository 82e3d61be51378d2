//! Credential store contract.
//!
//! The flow handlers only ever read users: by login name on form submission and by
//! identifier when the authorization server wants to skip the login form. User
//! records are owned by whatever backs the store.

pub mod database;
pub mod memory;
pub mod password;

pub use database::DbCredentialStore;
pub use memory::InMemoryCredentialStore;
pub use password::{hash_password, verify_password};

use crate::error::StoreError;
use async_trait::async_trait;
use serde::Deserialize;

/// A user as seen by the login flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Stable, store-assigned identifier. Used as the OAuth2 subject.
    pub id: String,
    pub username: String,
    pub mail: Option<String>,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Which fields a submitted login name is matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginLookup {
    Username,
    #[default]
    UsernameOrMail,
}

impl LoginLookup {
    pub fn matches(self, user: &User, login_name: &str) -> bool {
        match self {
            LoginLookup::Username => user.username == login_name,
            LoginLookup::UsernameOrMail => {
                user.username == login_name || user.mail.as_deref() == Some(login_name)
            }
        }
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by the name typed into the login form.
    async fn find_by_login_name(&self, login_name: &str) -> Result<User, StoreError>;

    /// Find a user by identifier.
    async fn find_by_id(&self, id: &str) -> Result<User, StoreError>;

    /// Check a plaintext password against the user's stored hash.
    fn verify_password(&self, user: &User, plaintext: &str) -> Result<(), StoreError> {
        if verify_password(plaintext, &user.password_hash) {
            Ok(())
        } else {
            Err(StoreError::Mismatch)
        }
    }
}
