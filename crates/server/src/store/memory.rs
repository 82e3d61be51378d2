use crate::error::StoreError;
use crate::store::{CredentialStore, LoginLookup, User};
use async_trait::async_trait;

/// Credential store holding a fixed set of users in memory.
///
/// Built once and never mutated afterwards, so it can be shared across requests
/// without locking.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCredentialStore {
    users: Vec<User>,
    lookup: LoginLookup,
}

impl InMemoryCredentialStore {
    pub fn new(lookup: LoginLookup) -> Self {
        Self {
            users: Vec::new(),
            lookup,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_login_name(&self, login_name: &str) -> Result<User, StoreError> {
        self.users
            .iter()
            .find(|u| self.lookup.matches(u, login_name))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(login_name.to_string()))
    }

    async fn find_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
