//! A login & consent provider for an OAuth2/OpenID Connect authorization server.
//!
//! The authorization server delegates every human decision to this service: who
//! is logging in, whether consent is granted, whether a logout proceeds. Each
//! decision is reported back through the server's admin API, which answers with
//! the URL the browser has to follow next.

use std::sync::Arc;

use crate::admin::AdminClient;
use crate::render::FormRenderer;
use crate::store::CredentialStore;

pub mod admin;
pub mod config;
pub mod error;
pub mod flows;
pub mod render;
pub mod server;
pub mod store;
pub mod tls;

/// Everything a request handler needs. Built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub admin: Arc<AdminClient>,
    pub store: Arc<dyn CredentialStore>,
    pub renderer: Arc<FormRenderer>,
}

impl AppState {
    pub fn new(
        admin: AdminClient,
        store: Arc<dyn CredentialStore>,
        renderer: FormRenderer,
    ) -> Self {
        Self {
            admin: Arc::new(admin),
            store,
            renderer: Arc::new(renderer),
        }
    }
}
