//! Client for the authorization server's administrative "requests" API.
//!
//! Every operation is the same call pattern parameterized by a [`FlowKind`] and an
//! [`Action`]:
//!
//! - `GET  {base}/oauth2/auth/requests/{flow}?{flow}_challenge=...`
//! - `PUT  {base}/oauth2/auth/requests/{flow}/accept?{flow}_challenge=...`
//! - `PUT  {base}/oauth2/auth/requests/login/reject?login_challenge=...`

pub mod client;
pub mod types;

pub use client::{ADMIN_TIMEOUT_SECS, AdminClient};
pub use types::{
    AcceptConsent, AcceptLogin, CompletedRequest, ConsentRequest, LoginRequest, LogoutRequest,
    REMEMBER_FOR_SECS, RejectRequest,
};

use crate::error::AdminError;
use std::fmt;
use std::str::FromStr;

/// The three kinds of challenge the authorization server delegates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
    Login,
    Consent,
    Logout,
}

impl FlowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowKind::Login => "login",
            FlowKind::Consent => "consent",
            FlowKind::Logout => "logout",
        }
    }

    /// Query parameter carrying the challenge for this flow.
    pub fn challenge_param(self) -> &'static str {
        match self {
            FlowKind::Login => "login_challenge",
            FlowKind::Consent => "consent_challenge",
            FlowKind::Logout => "logout_challenge",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(FlowKind::Login),
            "consent" => Ok(FlowKind::Consent),
            "logout" => Ok(FlowKind::Logout),
            other => Err(AdminError::InvalidArgument(format!("invalid flow: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Get,
    Accept,
    Reject,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Accept => "accept",
            Action::Reject => "reject",
        }
    }

    fn path_segment(self) -> Option<&'static str> {
        match self {
            Action::Get => None,
            Action::Accept => Some("accept"),
            Action::Reject => Some("reject"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Action::Get),
            "accept" => Ok(Action::Accept),
            "reject" => Ok(Action::Reject),
            other => Err(AdminError::InvalidArgument(format!(
                "invalid action: {other}"
            ))),
        }
    }
}
