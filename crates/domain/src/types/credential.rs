//! Opaque credential material handed to backend calls
//!
//! The cache never inspects credentials; it only passes them to the region
//! client factory. Secret fields are redacted from `Debug` output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Authentication material for the remote service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credential {
    AccessKey { access_key_id: String, access_key_secret: String },
    Token { token_id: String, token: String },
    Sts {
        access_key_id: String,
        access_key_secret: String,
        role_session_name: String,
        role_arn: String,
        #[serde(default)]
        policy: Option<String>,
    },
    InstanceRole { role_name: String },
    ClientKey { key_id: String, private_key_pem: String },
}

impl Credential {
    pub fn access_key(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::AccessKey { access_key_id: id.into(), access_key_secret: secret.into() }
    }

    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccessKey { .. } => "access_key",
            Self::Token { .. } => "token",
            Self::Sts { .. } => "sts",
            Self::InstanceRole { .. } => "instance_role",
            Self::ClientKey { .. } => "client_key",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessKey { access_key_id, .. } => f
                .debug_struct("AccessKey")
                .field("access_key_id", access_key_id)
                .field("access_key_secret", &"[REDACTED]")
                .finish(),
            Self::Token { token_id, .. } => {
                f.debug_struct("Token").field("token_id", token_id).field("token", &"[REDACTED]").finish()
            }
            Self::Sts { access_key_id, role_session_name, role_arn, .. } => f
                .debug_struct("Sts")
                .field("access_key_id", access_key_id)
                .field("access_key_secret", &"[REDACTED]")
                .field("role_session_name", role_session_name)
                .field("role_arn", role_arn)
                .finish_non_exhaustive(),
            Self::InstanceRole { role_name } => {
                f.debug_struct("InstanceRole").field("role_name", role_name).finish()
            }
            Self::ClientKey { key_id, .. } => f
                .debug_struct("ClientKey")
                .field("key_id", key_id)
                .field("private_key_pem", &"[REDACTED]")
                .finish(),
        }
    }
}
