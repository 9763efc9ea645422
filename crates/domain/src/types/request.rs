//! Request sent to a region client

use serde::{Deserialize, Serialize};

/// Parameters of a single `GetSecretValue` call.
///
/// Rebuilt for every region target when racing so no per-target state is
/// shared between concurrent attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSecretValueRequest {
    pub secret_name: String,
    pub version_stage: String,
    pub fetch_extended_config: bool,
}

impl GetSecretValueRequest {
    pub fn new(secret_name: impl Into<String>, version_stage: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            version_stage: version_stage.into(),
            fetch_extended_config: true,
        }
    }
}
