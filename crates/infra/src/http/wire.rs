//! JSON bodies exchanged with the secret service

use secretcache_domain::{GetSecretValueRequest, SecretDataType, SecretInfo};
use serde::{Deserialize, Serialize};

pub const ACTION_GET_SECRET_VALUE: &str = "GetSecretValue";

/// `GetSecretValue` call body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSecretValueBody<'a> {
    pub action: &'static str,
    #[serde(flatten)]
    pub request: &'a GetSecretValueRequest,
}

impl<'a> GetSecretValueBody<'a> {
    pub fn new(request: &'a GetSecretValueRequest) -> Self {
        Self { action: ACTION_GET_SECRET_VALUE, request }
    }
}

/// Successful `GetSecretValue` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetSecretValueResponse {
    pub secret_name: String,
    pub version_id: String,
    pub secret_data: String,
    pub secret_data_type: String,
    pub create_time: String,
    pub secret_type: String,
    pub automatic_rotation: String,
    pub extended_config: String,
    pub rotation_interval: String,
    pub next_rotation_date: String,
}

impl GetSecretValueResponse {
    pub fn into_secret_info(self) -> SecretInfo {
        let secret_data_type = if self.secret_data_type.eq_ignore_ascii_case("binary") {
            SecretDataType::Binary
        } else {
            SecretDataType::Text
        };
        SecretInfo {
            secret_name: self.secret_name,
            version_id: self.version_id,
            secret_value: self.secret_data,
            secret_value_byte_buffer: Vec::new(),
            secret_data_type,
            create_time: self.create_time,
            secret_type: self.secret_type,
            automatic_rotation: self.automatic_rotation,
            extended_config: self.extended_config,
            rotation_interval: self.rotation_interval,
            next_rotation_date: self.next_rotation_date,
        }
    }
}

/// Error body returned with a non-success status.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServiceErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
}
