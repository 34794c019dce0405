use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::AuthorityResponse;
use crate::utils::Password;

/// Identity document attached to a registration.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Multipart registration form as received; every part may be missing.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub password: Option<Password>,
    pub document: Option<UploadedDocument>,
}

/// Registration with every required part present and non-empty.
#[derive(Debug)]
pub struct CompleteRegistration {
    pub username: String,
    pub email: String,
    pub department: String,
    pub password: Password,
    pub document: UploadedDocument,
}

impl RegisterForm {
    pub fn into_complete(self) -> Option<CompleteRegistration> {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Some(CompleteRegistration {
            username: present(self.username)?,
            email: present(self.email)?,
            department: present(self.department)?,
            password: self.password.filter(|p| !p.as_str().is_empty())?,
            document: self.document.filter(|d| !d.filename.is_empty())?,
        })
    }
}

/// Schema-only mirror of the multipart registration body.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RegisterMultipart {
    #[schema(example = "depot_admin")]
    username: String,
    #[schema(example = "admin@transit.example")]
    email: String,
    #[schema(example = "Transport")]
    department: String,
    #[schema(example = "depot-pass-123")]
    password: String,
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "Registration successful")]
    pub msg: String,
    pub authority: AuthorityResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing credentials"))]
    #[schema(example = "depot_admin")]
    pub identifier: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Missing credentials"))]
    #[schema(example = "depot-pass-123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 28800)]
    pub expires_in: i64,
    pub authority: AuthorityResponse,
}
