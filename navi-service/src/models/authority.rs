//! Authority model - registered dashboard operators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Authority entity as stored. Carries the password hash, so it is never
/// serialized directly; use [`Authority::sanitized`].
#[derive(Debug, Clone, FromRow)]
pub struct Authority {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub department: String,
    pub password_hash: String,
    pub doc_filename: Option<String>,
    pub verified: bool,
    pub registered_at: DateTime<Utc>,
}

/// Fields needed to insert a new authority.
#[derive(Debug, Clone)]
pub struct NewAuthority {
    pub username: String,
    pub email: String,
    pub department: String,
    pub password_hash: String,
    pub doc_filename: Option<String>,
    pub verified: bool,
    pub registered_at: DateTime<Utc>,
}

impl Authority {
    pub fn sanitized(&self) -> AuthorityResponse {
        AuthorityResponse::from(self.clone())
    }
}

/// Public view of an authority.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorityResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "depot_admin")]
    pub username: String,
    #[schema(example = "admin@transit.example")]
    pub email: String,
    #[schema(example = "Transport")]
    pub department: String,
    pub verified: bool,
    pub registered_at: DateTime<Utc>,
    #[schema(example = "depot_admin_1717236000_id_card.pdf")]
    pub doc_filename: Option<String>,
}

impl From<Authority> for AuthorityResponse {
    fn from(authority: Authority) -> Self {
        Self {
            id: authority.id,
            username: authority.username,
            email: authority.email,
            department: authority.department,
            verified: authority.verified,
            registered_at: authority.registered_at,
            doc_filename: authority.doc_filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_view_omits_password_hash() {
        let authority = Authority {
            id: 7,
            username: "depot_admin".to_string(),
            email: "admin@transit.example".to_string(),
            department: "Transport".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            doc_filename: Some("depot_admin_1_id.pdf".to_string()),
            verified: true,
            registered_at: Utc::now(),
        };

        let json = serde_json::to_value(authority.sanitized()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();

        assert!(!keys.contains(&"password_hash"));
        assert_eq!(json["username"], "depot_admin");
        assert_eq!(json["doc_filename"], "depot_admin_1_id.pdf");
        assert_eq!(json["verified"], true);
    }
}
