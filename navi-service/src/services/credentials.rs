use chrono::Utc;
use std::sync::Arc;

use crate::{
    config::RegistrationConfig,
    dtos::auth::RegisterForm,
    models::{Authority, NewAuthority},
    services::{metrics, Database, DocumentStorage, ServiceError},
    utils::{has_allowed_extension, hash_password, stored_document_name, verify_password, Password},
};

/// Owns authority accounts: registration and credential checks.
#[derive(Clone)]
pub struct CredentialService {
    db: Database,
    storage: Arc<dyn DocumentStorage>,
    auto_verify: bool,
}

impl CredentialService {
    pub fn new(
        db: Database,
        storage: Arc<dyn DocumentStorage>,
        config: &RegistrationConfig,
    ) -> Self {
        Self {
            db,
            storage,
            auto_verify: config.auto_verify,
        }
    }

    pub async fn register(&self, form: RegisterForm) -> Result<Authority, ServiceError> {
        let Some(fields) = form.into_complete() else {
            return Err(ServiceError::Validation("Missing required fields".to_string()));
        };

        if !has_allowed_extension(&fields.document.filename) {
            return Err(ServiceError::FileType);
        }

        if self
            .db
            .find_authority_by_username_or_email(&fields.username, &fields.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict);
        }

        let password_hash = hash_password(&fields.password)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let now = Utc::now();
        let doc_filename =
            stored_document_name(&fields.username, now.timestamp(), &fields.document.filename);

        self.storage
            .save(&doc_filename, &fields.document.data)
            .await?;

        let new_authority = NewAuthority {
            username: fields.username,
            email: fields.email,
            department: fields.department,
            password_hash,
            doc_filename: Some(doc_filename.clone()),
            verified: self.auto_verify,
            registered_at: now,
        };

        let authority = match self.db.insert_authority(&new_authority).await {
            Ok(authority) => authority,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&doc_filename).await {
                    tracing::warn!(
                        doc_filename = %doc_filename,
                        error = %cleanup,
                        "Failed to remove document after rejected registration"
                    );
                }
                let err = ServiceError::from(e);
                return Err(if err.is_unique_violation() {
                    ServiceError::Conflict
                } else {
                    err
                });
            }
        };

        metrics::record_registration();
        tracing::info!(
            authority_id = authority.id,
            username = %authority.username,
            verified = authority.verified,
            "Authority registered"
        );

        Ok(authority)
    }

    /// `identifier` matches either the username or the email.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &Password,
    ) -> Result<Authority, ServiceError> {
        let Some(authority) = self.db.find_authority_by_identifier(identifier).await? else {
            metrics::record_login("failure");
            return Err(ServiceError::BadCredentials);
        };

        let valid = verify_password(password, &authority.password_hash)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password verification error: {}", e)))?;

        if !valid {
            metrics::record_login("failure");
            tracing::info!(username = %authority.username, "Login rejected");
            return Err(ServiceError::BadCredentials);
        }

        metrics::record_login("success");
        Ok(authority)
    }
}
