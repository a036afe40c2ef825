use std::fmt;

use tracing::{debug, info, warn};

use crate::application::ports::account_repository::AccountRepository;
use crate::application::ports::credential_hasher::CredentialHasher;
use crate::application::use_cases::auth::validation::{ValidationErrors, validate_login};
use crate::domain::accounts::account::AccountView;

pub struct Login<'a, R, H>
where
    R: AccountRepository + ?Sized,
    H: CredentialHasher + ?Sized,
{
    pub repo: &'a R,
    pub hasher: &'a H,
}

#[derive(Clone, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub credential: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("validation failed")]
    Validation(ValidationErrors),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("failed to verify credentials")]
    Storage(#[source] anyhow::Error),
}

impl<'a, R, H> Login<'a, R, H>
where
    R: AccountRepository + ?Sized,
    H: CredentialHasher + ?Sized,
{
    pub async fn execute(&self, req: &LoginRequest) -> Result<AccountView, LoginError> {
        let (email, credential) = validate_login(req.email.as_deref(), req.credential.as_deref())
            .map_err(LoginError::Validation)?;

        let Some(account) = self
            .repo
            .find_by_email(&email)
            .await
            .map_err(LoginError::Storage)?
        else {
            debug!(email = %email, "login_unknown_email");
            if let Err(e) = self.hasher.verify_decoy(credential).await {
                warn!(error = ?e, "login_decoy_verify_failed");
            }
            return Err(LoginError::InvalidCredentials);
        };

        let ok = self
            .hasher
            .verify(credential, &account.credential_hash)
            .await
            .map_err(|e| {
                warn!(account_id = %account.id, error = ?e, "login_verify_failed");
                LoginError::Storage(e)
            })?;
        if !ok {
            info!(account_id = %account.id, "login_rejected");
            return Err(LoginError::InvalidCredentials);
        }

        info!(account_id = %account.id, "login_succeeded");
        Ok(account.into_view())
    }
}
