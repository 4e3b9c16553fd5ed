use crate::errors::AppError;
use crate::models::Accounts;
use crate::storage::JsonStore;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing::{info, warn};

/// Verified against when the username is unknown, so a miss costs as much as
/// a wrong password.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("task-tracker-dummy-password").unwrap_or_default());

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::PasswordHash(err.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Clone)]
pub struct AccountStore {
    store: JsonStore<Accounts>,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), AppError> {
        self.store
            .update(|accounts| {
                if accounts.contains_key(username) {
                    return Err(AppError::AlreadyExists);
                }
                if username.is_empty() || password.is_empty() {
                    return Err(AppError::InvalidInput);
                }
                accounts.insert(username.to_owned(), hash_password(password)?);
                Ok(())
            })
            .await?;

        info!(username, "registered account");
        Ok(())
    }

    /// Succeeds only on an exact password match. Usernames are not trimmed.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let accounts = self.store.read().await?;
        let verified = match accounts.get(username) {
            Some(hash) => verify_password(password, hash),
            None => {
                verify_password(password, &DUMMY_HASH);
                false
            }
        };
        if verified {
            return Ok(());
        }
        warn!(username, "rejected login");
        Err(AppError::InvalidCredentials)
    }
}
