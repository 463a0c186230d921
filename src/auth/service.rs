// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential service: account registration and login.

use chrono::Utc;

use super::password;
use super::token::TokenKeys;
use crate::error::ServiceError;
use crate::storage::{InsertOutcome, Store, StoredAccount};

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub account_id: String,
    pub username: String,
}

/// A newly registered account. No token: callers log in separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub account_id: String,
    pub username: String,
}

/// Validates credentials against the account store and issues tokens.
#[derive(Clone)]
pub struct CredentialService {
    store: Store,
    keys: TokenKeys,
}

fn require_credentials(username: &str, password: &str) -> Result<(), ServiceError> {
    if username.is_empty() || password.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    Ok(())
}

impl CredentialService {
    pub fn new(store: Store, keys: TokenKeys) -> Self {
        Self { store, keys }
    }

    /// Check a username/password pair and sign a 24 hour access token.
    pub async fn validate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginGrant, ServiceError> {
        require_credentials(username, password)?;

        let Some(account) = self.store.find_account(username).await? else {
            tracing::info!(username, "Login rejected: unknown username");
            return Err(ServiceError::AuthenticationFailed);
        };

        if !password::verify_password(password, &account.password_salt, &account.password_digest)
        {
            tracing::info!(username, "Login rejected: wrong password");
            return Err(ServiceError::AuthenticationFailed);
        }

        let issued = self
            .keys
            .issue(&account.id, &account.username)
            .map_err(|e| ServiceError::ServiceUnavailable(format!("token signing failed: {e}")))?;

        tracing::info!(
            account_id = %account.id,
            expires_at = issued.claims.exp,
            "Issued access token"
        );

        Ok(LoginGrant {
            token: issued.token,
            account_id: account.id,
            username: account.username,
        })
    }

    /// Create a new account unless the username is taken.
    pub async fn register_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisteredAccount, ServiceError> {
        require_credentials(username, password)?;

        let digest = password::hash_password(password)
            .map_err(|e| ServiceError::ServiceUnavailable(format!("password digest failed: {e}")))?;

        let account = StoredAccount {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_salt: digest.salt,
            password_digest: digest.digest,
            created_at: Utc::now(),
        };
        let account_id = account.id.clone();

        match self.store.insert_account_if_absent(account).await? {
            InsertOutcome::Inserted => {
                tracing::info!(account_id = %account_id, username, "Registered account");
                Ok(RegisteredAccount {
                    account_id,
                    username: username.to_string(),
                })
            }
            InsertOutcome::AlreadyExists => {
                tracing::info!(username, "Registration rejected: username taken");
                Err(ServiceError::Conflict("Username already exists".to_string()))
            }
        }
    }
}
