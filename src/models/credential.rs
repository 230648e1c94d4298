//! Password credentials
//!
//! Passwords are stored as `method:payload`, e.g. `plaintext:hunter2`,
//! `bcrypt:$2b$12$...` or `argon2:$argon2id$v=19$...`. The method prefix is
//! mandatory and a credential is never empty.

use std::fmt;
use std::str::FromStr;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::{credential_methods, BCRYPT_COST};

/// A stored password credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    method: String,
    payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("password credential is empty")]
    Empty,

    #[error("password credential has no `method:` prefix")]
    MissingMethod,

    #[error("unknown credential method `{0}`")]
    UnknownMethod(String),

    #[error("failed to hash password: {0}")]
    Hashing(String),
}

impl PasswordCredential {
    /// Credential compared verbatim
    pub fn plaintext(password: &str) -> Result<Self, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self {
            method: credential_methods::PLAINTEXT.to_string(),
            payload: password.to_string(),
        })
    }

    /// Credential stored as a bcrypt hash, the format existing
    /// installations write
    pub fn bcrypt(password: &str) -> Result<Self, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        let hash = bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        Ok(Self {
            method: credential_methods::BCRYPT.to_string(),
            payload: hash,
        })
    }

    /// Credential stored as an argon2 PHC string
    pub fn hashed(password: &str) -> Result<Self, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        Ok(Self {
            method: credential_methods::ARGON2.to_string(),
            payload: hash.to_string(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Check a candidate password against this credential
    pub fn verify(&self, candidate: &str) -> bool {
        match self.method.as_str() {
            credential_methods::PLAINTEXT => self.payload == candidate,
            credential_methods::BCRYPT => bcrypt::verify(candidate, &self.payload).unwrap_or(false),
            credential_methods::ARGON2 => PasswordHash::new(&self.payload)
                .map(|parsed| {
                    Argon2::default()
                        .verify_password(candidate.as_bytes(), &parsed)
                        .is_ok()
                })
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl FromStr for PasswordCredential {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CredentialError::Empty);
        }
        let (method, payload) = s.split_once(':').ok_or(CredentialError::MissingMethod)?;
        if !credential_methods::ALL.contains(&method) {
            return Err(CredentialError::UnknownMethod(method.to_string()));
        }
        if payload.is_empty() {
            return Err(CredentialError::Empty);
        }

        Ok(Self {
            method: method.to_string(),
            payload: payload.to_string(),
        })
    }
}

impl fmt::Display for PasswordCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.payload)
    }
}
