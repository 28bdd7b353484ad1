//! Credential hashing/verification and the SQLite user directory.
//!
//! # Responsibility
//! - Define the one-way password comparison seam used by authentication.
//! - Provide an Argon2 implementation storing PHC-format hashes.
//!
//! # Invariants
//! - Plain-text passwords are never persisted or logged.
//! - A wrong password is a normal `false`, a corrupt stored hash is an error.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod users;

pub use users::SqliteUserDirectory;

/// Credential-store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Hashing a new password failed.
    Hash(String),
    /// A stored hash could not be parsed.
    MalformedHash(String),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(message) => write!(f, "failed to hash password: {message}"),
            Self::MalformedHash(message) => write!(f, "stored password hash is invalid: {message}"),
        }
    }
}

impl Error for CredentialError {}

/// One-way password comparison against a stored credential.
pub trait CredentialVerifier {
    /// Returns whether `password` matches `stored_hash`.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialError>;
}

/// Produces stored credentials from plain-text passwords.
pub trait CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;
}

/// Argon2id credentials with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Credentials;

impl CredentialHasher for Argon2Credentials {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialError::Hash(err.to_string()))
    }
}

impl CredentialVerifier for Argon2Credentials {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| CredentialError::MalformedHash(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialError::MalformedHash(err.to_string())),
        }
    }
}
