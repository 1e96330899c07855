//! Credential policy for sign-in and registration.
//!
//! Authentication itself happens in an external service; this module holds
//! the rules any service built on this crate applies: what counts as a
//! login identifier, which passwords are acceptable, and how they are
//! stored (Argon2id hashes, never plaintext).

use core::fmt;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bozor_core::{Email, EmailError, Phone, PhoneError};
use thiserror::Error;

/// Minimum password length, in characters, after trimming.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Credential errors.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("Password cannot be blank")]
    BlankPassword,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Password hashing failed")]
    PasswordHash,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// What a shopper signs in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(Email),
    Phone(Phone),
}

impl LoginIdentifier {
    /// Parse an email address or a phone number.
    ///
    /// Input containing `@` is treated as an email, anything else as a phone
    /// number.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidEmail` or
    /// `CredentialError::InvalidPhone` for the respective format.
    pub fn parse(input: &str) -> Result<Self, CredentialError> {
        if input.contains('@') {
            Ok(Self::Email(Email::parse(input)?))
        } else {
            Ok(Self::Phone(Phone::parse(input)?))
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(email) => fmt::Display::fmt(email, f),
            Self::Phone(phone) => fmt::Display::fmt(phone, f),
        }
    }
}

/// Check a candidate password.
///
/// # Errors
///
/// Returns `CredentialError::BlankPassword` for empty or whitespace-only
/// input and `CredentialError::PasswordTooShort` below
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    let trimmed = password.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::BlankPassword);
    }
    if trimmed.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `CredentialError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CredentialError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `CredentialError::InvalidCredentials` if the password does not
/// match or the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<(), CredentialError> {
    let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CredentialError::InvalidCredentials)
}
