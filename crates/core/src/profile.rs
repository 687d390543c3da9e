//! Admin profile and password management

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::directory::AdminAccounts;
use crate::error::Error;
use crate::models::{AdminProfile, AdminSession, PasswordChange, ProfileUpdate};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Field-level validation failures, in form order
#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<Error>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &str) {
        self.0.push(Error::validation(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for a field, if it failed
    pub fn get(&self, field: &str) -> Option<String> {
        self.0.iter().find_map(|e| match e {
            Error::Validation { field: f, message } if *f == field => Some(message.clone()),
            _ => None,
        })
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0
            .iter()
            .filter_map(|e| match e {
                Error::Validation { field, .. } => Some(*field),
                _ => None,
            })
            .collect()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,13}$").expect("phone pattern compiles"));

/// Contains something shaped like `name@host.tld`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Validate a profile edit. `email` is the account's current email.
pub fn validate_profile(email: &str, update: &ProfileUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if update.full_name.trim().is_empty() {
        errors.push("fullName", "Full Name is required");
    }

    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.push("email", "Email is invalid");
    }

    if update.phone_number.is_empty() {
        errors.push("phoneNumber", "Contact Number is required");
    } else if !is_valid_phone(&update.phone_number) {
        errors.push("phoneNumber", "Contact Number is invalid");
    }

    if update.address.trim().is_empty() {
        errors.push("address", "Current Address is required");
    }

    if update.state.trim().is_empty() {
        errors.push("state", "Current State is required");
    }

    errors.into_result()
}

pub fn validate_password_change(change: &PasswordChange) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if change.current.is_empty() {
        errors.push("currentPassword", "Current password is required");
    }

    if change.new.is_empty() {
        errors.push("newPassword", "New password is required");
    } else if change.new.chars().count() < MIN_PASSWORD_LEN {
        errors.push("newPassword", "Password must be at least 8 characters long");
    }

    if change.confirm.is_empty() {
        errors.push("confirmPassword", "Please confirm your new password");
    } else if change.confirm != change.new {
        errors.push("confirmPassword", "Passwords do not match");
    }

    errors.into_result()
}

#[derive(thiserror::Error, Debug)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Store(#[from] Error),
}

/// Validate and save a profile edit, returning the stored profile
pub async fn update_profile<A: AdminAccounts + ?Sized>(
    accounts: &A,
    session: &AdminSession,
    update: &ProfileUpdate,
) -> Result<AdminProfile, AccountError> {
    let current = accounts.profile(session).await?;
    validate_profile(&current.email, update).map_err(AccountError::Invalid)?;

    accounts.update_profile(session, update).await?;
    info!(email = %current.email, "Profile updated");
    Ok(accounts.profile(session).await?)
}

/// Validate the form, check the current password, then store the new one
pub async fn change_password<A: AdminAccounts + ?Sized>(
    accounts: &A,
    session: &AdminSession,
    change: &PasswordChange,
) -> Result<(), AccountError> {
    validate_password_change(change).map_err(AccountError::Invalid)?;

    if !accounts.verify_password(session, &change.current).await? {
        return Err(Error::Authentication("Current password is incorrect".to_string()).into());
    }

    accounts.update_password(session, &change.new).await?;
    info!(email = %session.email, "Password updated");
    Ok(())
}
