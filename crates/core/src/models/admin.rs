//! Admin account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dashboard administrator account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub state: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(email: String, full_name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            phone_number: String::new(),
            address: String::new(),
            state: String::new(),
            photo_url: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
            state: self.state.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// The signed-in admin, passed explicitly to every account operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub admin_id: Uuid,
    pub email: String,
}

impl AdminSession {
    pub fn new(admin_id: Uuid, email: String) -> Self {
        Self {
            admin_id,
            email,
        }
    }
}

/// Profile as shown on the "My Profile" page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub state: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

/// Editable profile fields. Email is not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub state: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

impl ProfileUpdate {
    /// Start an edit from the current profile
    pub fn from_profile(profile: &AdminProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            phone_number: profile.phone_number.clone(),
            address: profile.address.clone(),
            state: profile.state.clone(),
            photo_url: profile.photo_url.clone(),
        }
    }
}

/// Password change form
#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}
