//! Warden account model and status lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Hostel;
use crate::error::Error;

/// Account status of a warden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WardenStatus {
    /// Registered, awaiting approval
    New,
    /// Approved and allowed to manage a hostel
    Active,
    /// Suspended by an admin; can be reactivated
    Banned,
    /// Registration refused
    Rejected,
    /// Terminal; the record stays in the roster
    Deleted,
}

impl WardenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WardenStatus::New => "new",
            WardenStatus::Active => "active",
            WardenStatus::Banned => "banned",
            WardenStatus::Rejected => "rejected",
            WardenStatus::Deleted => "deleted",
        }
    }

    /// Statuses reachable from this one in a single transition
    pub fn allowed_targets(&self) -> &'static [WardenStatus] {
        match self {
            WardenStatus::New => &[WardenStatus::Active, WardenStatus::Rejected],
            WardenStatus::Active => &[WardenStatus::Banned, WardenStatus::Deleted],
            WardenStatus::Banned => &[WardenStatus::Active, WardenStatus::Deleted],
            WardenStatus::Rejected => &[WardenStatus::Deleted],
            WardenStatus::Deleted => &[],
        }
    }

    pub fn can_transition_to(&self, target: WardenStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_targets().is_empty()
    }

    pub fn all() -> &'static [WardenStatus] {
        &[
            WardenStatus::New,
            WardenStatus::Active,
            WardenStatus::Banned,
            WardenStatus::Rejected,
            WardenStatus::Deleted,
        ]
    }
}

impl fmt::Display for WardenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WardenStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WardenStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation("status", format!("Unknown warden status: {}", s)))
    }
}

/// Status partitions shown to the admin. Deleted accounts have no tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WardenTab {
    #[default]
    New,
    Active,
    Banned,
    Rejected,
}

impl WardenTab {
    pub fn status(&self) -> WardenStatus {
        match self {
            WardenTab::New => WardenStatus::New,
            WardenTab::Active => WardenStatus::Active,
            WardenTab::Banned => WardenStatus::Banned,
            WardenTab::Rejected => WardenStatus::Rejected,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WardenTab::New => "New Requests",
            WardenTab::Active => "Active Accounts",
            WardenTab::Banned => "Banned Accounts",
            WardenTab::Rejected => "Rejected Requests",
        }
    }

    pub fn all() -> &'static [WardenTab] {
        &[
            WardenTab::New,
            WardenTab::Active,
            WardenTab::Banned,
            WardenTab::Rejected,
        ]
    }
}

impl fmt::Display for WardenTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for WardenTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<WardenStatus>()? {
            WardenStatus::New => Ok(WardenTab::New),
            WardenStatus::Active => Ok(WardenTab::Active),
            WardenStatus::Banned => Ok(WardenTab::Banned),
            WardenStatus::Rejected => Ok(WardenTab::Rejected),
            WardenStatus::Deleted => Err(Error::validation(
                "tab",
                "Deleted accounts are not listed in any tab",
            )),
        }
    }
}

/// References to the front and back scans of the identity card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cnic {
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
}

/// A hostel staff account subject to the approval lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warden {
    /// Store-assigned document id
    pub id: String,
    /// Human-facing warden code
    pub warden_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub cnic: Cnic,
    pub status: WardenStatus,
    pub created_at: DateTime<Utc>,
    pub hostel: Hostel,
}

impl Warden {
    /// Case-folded substring match over name, hostel name and hostel location.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.full_name.to_lowercase().contains(needle)
            || self.hostel.name.to_lowercase().contains(needle)
            || self.hostel.location.to_lowercase().contains(needle)
    }
}
