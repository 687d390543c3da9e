//! Dashboard summary

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Warden, WardenStatus};
use crate::roster::monthly_creation_histogram;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monthly creation counts paired with their labels for charting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub label: &'static str,
    pub points: Vec<(&'static str, u32)>,
}

impl TrendSeries {
    pub fn from_counts(counts: [u32; 12]) -> Self {
        Self {
            label: "Total Hostels Created",
            points: MONTH_LABELS.iter().copied().zip(counts).collect(),
        }
    }
}

/// One row of the active hostels table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostelRow {
    pub id: String,
    pub warden_id: String,
    pub warden_name: String,
    pub hostel_name: String,
    pub hostel_location: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Warden> for HostelRow {
    fn from(w: &Warden) -> Self {
        Self {
            id: w.id.clone(),
            warden_id: w.warden_id.clone(),
            warden_name: w.full_name.clone(),
            hostel_name: w.hostel.name.clone(),
            hostel_location: w.hostel.location.clone(),
            created_at: w.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_hostels: usize,
    pub total_residents: u32,
    pub monthly_trend: TrendSeries,
    pub hostels: Vec<HostelRow>,
}

impl DashboardSummary {
    /// Build the summary from a full roster. Only active wardens count.
    pub fn from_roster(roster: &[Warden]) -> Self {
        let active: Vec<&Warden> = roster
            .iter()
            .filter(|w| w.status == WardenStatus::Active)
            .collect();

        Self {
            total_hostels: active.len(),
            total_residents: active.iter().map(|w| w.hostel.occupied_beds()).sum(),
            monthly_trend: TrendSeries::from_counts(monthly_creation_histogram(
                active.iter().copied(),
            )),
            hostels: active.iter().copied().map(HostelRow::from).collect(),
        }
    }
}
