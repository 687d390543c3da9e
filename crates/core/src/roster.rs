//! Warden roster engine
//!
//! Holds the in-memory roster of wardens, partitions it into status tabs,
//! applies the admin's free-text search and performs status transitions.
//!
//! The roster is a cache of the store's truth. A transition is sent to the
//! store first and the local record is patched only once the store accepts
//! it; the engine never re-reads after its own write.

use chrono::{Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::directory::WardenDirectory;
use crate::error::Error;
use crate::invariants::assert_roster_invariants;
use crate::models::{Warden, WardenStatus, WardenTab};

/// Whether the transition table is enforced before contacting the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Only edges listed by [`WardenStatus::allowed_targets`] are accepted
    #[default]
    Enforced,
    /// Any target status is accepted
    Permissive,
}

impl TransitionPolicy {
    pub fn permits(&self, from: WardenStatus, to: WardenStatus) -> bool {
        match self {
            TransitionPolicy::Enforced => from.can_transition_to(to),
            TransitionPolicy::Permissive => true,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TransitionError {
    /// The store rejected or failed the status update
    #[error("Failed to update warden status: {message}")]
    Remote { message: String },

    #[error("Cannot change warden status from {from} to {to}")]
    IllegalTransition { from: WardenStatus, to: WardenStatus },

    #[error("Warden {id} is not in the roster")]
    NotFound { id: String },
}

impl From<Error> for TransitionError {
    fn from(err: Error) -> Self {
        TransitionError::Remote {
            message: err.to_string(),
        }
    }
}

/// Admin actions offered on a warden row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WardenAction {
    Approve,
    Reject,
    Ban,
    Reactivate,
    Delete,
}

impl WardenAction {
    pub fn target(&self) -> WardenStatus {
        match self {
            WardenAction::Approve => WardenStatus::Active,
            WardenAction::Reject => WardenStatus::Rejected,
            WardenAction::Ban => WardenStatus::Banned,
            WardenAction::Reactivate => WardenStatus::Active,
            WardenAction::Delete => WardenStatus::Deleted,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            WardenAction::Approve => "Account is successfully approved",
            WardenAction::Reject => "Account is successfully rejected",
            WardenAction::Ban => "Account is successfully banned",
            WardenAction::Reactivate => "Account is successfully reactivated",
            WardenAction::Delete => "Account is successfully deleted",
        }
    }

    /// Actions available for a warden currently in `status`
    pub fn available_for(status: WardenStatus) -> &'static [WardenAction] {
        match status {
            WardenStatus::New => &[WardenAction::Approve, WardenAction::Reject],
            WardenStatus::Active => &[WardenAction::Ban, WardenAction::Delete],
            WardenStatus::Banned => &[WardenAction::Reactivate, WardenAction::Delete],
            WardenStatus::Rejected => &[WardenAction::Delete],
            WardenStatus::Deleted => &[],
        }
    }
}

/// Wardens in `roster` with the tab's status that match `search`, in roster order
pub fn visible_subset<'a>(roster: &'a [Warden], tab: WardenTab, search: &str) -> Vec<&'a Warden> {
    let needle = search.to_lowercase();
    let status = tab.status();
    roster
        .iter()
        .filter(|w| w.status == status)
        .filter(|w| w.matches_search(&needle))
        .collect()
}

/// Count wardens per calendar month of `created_at` in the observer's local time.
/// Index 0 is January.
pub fn monthly_creation_histogram<'a, I>(wardens: I) -> [u32; 12]
where
    I: IntoIterator<Item = &'a Warden>,
{
    monthly_creation_histogram_in(wardens, &Local)
}

/// Same as [`monthly_creation_histogram`] with an explicit calendar time zone
pub fn monthly_creation_histogram_in<'a, I, Tz>(wardens: I, tz: &Tz) -> [u32; 12]
where
    I: IntoIterator<Item = &'a Warden>,
    Tz: TimeZone,
{
    let mut counts = [0u32; 12];
    for warden in wardens {
        let month = warden.created_at.with_timezone(tz).month0() as usize;
        counts[month] += 1;
    }
    counts
}

/// Roster state plus the data-access collaborator it writes through
pub struct RosterEngine<D> {
    directory: D,
    policy: TransitionPolicy,
    roster: Vec<Warden>,
    active_tab: WardenTab,
    search_text: String,
    /// Indices into `roster`, recomputed after every mutation
    visible: Vec<usize>,
}

impl<D: WardenDirectory> RosterEngine<D> {
    pub fn new(directory: D, policy: TransitionPolicy) -> Self {
        Self {
            directory,
            policy,
            roster: Vec::new(),
            active_tab: WardenTab::default(),
            search_text: String::new(),
            visible: Vec::new(),
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Replace the roster wholesale
    pub fn load(&mut self, wardens: Vec<Warden>) {
        assert_roster_invariants(&wardens);
        self.roster = wardens;
        self.recompute();
    }

    /// Fetch the roster from the directory and load it.
    /// On failure the current roster is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> crate::Result<usize> {
        let wardens = self.directory.list_wardens().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch warden records");
            e
        })?;
        let count = wardens.len();
        self.load(wardens);
        info!(count, "Roster loaded");
        Ok(count)
    }

    pub fn select_tab(&mut self, tab: WardenTab) {
        self.active_tab = tab;
        self.recompute();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.recompute();
    }

    pub fn active_tab(&self) -> WardenTab {
        self.active_tab
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn roster(&self) -> &[Warden] {
        &self.roster
    }

    /// Wardens shown under the current tab and search
    pub fn visible(&self) -> Vec<&Warden> {
        self.visible.iter().map(|&i| &self.roster[i]).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Warden> {
        self.roster.iter().find(|w| w.id == id)
    }

    /// Number of wardens in each tab, ignoring the search text
    pub fn tab_counts(&self) -> Vec<(WardenTab, usize)> {
        WardenTab::all()
            .iter()
            .map(|&tab| {
                let status = tab.status();
                (tab, self.roster.iter().filter(|w| w.status == status).count())
            })
            .collect()
    }

    /// Creation histogram over the whole roster
    pub fn monthly_creation_histogram(&self) -> [u32; 12] {
        monthly_creation_histogram(&self.roster)
    }

    /// Change one warden's status through the directory, then patch the roster.
    ///
    /// Concurrent transitions for the same id are not deduplicated; callers
    /// disable the trigger while one is in flight.
    #[instrument(skip(self), fields(policy = ?self.policy))]
    pub async fn transition(
        &mut self,
        id: &str,
        target: WardenStatus,
    ) -> std::result::Result<(), TransitionError> {
        let index = self
            .roster
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| TransitionError::NotFound { id: id.to_string() })?;

        let from = self.roster[index].status;
        if !self.policy.permits(from, target) {
            warn!(%from, to = %target, "Rejected illegal status transition");
            return Err(TransitionError::IllegalTransition { from, to: target });
        }

        if let Err(e) = self.directory.set_warden_status(id, target).await {
            warn!(error = %e, "Status update failed, roster unchanged");
            return Err(e.into());
        }

        self.roster[index].status = target;
        self.recompute();
        info!(%from, to = %target, "Warden status updated");
        Ok(())
    }

    /// Apply an admin action; returns the confirmation text for display
    pub async fn apply(
        &mut self,
        id: &str,
        action: WardenAction,
    ) -> std::result::Result<&'static str, TransitionError> {
        self.transition(id, action.target()).await?;
        Ok(action.success_message())
    }

    fn recompute(&mut self) {
        let needle = self.search_text.to_lowercase();
        let status = self.active_tab.status();
        self.visible = self
            .roster
            .iter()
            .enumerate()
            .filter(|(_, w)| w.status == status && w.matches_search(&needle))
            .map(|(i, _)| i)
            .collect();
        debug!(
            tab = ?self.active_tab,
            search = %self.search_text,
            visible = self.visible.len(),
            "Recomputed visible wardens"
        );
    }
}
