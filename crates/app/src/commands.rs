//! Command execution and text rendering

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use hostel_admin_core::profile::{self, AccountError, MIN_PASSWORD_LEN};
use hostel_admin_core::{
    AdminAccounts, AdminProfile, DashboardSummary, Error, PasswordChange, ProfileUpdate,
    TransitionError, Warden, WardenAction, WardenRegistration,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::cli::{Command, Credentials, ProfileArgs};
use crate::state::{AppState, Engine};

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// An import file holds one registration or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<WardenRegistration>),
    One(Box<WardenRegistration>),
}

/// Run one command and return the text to print
pub async fn run(state: &AppState, command: Command) -> Result<String, CommandError> {
    match command {
        Command::List { tab, search } => {
            let mut engine = state.engine().await?;
            engine.select_tab(tab);
            engine.set_search(search);
            Ok(render_list(&engine))
        }
        Command::Show { id } => {
            let engine = state.engine().await?;
            let warden = engine
                .get(&id)
                .ok_or_else(|| Error::NotFound(format!("Warden {}", id)))?;
            Ok(render_detail(warden))
        }
        Command::Approve { id } => apply(state, &id, WardenAction::Approve).await,
        Command::Reject { id } => apply(state, &id, WardenAction::Reject).await,
        Command::Ban { id } => apply(state, &id, WardenAction::Ban).await,
        Command::Reactivate { id } => apply(state, &id, WardenAction::Reactivate).await,
        Command::Delete { id } => apply(state, &id, WardenAction::Delete).await,
        Command::Dashboard { json } => {
            let engine = state.engine().await?;
            let summary = DashboardSummary::from_roster(engine.roster());
            if json {
                Ok(serde_json::to_string_pretty(&summary).map_err(Error::from)?)
            } else {
                Ok(render_dashboard(&summary))
            }
        }
        Command::Import { file } => import(state, &file),
        Command::CreateAdmin {
            email,
            name,
            password,
        } => create_admin(state, &email, &name, &password),
        Command::Profile {
            credentials,
            update,
        } => edit_profile(state, &credentials, &update).await,
        Command::Passwd {
            credentials,
            new_password,
            confirm_password,
        } => {
            let session = state.sign_in(&credentials.email, &credentials.password)?;
            let change = PasswordChange {
                current: credentials.password,
                new: new_password,
                confirm: confirm_password,
            };
            profile::change_password(&*state.db, &session, &change).await?;
            Ok("Password updated successfully".to_string())
        }
    }
}

#[instrument(skip(state))]
async fn apply(state: &AppState, id: &str, action: WardenAction) -> Result<String, CommandError> {
    let mut engine = state.engine().await?;
    let message = engine.apply(id, action).await?;
    Ok(message.to_string())
}

fn import(state: &AppState, path: &Path) -> Result<String, CommandError> {
    let text = std::fs::read_to_string(path).map_err(Error::from)?;
    let registrations = match serde_json::from_str(&text).map_err(Error::from)? {
        ImportFile::Many(list) => list,
        ImportFile::One(one) => vec![*one],
    };

    let mut out = String::new();
    for registration in registrations {
        let warden = state.db.register_warden(registration)?;
        let _ = writeln!(
            out,
            "Registered {} ({}) as {}",
            warden.full_name, warden.warden_id, warden.id
        );
    }
    info!(path = %path.display(), "Imported registrations");
    Ok(out)
}

fn create_admin(
    state: &AppState,
    email: &str,
    name: &str,
    password: &str,
) -> Result<String, CommandError> {
    if !profile::is_valid_email(email) {
        return Err(Error::validation("email", "Email is invalid").into());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(
            "password",
            "Password must be at least 8 characters long",
        )
        .into());
    }

    let admin = state.db.create_admin(email, name, password)?;
    Ok(format!("Created admin account {}", admin.email))
}

async fn edit_profile(
    state: &AppState,
    credentials: &Credentials,
    args: &ProfileArgs,
) -> Result<String, CommandError> {
    let session = state.sign_in(&credentials.email, &credentials.password)?;
    let current = state.db.profile(&session).await?;
    if args.is_empty() {
        return Ok(render_profile(&current));
    }

    let update = merge_profile(&current, args);
    let saved = profile::update_profile(&*state.db, &session, &update).await?;
    Ok(format!("Profile updated successfully\n{}", render_profile(&saved)))
}

fn merge_profile(current: &AdminProfile, args: &ProfileArgs) -> ProfileUpdate {
    let mut update = ProfileUpdate::from_profile(current);
    if let Some(v) = &args.full_name {
        update.full_name = v.clone();
    }
    if let Some(v) = &args.phone {
        update.phone_number = v.clone();
    }
    if let Some(v) = &args.address {
        update.address = v.clone();
    }
    if let Some(v) = &args.state {
        update.state = v.clone();
    }
    if let Some(v) = &args.photo_url {
        update.photo_url = v.clone();
    }
    update
}

fn verb(action: WardenAction) -> &'static str {
    match action {
        WardenAction::Approve => "approve",
        WardenAction::Reject => "reject",
        WardenAction::Ban => "ban",
        WardenAction::Reactivate => "reactivate",
        WardenAction::Delete => "delete",
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d %b %Y").to_string()
}

fn render_list(engine: &Engine) -> String {
    let mut out = String::new();
    let counts: Vec<String> = engine
        .tab_counts()
        .iter()
        .map(|(tab, n)| format!("{}: {}", tab.status(), n))
        .collect();
    let _ = write!(out, "{}", engine.active_tab());
    if !engine.search_text().is_empty() {
        let _ = write!(out, " matching \"{}\"", engine.search_text());
    }
    let _ = writeln!(out, "  [{}]", counts.join(" | "));

    let visible = engine.visible();
    if visible.is_empty() {
        out.push_str("No wardens found\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<38} {:<10} {:<20} {:<24} {:<16} {}",
        "ID", "WARDEN", "NAME", "HOSTEL", "LOCATION", "REGISTERED"
    );
    for w in visible {
        let _ = writeln!(
            out,
            "{:<38} {:<10} {:<20} {:<24} {:<16} {}",
            w.id,
            w.warden_id,
            w.full_name,
            w.hostel.name,
            w.hostel.location,
            format_date(w.created_at)
        );
    }
    out
}

fn render_detail(w: &Warden) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Warden {} ({})", w.warden_id, w.id);
    let _ = writeln!(out, "  Name:       {}", w.full_name);
    let _ = writeln!(out, "  Email:      {}", w.email);
    let _ = writeln!(out, "  Phone:      {}", w.phone_number);
    let _ = writeln!(out, "  Status:     {}", w.status);
    let _ = writeln!(out, "  Registered: {}", format_date(w.created_at));
    let _ = writeln!(out, "  CNIC:       {} / {}", w.cnic.front, w.cnic.back);

    let h = &w.hostel;
    let _ = writeln!(out, "Hostel {} ({}, {})", h.name, h.location, h.hostel_type);
    if !h.description.is_empty() {
        let _ = writeln!(out, "  {}", h.description);
    }
    let _ = writeln!(
        out,
        "  Rooms: {}  Beds: {}  Seats available: {}",
        h.total_rooms(),
        h.total_beds(),
        h.seats_available()
    );
    for room in &h.rooms {
        let _ = writeln!(
            out,
            "  Room {:<6} {:<8} beds {:<3} available {:<3} washrooms {:<2} Rs {:.0}",
            room.room_number,
            room.room_type,
            room.number_of_beds,
            room.seats_available,
            room.washroom.count(),
            room.price
        );
    }
    for image in &h.images {
        let _ = writeln!(out, "  Image: {}", image);
    }

    let actions: Vec<&str> = WardenAction::available_for(w.status)
        .iter()
        .map(|&a| verb(a))
        .collect();
    if !actions.is_empty() {
        let _ = writeln!(out, "Actions: {}", actions.join(", "));
    }
    out
}

fn render_dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Hostels:   {}", summary.total_hostels);
    let _ = writeln!(out, "Total Residents: {}", summary.total_residents);

    let _ = writeln!(out, "\n{}", summary.monthly_trend.label);
    for (month, count) in &summary.monthly_trend.points {
        let _ = writeln!(out, "  {} {:>4}", month, count);
    }

    let _ = writeln!(out, "\nActive Hostels");
    if summary.hostels.is_empty() {
        out.push_str("  none\n");
    }
    for row in &summary.hostels {
        let _ = writeln!(
            out,
            "  {:<10} {:<20} {:<24} {:<16} {}",
            row.warden_id,
            row.warden_name,
            row.hostel_name,
            row.hostel_location,
            format_date(row.created_at)
        );
    }
    out
}

fn render_profile(p: &AdminProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Full Name:       {}", p.full_name);
    let _ = writeln!(out, "Email:           {}", p.email);
    let _ = writeln!(out, "Contact Number:  {}", p.phone_number);
    let _ = writeln!(out, "Current Address: {}", p.address);
    let _ = writeln!(out, "Current State:   {}", p.state);
    if !p.photo_url.is_empty() {
        let _ = writeln!(out, "Photo:           {}", p.photo_url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use chrono::TimeZone;
    use clap::Parser;
    use hostel_admin_core::{AppConfig, Hostel, Room, RoomType, TransitionPolicy, Washroom};
    use tempfile::{tempdir, TempDir};

    fn setup(policy: TransitionPolicy) -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let mut config = AppConfig::default();
        config.store.path = Some(dir.path().join("admin.db"));
        config.lifecycle.policy = policy;
        let state = AppState::new(config).unwrap();
        (dir, state)
    }

    fn registration(code: &str, name: &str, location: &str) -> WardenRegistration {
        WardenRegistration {
            warden_id: code.to_string(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: "03001234567".to_string(),
            cnic: Default::default(),
            hostel: Hostel {
                name: format!("{} House", name),
                location: location.to_string(),
                hostel_type: "Girls".to_string(),
                rooms: vec![Room {
                    room_number: "1".to_string(),
                    room_type: RoomType::Double,
                    number_of_beds: 2,
                    washroom: Washroom::Attached(true),
                    seats_available: 0,
                    price: 12000.0,
                }],
                ..Default::default()
            },
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()),
        }
    }

    async fn exec(state: &AppState, args: &[&str]) -> Result<String, CommandError> {
        let argv = std::iter::once("hostel-admin").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        run(state, cli.command).await
    }

    #[tokio::test]
    async fn test_list_filters_by_tab_and_search() {
        let (_dir, state) = setup(TransitionPolicy::Enforced);
        state
            .db
            .register_warden(registration("W-1", "Ayesha", "Lahore"))
            .unwrap();
        state
            .db
            .register_warden(registration("W-2", "Bilal", "Karachi"))
            .unwrap();

        let out = exec(&state, &["list"]).await.unwrap();
        assert!(out.starts_with("New Requests"));
        assert!(out.contains("new: 2"));
        assert!(out.contains("Ayesha"));
        assert!(out.contains("Bilal"));

        let out = exec(&state, &["list", "--search", "KARA"]).await.unwrap();
        assert!(out.starts_with("New Requests matching \"KARA\""));
        assert!(!out.contains("Ayesha"));
        assert!(out.contains("Bilal"));

        let out = exec(&state, &["list", "--tab", "active"]).await.unwrap();
        assert!(out.contains("No wardens found"));
    }

    #[tokio::test]
    async fn test_lifecycle_commands() {
        let (_dir, state) = setup(TransitionPolicy::Enforced);
        let w = state
            .db
            .register_warden(registration("W-1", "Ayesha", "Lahore"))
            .unwrap();

        let out = exec(&state, &["approve", &w.id]).await.unwrap();
        assert_eq!(out, "Account is successfully approved");

        let err = exec(&state, &["approve", &w.id]).await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Transition(TransitionError::IllegalTransition { .. })
        ));

        exec(&state, &["ban", &w.id]).await.unwrap();
        let out = exec(&state, &["list", "--tab", "banned"]).await.unwrap();
        assert!(out.contains("Ayesha"));

        let out = exec(&state, &["reactivate", &w.id]).await.unwrap();
        assert_eq!(out, "Account is successfully reactivated");

        exec(&state, &["delete", &w.id]).await.unwrap();
        for tab in ["new", "active", "banned", "rejected"] {
            let out = exec(&state, &["list", "--tab", tab]).await.unwrap();
            assert!(!out.contains("Ayesha"));
        }
    }

    #[tokio::test]
    async fn test_permissive_policy_allows_any_edge() {
        let (_dir, state) = setup(TransitionPolicy::Permissive);
        let w = state
            .db
            .register_warden(registration("W-1", "Ayesha", "Lahore"))
            .unwrap();

        exec(&state, &["ban", &w.id]).await.unwrap();
        let out = exec(&state, &["show", &w.id]).await.unwrap();
        assert!(out.contains("Status:     banned"));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let (_dir, state) = setup(TransitionPolicy::Enforced);
        let err = exec(&state, &["reject", "missing"]).await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Transition(TransitionError::NotFound { .. })
        ));

        let err = exec(&state, &["show", "missing"]).await.unwrap_err();
        assert!(matches!(err, CommandError::Core(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_show_detail() {
        let (_dir, state) = setup(TransitionPolicy::Enforced);
        let w = state
            .db
            .register_warden(registration("W-7", "Ayesha", "Lahore"))
            .unwrap();

        let out = exec(&state, &["show", &w.id]).await.unwrap();
        assert!(out.contains("Warden W-7"));
        assert!(out.contains("Hostel Ayesha House (Lahore, Girls)"));
        assert!(out.contains("Rooms: 1  Beds: 2  Seats available: 0"));
        assert!(out.contains("Actions: approve, reject"));
    }

    #[tokio::test]
    async fn test_import_and_dashboard() {
        let (dir, state) = setup(TransitionPolicy::Enforced);
        let file = dir.path().join("wardens.json");
        let batch = vec![
            registration("W-1", "Ayesha", "Lahore"),
            registration("W-2", "Bilal", "Karachi"),
        ];
        std::fs::write(&file, serde_json::to_string(&batch).unwrap()).unwrap();

        let out = exec(&state, &["import", file.to_str().unwrap()]).await.unwrap();
        assert_eq!(out.lines().count(), 2);

        let single = dir.path().join("one.json");
        std::fs::write(
            &single,
            serde_json::to_string(&registration("W-3", "Chand", "Multan")).unwrap(),
        )
        .unwrap();
        exec(&state, &["import", single.to_str().unwrap()]).await.unwrap();

        let roster = state.engine().await.unwrap();
        assert_eq!(roster.roster().len(), 3);
        let ayesha = roster
            .roster()
            .iter()
            .find(|w| w.warden_id == "W-1")
            .unwrap()
            .id
            .clone();
        exec(&state, &["approve", &ayesha]).await.unwrap();

        let out = exec(&state, &["dashboard"]).await.unwrap();
        assert!(out.contains("Total Hostels:   1"));
        assert!(out.contains("Total Residents: 2"));
        assert!(out.contains("Mar    1"));

        let json = exec(&state, &["dashboard", "--json"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_hostels"], 1);
        assert_eq!(value["hostels"][0]["warden_id"], "W-1");
    }

    #[tokio::test]
    async fn test_profile_and_password() {
        let (_dir, state) = setup(TransitionPolicy::Enforced);
        exec(
            &state,
            &["create-admin", "admin@hostel.pk", "Head Admin", "first-pass"],
        )
        .await
        .unwrap();

        let creds = ["--email", "admin@hostel.pk", "--password", "first-pass"];

        let out = exec(&state, &[&["profile"][..], &creds[..]].concat())
            .await
            .unwrap();
        assert!(out.contains("Full Name:       Head Admin"));

        let err = exec(
            &state,
            &[&["profile"][..], &creds[..], &["--phone", "12"][..]].concat(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Account(AccountError::Invalid(_))));

        let out = exec(
            &state,
            &[
                &["profile"][..],
                &creds[..],
                &[
                    "--phone",
                    "03001234567",
                    "--address",
                    "1 Mall Road",
                    "--state",
                    "Punjab",
                ][..],
            ]
            .concat(),
        )
        .await
        .unwrap();
        assert!(out.starts_with("Profile updated successfully"));
        assert!(out.contains("Current State:   Punjab"));

        let out = exec(
            &state,
            &[
                &["passwd"][..],
                &creds[..],
                &["--new", "second-pass", "--confirm", "second-pass"][..],
            ]
            .concat(),
        )
        .await
        .unwrap();
        assert_eq!(out, "Password updated successfully");
        assert!(state.sign_in("admin@hostel.pk", "second-pass").is_ok());
        assert!(state.sign_in("admin@hostel.pk", "first-pass").is_err());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_short_password() {
        let (_dir, state) = setup(TransitionPolicy::Enforced);
        let err = exec(&state, &["create-admin", "admin@hostel.pk", "Admin", "short"])
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Core(Error::Validation { .. })));
    }
}
