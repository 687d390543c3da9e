//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Wardens, hostels and rooms",
        sql: r#"
            -- Hostels table
            CREATE TABLE IF NOT EXISTS hostels (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                hostel_type TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT ''
            );

            -- Wardens table (one hostel per warden)
            CREATE TABLE IF NOT EXISTS wardens (
                id TEXT PRIMARY KEY,
                warden_id TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                cnic_front TEXT NOT NULL DEFAULT '',
                cnic_back TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL CHECK (status IN ('new', 'active', 'banned', 'rejected', 'deleted')),
                created_at TEXT NOT NULL,
                hostel_id TEXT NOT NULL UNIQUE,
                FOREIGN KEY (hostel_id) REFERENCES hostels(id) ON DELETE CASCADE
            );

            -- Rooms table
            CREATE TABLE IF NOT EXISTS rooms (
                hostel_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                room_number TEXT NOT NULL,
                room_type TEXT NOT NULL,
                number_of_beds INTEGER NOT NULL,
                washroom TEXT NOT NULL,
                seats_available INTEGER NOT NULL,
                price REAL NOT NULL,
                PRIMARY KEY (hostel_id, position),
                FOREIGN KEY (hostel_id) REFERENCES hostels(id) ON DELETE CASCADE
            );

            -- Hostel images table
            CREATE TABLE IF NOT EXISTS hostel_images (
                hostel_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                url TEXT NOT NULL,
                PRIMARY KEY (hostel_id, position),
                FOREIGN KEY (hostel_id) REFERENCES hostels(id) ON DELETE CASCADE
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_wardens_status ON wardens(status);
            CREATE INDEX IF NOT EXISTS idx_wardens_created ON wardens(created_at);
        "#,
    },
    Migration {
        version: 2,
        description: "Admin accounts",
        sql: r#"
            CREATE TABLE IF NOT EXISTS admins (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                full_name TEXT NOT NULL,
                phone_number TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                state TEXT NOT NULL DEFAULT '',
                photo_url TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;

            info!(version = migration.version, "Migration complete");
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}
