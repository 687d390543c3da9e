//! Admin account storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{Admin, ProfileUpdate};

const ADMIN_COLUMNS: &str =
    "id, email, password_hash, full_name, phone_number, address, state, photo_url, created_at";

pub struct AdminStore<'a> {
    conn: &'a Connection,
}

fn admin_from_row(row: &Row<'_>) -> rusqlite::Result<Admin> {
    Ok(Admin {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        full_name: row.get(3)?,
        phone_number: row.get(4)?,
        address: row.get(5)?,
        state: row.get(6)?,
        photo_url: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?)?,
    })
}

impl<'a> AdminStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new admin
    #[instrument(skip(self, admin), fields(email = %admin.email))]
    pub fn create(&self, admin: &Admin) -> Result<()> {
        self.conn.execute(
            "INSERT INTO admins (id, email, password_hash, full_name, phone_number, address, state, photo_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                admin.id.to_string(),
                admin.email,
                admin.password_hash,
                admin.full_name,
                admin.phone_number,
                admin.address,
                admin.state,
                admin.photo_url,
                admin.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let admin = self
            .conn
            .query_row(
                &format!("SELECT {} FROM admins WHERE id = ?1", ADMIN_COLUMNS),
                params![id.to_string()],
                admin_from_row,
            )
            .optional()?;
        Ok(admin)
    }

    #[instrument(skip(self))]
    pub fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = self
            .conn
            .query_row(
                &format!("SELECT {} FROM admins WHERE email = ?1 COLLATE NOCASE", ADMIN_COLUMNS),
                params![email],
                admin_from_row,
            )
            .optional()?;
        Ok(admin)
    }

    /// Overwrite the editable profile fields
    #[instrument(skip(self, update))]
    pub fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE admins SET full_name = ?1, phone_number = ?2, address = ?3, state = ?4, photo_url = ?5
             WHERE id = ?6",
            params![
                update.full_name,
                update.phone_number,
                update.address,
                update.state,
                update.photo_url,
                id.to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("admin {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    pub fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE admins SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id.to_string()],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("admin {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn admin() -> Admin {
        Admin::new(
            "admin@hostel.pk".to_string(),
            "Head Admin".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let admin = admin();
        db.with_conn(|c| AdminStore::new(c).create(&admin)).unwrap();

        let by_email = db
            .with_conn(|c| AdminStore::new(c).find_by_email("ADMIN@hostel.pk"))
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, admin.id);

        let by_id = db
            .with_conn(|c| AdminStore::new(c).find_by_id(admin.id))
            .unwrap()
            .unwrap();
        assert_eq!(by_id.full_name, "Head Admin");
    }

    #[test]
    fn test_update_profile_keeps_email() {
        let db = Database::open_in_memory().unwrap();
        let admin = admin();
        db.with_conn(|c| AdminStore::new(c).create(&admin)).unwrap();

        let update = ProfileUpdate {
            full_name: "Deputy Admin".to_string(),
            phone_number: "03001234567".to_string(),
            address: "Mall Road".to_string(),
            state: "Punjab".to_string(),
            photo_url: "profilePictures/admin@hostel.pk".to_string(),
        };
        db.with_conn(|c| AdminStore::new(c).update_profile(admin.id, &update))
            .unwrap();

        let stored = db
            .with_conn(|c| AdminStore::new(c).find_by_id(admin.id))
            .unwrap()
            .unwrap();
        assert_eq!(stored.email, "admin@hostel.pk");
        assert_eq!(stored.full_name, "Deputy Admin");
        assert_eq!(stored.state, "Punjab");
    }

    #[test]
    fn test_update_missing_admin() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_conn(|c| AdminStore::new(c).update_password_hash(Uuid::new_v4(), "x"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
