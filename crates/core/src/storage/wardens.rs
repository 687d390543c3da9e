//! Warden storage operations
//!
//! Wardens, their hostel, rooms and images live in separate tables. Listing
//! is a batch read: one query for wardens joined to hostels, one for every
//! room and one for every image, stitched together in memory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::parse::{parse_datetime, parse_room_type, parse_status, parse_washroom, OptionalExt};
use crate::error::{Error, Result};
use crate::invariants::assert_warden_invariants;
use crate::models::{Cnic, Hostel, Room, Warden, WardenStatus};

/// A registration submitted by a prospective warden
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardenRegistration {
    pub warden_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub cnic: Cnic,
    pub hostel: Hostel,
    /// Defaults to the time of registration
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WardenRegistration {
    pub fn into_warden(self) -> Warden {
        Warden {
            id: Uuid::new_v4().to_string(),
            warden_id: self.warden_id,
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            cnic: self.cnic,
            status: WardenStatus::New,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            hostel: self.hostel,
        }
    }
}

pub struct WardenStore<'a> {
    conn: &'a Connection,
}

impl<'a> WardenStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Store a complete warden record with its hostel, rooms and images
    #[instrument(skip(self, warden), fields(id = %warden.id, warden_id = %warden.warden_id))]
    pub fn insert(&self, warden: &Warden) -> Result<()> {
        assert_warden_invariants(warden);

        let tx = self.conn.unchecked_transaction()?;
        let hostel_id = Uuid::new_v4().to_string();
        let hostel = &warden.hostel;

        tx.execute(
            "INSERT INTO hostels (id, name, location, hostel_type, description) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![hostel_id, hostel.name, hostel.location, hostel.hostel_type, hostel.description],
        )?;

        tx.execute(
            "INSERT INTO wardens (id, warden_id, full_name, email, phone_number, cnic_front, cnic_back, status, created_at, hostel_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                warden.id,
                warden.warden_id,
                warden.full_name,
                warden.email,
                warden.phone_number,
                warden.cnic.front,
                warden.cnic.back,
                warden.status.as_str(),
                warden.created_at.to_rfc3339(),
                hostel_id,
            ],
        )?;

        for (position, room) in hostel.rooms.iter().enumerate() {
            tx.execute(
                "INSERT INTO rooms (hostel_id, position, room_number, room_type, number_of_beds, washroom, seats_available, price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    hostel_id,
                    position as i64,
                    room.room_number,
                    room.room_type.as_str(),
                    room.number_of_beds,
                    serde_json::to_string(&room.washroom)?,
                    room.seats_available,
                    room.price,
                ],
            )?;
        }

        for (position, url) in hostel.images.iter().enumerate() {
            tx.execute(
                "INSERT INTO hostel_images (hostel_id, position, url) VALUES (?1, ?2, ?3)",
                params![hostel_id, position as i64, url],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Register a new warden with status `new`
    pub fn register(&self, registration: WardenRegistration) -> Result<Warden> {
        let warden = registration.into_warden();
        self.insert(&warden)?;
        Ok(warden)
    }

    /// All wardens with hostels attached, oldest first
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<Warden>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.id, w.warden_id, w.full_name, w.email, w.phone_number, w.cnic_front, w.cnic_back,
                    w.status, w.created_at, h.id, h.name, h.location, h.hostel_type, h.description
             FROM wardens w
             JOIN hostels h ON h.id = w.hostel_id
             ORDER BY w.created_at, w.id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let hostel_id: String = row.get(9)?;
                let warden = Warden {
                    id: row.get(0)?,
                    warden_id: row.get(1)?,
                    full_name: row.get(2)?,
                    email: row.get(3)?,
                    phone_number: row.get(4)?,
                    cnic: Cnic {
                        front: row.get(5)?,
                        back: row.get(6)?,
                    },
                    status: parse_status(&row.get::<_, String>(7)?)?,
                    created_at: parse_datetime(&row.get::<_, String>(8)?)?,
                    hostel: Hostel {
                        name: row.get(10)?,
                        location: row.get(11)?,
                        hostel_type: row.get(12)?,
                        description: row.get(13)?,
                        images: Vec::new(),
                        rooms: Vec::new(),
                    },
                };
                Ok((hostel_id, warden))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut rooms = self.rooms_by_hostel()?;
        let mut images = self.images_by_hostel()?;

        let wardens: Vec<Warden> = rows
            .into_iter()
            .map(|(hostel_id, mut warden)| {
                warden.hostel.rooms = rooms.remove(&hostel_id).unwrap_or_default();
                warden.hostel.images = images.remove(&hostel_id).unwrap_or_default();
                warden
            })
            .collect();

        debug!(count = wardens.len(), "Listed wardens");
        Ok(wardens)
    }

    fn rooms_by_hostel(&self) -> Result<HashMap<String, Vec<Room>>> {
        let mut stmt = self.conn.prepare(
            "SELECT hostel_id, room_number, room_type, number_of_beds, washroom, seats_available, price
             FROM rooms ORDER BY hostel_id, position",
        )?;

        let mut grouped: HashMap<String, Vec<Room>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            let hostel_id: String = row.get(0)?;
            let room = Room {
                room_number: row.get(1)?,
                room_type: parse_room_type(&row.get::<_, String>(2)?)?,
                number_of_beds: row.get(3)?,
                washroom: parse_washroom(&row.get::<_, String>(4)?)?,
                seats_available: row.get(5)?,
                price: row.get(6)?,
            };
            Ok((hostel_id, room))
        })?;
        for row in rows {
            let (hostel_id, room) = row?;
            grouped.entry(hostel_id).or_default().push(room);
        }
        Ok(grouped)
    }

    fn images_by_hostel(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT hostel_id, url FROM hostel_images ORDER BY hostel_id, position")?;

        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (hostel_id, url) = row?;
            grouped.entry(hostel_id).or_default().push(url);
        }
        Ok(grouped)
    }

    /// Current status of a single warden
    pub fn status(&self, id: &str) -> Result<Option<WardenStatus>> {
        let status = self
            .conn
            .query_row(
                "SELECT status FROM wardens WHERE id = ?1",
                params![id],
                |row| parse_status(&row.get::<_, String>(0)?),
            )
            .optional()?;
        Ok(status)
    }

    /// Overwrite a warden's status
    #[instrument(skip(self))]
    pub fn set_status(&self, id: &str, status: WardenStatus) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE wardens SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("warden {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomType, Washroom};
    use crate::storage::Database;
    use crate::testing::{warden, warden_created};
    use chrono::TimeZone;

    fn registration() -> WardenRegistration {
        WardenRegistration {
            warden_id: "W-100".to_string(),
            full_name: "Ali Raza".to_string(),
            email: "ali@example.com".to_string(),
            phone_number: "03001234567".to_string(),
            cnic: Cnic::default(),
            hostel: Hostel {
                name: "Iqbal House".to_string(),
                location: "Lahore".to_string(),
                hostel_type: "Boys".to_string(),
                description: "Five minutes from campus".to_string(),
                images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
                rooms: vec![
                    Room {
                        room_number: "1".to_string(),
                        room_type: RoomType::Single,
                        number_of_beds: 1,
                        washroom: Washroom::Attached(true),
                        seats_available: 1,
                        price: 15000.0,
                    },
                    Room {
                        room_number: "2".to_string(),
                        room_type: RoomType::Bunker,
                        number_of_beds: 6,
                        washroom: Washroom::Count(2),
                        seats_available: 3,
                        price: 7000.0,
                    },
                ],
            },
            created_at: None,
        }
    }

    #[test]
    fn test_register_and_list() {
        let db = Database::open_in_memory().unwrap();
        let registered = db.with_conn(|c| WardenStore::new(c).register(registration())).unwrap();
        assert_eq!(registered.status, WardenStatus::New);

        let listed = db.with_conn(|c| WardenStore::new(c).list_all()).unwrap();
        assert_eq!(listed, vec![registered]);
        assert_eq!(listed[0].hostel.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(listed[0].hostel.rooms[0].washroom, Washroom::Attached(true));
        assert_eq!(listed[0].hostel.rooms[1].room_type, RoomType::Bunker);
    }

    #[test]
    fn test_list_orders_by_creation() {
        let db = Database::open_in_memory().unwrap();
        let later = warden_created("b", WardenStatus::Active, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        let earlier = warden_created("a", WardenStatus::New, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());

        db.with_conn(|c| {
            let store = WardenStore::new(c);
            store.insert(&later)?;
            store.insert(&earlier)
        })
        .unwrap();

        let ids: Vec<String> = db
            .with_conn(|c| WardenStore::new(c).list_all())
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_set_status() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|c| {
            let store = WardenStore::new(c);
            store.insert(&warden("1", WardenStatus::New, "Ali", "Lahore"))?;
            store.set_status("1", WardenStatus::Active)?;
            assert_eq!(store.status("1")?, Some(WardenStatus::Active));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_set_status_unknown_id() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_conn(|c| WardenStore::new(c).set_status("missing", WardenStatus::Active))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_duplicate_warden_code_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let first = warden("1", WardenStatus::New, "Ali", "Lahore");
        let mut second = warden("2", WardenStatus::New, "Sara", "Karachi");
        second.warden_id = first.warden_id.clone();

        db.with_conn(|c| WardenStore::new(c).insert(&first)).unwrap();
        assert!(db.with_conn(|c| WardenStore::new(c).insert(&second)).is_err());

        let hostels: i64 = db
            .with_conn(|c| Ok(c.query_row("SELECT COUNT(*) FROM hostels", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(hostels, 1);
    }
}
