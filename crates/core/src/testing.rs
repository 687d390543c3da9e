//! Test fixtures shared across modules

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::directory::WardenDirectory;
use crate::error::{Error, Result};
use crate::models::{Cnic, Hostel, Room, RoomType, Warden, WardenStatus, Washroom};

pub fn warden(id: &str, status: WardenStatus, full_name: &str, location: &str) -> Warden {
    Warden {
        id: id.to_string(),
        warden_id: format!("W-{}", id),
        full_name: full_name.to_string(),
        email: format!("{}@example.com", full_name.to_lowercase()),
        phone_number: "+923001234567".to_string(),
        cnic: Cnic {
            front: format!("cnic/{}/front.jpg", id),
            back: format!("cnic/{}/back.jpg", id),
        },
        status,
        created_at: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        hostel: Hostel {
            name: format!("{} Residency", full_name),
            location: location.to_string(),
            hostel_type: "Boys".to_string(),
            description: "Near campus".to_string(),
            images: vec![format!("hostels/{}/1.jpg", id)],
            rooms: vec![Room {
                room_number: "101".to_string(),
                room_type: RoomType::Shared,
                number_of_beds: 4,
                washroom: Washroom::Count(1),
                seats_available: 1,
                price: 9500.0,
            }],
        },
    }
}

pub fn warden_created(id: &str, status: WardenStatus, created_at: DateTime<Utc>) -> Warden {
    let mut w = warden(id, status, "Test", "Lahore");
    w.created_at = created_at;
    w
}

/// In-memory directory that records commands and can fail on demand
#[derive(Default)]
pub struct FakeDirectory {
    wardens: Mutex<Vec<Warden>>,
    fail_next: Mutex<Option<String>>,
    commands: Mutex<Vec<(String, WardenStatus)>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wardens(wardens: Vec<Warden>) -> Self {
        Self {
            wardens: Mutex::new(wardens),
            ..Self::default()
        }
    }

    /// Make the next remote call fail with `message`
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    pub fn commands(&self) -> Vec<(String, WardenStatus)> {
        self.commands.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(Error::Remote(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WardenDirectory for FakeDirectory {
    async fn list_wardens(&self) -> Result<Vec<Warden>> {
        self.take_failure()?;
        Ok(self.wardens.lock().unwrap().clone())
    }

    async fn set_warden_status(&self, id: &str, status: WardenStatus) -> Result<()> {
        self.take_failure()?;
        self.commands.lock().unwrap().push((id.to_string(), status));
        let mut wardens = self.wardens.lock().unwrap();
        if let Some(w) = wardens.iter_mut().find(|w| w.id == id) {
            w.status = status;
        }
        Ok(())
    }
}
