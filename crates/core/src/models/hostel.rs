//! Hostel and room models

use serde::{Deserialize, Serialize};

/// Room categories offered by a hostel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Single,
    Double,
    Shared,
    Bunker,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Shared => "Shared",
            RoomType::Bunker => "Bunker",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Some(RoomType::Single),
            "double" => Some(RoomType::Double),
            "shared" => Some(RoomType::Shared),
            "bunker" => Some(RoomType::Bunker),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registrations record the washroom either as a count or as an attached flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Washroom {
    Count(u32),
    Attached(bool),
}

impl Washroom {
    pub fn count(&self) -> u32 {
        match self {
            Washroom::Count(n) => *n,
            Washroom::Attached(true) => 1,
            Washroom::Attached(false) => 0,
        }
    }
}

impl Default for Washroom {
    fn default() -> Self {
        Washroom::Count(0)
    }
}

/// A bookable unit inside a hostel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub number_of_beds: u32,
    #[serde(default)]
    pub washroom: Washroom,
    pub seats_available: u32,
    pub price: f64,
}

impl Room {
    /// Beds currently taken
    pub fn occupied(&self) -> u32 {
        self.number_of_beds.saturating_sub(self.seats_available)
    }
}

/// The facility a warden administers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    pub name: String,
    pub location: String,
    #[serde(rename = "type", default)]
    pub hostel_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Hostel {
    pub fn total_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn total_beds(&self) -> u32 {
        self.rooms.iter().map(|r| r.number_of_beds).sum()
    }

    pub fn seats_available(&self) -> u32 {
        self.rooms.iter().map(|r| r.seats_available).sum()
    }

    pub fn occupied_beds(&self) -> u32 {
        self.rooms.iter().map(Room::occupied).sum()
    }
}
