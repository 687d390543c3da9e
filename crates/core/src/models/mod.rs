//! Data models for the hostel admin dashboard

mod admin;
mod hostel;
mod warden;

pub use admin::*;
pub use hostel::*;
pub use warden::*;
