//! Booking-domain data structures: care categories, time slots, and
//! appointments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Care category reference data (Prenatal, Postnatal, ...). Read-only from
/// the API's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub slug: String,
}

#[derive(Error, Debug)]
#[error("not a bookable slot: {0}")]
pub struct InvalidSlot(pub String);

/// The fixed set of bookable hourly slots, 09:00 through 17:00.
///
/// A closed enum rather than a range check: anything outside the nine
/// listed values cannot be represented at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "09:00")]
    Nine,
    #[serde(rename = "10:00")]
    Ten,
    #[serde(rename = "11:00")]
    Eleven,
    #[serde(rename = "12:00")]
    Twelve,
    #[serde(rename = "13:00")]
    Thirteen,
    #[serde(rename = "14:00")]
    Fourteen,
    #[serde(rename = "15:00")]
    Fifteen,
    #[serde(rename = "16:00")]
    Sixteen,
    #[serde(rename = "17:00")]
    Seventeen,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 9] = [
        TimeSlot::Nine,
        TimeSlot::Ten,
        TimeSlot::Eleven,
        TimeSlot::Twelve,
        TimeSlot::Thirteen,
        TimeSlot::Fourteen,
        TimeSlot::Fifteen,
        TimeSlot::Sixteen,
        TimeSlot::Seventeen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Nine => "09:00",
            TimeSlot::Ten => "10:00",
            TimeSlot::Eleven => "11:00",
            TimeSlot::Twelve => "12:00",
            TimeSlot::Thirteen => "13:00",
            TimeSlot::Fourteen => "14:00",
            TimeSlot::Fifteen => "15:00",
            TimeSlot::Sixteen => "16:00",
            TimeSlot::Seventeen => "17:00",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = InvalidSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .iter()
            .find(|slot| slot.as_str() == s)
            .copied()
            .ok_or_else(|| InvalidSlot(s.to_string()))
    }
}

/// A booked appointment.
///
/// `is_confirmed` starts false and flips to true exactly once, after the
/// confirmation notification has been delivered. It never goes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub category_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}
