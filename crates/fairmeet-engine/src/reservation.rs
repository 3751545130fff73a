//! Persisted reservation records and their lifecycle vocabulary.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Created by a request, awaiting the provider's decision.
    Pending,
    /// Confirmed by the provider; blocks all further requests for the day.
    Booked,
    /// Declined by the provider; kept as history, does not block re-requests.
    Rejected,
}

impl ReservationStatus {
    /// Pending and Booked rows hold the single-active-reservation key;
    /// Rejected rows are inert history.
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Booked)
    }
}

/// A provider's verdict on a pending reservation.
///
/// There is deliberately no `Pending` variant: re-opening a booked
/// reservation is an unsupported transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Booked,
    Rejected,
}

impl From<Decision> for ReservationStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Booked => ReservationStatus::Booked,
            Decision::Rejected => ReservationStatus::Rejected,
        }
    }
}

/// One attempt by a requester to hold a slot with a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub requester_id: String,
    /// Display name carried on the record for provider-side listings.
    #[serde(default)]
    pub requester_name: Option<String>,
    pub provider_id: String,
    /// Pinned to a generated slot boundary by construction.
    pub slot_start: DateTime<Utc>,
    /// IANA zone the requester transacted in.
    pub time_zone: String,
    pub duration_minutes: u32,
    pub status: ReservationStatus,
    #[serde(default)]
    pub meeting_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// New pending reservation with a fresh id.
    pub fn new(
        requester_id: &str,
        requester_name: Option<&str>,
        provider_id: &str,
        slot_start: DateTime<Utc>,
        duration_minutes: u32,
        time_zone: &str,
    ) -> Self {
        Reservation {
            id: Uuid::new_v4().to_string(),
            requester_id: requester_id.to_string(),
            requester_name: requester_name.map(str::to_string),
            provider_id: provider_id.to_string(),
            slot_start,
            time_zone: time_zone.to_string(),
            duration_minutes,
            status: ReservationStatus::Pending,
            meeting_link: None,
            created_at: Utc::now(),
        }
    }

    /// Calendar day this reservation falls on when viewed in `tz`.
    pub fn local_day(&self, tz: Tz) -> NaiveDate {
        self.slot_start.with_timezone(&tz).date_naive()
    }
}

/// Which side of the transaction a listing is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Party {
    Requester(String),
    Provider(String),
}
