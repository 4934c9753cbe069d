//! Facility and review records plus the per-request derived views.

use finder_geo::{Coordinate, Located};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of service a facility provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Hospital,
    Clinic,
    Pharmacy,
    Police,
    FireStation,
    Shelter,
}

impl FacilityType {
    /// Every type, in wire-name order
    pub const ALL: [FacilityType; 6] = [
        Self::Hospital,
        Self::Clinic,
        Self::Pharmacy,
        Self::Police,
        Self::FireStation,
        Self::Shelter,
    ];

    /// Wire and database name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Clinic => "clinic",
            Self::Pharmacy => "pharmacy",
            Self::Police => "police",
            Self::FireStation => "fire_station",
            Self::Shelter => "shelter",
        }
    }

    /// Wire names of every type, for validation messages
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown facility type '{s}'"))
    }
}

/// Operational status, in ranking order.
///
/// The derived `Ord` is the ranking order: an open facility always beats a
/// crowded one, which beats a closed one. Values the store holds that this
/// build does not recognise become [`FacilityStatus::Unknown`] and rank last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityStatus {
    Open,
    Crowded,
    Closed,
    #[serde(other)]
    Unknown,
}

impl FacilityStatus {
    /// Ranking priority, lower sorts first
    pub const fn priority(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Crowded => 2,
            Self::Closed => 3,
            Self::Unknown => 4,
        }
    }

    /// Parse a stored status, falling back to `Unknown`
    pub fn from_stored(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Self::Open,
            "crowded" => Self::Crowded,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

/// A facility row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub lat: f64,
    pub lon: f64,
    pub status: FacilityStatus,
    /// Static rating maintained outside this system
    pub rating: f64,
    pub phone: Option<String>,
    /// Messaging handle (e.g. LINE or WhatsApp id)
    pub messaging: Option<String>,
}

impl Facility {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

impl Located for Facility {
    fn position(&self) -> Option<Coordinate> {
        Some(self.coordinate()).filter(Coordinate::is_valid)
    }
}

/// A review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub facility_id: i64,
    pub reviewer_name: String,
    pub rating: f64,
    pub comment: Option<String>,
}

/// A facility enriched with driving distance and time for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub facility: Facility,
    /// Driving distance in kilometers
    pub distance: f64,
    /// Driving time in whole minutes
    pub time: u32,
    /// Status priority, see [`FacilityStatus::priority`]
    pub priority: u8,
}

impl RankedFacility {
    pub fn new(facility: Facility, distance: f64, time: u32) -> Self {
        let priority = facility.status.priority();
        Self {
            facility,
            distance,
            time,
            priority,
        }
    }
}

/// A facility with its reviews and their average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityDetail {
    pub facility: Facility,
    pub reviews: Vec<Review>,
    pub average_rating: f64,
}
