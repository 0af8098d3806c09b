use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::lifecycle::ParcelStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parcel {
    pub id: u64,
    pub user_id: u64,
    pub status: ParcelStatus,
    pub pickup_address: String,
    pub destination_address: String,
    #[serde(default)]
    pub present_location: Option<String>,
    pub weight_category: String,
    pub quote_amount: f64,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_mins: Option<f64>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationUpdate {
    pub destination_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUpdate {
    pub status: ParcelStatus,
    #[serde(default)]
    pub present_location: String,
}

/// Accepts RFC 3339 and naive ISO timestamps; naive values are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp {raw:?}: {err}"))
}
