//! Parcel lifecycle: status values, their display treatment, and which
//! mutations each status permits. Every view reads status semantics from here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Happy-path order used for progress display. `Cancelled` is not on it.
pub const PROGRESS_STEPS: [ParcelStatus; 3] = [
    ParcelStatus::Pending,
    ParcelStatus::InTransit,
    ParcelStatus::Delivered,
];

/// Statuses an admin may pick when overriding a parcel.
pub const ADMIN_STATUS_OPTIONS: [ParcelStatus; 4] = [
    ParcelStatus::Pending,
    ParcelStatus::InTransit,
    ParcelStatus::Delivered,
    ParcelStatus::Cancelled,
];

/// Progress index for statuses off the happy path.
pub const OFF_PATH: i32 = -1;

/// Parcel status as reported by the backend. Values this build does not know
/// about are kept verbatim in `Other` so they still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParcelStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
    Other(String),
}

impl ParcelStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ParcelStatus::Pending => "pending",
            ParcelStatus::InTransit => "in_transit",
            ParcelStatus::Delivered => "delivered",
            ParcelStatus::Cancelled => "cancelled",
            ParcelStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ParcelStatus::Other(_))
    }
}

impl From<&str> for ParcelStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => ParcelStatus::Pending,
            "in_transit" => ParcelStatus::InTransit,
            "delivered" => ParcelStatus::Delivered,
            "cancelled" => ParcelStatus::Cancelled,
            other => ParcelStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ParcelStatus {
    fn from(raw: String) -> Self {
        ParcelStatus::from(raw.as_str())
    }
}

impl From<ParcelStatus> for String {
    fn from(status: ParcelStatus) -> Self {
        match status {
            ParcelStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Success,
    Info,
    Error,
    Warning,
}

impl StatusColor {
    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Success => "#00C853",
            StatusColor::Info => "#2196F3",
            StatusColor::Error => "#FF5252",
            StatusColor::Warning => "#FF9800",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIcon {
    Check,
    Shipping,
    Cancel,
    Pending,
}

pub fn status_label(status: &ParcelStatus) -> &str {
    match status {
        ParcelStatus::Pending => "Pending Pickup",
        ParcelStatus::InTransit => "In Transit",
        ParcelStatus::Delivered => "Delivered",
        ParcelStatus::Cancelled => "Cancelled",
        ParcelStatus::Other(raw) => raw,
    }
}

/// Short label used by the admin status picker and the dashboard stat cards.
pub fn status_option_label(status: &ParcelStatus) -> &str {
    match status {
        ParcelStatus::Pending => "Pending",
        other => status_label(other),
    }
}

pub fn status_color(status: &ParcelStatus) -> StatusColor {
    match status {
        ParcelStatus::Delivered => StatusColor::Success,
        ParcelStatus::InTransit => StatusColor::Info,
        ParcelStatus::Cancelled => StatusColor::Error,
        _ => StatusColor::Warning,
    }
}

pub fn status_icon(status: &ParcelStatus) -> StatusIcon {
    match status {
        ParcelStatus::Delivered => StatusIcon::Check,
        ParcelStatus::InTransit => StatusIcon::Shipping,
        ParcelStatus::Cancelled => StatusIcon::Cancel,
        _ => StatusIcon::Pending,
    }
}

/// Position within [`PROGRESS_STEPS`], or [`OFF_PATH`].
pub fn status_progress_index(status: &ParcelStatus) -> i32 {
    PROGRESS_STEPS
        .iter()
        .position(|step| step == status)
        .map_or(OFF_PATH, |index| index as i32)
}

/// Progress as a percentage in `0.0..=100.0`.
pub fn progress_percent(status: &ParcelStatus) -> f64 {
    let index = status_progress_index(status);
    if index < 0 {
        return 0.0;
    }

    (f64::from(index + 1) / PROGRESS_STEPS.len() as f64) * 100.0
}

pub fn can_user_cancel(status: &ParcelStatus) -> bool {
    *status == ParcelStatus::Pending
}

pub fn can_user_modify(status: &ParcelStatus) -> bool {
    !matches!(status, ParcelStatus::Delivered | ParcelStatus::Cancelled)
}

pub fn can_admin_override(_status: &ParcelStatus) -> bool {
    true
}
