//! Display-ready view models for the three parcel screens. All status
//! treatment goes through [`crate::lifecycle`].

pub mod admin;
pub mod detail;
pub mod format;
pub mod list;

use serde::Serialize;

use crate::lifecycle::{self, ParcelStatus, StatusColor, StatusIcon};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusBadge {
    pub value: String,
    pub label: String,
    pub color: StatusColor,
    pub hex: &'static str,
    pub icon: StatusIcon,
}

impl StatusBadge {
    pub fn for_status(status: &ParcelStatus) -> Self {
        let color = lifecycle::status_color(status);
        Self {
            value: status.to_string(),
            label: lifecycle::status_label(status).to_string(),
            color,
            hex: color.hex(),
            icon: lifecycle::status_icon(status),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

/// Reply to a mutation: the confirmation plus the screen re-fetched after it.
#[derive(Debug, Clone, Serialize)]
pub struct Refreshed<V> {
    pub notice: Notice,
    pub view: V,
}

impl<V> Refreshed<V> {
    pub fn new(message: impl Into<String>, view: V) -> Self {
        Self {
            notice: Notice::success(message),
            view,
        }
    }
}
