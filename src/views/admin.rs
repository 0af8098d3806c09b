use serde::Serialize;

use crate::lifecycle::{self, ParcelStatus, ADMIN_STATUS_OPTIONS};
use crate::models::parcel::Parcel;
use crate::views::format;
use crate::views::StatusBadge;

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboardView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub stats: Vec<StatCard>,
    pub rows: Vec<AdminRow>,
    pub status_options: Vec<StatusOption>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatCard {
    pub label: String,
    pub value: usize,
    pub hex: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminRow {
    pub id: u64,
    pub reference: String,
    pub user_id: u64,
    pub route_from: String,
    pub route_to: String,
    pub weight_category: String,
    pub amount: String,
    pub status: StatusBadge,
    /// Raw values used to prefill the edit dialog.
    pub present_location: String,
    pub location: String,
    pub created: String,
    pub editable: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusOption {
    pub value: String,
    pub label: String,
}

const TOTAL_HEX: &str = "#0066FF";

impl AdminDashboardView {
    pub fn build(parcels: &[Parcel]) -> Self {
        let count = |status: ParcelStatus| parcels.iter().filter(|p| p.status == status).count();
        let card = |status: ParcelStatus| StatCard {
            label: lifecycle::status_option_label(&status).to_string(),
            hex: lifecycle::status_color(&status).hex(),
            value: count(status),
        };

        let stats = vec![
            StatCard {
                label: "Total Parcels".to_string(),
                value: parcels.len(),
                hex: TOTAL_HEX,
            },
            card(ParcelStatus::Pending),
            card(ParcelStatus::InTransit),
            card(ParcelStatus::Delivered),
        ];

        Self {
            title: "Admin Dashboard",
            subtitle: "Manage all parcel deliveries and track system performance",
            stats,
            rows: parcels.iter().map(AdminRow::build).collect(),
            status_options: ADMIN_STATUS_OPTIONS
                .iter()
                .map(|status| StatusOption {
                    value: status.to_string(),
                    label: lifecycle::status_option_label(status).to_string(),
                })
                .collect(),
        }
    }
}

impl AdminRow {
    fn build(parcel: &Parcel) -> Self {
        let present_location = parcel.present_location.clone().unwrap_or_default();
        let location = if present_location.is_empty() {
            "Not set".to_string()
        } else {
            present_location.clone()
        };

        Self {
            id: parcel.id,
            reference: format::parcel_ref(parcel.id),
            user_id: parcel.user_id,
            route_from: format::short_address(&parcel.pickup_address),
            route_to: format::short_address(&parcel.destination_address),
            weight_category: parcel.weight_category.clone(),
            amount: format::money(parcel.quote_amount),
            status: StatusBadge::for_status(&parcel.status),
            present_location,
            location,
            created: format::short_date(&parcel.created_at),
            editable: lifecycle::can_admin_override(&parcel.status),
        }
    }
}
