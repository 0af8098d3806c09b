use serde::Serialize;

use crate::lifecycle;
use crate::models::parcel::Parcel;
use crate::views::format;
use crate::views::StatusBadge;

const DEFAULT_LOCATION: &str = "Pickup location";

#[derive(Debug, Clone, Serialize)]
pub struct ParcelListView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub empty: bool,
    pub rows: Vec<ParcelRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParcelRow {
    pub id: u64,
    pub reference: String,
    pub route_from: String,
    pub route_to: String,
    /// Full address, used to prefill the destination editor.
    pub destination_address: String,
    pub weight_category: String,
    pub amount: String,
    pub status: StatusBadge,
    pub location: String,
    pub actions: RowActions,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RowActions {
    pub view: bool,
    pub edit_destination: bool,
    pub cancel: bool,
}

impl ParcelListView {
    pub fn build(parcels: &[Parcel]) -> Self {
        Self {
            title: "My Parcels",
            subtitle: "Manage your parcel deliveries",
            empty: parcels.is_empty(),
            rows: parcels.iter().map(ParcelRow::build).collect(),
        }
    }
}

impl ParcelRow {
    fn build(parcel: &Parcel) -> Self {
        Self {
            id: parcel.id,
            reference: format::parcel_ref(parcel.id),
            route_from: format::short_address(&parcel.pickup_address),
            route_to: format::short_address(&parcel.destination_address),
            destination_address: parcel.destination_address.clone(),
            weight_category: parcel.weight_category.clone(),
            amount: format::money(parcel.quote_amount),
            status: StatusBadge::for_status(&parcel.status),
            location: parcel
                .present_location
                .clone()
                .filter(|location| !location.is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            actions: RowActions {
                view: true,
                edit_destination: lifecycle::can_user_modify(&parcel.status),
                cancel: lifecycle::can_user_cancel(&parcel.status),
            },
        }
    }
}
