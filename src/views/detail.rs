use serde::Serialize;

use crate::lifecycle::{self, ParcelStatus, PROGRESS_STEPS};
use crate::models::parcel::Parcel;
use crate::views::format;
use crate::views::StatusBadge;

#[derive(Debug, Clone, Serialize)]
pub struct ParcelDetailView {
    pub id: u64,
    pub title: String,
    pub status: StatusBadge,
    pub created_on: String,
    /// Absent for cancelled parcels.
    pub progress: Option<ProgressView>,
    pub pickup_address: String,
    pub destination_address: String,
    pub estimated_delivery: String,
    pub route: RouteView,
    pub payment: PaymentView,
    pub package: PackageView,
    pub tracking: TrackingView,
    pub actions: DetailActions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub percent: f64,
    pub index: i32,
    pub steps: Vec<ProgressStep>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressStep {
    pub number: usize,
    pub status: String,
    pub label: String,
    pub reached: bool,
}

/// Inputs for the map component. Both are absent until the backend has
/// estimated the route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    pub distance: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub amount: String,
    pub state: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageView {
    pub weight_category: String,
    pub distance: String,
    pub current_location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub code_label: String,
    pub number: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DetailActions {
    pub cancel: bool,
}

impl ParcelDetailView {
    pub fn build(parcel: &Parcel) -> Self {
        Self {
            id: parcel.id,
            title: format!("Delivery {}", format::parcel_ref(parcel.id)),
            status: StatusBadge::for_status(&parcel.status),
            created_on: format::long_date(&parcel.created_at),
            progress: ProgressView::build(&parcel.status),
            pickup_address: parcel.pickup_address.clone(),
            destination_address: parcel.destination_address.clone(),
            estimated_delivery: parcel
                .duration_mins
                .and_then(format::whole_minutes)
                .filter(|mins| *mins > 0)
                .map_or_else(|| "Calculating...".to_string(), |mins| format!("{mins} minutes")),
            route: RouteView {
                distance: parcel.distance_km.map(format::distance),
                duration: parcel.duration_mins.and_then(format::duration),
            },
            payment: PaymentView {
                amount: format::money(parcel.quote_amount),
                state: "Paid",
            },
            package: PackageView {
                weight_category: parcel.weight_category.clone(),
                distance: parcel
                    .distance_km
                    .map_or_else(|| "N/A".to_string(), format::distance),
                current_location: parcel
                    .present_location
                    .clone()
                    .filter(|location| !location.is_empty())
                    .unwrap_or_else(|| "Waiting for pickup".to_string()),
            },
            tracking: TrackingView {
                code_label: format::tracking_code_label(parcel.id),
                number: format::tracking_number(parcel.id),
            },
            actions: DetailActions {
                cancel: lifecycle::can_user_cancel(&parcel.status),
            },
        }
    }
}

impl ProgressView {
    fn build(status: &ParcelStatus) -> Option<Self> {
        if *status == ParcelStatus::Cancelled {
            return None;
        }

        let index = lifecycle::status_progress_index(status);
        let steps = PROGRESS_STEPS
            .iter()
            .enumerate()
            .map(|(position, step)| ProgressStep {
                number: position + 1,
                status: step.to_string(),
                label: lifecycle::status_label(step).to_string(),
                reached: index >= 0 && position as i32 <= index,
            })
            .collect();

        Some(Self {
            percent: lifecycle::progress_percent(status),
            index,
            steps,
        })
    }
}
