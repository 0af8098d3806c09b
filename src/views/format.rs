use chrono::{DateTime, Utc};

/// `#0042`
pub fn parcel_ref(id: u64) -> String {
    format!("#{id:04}")
}

/// Ten-digit tracking number printed on the label.
pub fn tracking_number(id: u64) -> String {
    format!("{id:010}")
}

/// Text shown inside the printed tracking code.
pub fn tracking_code_label(id: u64) -> String {
    format!("TRACKING {id:08}")
}

/// First comma-separated segment of an address, usually the street.
pub fn short_address(address: &str) -> String {
    address
        .split(',')
        .next()
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .unwrap_or(address)
        .to_string()
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn distance(km: f64) -> String {
    format!("{km:.1} km")
}

/// Whole minutes of a backend estimate. Negative or non-finite values are
/// treated as unknown.
pub fn whole_minutes(mins: f64) -> Option<u64> {
    (mins.is_finite() && mins >= 0.0).then(|| mins.trunc() as u64)
}

/// `6h 30m`
pub fn duration(mins: f64) -> Option<String> {
    whole_minutes(mins).map(|mins| format!("{}h {}m", mins / 60, mins % 60))
}

/// `Jan 5, 2026, 02:30 PM`
pub fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// `Monday, January 5, 2026 at 02:30 PM`
pub fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}
