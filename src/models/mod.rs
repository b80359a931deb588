//! Database rows and wire DTOs, one module per resource. Wire field names
//! follow the upstream integration contract exactly, hence the mixed casing.

pub mod delivery;
pub mod farmers;
pub mod proof;
pub mod sales;

use chrono::{DateTime, Utc};

/// Timestamp rendering used across responses: second precision, `Z` suffix.
pub fn format_ts(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Placeholder date for "record not found" bodies.
pub const EPOCH_PLACEHOLDER: &str = "1900-01-01T00:00:00";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_render_utc_seconds() {
        let t = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(format_ts(&t), "2026-03-14T09:26:53Z");
    }
}
