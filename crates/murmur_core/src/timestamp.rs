//! Time-boundary parsing for history queries

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{MurmurError, Result};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a user-supplied boundary into an instant.
///
/// Offsets are honoured, a trailing `Z` means UTC and timestamps with no
/// offset at all are read as UTC. `field` only feeds the error message.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_instant(value).ok_or_else(|| {
        tracing::debug!(field, value, "rejected timestamp");
        MurmurError::invalid_timestamp(field, value)
    })
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(parsed.and_utc());
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_equivalent_spellings_agree() {
        for input in [
            "2024-05-17T12:00:00Z",
            "2024-05-17T12:00:00.000Z",
            "2024-05-17T12:00:00+00:00",
            "2024-05-17T14:00:00+02:00",
            "2024-05-17T12:00:00.000000+0000",
            "2024-05-17T12:00:00",
            "2024-05-17T12:00:00.000",
            "2024-05-17 12:00:00",
            " 2024-05-17T12:00:00Z ",
        ] {
            assert_eq!(parse_timestamp("before", input).unwrap(), noon(), "{input}");
        }
    }

    #[test]
    fn test_fractional_seconds_are_kept() {
        let parsed = parse_timestamp("after", "2024-05-17T12:00:00.250Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let parsed = parse_timestamp("after", "2024-05-17").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_malformed_input_names_the_field() {
        for input in ["", "yesterday", "2024-13-01T00:00:00Z", "17/05/2024", "2024-05-17T25:00"] {
            let err = parse_timestamp("before", input).unwrap_err();
            assert!(
                matches!(err, MurmurError::InvalidTimestamp { ref field, .. } if field == "before"),
                "{input}: {err}"
            );
        }
    }
}
