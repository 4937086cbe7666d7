use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Timestamp representations that can appear in stored records or request
/// payloads. Rows imported from the previous system wrote whatever shape the
/// old driver produced, so every reader funnels through [`coerce_dt`] instead
/// of assuming one format.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// Native timezone-aware datetime.
    DateTime(DateTime<Utc>),
    /// Store-native timestamp object (seconds + nanos since the epoch).
    Store { seconds: i64, nanos: u32 },
    /// Epoch seconds, integral or fractional.
    Epoch(f64),
    /// ISO-8601 / RFC 3339 text, a naive datetime, or bare epoch digits.
    Text(String),
}

/// Coerce a [`TimeValue`] into a UTC datetime. Returns `None` for anything
/// unrecognizable; callers skip such values rather than erroring.
pub fn coerce_dt(value: &TimeValue) -> Option<DateTime<Utc>> {
    match value {
        TimeValue::DateTime(dt) => Some(*dt),
        TimeValue::Store { seconds, nanos } => DateTime::from_timestamp(*seconds, *nanos),
        TimeValue::Epoch(secs) => {
            if !secs.is_finite() {
                return None;
            }
            let whole = secs.trunc() as i64;
            let nanos = (secs.fract().abs() * 1e9) as u32;
            DateTime::from_timestamp(whole, nanos)
        }
        TimeValue::Text(s) => coerce_str(s),
    }
}

/// Coerce raw timestamp text. Handles RFC 3339, ISO-8601 with or without an
/// offset (naive values are assumed UTC), and bare epoch digits.
pub fn coerce_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    // Legacy rows hold epoch seconds written as numbers.
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Ok(secs) = s.parse::<f64>() {
        return coerce_dt(&TimeValue::Epoch(secs));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn coerces_native_datetime() {
        assert_eq!(coerce_dt(&TimeValue::DateTime(instant())), Some(instant()));
    }

    #[test]
    fn coerces_store_timestamp() {
        let value = TimeValue::Store {
            seconds: instant().timestamp(),
            nanos: 0,
        };
        assert_eq!(coerce_dt(&value), Some(instant()));
    }

    #[test]
    fn coerces_epoch_seconds() {
        let value = TimeValue::Epoch(instant().timestamp() as f64);
        assert_eq!(coerce_dt(&value), Some(instant()));
    }

    #[test]
    fn coerces_rfc3339_text() {
        assert_eq!(coerce_str("2024-03-15T10:30:00+00:00"), Some(instant()));
        assert_eq!(coerce_str("2024-03-15T16:00:00+05:30"), Some(instant()));
    }

    #[test]
    fn naive_text_is_assumed_utc() {
        assert_eq!(coerce_str("2024-03-15 10:30:00"), Some(instant()));
        assert_eq!(coerce_str("2024-03-15T10:30:00"), Some(instant()));
    }

    #[test]
    fn coerces_epoch_digits_in_text() {
        let raw = instant().timestamp().to_string();
        assert_eq!(coerce_str(&raw), Some(instant()));
    }

    #[test]
    fn every_supported_form_agrees() {
        let forms = [
            TimeValue::DateTime(instant()),
            TimeValue::Store {
                seconds: instant().timestamp(),
                nanos: 0,
            },
            TimeValue::Epoch(instant().timestamp() as f64),
            TimeValue::Text(instant().to_rfc3339()),
        ];
        for form in &forms {
            assert_eq!(coerce_dt(form), Some(instant()));
        }
    }

    #[test]
    fn coercion_is_idempotent() {
        let once = coerce_str("2024-03-15 10:30:00").unwrap();
        let again = coerce_dt(&TimeValue::DateTime(once)).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn garbage_coerces_to_none() {
        assert_eq!(coerce_str(""), None);
        assert_eq!(coerce_str("soon"), None);
        assert_eq!(coerce_str("15/03/2024"), None);
        assert_eq!(coerce_dt(&TimeValue::Epoch(f64::NAN)), None);
    }
}
