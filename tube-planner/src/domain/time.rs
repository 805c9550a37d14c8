//! Minute-of-day time handling.
//!
//! Timetable events are stored as minutes past midnight, as real numbers.
//! Services that run past midnight keep counting upwards (a 00:30 arrival
//! on an overnight train is minute 1470), so clock strings produced here
//! are never wrapped to 24 hours.

use chrono::Duration;

/// Error returned when decoding an invalid clock string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Largest encodable offset. Anything above is clamped.
const MAX_ENCODED_SECONDS: f64 = i32::MAX as f64;

/// Convert minutes past midnight to an "HH:MM:SS" clock string.
///
/// The value is rounded to the nearest whole second. Hours are not wrapped,
/// so minute 1500 encodes as "25:00:00". Negative and NaN inputs encode as
/// midnight.
///
/// # Examples
///
/// ```
/// use tube_planner::domain::encode;
///
/// assert_eq!(encode(540.0), "09:00:00");
/// assert_eq!(encode(549.5), "09:09:30");
/// assert_eq!(encode(1500.25), "25:00:15");
/// ```
pub fn encode(minutes: f64) -> String {
    let seconds = (minutes.max(0.0) * 60.0)
        .round()
        .min(MAX_ENCODED_SECONDS) as i64;
    let offset = Duration::seconds(seconds);

    format!(
        "{:02}:{:02}:{:02}",
        offset.num_hours(),
        offset.num_minutes() % 60,
        offset.num_seconds() % 60
    )
}

/// Parse an "HH:MM" or "HH:MM:SS" clock string into minutes past midnight.
///
/// Hours may exceed 23 to express next-day times; minutes and seconds must
/// be two digits in the range 0-59.
///
/// # Examples
///
/// ```
/// use tube_planner::domain::decode;
///
/// assert_eq!(decode("09:00").unwrap(), 540.0);
/// assert_eq!(decode("09:09:30").unwrap(), 549.5);
/// assert_eq!(decode("25:00").unwrap(), 1500.0);
///
/// assert!(decode("9").is_err());
/// assert!(decode("09:60").is_err());
/// ```
pub fn decode(s: &str) -> Result<f64, TimeError> {
    let mut parts = s.split(':');

    let hours = parts
        .next()
        .filter(|h| !h.is_empty() && h.len() <= 3 && h.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|h| h.parse::<i64>().ok())
        .ok_or_else(|| TimeError::new("invalid hour digits"))?;

    let minutes = parts
        .next()
        .ok_or_else(|| TimeError::new("expected HH:MM or HH:MM:SS format"))
        .and_then(|m| parse_sexagesimal(m, "minute must be two digits 00-59"))?;

    let seconds = match parts.next() {
        Some(sec) => parse_sexagesimal(sec, "second must be two digits 00-59")?,
        None => 0,
    };

    if parts.next().is_some() {
        return Err(TimeError::new("expected HH:MM or HH:MM:SS format"));
    }

    let offset = Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds);
    Ok(offset.num_seconds() as f64 / 60.0)
}

/// Parse a two-digit minute or second field.
fn parse_sexagesimal(field: &str, reason: &'static str) -> Result<i64, TimeError> {
    let bytes = field.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(TimeError::new(reason));
    }
    let value = i64::from(bytes[0] - b'0') * 10 + i64::from(bytes[1] - b'0');
    if value > 59 {
        return Err(TimeError::new(reason));
    }
    Ok(value)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Encoding then decoding recovers the value rounded to the second
        #[test]
        fn decode_inverts_encode(minutes in 0.0f64..5000.0) {
            let decoded = decode(&encode(minutes)).unwrap();
            let expected = (minutes * 60.0).round() / 60.0;
            prop_assert!((decoded - expected).abs() < 1e-9);
        }

        /// Whole-second values survive the round trip exactly
        #[test]
        fn whole_seconds_roundtrip(hour in 0i64..48, minute in 0i64..60, second in 0i64..60) {
            let s = format!("{:02}:{:02}:{:02}", hour, minute, second);
            let minutes = decode(&s).unwrap();
            prop_assert_eq!(encode(minutes), s);
        }

        /// Encoding is monotonic in its input
        #[test]
        fn encode_monotonic(a in 0.0f64..3000.0, b in 0.0f64..3000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_secs = decode(&encode(lo)).unwrap();
            let hi_secs = decode(&encode(hi)).unwrap();
            prop_assert!(lo_secs <= hi_secs);
        }
    }
}
