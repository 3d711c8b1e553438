//! Expiry classification for scanned products.
//!
//! Given a token's optional `expiryDate` and the current instant, decide which
//! banner the scan view shows and how many days remain.
//!
//! Boundaries: an expiry exactly at `now` is not yet expired, and an expiry
//! exactly at the end of the window still counts as expiring soon.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::warn;

use crate::config::Config;

/// Default length of the "expiring soon" window in days.
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Display state of a product's expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryState {
    /// No expiry date, or one that could not be parsed.
    NoExpiry,
    /// The expiry instant is strictly before now.
    Expired,
    /// The expiry is now or within the window.
    ExpiringSoon,
    /// The expiry is beyond the window.
    Valid,
}

impl fmt::Display for ExpiryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoExpiry => write!(f, "no_expiry"),
            Self::Expired => write!(f, "expired"),
            Self::ExpiringSoon => write!(f, "expiring_soon"),
            Self::Valid => write!(f, "valid"),
        }
    }
}

/// Result of classifying an expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpiryStatus {
    /// The display state.
    pub state: ExpiryState,
    /// Days until expiry, rounded up. Negative once expired; `None` without a date.
    pub days_until_expiry: Option<i64>,
}

impl ExpiryStatus {
    const NONE: Self = Self {
        state: ExpiryState::NoExpiry,
        days_until_expiry: None,
    };

    /// Short banner title, if a banner should be shown.
    #[must_use]
    pub fn headline(&self) -> Option<&'static str> {
        match self.state {
            ExpiryState::NoExpiry => None,
            ExpiryState::Expired => Some("Product expired"),
            ExpiryState::ExpiringSoon => Some("Expiring soon"),
            ExpiryState::Valid => Some("Product in date"),
        }
    }

    /// Banner body text, if a banner should be shown.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self.state {
            ExpiryState::NoExpiry => None,
            ExpiryState::Expired => {
                Some("This product has passed its expiration date.".to_string())
            }
            ExpiryState::ExpiringSoon => {
                let days = self.days_until_expiry.unwrap_or_default();
                let unit = if days == 1 { "day" } else { "days" };
                Some(format!("This product will expire in {days} {unit}."))
            }
            ExpiryState::Valid => Some("This product is within its expiry period.".to_string()),
        }
    }
}

/// Classifies expiry dates against a configurable "expiring soon" window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryClassifier {
    window: Duration,
}

impl ExpiryClassifier {
    /// Create a classifier with a window of `expiring_soon_days` days.
    #[must_use]
    pub fn new(expiring_soon_days: u32) -> Self {
        Self {
            window: Duration::days(i64::from(expiring_soon_days)),
        }
    }

    /// Create a classifier with the configured window.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.expiry.expiring_soon_days)
    }

    /// Classify `expiry_date` as seen at `now`.
    ///
    /// An unparsable date is logged and treated as absent.
    #[must_use]
    pub fn classify(&self, expiry_date: Option<&str>, now: DateTime<Utc>) -> ExpiryStatus {
        let Some(raw) = expiry_date else {
            return ExpiryStatus::NONE;
        };
        let Some(expiry) = parse_timestamp(raw) else {
            warn!(expiry_date = %raw, "Unparsable expiry date, treating as absent");
            return ExpiryStatus::NONE;
        };

        let state = if expiry < now {
            ExpiryState::Expired
        } else if expiry - now <= self.window {
            ExpiryState::ExpiringSoon
        } else {
            ExpiryState::Valid
        };

        ExpiryStatus {
            state,
            days_until_expiry: Some(days_until(expiry, now)),
        }
    }

    /// Classify `expiry_date` against the current time.
    #[must_use]
    pub fn classify_now(&self, expiry_date: Option<&str>) -> ExpiryStatus {
        self.classify(expiry_date, Utc::now())
    }
}

impl Default for ExpiryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRING_SOON_DAYS)
    }
}

/// Classify with the default 30-day window.
#[must_use]
pub fn classify_expiry(expiry_date: Option<&str>, now: DateTime<Utc>) -> ExpiryStatus {
    ExpiryClassifier::default().classify(expiry_date, now)
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC), or a
/// bare date (midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Whole days from `now` until `expiry`, rounded up.
#[must_use]
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative deltas.
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Format an optional ISO-8601 date for display, e.g. "April 17, 2023".
#[must_use]
pub fn display_date(raw: Option<&str>) -> String {
    match raw {
        None => "Not available".to_string(),
        Some(raw) => parse_timestamp(raw).map_or_else(
            || "Invalid date".to_string(),
            |dt| dt.format("%B %-d, %Y").to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn iso(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn classify_at(offset: Duration) -> ExpiryStatus {
        classify_expiry(Some(iso(now() + offset).as_str()), now())
    }

    #[test]
    fn test_no_expiry_date() {
        let status = classify_expiry(None, now());
        assert_eq!(status.state, ExpiryState::NoExpiry);
        assert_eq!(status.days_until_expiry, None);
        assert!(status.headline().is_none());
    }

    #[test]
    fn test_expired_yesterday() {
        let status = classify_at(Duration::days(-1));
        assert_eq!(status.state, ExpiryState::Expired);
        assert_eq!(status.days_until_expiry, Some(-1));
    }

    #[test]
    fn test_expiring_in_fifteen_days() {
        let status = classify_at(Duration::days(15));
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
        assert_eq!(status.days_until_expiry, Some(15));
    }

    #[test]
    fn test_valid_in_forty_five_days() {
        let status = classify_at(Duration::days(45));
        assert_eq!(status.state, ExpiryState::Valid);
        assert_eq!(status.days_until_expiry, Some(45));
    }

    #[test]
    fn test_exactly_now_is_not_expired() {
        let status = classify_at(Duration::zero());
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
        assert_eq!(status.days_until_expiry, Some(0));
    }

    #[test]
    fn test_one_second_ago_is_expired() {
        let status = classify_at(Duration::seconds(-1));
        assert_eq!(status.state, ExpiryState::Expired);
        assert_eq!(status.days_until_expiry, Some(0));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let status = classify_at(Duration::days(30));
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
        assert_eq!(status.days_until_expiry, Some(30));

        let status = classify_at(Duration::days(30) + Duration::seconds(1));
        assert_eq!(status.state, ExpiryState::Valid);
        assert_eq!(status.days_until_expiry, Some(31));
    }

    #[test]
    fn test_day_count_rounds_up() {
        let status = classify_at(Duration::hours(1));
        assert_eq!(status.days_until_expiry, Some(1));

        let status = classify_at(Duration::hours(-36));
        assert_eq!(status.days_until_expiry, Some(-1));
    }

    #[test]
    fn test_unparsable_date_is_no_expiry() {
        let status = classify_expiry(Some("next tuesday"), now());
        assert_eq!(status, ExpiryStatus::NONE);
    }

    #[test]
    fn test_custom_window() {
        let classifier = ExpiryClassifier::new(7);
        let expiry = iso(now() + Duration::days(10));
        assert_eq!(
            classifier.classify(Some(expiry.as_str()), now()).state,
            ExpiryState::Valid
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.expiry.expiring_soon_days = 60;
        let classifier = ExpiryClassifier::from_config(&config);

        let expiry = iso(now() + Duration::days(45));
        assert_eq!(
            classifier.classify(Some(expiry.as_str()), now()).state,
            ExpiryState::ExpiringSoon
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 4, 17, 14, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2023-04-17T14:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2023-04-17T14:30:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2023-04-17T16:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-04-17T14:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2023-04-17"),
            Some(Utc.with_ymd_and_hms(2023, 4, 17, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("17/04/2023"), None);
    }

    #[test]
    fn test_headlines_and_details() {
        let expired = classify_at(Duration::days(-3));
        assert_eq!(expired.headline(), Some("Product expired"));

        let soon = classify_at(Duration::days(1));
        assert_eq!(soon.headline(), Some("Expiring soon"));
        assert_eq!(
            soon.detail().as_deref(),
            Some("This product will expire in 1 day.")
        );

        let soon = classify_at(Duration::days(12));
        assert_eq!(
            soon.detail().as_deref(),
            Some("This product will expire in 12 days.")
        );

        let valid = classify_at(Duration::days(400));
        assert_eq!(valid.headline(), Some("Product in date"));
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(None), "Not available");
        assert_eq!(display_date(Some("garbage")), "Invalid date");
        assert_eq!(display_date(Some("2023-04-17T14:30:00Z")), "April 17, 2023");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ExpiryState::ExpiringSoon.to_string(), "expiring_soon");
        assert_eq!(ExpiryState::NoExpiry.to_string(), "no_expiry");
    }
}
