//! Repository age calculation

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Fractional years between an ISO-8601 creation timestamp and `now`,
/// rounded to 3 decimals. A missing or unparseable timestamp yields `None`.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "acceptable for age statistics")]
pub fn age_years(created_at: Option<&str>, now: DateTime<Utc>) -> Option<f64> {
    let created = DateTime::parse_from_rfc3339(created_at?).ok()?.with_timezone(&Utc);
    let days = (now - created).num_seconds() as f64 / SECONDS_PER_DAY;
    Some((days / DAYS_PER_YEAR * 1000.0).round() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z").unwrap().to_utc()
    }

    #[test]
    fn test_age_exact_days() {
        let created = now() - Duration::days(100);
        let age = age_years(Some(&created.to_rfc3339()), now()).unwrap();
        // 100 / 365.25 = 0.27378..., rounded to 3 decimals
        assert!((age - 0.274).abs() < f64::EPSILON);
    }

    #[test]
    fn test_age_one_julian_year() {
        let created = now() - Duration::hours(365 * 24 + 6);
        let age = age_years(Some(&created.to_rfc3339()), now()).unwrap();
        assert!((age - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_age_zero() {
        let age = age_years(Some(&now().to_rfc3339()), now()).unwrap();
        assert!(age.abs() < f64::EPSILON);
    }

    #[test]
    fn test_age_null_input() {
        assert!(age_years(None, now()).is_none());
    }

    #[test]
    fn test_age_unparseable_input() {
        assert!(age_years(Some("yesterday-ish"), now()).is_none());
    }

    #[test]
    fn test_age_rounding() {
        let created = now() - Duration::days(1);
        let age = age_years(Some(&created.to_rfc3339()), now()).unwrap();
        // 1 / 365.25 = 0.0027378... -> 0.003
        assert!((age - 0.003).abs() < f64::EPSILON);
    }
}
