use chrono::{DateTime, Days, NaiveDate, Utc};

/// Inclusive window of UTC calendar dates `[today - days, today]`.
///
/// `days == 0` admits only items created on the current UTC date. This is a
/// calendar check, not a rolling 24 hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    days: u32,
}

impl Timeframe {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn is_today_only(&self) -> bool {
        self.days == 0
    }

    /// Evaluates against the UTC date at call time.
    pub fn contains(&self, created_utc: f64) -> bool {
        self.contains_at(created_utc, Utc::now())
    }

    pub fn contains_at(&self, created_utc: f64, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        let Some(created) = utc_date(created_utc) else {
            return false;
        };
        let start = today
            .checked_sub_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MIN);
        start <= created && created <= today
    }

    /// Human label used in log lines and the digest subject.
    pub fn label(&self) -> String {
        if self.is_today_only() {
            "Today".to_string()
        } else {
            format!("Past {} Days", self.days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn ts(dt: DateTime<Utc>) -> f64 {
        dt.timestamp() as f64
    }

    #[test]
    fn test_today_only_excludes_yesterday_late_evening() {
        let now = at(2024, 3, 15, 0, 0, 30);
        let tf = Timeframe::new(0);

        assert!(!tf.contains_at(ts(at(2024, 3, 14, 23, 59, 0)), now));
        assert!(tf.contains_at(ts(at(2024, 3, 15, 0, 0, 0)), now));
    }

    #[test]
    fn test_today_only_holds_late_in_the_day() {
        let now = at(2024, 3, 15, 23, 59, 59);
        let tf = Timeframe::new(0);

        assert!(!tf.contains_at(ts(at(2024, 3, 14, 23, 59, 0)), now));
        assert!(tf.contains_at(ts(at(2024, 3, 15, 0, 0, 0)), now));
        assert!(tf.contains_at(ts(at(2024, 3, 15, 12, 0, 0)), now));
    }

    #[test]
    fn test_multi_day_boundaries_are_calendar_days() {
        let now = at(2024, 3, 15, 9, 0, 0);
        let tf = Timeframe::new(7);

        assert!(tf.contains_at(ts(at(2024, 3, 8, 0, 0, 0)), now));
        assert!(tf.contains_at(ts(at(2024, 3, 8, 23, 59, 59)), now));
        assert!(!tf.contains_at(ts(at(2024, 3, 7, 23, 59, 59)), now));
    }

    #[test]
    fn test_future_dates_are_excluded() {
        let now = at(2024, 3, 15, 9, 0, 0);
        let tomorrow = now + Duration::days(1);

        assert!(!Timeframe::new(30).contains_at(ts(tomorrow), now));
    }

    #[test]
    fn test_fractional_timestamps() {
        let now = at(2024, 3, 15, 9, 0, 0);
        let midnight = ts(at(2024, 3, 15, 0, 0, 0));

        assert!(Timeframe::new(0).contains_at(midnight + 0.5, now));
        assert!(!Timeframe::new(0).contains_at(midnight - 0.5, now));
        assert!(!Timeframe::new(0).contains_at(f64::NAN, now));
    }

    #[test]
    fn test_current_time_is_always_within_window() {
        let now = Utc::now();
        assert!(Timeframe::new(0).contains(ts(now)));
        assert!(Timeframe::new(3).contains(ts(now)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Timeframe::new(0).label(), "Today");
        assert_eq!(Timeframe::new(7).label(), "Past 7 Days");
    }
}
