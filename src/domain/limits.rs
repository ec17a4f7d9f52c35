use chrono::{Datelike, NaiveDate, Weekday};

pub const DAYS_PER_WEEK: usize = 7;

/// Per-weekday submission caps, indexed Sunday = 0 through Saturday = 6.
///
/// A cap of 0 means the chore cannot be submitted on that weekday at all;
/// there is no unlimited setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayLimits([i64; DAYS_PER_WEEK]);

impl DayLimits {
    pub fn new(limits: [i64; DAYS_PER_WEEK]) -> Self {
        Self(limits)
    }

    pub fn for_weekday(&self, weekday: Weekday) -> i64 {
        self.0[weekday.num_days_from_sunday() as usize]
    }

    pub fn on(&self, date: NaiveDate) -> i64 {
        self.for_weekday(date.weekday())
    }

    /// Compact availability string for chore listings: one letter per weekday
    /// whose cap is above zero, e.g. "SMTWThFS" for an everyday chore.
    pub fn day_abbreviations(&self) -> String {
        const LABELS: [&str; DAYS_PER_WEEK] = ["S", "M", "T", "W", "Th", "F", "S"];

        LABELS
            .iter()
            .zip(self.0.iter())
            .filter(|&(_, &limit)| limit > 0)
            .map(|(label, _)| *label)
            .collect()
    }

    pub fn available_any_day(&self) -> bool {
        self.0.iter().any(|&limit| limit > 0)
    }
}

/// Today's cap for one chore type and how much of it is already spent.
///
/// `used` counts pending and approved submissions for the day; rejected
/// submissions give their slot back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    pub limit: i64,
    pub used: i64,
}

impl Allowance {
    pub fn remaining(&self) -> i64 {
        (self.limit - self.used).max(0)
    }

    pub fn allows(&self, count: i64) -> bool {
        count > 0 && count <= self.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_starts_at_sunday() {
        let limits = DayLimits::new([0, 1, 2, 0, 0, 0, 0]);
        assert_eq!(limits.for_weekday(Weekday::Sun), 0);
        assert_eq!(limits.for_weekday(Weekday::Mon), 1);
        assert_eq!(limits.for_weekday(Weekday::Tue), 2);
        assert_eq!(limits.for_weekday(Weekday::Sat), 0);
    }

    #[test]
    fn limit_follows_the_calendar_date() {
        let limits = DayLimits::new([1, 0, 0, 1, 0, 0, 0]);
        // 2024-06-05 is a Wednesday, 2024-06-04 a Tuesday.
        let wednesday = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert_eq!(limits.on(wednesday), 1);
        assert_eq!(limits.on(tuesday), 0);
    }

    #[test]
    fn day_abbreviations_skip_blocked_days() {
        let limits = DayLimits::new([1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(limits.day_abbreviations(), "STThS");

        let everyday = DayLimits::new([1; DAYS_PER_WEEK]);
        assert_eq!(everyday.day_abbreviations(), "SMTWThFS");

        let never = DayLimits::new([0; DAYS_PER_WEEK]);
        assert_eq!(never.day_abbreviations(), "");
        assert!(!never.available_any_day());
    }

    #[test]
    fn allowance_boundary() {
        let open = Allowance { limit: 2, used: 1 };
        assert_eq!(open.remaining(), 1);
        assert!(open.allows(1));
        assert!(!open.allows(2));

        let spent = Allowance { limit: 2, used: 2 };
        assert_eq!(spent.remaining(), 0);
        assert!(!spent.allows(1));

        // A used count above the cap (cap lowered after submissions) must not
        // go negative.
        let shrunk = Allowance { limit: 1, used: 3 };
        assert_eq!(shrunk.remaining(), 0);
    }

    #[test]
    fn zero_limit_blocks_the_day() {
        let blocked = Allowance { limit: 0, used: 0 };
        assert_eq!(blocked.remaining(), 0);
        assert!(!blocked.allows(1));
    }
}
