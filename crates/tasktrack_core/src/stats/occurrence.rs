//! Scheduled occurrence counting for weekly recurrence rules.

use crate::model::period::Period;
use crate::model::schedule::RecurrenceRule;

/// Counts `(rule, day)` pairs where `rule` fires on `day` inside `period`.
///
/// Duplicate rules each contribute their own occurrences. Walks every day
/// of the period against every rule.
pub fn count_scheduled(rules: &[RecurrenceRule], period: &Period) -> u32 {
    if rules.is_empty() {
        return 0;
    }

    let mut total: u32 = 0;
    for day in period.days() {
        for rule in rules {
            if rule.fires_on(day) {
                total = total.saturating_add(1);
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::count_scheduled;
    use crate::model::period::Period;
    use crate::model::schedule::{Recurrence, RecurrenceRule};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_rules_count_nothing() {
        let period = Period::new(date(2024, 1, 1), date(2025, 1, 1)).unwrap();
        assert_eq!(count_scheduled(&[], &period), 0);
    }

    #[test]
    fn degenerate_period_counts_nothing() {
        let period = Period::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        let rules = [RecurrenceRule::weekly(Weekday::Mon)];
        assert_eq!(count_scheduled(&rules, &period), 0);
    }

    #[test]
    fn duplicate_rules_count_with_multiplicity() {
        // 2024-01-01 is a Monday.
        let period = Period::new(date(2024, 1, 1), date(2024, 1, 8)).unwrap();
        let rules = [
            RecurrenceRule::weekly(Weekday::Mon),
            RecurrenceRule::weekly(Weekday::Mon),
        ];
        assert_eq!(count_scheduled(&rules, &period), 2);
    }

    #[test]
    fn matches_brute_force_weekday_count_over_odd_windows() {
        let rules = [
            RecurrenceRule::weekly(Weekday::Tue),
            RecurrenceRule::weekly(Weekday::Sat),
            RecurrenceRule::weekly(Weekday::Sat),
        ];
        let start = date(2023, 12, 20);
        for len in 0..45u64 {
            let end = start + chrono::Days::new(len);
            let period = Period::new(start, end).unwrap();
            let expected: u32 = period
                .days()
                .map(|day| {
                    rules
                        .iter()
                        .filter(|rule| {
                            matches!(rule.recurrence, Recurrence::Weekly { day: wd } if wd == day.weekday())
                        })
                        .count() as u32
                })
                .sum();
            assert_eq!(count_scheduled(&rules, &period), expected, "len={len}");
        }
    }

    #[test]
    fn leap_year_starting_on_monday_gains_one_monday() {
        let period = Period::new(date(2024, 1, 1), date(2025, 1, 1)).unwrap();
        // 2024 starts on Monday and has 366 days: 53 Mondays and 53 Tuesdays.
        assert_eq!(
            count_scheduled(&[RecurrenceRule::weekly(Weekday::Mon)], &period),
            53
        );
        assert_eq!(
            count_scheduled(&[RecurrenceRule::weekly(Weekday::Wed)], &period),
            52
        );
    }
}
