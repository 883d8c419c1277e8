//! Completion counting inside a period.

use crate::model::period::Period;
use crate::model::schedule::CompletionRecord;

/// Counts records whose completion date lies in `period`.
///
/// Records without a timestamp never count.
pub fn count_completed(records: &[CompletionRecord], period: &Period) -> u32 {
    let count = records
        .iter()
        .filter_map(CompletionRecord::completion_date)
        .filter(|date| period.contains(*date))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::count_completed;
    use crate::model::period::Period;
    use crate::model::schedule::CompletionRecord;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_only_dates_inside_half_open_window() {
        let period = Period::new(date(2024, 3, 4), date(2024, 3, 11)).unwrap();
        let late_evening = date(2024, 3, 10).and_hms_opt(23, 59, 59).unwrap();
        let records = vec![
            CompletionRecord::on(date(2024, 3, 3)),
            CompletionRecord::on(date(2024, 3, 4)),
            CompletionRecord::new(Some(late_evening)),
            CompletionRecord::on(date(2024, 3, 11)),
        ];
        assert_eq!(count_completed(&records, &period), 2);
    }

    #[test]
    fn records_without_timestamp_are_ignored() {
        let period = Period::new(date(2024, 3, 4), date(2024, 3, 11)).unwrap();
        let records = vec![CompletionRecord::new(None), CompletionRecord::on(date(2024, 3, 5))];
        assert_eq!(count_completed(&records, &period), 1);
    }

    #[test]
    fn degenerate_period_counts_nothing() {
        let period = Period::new(date(2024, 3, 4), date(2024, 3, 4)).unwrap();
        let records = vec![CompletionRecord::on(date(2024, 3, 4))];
        assert_eq!(count_completed(&records, &period), 0);
    }
}
