//! Pure calendar math for the rolling date window.

use chrono::{Days, NaiveDate};

/// Tabs materialized at once: the focused day plus [`WINDOW_RADIUS`] days on
/// each side.
pub const WINDOW_LEN: usize = 21;
pub const WINDOW_RADIUS: usize = 10;

/// The strictly consecutive, ascending run of [`WINDOW_LEN`] days with
/// `center` at index [`WINDOW_RADIUS`].
pub fn window_around(center: NaiveDate) -> Vec<NaiveDate> {
    let first = center - Days::new(WINDOW_RADIUS as u64);
    (0..WINDOW_LEN as u64)
        .map(|offset| first + Days::new(offset))
        .collect()
}

/// ISO `YYYY-MM-DD`, the key the backend expects for the `date` parameter.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Tab strip label for a date relative to today.
pub fn tab_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + Days::new(1) {
        "Tomorrow".to_string()
    } else if date + Days::new(1) == today {
        "Yesterday".to_string()
    } else {
        date.format("%a %-d %b").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_is_consecutive_and_centered() {
        let center = day(2024, 6, 15);
        let dates = window_around(center);

        assert_eq!(dates.len(), WINDOW_LEN);
        assert_eq!(dates[WINDOW_RADIUS], center);
        assert_eq!(dates[0], day(2024, 6, 5));
        assert_eq!(dates[WINDOW_LEN - 1], day(2024, 6, 25));
        for pair in dates.windows(2) {
            assert_eq!(pair[0] + Days::new(1), pair[1]);
        }
    }

    #[test]
    fn window_crosses_month_boundaries() {
        let dates = window_around(day(2024, 3, 2));
        assert_eq!(dates[0], day(2024, 2, 21));
        assert_eq!(dates[WINDOW_RADIUS], day(2024, 3, 2));
    }

    #[test]
    fn iso_key() {
        assert_eq!(date_key(day(2024, 6, 5)), "2024-06-05");
    }

    #[test]
    fn labels_relative_to_today() {
        let today = day(2024, 6, 15);
        assert_eq!(tab_label(today, today), "Today");
        assert_eq!(tab_label(day(2024, 6, 16), today), "Tomorrow");
        assert_eq!(tab_label(day(2024, 6, 14), today), "Yesterday");
        assert_eq!(tab_label(day(2024, 6, 3), today), "Mon 3 Jun");
    }
}
