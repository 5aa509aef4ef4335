use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, Weekday};

/// Today's date on the workstation clock.
///
/// Observation dates and import end points use local time: the gateway runs
/// on the same machine and stamps daily bars in the exchange session date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local date-time, the end point of history imports.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Next Monday-to-Friday date strictly after `date`. Holidays are not skipped.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date;
    loop {
        match next.checked_add_days(Days::new(1)) {
            Some(d) => next = d,
            None => return date,
        }
        if is_weekday(next) {
            return next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_business_day_skips_weekend() {
        // 2025-03-07 is a Friday
        assert_eq!(next_business_day(day(2025, 3, 7)), day(2025, 3, 10));
        assert_eq!(next_business_day(day(2025, 3, 8)), day(2025, 3, 10));
        assert_eq!(next_business_day(day(2025, 3, 10)), day(2025, 3, 11));
    }

    #[test]
    fn test_is_weekday() {
        assert!(is_weekday(day(2025, 3, 7)));
        assert!(!is_weekday(day(2025, 3, 9)));
    }
}
