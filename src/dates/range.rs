//! Inclusive symmetric and directional date ranges.

use chrono::{NaiveDate, TimeDelta};

use crate::error::DateRangeError;

fn shift(base: NaiveDate, days: i64) -> Result<NaiveDate, DateRangeError> {
    TimeDelta::try_days(days)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or(DateRangeError::OutOfRange(base))
}

/// Returns the `2 × flex + 1` consecutive dates centred on `base`.
///
/// # Errors
///
/// Fails with [`DateRangeError::NonPositiveFlex`] when `flex <= 0`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use whatif_optim::dates::date_range;
///
/// let base = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let days = date_range(base, 1).unwrap();
/// assert_eq!(days.len(), 3);
/// assert_eq!(days[1], base);
/// ```
pub fn date_range(base: NaiveDate, flex: i64) -> Result<Vec<NaiveDate>, DateRangeError> {
    if flex <= 0 {
        return Err(DateRangeError::NonPositiveFlex(flex));
    }
    (-flex..=flex).map(|offset| shift(base, offset)).collect()
}

/// Returns ascending dates from `base` spanning `days` in one direction.
///
/// For `days >= 0` the range runs forward from `base` (`days + 1` dates);
/// for negative `days` it runs backward and ends at `base`
/// (`|days| + 1` dates).
pub fn create_date_range(base: NaiveDate, days: i64) -> Result<Vec<NaiveDate>, DateRangeError> {
    let span = days.checked_abs().ok_or(DateRangeError::OutOfRange(base))?;
    let start = if days >= 0 { base } else { shift(base, days)? };
    (0..=span).map(|offset| shift(start, offset)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_rejects_non_positive_flex() {
        let base = ymd(2024, 1, 1);
        assert_eq!(date_range(base, 0), Err(DateRangeError::NonPositiveFlex(0)));
        assert_eq!(date_range(base, -2), Err(DateRangeError::NonPositiveFlex(-2)));
    }

    #[test]
    fn test_date_range_crosses_month() {
        let days = date_range(ymd(2024, 3, 1), 2).unwrap();
        assert_eq!(
            days,
            vec![
                ymd(2024, 2, 28),
                ymd(2024, 2, 29),
                ymd(2024, 3, 1),
                ymd(2024, 3, 2),
                ymd(2024, 3, 3),
            ]
        );
    }

    #[test]
    fn test_create_date_range_forward() {
        let days = create_date_range(ymd(2024, 1, 1), 2).unwrap();
        assert_eq!(days, vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
    }

    #[test]
    fn test_create_date_range_backward_ends_at_base() {
        let days = create_date_range(ymd(2024, 1, 1), -2).unwrap();
        assert_eq!(
            days,
            vec![ymd(2023, 12, 30), ymd(2023, 12, 31), ymd(2024, 1, 1)]
        );
    }

    #[test]
    fn test_create_date_range_zero() {
        let base = ymd(2024, 6, 15);
        assert_eq!(create_date_range(base, 0).unwrap(), vec![base]);
    }

    proptest! {
        #[test]
        fn prop_date_range_symmetric(offset in 0i64..20_000, flex in 1i64..60) {
            let base = ymd(1990, 1, 1) + TimeDelta::days(offset);
            let days = date_range(base, flex).unwrap();
            prop_assert_eq!(days.len() as i64, 2 * flex + 1);
            prop_assert_eq!(days[flex as usize], base);
            for pair in days.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], TimeDelta::days(1));
            }
        }

        #[test]
        fn prop_create_date_range_length(offset in 0i64..20_000, days in -60i64..60) {
            let base = ymd(1990, 1, 1) + TimeDelta::days(offset);
            let range = create_date_range(base, days).unwrap();
            prop_assert_eq!(range.len() as i64, days.abs() + 1);
            if days >= 0 {
                prop_assert_eq!(range.first(), Some(&base));
            } else {
                prop_assert_eq!(range.last(), Some(&base));
            }
        }
    }
}
