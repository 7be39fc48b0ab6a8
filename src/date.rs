use chrono::{Datelike, NaiveDate};

use crate::error::{PipelineError, Result};

/// First day the scraper produced a snapshot.
pub const EARLIEST_DATE: (i32, u32, u32) = (2022, 6, 20);

pub fn earliest_date() -> NaiveDate {
    let (year, month, day) = EARLIEST_DATE;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Decodes `YYYY*10000 + MM*100 + DD`.
pub fn decode_date(value: i64) -> Result<NaiveDate> {
    if !(10_000_101..=99_991_231).contains(&value) {
        return Err(PipelineError::DateDecode { value });
    }

    let year = (value / 10_000) as i32;
    let month = ((value / 100) % 100) as u32;
    let day = (value % 100) as u32;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(PipelineError::DateDecode { value })
}

pub fn encode_date(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// Parses the `YYYY-MM-DD` form a date picker hands back.
pub fn parse_selection(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PipelineError::InvalidDateInput {
            value: value.to_string(),
        }
    })
}

pub fn validate_selection(selected: NaiveDate, latest: NaiveDate) -> Result<NaiveDate> {
    let earliest = earliest_date();
    if selected < earliest || selected > latest {
        return Err(PipelineError::InvalidSelection {
            selected,
            earliest,
            latest,
        });
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_eight_digit_dates() {
        let date = decode_date(20220620).expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 6, 20).unwrap());
    }

    #[test]
    fn rejects_invalid_digit_groups() {
        assert!(matches!(
            decode_date(20220020),
            Err(PipelineError::DateDecode { value: 20220020 })
        ));
        assert!(decode_date(20220631).is_err());
        assert!(decode_date(20221300).is_err());
        assert!(decode_date(2022062).is_err());
        assert!(decode_date(-20220620).is_err());
    }

    #[test]
    fn encode_inverts_decode() {
        for value in [20220620, 20230101, 20231231, 20240229] {
            let date = decode_date(value).expect("valid date");
            assert_eq!(encode_date(date), value);
        }
    }

    #[test]
    fn parses_picker_selection() {
        let date = parse_selection("2022-07-01").expect("iso date");
        assert_eq!(encode_date(date), 20220701);
        assert!(parse_selection("01-07-2022").is_err());
    }

    #[test]
    fn selection_must_fall_inside_known_range() {
        let latest = NaiveDate::from_ymd_opt(2022, 8, 1).unwrap();
        let inside = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
        let before = NaiveDate::from_ymd_opt(2022, 6, 19).unwrap();
        let after = NaiveDate::from_ymd_opt(2022, 8, 2).unwrap();

        assert_eq!(validate_selection(inside, latest).unwrap(), inside);
        assert_eq!(validate_selection(latest, latest).unwrap(), latest);
        assert_eq!(validate_selection(earliest_date(), latest).unwrap(), earliest_date());
        assert!(validate_selection(before, latest).is_err());
        assert!(validate_selection(after, latest).is_err());
    }
}
