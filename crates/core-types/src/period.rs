use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One calendar month, the unit every report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    month: u32,
    year: i32,
}

impl ReportPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidInput(
                "month".to_string(),
                format!("{month} is not between 1 and 12"),
            ));
        }
        // Rejects years chrono cannot represent.
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            CoreError::InvalidInput("year".to_string(), format!("{year} is out of range"))
        })?;
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The first day of the month.
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the month, inclusive.
    pub fn end_date(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Formats as `MM/YYYY`, the label used on the document and in the mail subject.
impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_the_whole_month() {
        let period = ReportPeriod::new(9, 2024).unwrap();
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());
        assert_eq!(period.to_string(), "09/2024");
    }

    #[test]
    fn handles_leap_february_and_december() {
        let leap = ReportPeriod::new(2, 2024).unwrap();
        assert_eq!(leap.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        let common = ReportPeriod::new(2, 2023).unwrap();
        assert_eq!(common.end_date(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        let december = ReportPeriod::new(12, 2024).unwrap();
        assert_eq!(december.end_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(ReportPeriod::new(0, 2024).is_err());
        assert!(ReportPeriod::new(13, 2024).is_err());
    }
}
