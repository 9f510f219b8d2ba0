//! One-minute UTC sampling of a calendar day.
use hifitime::{Duration, Unit};

use crate::constants::MINUTES_PER_DAY;
use crate::penumbra_errors::PenumbraError;
use crate::time::{CalendarDate, TimeInstant};

/// Ordered instants covering `[date 00:00, date+1 00:00)` UTC at one-minute steps.
///
/// Always holds [`MINUTES_PER_DAY`] strictly increasing instants, the first at
/// midnight and the last at 23:59.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    date: CalendarDate,
    instants: Vec<TimeInstant>,
}

impl TimeGrid {
    /// Build the grid for a validated calendar date.
    ///
    /// Arguments
    /// -----------------
    /// * `date`: the UTC day to sample.
    ///
    /// Return
    /// ----------
    /// * The 1440-instant grid, or [`PenumbraError::InvalidDate`] if the date
    ///   cannot be represented.
    pub fn build(date: CalendarDate) -> Result<Self, PenumbraError> {
        let start = date.midnight()?;
        let step: Duration = Unit::Minute * 1_i64;

        let instants = (0..MINUTES_PER_DAY as i64)
            .map(|minute| TimeInstant::new(start + step * minute))
            .collect();

        Ok(TimeGrid { date, instants })
    }

    /// Parse a `YYYY-MM-DD` string and build its grid.
    pub fn from_date_str(date: &str) -> Result<Self, PenumbraError> {
        TimeGrid::build(CalendarDate::parse(date)?)
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn instants(&self) -> &[TimeInstant] {
        &self.instants
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimeInstant> {
        self.instants.get(index)
    }

    pub fn first(&self) -> Option<&TimeInstant> {
        self.instants.first()
    }

    pub fn last(&self) -> Option<&TimeInstant> {
        self.instants.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeInstant> {
        self.instants.iter()
    }
}

impl<'a> IntoIterator for &'a TimeGrid {
    type Item = &'a TimeInstant;
    type IntoIter = std::slice::Iter<'a, TimeInstant>;

    fn into_iter(self) -> Self::IntoIter {
        self.instants.iter()
    }
}

#[cfg(test)]
mod time_grid_test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_grid_shape() {
        let grid = TimeGrid::from_date_str("2024-04-08").unwrap();
        assert_eq!(grid.len(), MINUTES_PER_DAY);
        assert_eq!(
            grid.first().unwrap().to_iso8601(),
            "2024-04-08T00:00:00+00:00"
        );
        assert_eq!(
            grid.last().unwrap().to_iso8601(),
            "2024-04-08T23:59:00+00:00"
        );
        assert_eq!(grid.get(737).unwrap().to_iso8601(), "2024-04-08T12:17:00+00:00");
    }

    #[test]
    fn test_grid_is_strictly_increasing_by_one_minute() {
        let grid = TimeGrid::from_date_str("2017-08-21").unwrap();
        for (a, b) in grid.iter().tuple_windows() {
            let step = b.epoch() - a.epoch();
            assert_eq!(step, Unit::Minute * 1_i64);
        }
        assert_eq!(grid.iter().unique_by(|t| t.to_iso8601()).count(), 1440);
    }

    #[test]
    fn test_grid_end_of_year_and_leap_day() {
        let grid = TimeGrid::from_date_str("2024-02-29").unwrap();
        assert_eq!(grid.len(), 1440);
        assert_eq!(
            grid.last().unwrap().to_iso8601(),
            "2024-02-29T23:59:00+00:00"
        );

        let grid = TimeGrid::from_date_str("2023-12-31").unwrap();
        assert_eq!(
            grid.last().unwrap().to_iso8601(),
            "2023-12-31T23:59:00+00:00"
        );
    }

    #[test]
    fn test_invalid_date() {
        assert!(matches!(
            TimeGrid::from_date_str("2024-13-01"),
            Err(PenumbraError::InvalidDate(_))
        ));
        assert!(matches!(
            TimeGrid::from_date_str("2023-02-29"),
            Err(PenumbraError::InvalidDate(_))
        ));
    }
}
