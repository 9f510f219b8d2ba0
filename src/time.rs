//! # Time helpers
//!
//! * [`CalendarDate`] – a validated Gregorian UTC date parsed from `YYYY-MM-DD`.
//! * [`TimeInstant`] – a UTC instant of the eclipse time grid, serialised in
//!   ISO-8601 with an explicit `+00:00` offset.
//! * [`gmst`] – Greenwich mean sidereal time from a UT1 MJD.
use std::fmt;

use hifitime::Epoch;
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};
use serde::{Serialize, Serializer};

use crate::constants::{EphemerisTime, DPI, MJD, SIDEREAL_RATE, T2000};
use crate::penumbra_errors::PenumbraError;

/// A calendar day in the Gregorian calendar, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn year(input: &str) -> IResult<&str, i32> {
    map_res(take_while_m_n(4, 4, is_digit), str::parse::<i32>)(input)
}

fn two_digits(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_digit), str::parse::<u8>)(input)
}

fn parse_ymd(input: &str) -> IResult<&str, (i32, u8, u8)> {
    let (input, (year, _, month, _, day)) =
        all_consuming(tuple((year, char('-'), two_digits, char('-'), two_digits)))(input)?;
    Ok((input, (year, month, day)))
}

impl CalendarDate {
    /// Build a date, rejecting days that do not exist in the Gregorian calendar.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, PenumbraError> {
        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
            .map_err(|e| PenumbraError::InvalidDate(format!("{year:04}-{month:02}-{day:02}: {e}")))?;
        Ok(CalendarDate { year, month, day })
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, PenumbraError> {
        let trimmed = input.trim();
        let (_, (year, month, day)) = parse_ymd(trimmed).map_err(|_| {
            PenumbraError::InvalidDate(format!("'{trimmed}' is not formatted as YYYY-MM-DD"))
        })?;
        CalendarDate::new(year, month, day)
    }

    /// Midnight UTC at the start of this day.
    pub fn midnight(&self) -> Result<Epoch, PenumbraError> {
        Epoch::maybe_from_gregorian_utc(self.year, self.month, self.day, 0, 0, 0, 0)
            .map_err(|e| PenumbraError::InvalidDate(format!("{self}: {e}")))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = PenumbraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDate::parse(s)
    }
}

/// One UTC instant of the eclipse time grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeInstant(Epoch);

impl TimeInstant {
    pub fn new(epoch: Epoch) -> Self {
        TimeInstant(epoch)
    }

    pub fn epoch(&self) -> Epoch {
        self.0
    }

    /// Seconds of ephemeris time (TDB) past J2000, the time argument of SPK kernels.
    pub fn et_seconds(&self) -> EphemerisTime {
        self.0.to_et_seconds()
    }

    pub fn mjd_tt(&self) -> MJD {
        self.0.to_mjd_tt_days()
    }

    /// ISO-8601 UTC representation, e.g. `2024-04-08T18:17:00+00:00`.
    pub fn to_iso8601(&self) -> String {
        let (y, mo, d, h, mi, s, _) = self.0.to_gregorian_utc();
        format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}+00:00")
    }
}

impl fmt::Display for TimeInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for TimeInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

/// Greenwich Mean Sidereal Time (IAU 1982), in radians within `[0, 2π)`.
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date in the UT1 scale.
///
/// Return
/// ----------
/// * GMST in radians.
pub fn gmst(tjm: MJD) -> f64 {
    // GMST at 0h UT1, seconds of time
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let day = tjm.floor();
    let t = (day - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;
    let h = (tjm - day) * DPI;

    (gmst0 + h * SIDEREAL_RATE).rem_euclid(DPI)
}
