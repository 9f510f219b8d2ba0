//! # Eclipse phase detection
//!
//! From a separation series and its time grid, [`detect`] finds:
//!
//! * the **maximum eclipse**, the instant of smallest Sun–Moon separation
//!   (first one on ties);
//! * the **first and last contacts**, the first and last instants where the
//!   separation is at most the sum of the two apparent radii.
//!
//! A day without any sample under the threshold is not an error: both contacts
//! are `None` and the maximum still reports the closest approach.
//!
//! The detector assumes a single Sun–Moon pass per day, so when contacts exist
//! `first_contact <= maximum <= last_contact`.
use hifitime::Duration;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, DEFAULT_MOON_RADIUS_DEG, DEFAULT_SUN_RADIUS_DEG};
use crate::penumbra_errors::PenumbraError;
use crate::time::TimeInstant;

/// Apparent angular radii used for the contact threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactRadii {
    pub sun_radius_deg: Degree,
    pub moon_radius_deg: Degree,
}

impl Default for ContactRadii {
    fn default() -> Self {
        ContactRadii {
            sun_radius_deg: DEFAULT_SUN_RADIUS_DEG,
            moon_radius_deg: DEFAULT_MOON_RADIUS_DEG,
        }
    }
}

impl ContactRadii {
    /// Radii must be finite and positive.
    pub fn new(sun_radius_deg: Degree, moon_radius_deg: Degree) -> Result<Self, PenumbraError> {
        for (name, value) in [("sun", sun_radius_deg), ("moon", moon_radius_deg)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PenumbraError::InvalidInput(format!(
                    "{name} radius must be a positive number of degrees, got {value}"
                )));
            }
        }
        Ok(ContactRadii {
            sun_radius_deg,
            moon_radius_deg,
        })
    }

    /// Separation at which the two disks touch.
    pub fn threshold(&self) -> Degree {
        self.sun_radius_deg + self.moon_radius_deg
    }
}

/// First or last contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContactEvent {
    pub time: TimeInstant,
}

/// Instant of the smallest separation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaximumEclipseEvent {
    pub time: TimeInstant,
    pub separation: Degree,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipsePhases {
    pub first_contact: Option<ContactEvent>,
    pub maximum: MaximumEclipseEvent,
    pub last_contact: Option<ContactEvent>,
}

impl EclipsePhases {
    /// `true` when the disks overlap at some sample.
    pub fn is_eclipse(&self) -> bool {
        self.first_contact.is_some()
    }

    /// Time from first to last contact, `None` without an eclipse.
    pub fn partial_phase_duration(&self) -> Option<Duration> {
        match (self.first_contact, self.last_contact) {
            (Some(first), Some(last)) => Some(last.time.epoch() - first.time.epoch()),
            _ => None,
        }
    }
}

/// Derive the eclipse phases from a separation series.
///
/// Arguments
/// -----------------
/// * `grid`: the sampled instants, in increasing order.
/// * `series`: separation in degrees at each instant of `grid`.
/// * `radii`: apparent radii setting the contact threshold.
///
/// Return
/// ----------
/// * The phases, or [`PenumbraError::InvalidInput`] when the series is empty,
///   contains a non-finite value, or does not match the grid length.
pub fn detect(
    grid: &[TimeInstant],
    series: &[Degree],
    radii: &ContactRadii,
) -> Result<EclipsePhases, PenumbraError> {
    if series.len() != grid.len() {
        return Err(PenumbraError::InvalidInput(format!(
            "separation series has {} samples for {} instants",
            series.len(),
            grid.len()
        )));
    }
    if let Some(index) = series.iter().position(|s| !s.is_finite()) {
        return Err(PenumbraError::InvalidInput(format!(
            "separation at index {index} is not finite"
        )));
    }

    let max_index = series
        .iter()
        .position_min_by(|a, b| a.total_cmp(b))
        .ok_or_else(|| PenumbraError::InvalidInput("empty separation series".into()))?;

    let threshold = radii.threshold();
    let in_contact = |s: &Degree| *s <= threshold;
    let contact_event = |index: usize| ContactEvent { time: grid[index] };

    Ok(EclipsePhases {
        first_contact: series.iter().position(in_contact).map(contact_event),
        maximum: MaximumEclipseEvent {
            time: grid[max_index],
            separation: series[max_index],
        },
        last_contact: series.iter().rposition(in_contact).map(contact_event),
    })
}

#[cfg(test)]
mod phases_test {
    use super::*;
    use hifitime::{Epoch, Unit};
    use proptest::prelude::*;

    fn minute_grid(n: usize) -> Vec<TimeInstant> {
        let start = Epoch::from_gregorian_utc_at_midnight(2024, 4, 8);
        (0..n as i64)
            .map(|i| TimeInstant::new(start + Unit::Minute * i))
            .collect()
    }

    #[test]
    fn test_default_threshold() {
        let radii = ContactRadii::default();
        assert_eq!(radii.threshold(), 0.5332);
        assert!(ContactRadii::new(0.0, 0.27).is_err());
        assert!(ContactRadii::new(0.26, f64::NAN).is_err());
        assert_eq!(ContactRadii::new(0.25, 0.5).unwrap().threshold(), 0.75);
    }

    #[test]
    fn test_eclipse_day() {
        let grid = minute_grid(8);
        let series = [3.0, 1.0, 0.5, 0.1, 0.1, 0.4, 0.6, 2.0];
        let phases = detect(&grid, &series, &ContactRadii::default()).unwrap();

        assert_eq!(phases.first_contact, Some(ContactEvent { time: grid[2] }));
        assert_eq!(phases.last_contact, Some(ContactEvent { time: grid[5] }));
        // first index wins the tie
        assert_eq!(phases.maximum.time, grid[3]);
        assert_eq!(phases.maximum.separation, 0.1);
        assert!(phases.is_eclipse());
        assert_eq!(
            phases.partial_phase_duration(),
            Some(Unit::Minute * 3_i64)
        );
    }

    #[test]
    fn test_no_eclipse() {
        let grid = minute_grid(5);
        let series = [9.0, 7.5, 6.0, 7.0, 8.0];
        let phases = detect(&grid, &series, &ContactRadii::default()).unwrap();

        assert_eq!(phases.first_contact, None);
        assert_eq!(phases.last_contact, None);
        assert_eq!(phases.maximum.time, grid[2]);
        assert_eq!(phases.maximum.separation, 6.0);
        assert_eq!(phases.partial_phase_duration(), None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let grid = minute_grid(3);
        let series = [1.0, 0.5332, 1.0];
        let phases = detect(&grid, &series, &ContactRadii::default()).unwrap();
        assert_eq!(phases.first_contact, phases.last_contact);
        assert_eq!(phases.first_contact.map(|c| c.time), Some(grid[1]));
    }

    #[test]
    fn test_invalid_series() {
        let radii = ContactRadii::default();
        assert!(matches!(
            detect(&[], &[], &radii),
            Err(PenumbraError::InvalidInput(_))
        ));
        assert!(matches!(
            detect(&minute_grid(3), &[1.0, 2.0], &radii),
            Err(PenumbraError::InvalidInput(_))
        ));
        assert!(matches!(
            detect(&minute_grid(2), &[1.0, f64::NAN], &radii),
            Err(PenumbraError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let grid = minute_grid(3);
        let phases = detect(&grid, &[5.0, 4.0, 5.0], &ContactRadii::default()).unwrap();
        let json = serde_json::to_value(phases).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "first_contact": null,
                "maximum": {"time": "2024-04-08T00:01:00+00:00", "separation": 4.0},
                "last_contact": null
            })
        );
    }

    proptest! {
        #[test]
        fn maximum_is_first_minimum(series in prop::collection::vec(0.0..180.0f64, 1..300)) {
            let grid = minute_grid(series.len());
            let phases = detect(&grid, &series, &ContactRadii::default()).unwrap();

            let min = series.iter().cloned().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(phases.maximum.separation, min);
            let first_min = series.iter().position(|s| *s == min).unwrap();
            prop_assert_eq!(phases.maximum.time, grid[first_min]);
        }

        #[test]
        fn contacts_follow_threshold(
            series in prop::collection::vec(0.0..2.0f64, 1..300),
            sun in 0.1..0.4f64,
            moon in 0.1..0.4f64,
        ) {
            let grid = minute_grid(series.len());
            let radii = ContactRadii::new(sun, moon).unwrap();
            let phases = detect(&grid, &series, &radii).unwrap();

            match (phases.first_contact, phases.last_contact) {
                (Some(first), Some(last)) => {
                    prop_assert!(first.time <= last.time);
                    // the closest approach is always inside the contacts
                    prop_assert!(first.time <= phases.maximum.time);
                    prop_assert!(phases.maximum.time <= last.time);
                    prop_assert!(phases.maximum.separation <= radii.threshold());
                }
                (None, None) => {
                    prop_assert!(series.iter().all(|s| *s > radii.threshold()));
                }
                _ => prop_assert!(false, "contacts must come in pairs"),
            }

            // pure function
            prop_assert_eq!(detect(&grid, &series, &radii).unwrap(), phases);
        }
    }
}
