//! # Topocentric Sun–Moon geometry
//!
//! [`GeometryEngine`] turns an observer location and a [`TimeGrid`] into the
//! series of Sun–Moon angular separations seen from the site.
//!
//! For each instant:
//! 1. the observer's barycentric state is the Earth state from the provider plus
//!    the site offset rotated into ICRF ([`GeoLocation::icrf_state`]);
//! 2. the Sun and Moon directions are astrometric: the target is taken at
//!    `t − τ`, τ the light time, iterated to convergence;
//! 3. with [`GeometryEngine::with_aberration`], annual and diurnal aberration
//!    are applied to both directions;
//! 4. the separation is `atan2(|a × b|, a · b)`, exact near 0° and 180°.
//!
//! The whole grid is evaluated as one `rayon` batch. Output order always matches
//! the grid order.
use hifitime::ut1::Ut1Provider;
use hifitime::{Duration, Epoch};
use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::debug;

use crate::constants::{
    Degree, EphemerisTime, LIGHT_TIME_ITERATIONS, LIGHT_TIME_TOLERANCE, VLIGHT,
};
use crate::env_state::tai_minus_ut1;
use crate::jpl_ephem::{Body, EphemerisProvider, StateVector};
use crate::observers::GeoLocation;
use crate::penumbra_errors::PenumbraError;
use crate::ref_system::correct_aberration;
use crate::time::TimeInstant;
use crate::time_grid::TimeGrid;

/// Sun–Moon separations in degrees, index-aligned with a [`TimeGrid`].
pub type SeparationSeries = Vec<Degree>;

/// Sun and Moon as seen from the observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopocentricGeometry {
    /// Observer → Sun vector, km.
    pub sun: Vector3<f64>,
    /// Observer → Moon vector, km.
    pub moon: Vector3<f64>,
    /// Angle between the two, degrees.
    pub separation: Degree,
}

/// Great-circle angle between two directions, in degrees within `[0, 180]`.
pub fn angular_separation_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> Degree {
    a.cross(b).norm().atan2(a.dot(b)).to_degrees()
}

pub struct GeometryEngine<'a, P: EphemerisProvider + ?Sized> {
    ephem: &'a P,
    ut1_provider: Option<&'a Ut1Provider>,
    aberration: bool,
}

impl<'a, P: EphemerisProvider + ?Sized> GeometryEngine<'a, P> {
    /// Astrometric engine, UT1 ≈ UTC.
    pub fn new(ephem: &'a P) -> Self {
        GeometryEngine {
            ephem,
            ut1_provider: None,
            aberration: false,
        }
    }

    pub fn with_ut1(mut self, ut1_provider: Option<&'a Ut1Provider>) -> Self {
        self.ut1_provider = ut1_provider;
        self
    }

    pub fn with_aberration(mut self, aberration: bool) -> Self {
        self.aberration = aberration;
        self
    }

    /// Barycentric state of the observer, km and km/s.
    fn observer_state(
        &self,
        location: &GeoLocation,
        epoch: Epoch,
        et_seconds: EphemerisTime,
        ut1_offset: Option<Duration>,
    ) -> Result<StateVector, PenumbraError> {
        let earth = self.ephem.barycentric_state(Body::Earth, et_seconds)?;
        let (site_pos, site_vel) = location.icrf_state(epoch, ut1_offset);
        Ok(earth + StateVector::new(site_pos, site_vel))
    }

    /// Observer → `body` vector corrected for light time (and aberration when
    /// enabled).
    fn apparent_vector(
        &self,
        body: Body,
        observer: &StateVector,
        et_seconds: EphemerisTime,
    ) -> Result<Vector3<f64>, PenumbraError> {
        let mut light_time = 0.0;
        let mut relative = Vector3::zeros();

        for _ in 0..LIGHT_TIME_ITERATIONS {
            let target = self.ephem.barycentric_state(body, et_seconds - light_time)?;
            relative = target.position - observer.position;

            let updated = relative.norm() / VLIGHT;
            let converged = (updated - light_time).abs() < LIGHT_TIME_TOLERANCE;
            light_time = updated;
            if converged {
                break;
            }
        }

        if self.aberration {
            relative = correct_aberration(relative, observer.velocity);
        }
        Ok(relative)
    }

    fn geometry_at(
        &self,
        location: &GeoLocation,
        instant: &TimeInstant,
        ut1_offset: Option<Duration>,
    ) -> Result<TopocentricGeometry, PenumbraError> {
        let et = instant.et_seconds();
        let observer = self.observer_state(location, instant.epoch(), et, ut1_offset)?;
        let sun = self.apparent_vector(Body::Sun, &observer, et)?;
        let moon = self.apparent_vector(Body::Moon, &observer, et)?;

        Ok(TopocentricGeometry {
            sun,
            moon,
            separation: angular_separation_deg(&sun, &moon),
        })
    }

    /// Sun and Moon seen from `location` at a single instant.
    pub fn observe_instant(
        &self,
        location: &GeoLocation,
        instant: &TimeInstant,
    ) -> Result<TopocentricGeometry, PenumbraError> {
        let ut1_offset = tai_minus_ut1(instant.epoch(), self.ut1_provider);
        self.geometry_at(location, instant, ut1_offset)
    }

    /// Separation series over a whole grid.
    ///
    /// Arguments
    /// -----------------
    /// * `location`: the observer.
    /// * `grid`: instants to evaluate.
    ///
    /// Return
    /// ----------
    /// * One separation per grid instant, same order, or the first provider
    ///   error ([`PenumbraError::EphemerisRange`] outside the kernel span).
    pub fn observe(
        &self,
        location: &GeoLocation,
        grid: &TimeGrid,
    ) -> Result<SeparationSeries, PenumbraError> {
        // ΔUT1 drifts by milliseconds over a day
        let ut1_offset = grid
            .get(grid.len() / 2)
            .and_then(|mid| tai_minus_ut1(mid.epoch(), self.ut1_provider));

        let series = grid
            .instants()
            .par_iter()
            .map(|instant| {
                self.geometry_at(location, instant, ut1_offset)
                    .map(|geometry| geometry.separation)
            })
            .collect::<Result<SeparationSeries, _>>()?;

        debug!(
            instants = series.len(),
            latitude = location.latitude(),
            longitude = location.longitude(),
            "separation series computed"
        );
        Ok(series)
    }

    /// Altitude of the Sun's center above the geodetic horizon, degrees.
    ///
    /// Geometric altitude, no refraction.
    pub fn sun_altitude(
        &self,
        location: &GeoLocation,
        instant: &TimeInstant,
    ) -> Result<Degree, PenumbraError> {
        let ut1_offset = tai_minus_ut1(instant.epoch(), self.ut1_provider);
        let geometry = self.geometry_at(location, instant, ut1_offset)?;
        let zenith = location.zenith_icrf(instant.epoch(), ut1_offset);
        Ok(90.0 - angular_separation_deg(&zenith, &geometry.sun))
    }
}
