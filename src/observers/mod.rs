//! # Observer site geometry
//!
//! [`GeoLocation`] holds a validated geodetic site on the WGS84 ellipsoid and
//! its precomputed body-fixed position. [`GeoLocation::icrf_state`] lifts it
//! into the inertial frame of the JPL kernels:
//!
//! ```text
//! Body-fixed --(GAST)--> True equator of date --(nutation, precession)--> ICRF (≈ mean J2000)
//! ```
//!
//! GAST is GMST evaluated on UT1 plus the equation of the equinoxes. Polar
//! motion and the frame bias are neglected (both well under an arcsecond
//! as seen from the site).
//!
//! ## Units
//!
//! - Latitude and longitude: **degrees**, longitude east positive.
//! - Elevation: **metres** above the ellipsoid.
//! - Geocentric positions: **km**, velocities **km/s**.
use hifitime::{Duration, Epoch};
use nalgebra::{Matrix3, Vector3};
use ordered_float::NotNan;

use crate::constants::{
    Degree, Kilometer, Meter, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, EARTH_RADIUS_KM,
    EARTH_ROTATION_RATE,
};
use crate::earth_orientation::equequ;
use crate::env_state::mjd_ut1;
use crate::penumbra_errors::PenumbraError;
use crate::ref_system::{rotmt, rotpn, RefEpoch, RefSystem};
use crate::time::gmst;

/// A point on (or above) the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoLocation {
    latitude: NotNan<f64>,
    longitude: NotNan<f64>,
    elevation: NotNan<f64>,
    body_fixed_coord: Vector3<NotNan<f64>>,
}

impl GeoLocation {
    /// Build a site from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: geodetic latitude in degrees, within `[-90, 90]`.
    /// * `longitude`: east longitude in degrees, within `[-180, 180]`.
    /// * `elevation`: height above the WGS84 ellipsoid in metres.
    ///
    /// Return
    /// ----------
    /// * The site, or [`PenumbraError::InvalidInput`] for NaN, infinite or
    ///   out-of-range values.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
    ) -> Result<Self, PenumbraError> {
        let latitude = NotNan::new(latitude)?;
        let longitude = NotNan::new(longitude)?;
        let elevation = NotNan::new(elevation)?;

        if !(-90.0..=90.0).contains(&latitude.into_inner()) {
            return Err(PenumbraError::InvalidInput(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude.into_inner()) {
            return Err(PenumbraError::InvalidInput(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        // deepest trench to well above the stratosphere
        if !(-11_000.0..=100_000.0).contains(&elevation.into_inner()) {
            return Err(PenumbraError::InvalidInput(format!(
                "elevation {elevation} m is not a plausible site height"
            )));
        }

        let (rho_cos_phi, rho_sin_phi) =
            geodetic_to_parallax(latitude.into_inner(), elevation.into_inner());
        let lon_radians = longitude.to_radians();
        let body_fixed_coord = Vector3::new(
            NotNan::new(EARTH_RADIUS_KM * rho_cos_phi * lon_radians.cos())?,
            NotNan::new(EARTH_RADIUS_KM * rho_cos_phi * lon_radians.sin())?,
            NotNan::new(EARTH_RADIUS_KM * rho_sin_phi)?,
        );

        Ok(GeoLocation {
            latitude,
            longitude,
            elevation,
            body_fixed_coord,
        })
    }

    /// Site on the ellipsoid surface.
    pub fn from_degrees(latitude: Degree, longitude: Degree) -> Result<Self, PenumbraError> {
        GeoLocation::new(latitude, longitude, 0.0)
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.into_inner()
    }

    pub fn longitude(&self) -> Degree {
        self.longitude.into_inner()
    }

    pub fn elevation(&self) -> Meter {
        self.elevation.into_inner()
    }

    /// Geocentric position in the Earth-fixed frame, km.
    pub fn body_fixed_coord(&self) -> Vector3<Kilometer> {
        self.body_fixed_coord.map(NotNan::into_inner)
    }

    /// Outward normal of the ellipsoid at the site (local vertical), Earth-fixed.
    pub fn zenith_body_fixed(&self) -> Vector3<f64> {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    /// Geocentric position and velocity of the site in ICRF.
    ///
    /// Arguments
    /// -----------------
    /// * `epoch`: instant of the observation.
    /// * `tai_minus_ut1`: Earth-orientation offset, `None` for UT1 ≈ UTC.
    ///
    /// Return
    /// ----------
    /// * `(position km, velocity km/s)`; the velocity is the Earth-rotation
    ///   term `ω × r` only.
    pub fn icrf_state(
        &self,
        epoch: Epoch,
        tai_minus_ut1: Option<Duration>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        let rot = terrestrial_to_icrf(epoch, tai_minus_ut1);
        let dxbf = self.body_fixed_coord();
        let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE);
        let dvbf = omega.cross(&dxbf);
        (rot * dxbf, rot * dvbf)
    }

    /// Local vertical of the site expressed in ICRF.
    pub fn zenith_icrf(&self, epoch: Epoch, tai_minus_ut1: Option<Duration>) -> Vector3<f64> {
        terrestrial_to_icrf(epoch, tai_minus_ut1) * self.zenith_body_fixed()
    }
}

/// Rotation from the Earth-fixed frame to ICRF at `epoch`.
pub fn terrestrial_to_icrf(epoch: Epoch, tai_minus_ut1: Option<Duration>) -> Matrix3<f64> {
    let mjd_tt = epoch.to_mjd_tt_days();
    let gast = gmst(mjd_ut1(epoch, tai_minus_ut1)) + equequ(mjd_tt);

    let true_of_date = RefSystem::Equt(RefEpoch::Epoch(mjd_tt));
    let icrf = RefSystem::Equm(RefEpoch::J2000);
    rotpn(&true_of_date, &icrf) * rotmt(gast, 2)
}

/// Geodetic latitude and height to normalized parallax coordinates.
///
/// Arguments
/// -----------------
/// * `lat`: geodetic latitude in degrees.
/// * `height`: height above the ellipsoid in metres.
///
/// Return
/// ----------
/// * `(ρ·cosφ', ρ·sinφ')` in units of the equatorial radius.
///
/// ```text
/// u      = atan(b/a · tan φ)
/// ρ·sinφ' = b/a · sin u + h/a · sin φ
/// ρ·cosφ' = cos u + h/a · cos φ
/// ```
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    let lat = lat.to_radians();
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    let u = (lat.sin() * axis_ratio).atan2(lat.cos());
    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

#[cfg(test)]
mod observers_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn geodetic_to_parallax_test() {
        // latitude and height of Pan-STARRS 1, Haleakala
        let (pxy, pz) = geodetic_to_parallax(20.707233557, 3067.694);
        assert_relative_eq!(pxy, 0.9362410003211518, epsilon = 1e-8);
        assert_relative_eq!(pz, 0.35154299856304305, epsilon = 1e-8);

        let (pxy, pz) = geodetic_to_parallax(90.0, 0.0);
        assert_relative_eq!(pxy, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pz, EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS, epsilon = 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(GeoLocation::from_degrees(45.0, 7.0).is_ok());
        assert!(GeoLocation::from_degrees(-90.0, 180.0).is_ok());

        for (lat, lon) in [(90.1, 0.0), (-91.0, 0.0), (0.0, 180.5), (0.0, -200.0)] {
            assert!(
                matches!(
                    GeoLocation::from_degrees(lat, lon),
                    Err(PenumbraError::InvalidInput(_))
                ),
                "({lat}, {lon})"
            );
        }
        assert_eq!(
            GeoLocation::from_degrees(f64::NAN, 0.0),
            Err(PenumbraError::InvalidInput("coordinate is NaN".into()))
        );
        assert!(GeoLocation::from_degrees(f64::INFINITY, 0.0).is_err());
        assert!(GeoLocation::new(0.0, 0.0, 1.0e6).is_err());
    }

    #[test]
    fn body_fixed_coord_test() {
        let site = GeoLocation::from_degrees(0.0, 90.0).unwrap();
        assert_relative_eq!(
            site.body_fixed_coord(),
            Vector3::new(0.0, EARTH_RADIUS_KM, 0.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(site.zenith_body_fixed(), Vector3::y(), epsilon = 1e-12);

        // Pan-STARRS 1, in km
        let site = GeoLocation::new(20.707233557, -156.25591, 3067.694).unwrap();
        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(20.707233557, 3067.694);
        let coord = site.body_fixed_coord();
        assert_relative_eq!(
            coord.norm(),
            EARTH_RADIUS_KM * rho_cos_phi.hypot(rho_sin_phi),
            epsilon = 1e-9
        );
        assert_relative_eq!(coord.z, EARTH_RADIUS_KM * rho_sin_phi, epsilon = 1e-9);
        assert_relative_eq!(
            coord.y.atan2(coord.x).to_degrees(),
            -156.25591,
            epsilon = 1e-9
        );
        // published parallax constants of the site, to the ellipsoid difference
        let published = EARTH_RADIUS_KM * 0.9362410003211518_f64.hypot(0.35154299856304305);
        assert_relative_eq!(coord.norm(), published, epsilon = 1e-5);
    }

    #[test]
    fn test_icrf_state() {
        let site = GeoLocation::new(48.8, 2.35, 35.0).unwrap();
        let epoch = Epoch::from_gregorian_utc_at_noon(2024, 4, 8);
        let (pos, vel) = site.icrf_state(epoch, None);

        // rotations keep the geocentric distance
        assert_relative_eq!(pos.norm(), site.body_fixed_coord().norm(), epsilon = 1e-9);
        // rotation speed at 48.8° N: ~0.306 km/s, perpendicular to the position
        let expected_speed = EARTH_ROTATION_RATE * site.body_fixed_coord().xy().norm();
        assert_relative_eq!(vel.norm(), expected_speed, epsilon = 1e-9);
        assert_relative_eq!(pos.dot(&vel), 0.0, epsilon = 1e-6);
        // the height above the equator is untouched by the Earth rotation,
        // only precession-nutation tilts it a little
        assert!((pos.z - site.body_fixed_coord().z).abs() < 40.0);
    }

    #[test]
    fn test_zenith_tracks_sidereal_time() {
        // a site on the equator at Greenwich points to right ascension = GAST
        let site = GeoLocation::from_degrees(0.0, 0.0).unwrap();
        let epoch = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
        let zenith = site.zenith_icrf(epoch, None);
        let ra = zenith.y.atan2(zenith.x).rem_euclid(crate::constants::DPI);
        let gast = gmst(epoch.to_mjd_utc_days()) + equequ(epoch.to_mjd_tt_days());
        assert_relative_eq!(ra, gast.rem_euclid(crate::constants::DPI), epsilon = 1e-4);
        assert_relative_eq!(zenith.norm(), 1.0, epsilon = 1e-12);
    }
}
