//! # Reference frames
//!
//! Rotations between the equatorial and ecliptic reference systems used to lift
//! a body-fixed observer into the inertial frame of the JPL kernels.
//!
//! Every system is tied to an epoch. [`rotpn`] goes through the mean equator and
//! equinox of J2000 (ICRF to within the frame bias), so any pair of systems can
//! be chained.
//!
//! ```text
//! Eclm(t) --obliquity--> Equm(t) <--nutation-- Equt(t)
//!                          |
//!                      precession
//!                          |
//!                     Equm(J2000)  ~ ICRF
//! ```
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{T2000, VLIGHT};
use crate::earth_orientation::{obleq, prec, rnut80};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    /// Modified Julian date in the TT scale.
    Epoch(f64),
}

impl RefEpoch {
    pub fn date(&self) -> f64 {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefSystem {
    /// Mean equator and mean equinox of the epoch (precession only).
    Equm(RefEpoch),
    /// True equator and true equinox of the epoch (precession and nutation).
    Equt(RefEpoch),
    /// Mean ecliptic and mean equinox of the epoch.
    Eclm(RefEpoch),
}

impl RefSystem {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            RefSystem::Equm(e) | RefSystem::Equt(e) | RefSystem::Eclm(e) => e,
        }
    }

    /// Matrix taking coordinates in `self` to the mean equator and equinox of J2000.
    fn to_equm_j2000(self) -> Matrix3<f64> {
        let date = self.epoch().date();
        let precession = match self.epoch() {
            RefEpoch::J2000 => Matrix3::identity(),
            RefEpoch::Epoch(_) => prec(date),
        };
        match self {
            RefSystem::Equm(_) => precession,
            RefSystem::Equt(_) => precession * rnut80(date),
            RefSystem::Eclm(_) => precession * rotmt(obleq(date), 0),
        }
    }
}

/// Rotation matrix between two reference systems.
///
/// Arguments
/// -----------------
/// * `ref_sys1`: source system.
/// * `ref_sys2`: target system.
///
/// Return
/// ----------
/// * `M` such that `v2 = M * v1` for a vector `v1` expressed in `ref_sys1`.
///
/// See also
/// ------------
/// * [`crate::earth_orientation::prec`] – IAU 1976 precession.
/// * [`crate::earth_orientation::rnut80`] – IAU 1980 nutation.
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    if ref_sys1 == ref_sys2 {
        return Matrix3::identity();
    }
    ref_sys2.to_equm_j2000().transpose() * ref_sys1.to_equm_j2000()
}

/// Active rotation of angle `alpha` (radians) around axis `k` (0 = x, 1 = y, 2 = z).
///
/// Axis indices above 2 wrap around.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k % 3 {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        _ => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// First-order stellar aberration.
///
/// Arguments
/// -----------------
/// * `xrel`: observer → target vector in km.
/// * `vobs`: barycentric velocity of the observer in km/s.
///
/// Return
/// ----------
/// * The apparent observer → target vector, same length scale as `xrel`.
pub fn correct_aberration(xrel: Vector3<f64>, vobs: Vector3<f64>) -> Vector3<f64> {
    let dt = xrel.norm() / VLIGHT;
    xrel + dt * vobs
}
