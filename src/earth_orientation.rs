//! # Earth orientation
//!
//! IAU 1976 precession, IAU 1980 nutation and the mean obliquity of the
//! ecliptic. These drive the rotation of a ground site into the inertial frame:
//!
//! * [`obleq`] – mean obliquity of the ecliptic,
//! * [`nutn80`] – nutation in longitude and obliquity,
//! * [`rnut80`] – nutation matrix (true of date → mean of date),
//! * [`equequ`] – equation of the equinoxes (GAST − GMST),
//! * [`prec`] – precession matrix (mean of date → mean J2000).
//!
//! The nutation series keeps every IAU 1980 term with an amplitude of at least
//! 0.0006 arcsec. The dropped terms sum to a few hundredths of an arcsecond,
//! far below what a one-minute eclipse grid can resolve.
//!
//! All functions take the date as a **Modified Julian Date in TT**.
use nalgebra::Matrix3;

use crate::constants::{ArcSec, Radian, DPI, RADSEC, T2000};
use crate::ref_system::rotmt;

const DAYS_PER_CENTURY: f64 = 36525.0;

/// One row of the nutation series.
///
/// Multipliers of the Delaunay arguments `(l, l', F, D, Ω)`, then the sine
/// amplitude in longitude `A + B·t` and the cosine amplitude in obliquity
/// `C + D·t`, in units of 0.0001 arcsec (`t` in Julian centuries since J2000).
struct NutationTerm {
    args: [i8; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [i8; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

#[rustfmt::skip]
const NUTATION_SERIES: [NutationTerm; 45] = [
    term([ 0,  0,  0,  0, 1], (-171996.0, -174.2), (92025.0,  8.9)),
    term([ 0,  0,  2, -2, 2], ( -13187.0,   -1.6), ( 5736.0, -3.1)),
    term([ 0,  0,  2,  0, 2], (  -2274.0,   -0.2), (  977.0, -0.5)),
    term([ 0,  0,  0,  0, 2], (   2062.0,    0.2), ( -895.0,  0.5)),
    term([ 0,  1,  0,  0, 0], (   1426.0,   -3.4), (   54.0, -0.1)),
    term([ 1,  0,  0,  0, 0], (    712.0,    0.1), (   -7.0,  0.0)),
    term([ 0,  1,  2, -2, 2], (   -517.0,    1.2), (  224.0, -0.6)),
    term([ 0,  0,  2,  0, 1], (   -386.0,   -0.4), (  200.0,  0.0)),
    term([ 1,  0,  2,  0, 2], (   -301.0,    0.0), (  129.0, -0.1)),
    term([ 0, -1,  2, -2, 2], (    217.0,   -0.5), (  -95.0,  0.3)),
    term([ 1,  0,  0, -2, 0], (   -158.0,    0.0), (    0.0,  0.0)),
    term([ 0,  0,  2, -2, 1], (    129.0,    0.1), (  -70.0,  0.0)),
    term([-1,  0,  2,  0, 2], (    123.0,    0.0), (  -53.0,  0.0)),
    term([ 1,  0,  0,  0, 1], (     63.0,    0.1), (  -33.0,  0.0)),
    term([ 0,  0,  0,  2, 0], (     63.0,    0.0), (    0.0,  0.0)),
    term([-1,  0,  2,  2, 2], (    -59.0,    0.0), (   26.0,  0.0)),
    term([-1,  0,  0,  0, 1], (    -58.0,   -0.1), (   32.0,  0.0)),
    term([ 1,  0,  2,  0, 1], (    -51.0,    0.0), (   27.0,  0.0)),
    term([ 2,  0,  0, -2, 0], (     48.0,    0.0), (    0.0,  0.0)),
    term([-2,  0,  2,  0, 1], (     46.0,    0.0), (  -24.0,  0.0)),
    term([ 0,  0,  2,  2, 2], (    -38.0,    0.0), (   16.0,  0.0)),
    term([ 2,  0,  2,  0, 2], (    -31.0,    0.0), (   13.0,  0.0)),
    term([ 2,  0,  0,  0, 0], (     29.0,    0.0), (    0.0,  0.0)),
    term([ 1,  0,  2, -2, 2], (     29.0,    0.0), (  -12.0,  0.0)),
    term([ 0,  0,  2,  0, 0], (     26.0,    0.0), (    0.0,  0.0)),
    term([ 0,  0,  2, -2, 0], (    -22.0,    0.0), (    0.0,  0.0)),
    term([-1,  0,  2,  0, 1], (     21.0,    0.0), (  -10.0,  0.0)),
    term([ 0,  2,  0,  0, 0], (     17.0,   -0.1), (    0.0,  0.0)),
    term([ 0,  2,  2, -2, 2], (    -16.0,    0.1), (    7.0,  0.0)),
    term([-1,  0,  0,  2, 1], (     16.0,    0.0), (   -8.0,  0.0)),
    term([ 0,  1,  0,  0, 1], (    -15.0,    0.0), (    9.0,  0.0)),
    term([ 1,  0,  0, -2, 1], (    -13.0,    0.0), (    7.0,  0.0)),
    term([ 0, -1,  0,  0, 1], (    -12.0,    0.0), (    6.0,  0.0)),
    term([ 2,  0, -2,  0, 0], (     11.0,    0.0), (    0.0,  0.0)),
    term([-1,  0,  2,  2, 1], (    -10.0,    0.0), (    5.0,  0.0)),
    term([ 1,  0,  2,  2, 2], (     -8.0,    0.0), (    3.0,  0.0)),
    term([ 0, -1,  2,  0, 2], (     -7.0,    0.0), (    3.0,  0.0)),
    term([ 0,  0,  2,  2, 1], (     -7.0,    0.0), (    3.0,  0.0)),
    term([ 1,  1,  0, -2, 0], (     -7.0,    0.0), (    0.0,  0.0)),
    term([ 0,  1,  2,  0, 2], (      7.0,    0.0), (   -3.0,  0.0)),
    term([-2,  0,  0,  2, 1], (     -6.0,    0.0), (    3.0,  0.0)),
    term([ 0,  0,  0,  2, 1], (     -6.0,    0.0), (    3.0,  0.0)),
    term([ 2,  0,  2, -2, 2], (      6.0,    0.0), (   -3.0,  0.0)),
    term([ 1,  0,  0,  2, 0], (      6.0,    0.0), (    0.0,  0.0)),
    term([ 1,  0,  2, -2, 1], (      6.0,    0.0), (   -3.0,  0.0)),
];

/// Mean obliquity of the ecliptic (IAU 1976), in radians.
pub fn obleq(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Delaunay arguments `(l, l', F, D, Ω)` in radians.
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let poly = |c0: f64, c1: f64, c2: f64, c3: f64| {
        ((((c3 * t + c2) * t + c1) * t + c0) * RADSEC) % DPI
    };
    [
        poly(485866.733, 1717915922.633, 31.310, 0.064),
        poly(1287099.804, 129596581.224, -0.577, -0.012),
        poly(335778.877, 1739527263.137, -13.257, 0.011),
        poly(1072261.307, 1602961601.328, -6.891, 0.019),
        poly(450160.280, -6962890.539, 7.455, 0.008),
    ]
}

/// Nutation in longitude and obliquity (IAU 1980).
///
/// Return
/// ----------
/// * `(Δψ, Δε)` in arcseconds.
pub fn nutn80(tjm: f64) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    let fund = fundamental_arguments(t);

    let (dpsi, deps) = NUTATION_SERIES
        .iter()
        .fold((0.0, 0.0), |(dpsi, deps), nut| {
            let arg: f64 = nut
                .args
                .iter()
                .zip(fund.iter())
                .map(|(&k, a)| f64::from(k) * a)
                .sum();
            (
                dpsi + (nut.psi.0 + nut.psi.1 * t) * arg.sin(),
                deps + (nut.eps.0 + nut.eps.1 * t) * arg.cos(),
            )
        });

    (dpsi * 1e-4, deps * 1e-4)
}

/// Nutation matrix taking true-of-date coordinates to mean-of-date coordinates.
///
/// `R1(ε) · R3(−Δψ) · R1(−ε − Δε)` with active rotations.
pub fn rnut80(tjm: f64) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(epsm, 0) * rotmt(-dpsi * RADSEC, 2) * rotmt(-epst, 0)
}

/// Equation of the equinoxes (GAST − GMST), in radians.
pub fn equequ(tjm: f64) -> Radian {
    let (dpsi, _) = nutn80(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix taking mean-of-date coordinates to mean J2000 coordinates.
///
/// `R3(−ζ) · R2(θ) · R3(−z)` with active rotations.
pub fn prec(tjm: f64) -> Matrix3<f64> {
    // arcsec, powers of t
    const ZETA: [f64; 3] = [2306.2181, 0.30188, 0.017998];
    const Z: [f64; 3] = [2306.2181, 1.09468, 0.018203];
    const THETA: [f64; 3] = [2004.3109, -0.42665, -0.041833];

    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    let angle = |c: [f64; 3]| ((c[2] * t + c[1]) * t + c[0]) * t * RADSEC;

    rotmt(-angle(ZETA), 2) * rotmt(angle(THETA), 1) * rotmt(-angle(Z), 2)
}
