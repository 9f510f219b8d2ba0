//! # Constants and type aliases for Penumbra
//!
//! Physical constants, unit conversions and the handful of type aliases shared
//! by the ephemeris reader, the observer geometry and the phase detector.
//!
//! ## Units
//!
//! - Distances coming out of SPK kernels are **kilometres**, times are
//!   **ET/TDB seconds past J2000**.
//! - Site elevations are **metres**, angles exposed to callers are **degrees**.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π
pub const DPI: f64 = 2. * std::f64::consts::PI;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical unit in kilometres.
pub const AU: f64 = 149_597_870.7;

/// MJD of the J2000 epoch (2000-01-01 12:00 TT).
pub const T2000: f64 = 51544.5;

/// Arcseconds to radians.
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// WGS84 semi-major axis in metres.
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 semi-minor axis in metres.
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.314_245;

/// Equatorial Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.0;

/// Speed of light in km/s.
pub const VLIGHT: f64 = 2.99792458e5;

/// Ratio of the sidereal to the solar day rotation rate.
pub const SIDEREAL_RATE: f64 = 1.00273790934;

/// Earth rotation rate in rad/s.
pub const EARTH_ROTATION_RATE: f64 = DPI * SIDEREAL_RATE / SECONDS_PER_DAY;

// -------------------------------------------------------------------------------------------------
// Eclipse geometry
// -------------------------------------------------------------------------------------------------

/// Mean apparent angular radius of the Sun used for contact detection, in degrees.
pub const DEFAULT_SUN_RADIUS_DEG: Degree = 0.2666;

/// Mean apparent angular radius of the Moon used for contact detection, in degrees.
pub const DEFAULT_MOON_RADIUS_DEG: Degree = 0.2666;

/// Number of one-minute samples in a UTC day.
pub const MINUTES_PER_DAY: usize = 1440;

/// Upper bound on light-time iterations per body and instant.
pub const LIGHT_TIME_ITERATIONS: usize = 10;

/// Light-time convergence tolerance in seconds.
pub const LIGHT_TIME_TOLERANCE: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

pub type Degree = f64;
pub type ArcSec = f64;
pub type Radian = f64;
pub type Kilometer = f64;
pub type Meter = f64;
pub type MJD = f64;

/// Seconds of ephemeris time past J2000.
pub type EphemerisTime = f64;
