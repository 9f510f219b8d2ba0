//! # JPL ephemerides
//!
//! Barycentric states of the Sun, the Earth and the Moon, read from a NAIF SPK
//! kernel. The geometry code only sees the [`EphemerisProvider`] trait so that
//! it can run against any source of states.
use std::fmt;

use download_jpl_file::{EphemFilePath, EphemFileSource};
use naif::{
    naif_data::NaifData,
    naif_ids::{planet_bary::PlanetaryBary, NaifIds},
};
use tracing::info;

use crate::constants::EphemerisTime;
use crate::penumbra_errors::PenumbraError;

pub mod download_jpl_file;
pub mod naif;
pub mod state_vector;

pub use state_vector::StateVector;

/// Bodies the eclipse geometry needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Earth,
    Moon,
}

impl Body {
    pub const ALL: [Body; 3] = [Body::Sun, Body::Earth, Body::Moon];

    pub fn naif_id(self) -> NaifIds {
        match self {
            Body::Sun => NaifIds::Sun,
            Body::Earth => NaifIds::PMC(PlanetaryBary::EarthMoon),
            Body::Moon => NaifIds::Moon,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naif_id())
    }
}

/// Read-only source of barycentric states, shared across threads.
pub trait EphemerisProvider: Send + Sync {
    /// State of `body` relative to the Solar System Barycenter, ICRF axes,
    /// km and km/s.
    ///
    /// Fails with [`PenumbraError::EphemerisRange`] outside the covered span.
    fn barycentric_state(
        &self,
        body: Body,
        et_seconds: EphemerisTime,
    ) -> Result<StateVector, PenumbraError>;

    /// ET span over which every [`Body`] can be evaluated.
    fn coverage(&self) -> (EphemerisTime, EphemerisTime);

    /// Fail with [`PenumbraError::EphemerisRange`] if `et_seconds` is outside
    /// [`Self::coverage`].
    fn check_coverage(&self, body: Body, et_seconds: EphemerisTime) -> Result<(), PenumbraError> {
        let (start, end) = self.coverage();
        if (start..=end).contains(&et_seconds) {
            Ok(())
        } else {
            Err(PenumbraError::EphemerisRange {
                body: body.to_string(),
                epoch: et_seconds,
                start,
                end,
            })
        }
    }
}

/// A loaded JPL planetary kernel.
#[derive(Debug, Clone)]
pub struct JPLEphem {
    source: EphemFilePath,
    naif: NaifData,
    coverage: (EphemerisTime, EphemerisTime),
}

impl JPLEphem {
    /// Resolve and load a kernel.
    ///
    /// Arguments
    /// -----------------
    /// * `file_source`: named NAIF kernel or path to a `.bsp` file.
    ///
    /// Return
    /// ----------
    /// * The loaded kernel, or [`PenumbraError::EphemerisLoad`] (and
    ///   [`PenumbraError::JPLFileNotFound`] for a missing file) if it cannot
    ///   serve the Sun, the Earth and the Moon.
    pub fn new(file_source: &EphemFileSource) -> Result<Self, PenumbraError> {
        let source = EphemFilePath::get_ephemeris_file(file_source)?;
        let naif = NaifData::read_naif_file(source.path())?;
        Self::from_naif_data(source, naif)
    }

    pub(crate) fn from_naif_data(
        source: EphemFilePath,
        naif: NaifData,
    ) -> Result<Self, PenumbraError> {
        let mut coverage = (f64::NEG_INFINITY, f64::INFINITY);
        for body in Body::ALL {
            let (start, end) = naif
                .coverage_wrt_ssb(body.naif_id().to_id())
                .ok_or_else(|| {
                    PenumbraError::EphemerisLoad(format!(
                        "{source} has no segment chain from {body} to the Solar System Barycenter"
                    ))
                })?;
            coverage = (coverage.0.max(start), coverage.1.min(end));
        }
        if coverage.0 >= coverage.1 {
            return Err(PenumbraError::EphemerisLoad(format!(
                "{source}: Sun, Earth and Moon segments do not overlap in time"
            )));
        }

        info!(
            source = %source,
            start = %hifitime::Epoch::from_et_seconds(coverage.0),
            end = %hifitime::Epoch::from_et_seconds(coverage.1),
            "ephemeris ready"
        );

        Ok(JPLEphem {
            source,
            naif,
            coverage,
        })
    }

    pub fn source(&self) -> &EphemFilePath {
        &self.source
    }

    pub fn naif_data(&self) -> &NaifData {
        &self.naif
    }
}

impl EphemerisProvider for JPLEphem {
    fn barycentric_state(
        &self,
        body: Body,
        et_seconds: EphemerisTime,
    ) -> Result<StateVector, PenumbraError> {
        self.check_coverage(body, et_seconds)?;
        self.naif
            .state_wrt_ssb(body.naif_id().to_id(), et_seconds)
            .ok_or_else(|| PenumbraError::EphemerisRange {
                body: body.to_string(),
                epoch: et_seconds,
                start: self.coverage.0,
                end: self.coverage.1,
            })
    }

    fn coverage(&self) -> (EphemerisTime, EphemerisTime) {
        self.coverage
    }
}

impl fmt::Display for JPLEphem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source: {}", self.source)?;
        writeln!(
            f,
            "Coverage: {} .. {}",
            hifitime::Epoch::from_et_seconds(self.coverage.0),
            hifitime::Epoch::from_et_seconds(self.coverage.1)
        )?;
        write!(f, "{}", self.naif)
    }
}
