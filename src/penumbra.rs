//! # Penumbra context
//!
//! [`Penumbra`] owns the process-lifetime state (the loaded ephemeris and the
//! Earth-orientation environment) and wires the pipeline for one request:
//!
//! ```text
//! CalendarDate --TimeGrid::build--> grid --GeometryEngine::observe--> separations
//!                                                    |
//!                                   phases::detect <-+--> EclipseReport
//! ```
//!
//! The ephemeris is loaded once, eagerly, by [`Penumbra::new`]; a load failure
//! is returned before any request is served. The handle is shared read-only
//! (`Arc<dyn EphemerisProvider>`), so a `Penumbra` can be cloned into worker
//! threads.
use std::{fmt, sync::Arc};

use camino::Utf8PathBuf;
use tracing::{error, info, warn};

use crate::constants::Degree;
use crate::env_state::PenumbraEnv;
use crate::geometry::{GeometryEngine, SeparationSeries};
use crate::jpl_ephem::{
    download_jpl_file::EphemFileSource, naif::naif_version::NaifVersion, Body,
    EphemerisProvider, JPLEphem,
};
use crate::observers::GeoLocation;
use crate::penumbra_errors::PenumbraError;
use crate::phases::{detect, ContactRadii, EclipsePhases};
use crate::request::{EclipseRequest, EclipseResponse};
use crate::time::CalendarDate;
use crate::time_grid::TimeGrid;

/// Everything needed to build a [`Penumbra`].
#[derive(Debug, Clone, PartialEq)]
pub struct PenumbraConfig {
    pub ephemeris: EphemFileSource,
    pub eop_file: Option<Utf8PathBuf>,
    pub radii: ContactRadii,
    pub aberration: bool,
}

impl Default for PenumbraConfig {
    fn default() -> Self {
        PenumbraConfig {
            ephemeris: EphemFileSource::Naif(NaifVersion::DE421),
            eop_file: None,
            radii: ContactRadii::default(),
            aberration: false,
        }
    }
}

impl PenumbraConfig {
    /// Default configuration reading the given ephemeris source
    /// (`"naif:DE440"` or a path to a `.bsp` file).
    pub fn new(ephemeris: &str) -> Result<Self, PenumbraError> {
        Ok(PenumbraConfig {
            ephemeris: ephemeris.try_into()?,
            ..Default::default()
        })
    }
}

/// Eclipse circumstances for one site and one day.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseReport {
    pub location: GeoLocation,
    pub date: CalendarDate,
    pub phases: EclipsePhases,
    pub separation: SeparationSeries,
    /// Geometric altitude of the Sun at maximum eclipse, degrees.
    pub sun_altitude_at_maximum: Degree,
}

#[derive(Clone)]
pub struct Penumbra {
    env_state: PenumbraEnv,
    ephem: Arc<dyn EphemerisProvider>,
    radii: ContactRadii,
    aberration: bool,
}

impl Penumbra {
    /// Load the ephemeris (and the EOP file, if any) described by `config`.
    ///
    /// Return
    /// ----------
    /// * The ready context, or the load error ([`PenumbraError::EphemerisLoad`],
    ///   [`PenumbraError::JPLFileNotFound`], [`PenumbraError::Ut1ProviderError`]).
    pub fn new(config: &PenumbraConfig) -> Result<Self, PenumbraError> {
        let env_state = match &config.eop_file {
            Some(path) => PenumbraEnv::from_eop_file(path)?,
            None => PenumbraEnv::new(),
        };
        let ephem = JPLEphem::new(&config.ephemeris)?;
        Ok(Self::with_provider(Arc::new(ephem), env_state, config))
    }

    /// Build a context around an already loaded provider.
    pub fn with_provider(
        ephem: Arc<dyn EphemerisProvider>,
        env_state: PenumbraEnv,
        config: &PenumbraConfig,
    ) -> Self {
        Penumbra {
            env_state,
            ephem,
            radii: config.radii,
            aberration: config.aberration,
        }
    }

    pub fn get_ephemeris(&self) -> &dyn EphemerisProvider {
        self.ephem.as_ref()
    }

    pub fn get_env_state(&self) -> &PenumbraEnv {
        &self.env_state
    }

    pub fn radii(&self) -> &ContactRadii {
        &self.radii
    }

    fn engine(&self) -> GeometryEngine<'_, dyn EphemerisProvider> {
        GeometryEngine::new(self.ephem.as_ref())
            .with_ut1(self.env_state.get_ut1_provider())
            .with_aberration(self.aberration)
    }

    /// Fail early when the kernel does not span the whole grid.
    fn check_grid_coverage(&self, grid: &TimeGrid) -> Result<(), PenumbraError> {
        let (Some(first), Some(last)) = (grid.first(), grid.last()) else {
            return Ok(());
        };
        let first_covered = self.ephem.check_coverage(Body::Moon, first.et_seconds());
        let last_covered = self.ephem.check_coverage(Body::Moon, last.et_seconds());

        if first_covered.is_ok() != last_covered.is_ok() {
            warn!(
                date = %grid.date(),
                "date is only partly covered by the ephemeris"
            );
        }
        first_covered.and(last_covered)
    }

    /// Sun–Moon separation series seen from `location` over `grid`.
    pub fn separation_series(
        &self,
        location: &GeoLocation,
        grid: &TimeGrid,
    ) -> Result<SeparationSeries, PenumbraError> {
        self.check_grid_coverage(grid)?;
        self.engine().observe(location, grid)
    }

    /// Eclipse circumstances for `location` on `date`.
    ///
    /// Arguments
    /// -----------------
    /// * `location`: the observer.
    /// * `date`: the UTC day to scan, minute by minute.
    ///
    /// Return
    /// ----------
    /// * The report, contacts set to `None` when the disks never touch, or
    ///   [`PenumbraError::EphemerisRange`] when the day is outside the kernel.
    pub fn eclipse_circumstances(
        &self,
        location: &GeoLocation,
        date: CalendarDate,
    ) -> Result<EclipseReport, PenumbraError> {
        let grid = TimeGrid::build(date)?;
        let separation = self.separation_series(location, &grid)?;
        let phases = detect(grid.instants(), &separation, &self.radii)?;
        let sun_altitude_at_maximum = self
            .engine()
            .sun_altitude(location, &phases.maximum.time)?;

        info!(
            %date,
            latitude = location.latitude(),
            longitude = location.longitude(),
            eclipse = phases.is_eclipse(),
            maximum = %phases.maximum.time,
            min_separation = phases.maximum.separation,
            "eclipse circumstances computed"
        );

        Ok(EclipseReport {
            location: *location,
            date,
            phases,
            separation,
            sun_altitude_at_maximum,
        })
    }

    /// Answer a request, turning every error into a failure response.
    pub fn handle_request(&self, request: &EclipseRequest) -> EclipseResponse {
        let outcome = request.location().and_then(|location| {
            let date = request.date()?;
            self.eclipse_circumstances(&location, date)
        });

        match outcome {
            Ok(report) => EclipseResponse::success(report),
            Err(err) => {
                if err.is_client_error() {
                    warn!(error = %err, "request rejected");
                } else {
                    error!(error = %err, "request failed");
                }
                EclipseResponse::failure(&err)
            }
        }
    }
}

impl fmt::Debug for Penumbra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Penumbra")
            .field("coverage", &self.ephem.coverage())
            .field("ut1_provider", &self.env_state.ut1_provider.is_some())
            .field("radii", &self.radii)
            .field("aberration", &self.aberration)
            .finish()
    }
}
