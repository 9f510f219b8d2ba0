//! # Penumbra environment state
//!
//! [`PenumbraEnv`] carries the Earth-orientation data shared by every request:
//! an optional [`hifitime::ut1::Ut1Provider`] built from a JPL EOP file.
//!
//! Without a provider the engine takes UT1 ≈ UTC. |UT1 − UTC| stays under
//! 0.9 s, which moves the observer by less than 0.4 km and the Sun–Moon
//! separation by well under an arcsecond.
//!
//! ```text
//! PenumbraEnv
//! └── ut1_provider (Option<hifitime::Ut1Provider>)
//! ```
use camino::Utf8Path;
use hifitime::ut1::Ut1Provider;
use hifitime::{Duration, Epoch};
use tracing::info;

use crate::constants::MJD;
use crate::penumbra_errors::PenumbraError;

#[derive(Debug, Clone, Default)]
pub struct PenumbraEnv {
    pub ut1_provider: Option<Ut1Provider>,
}

impl PenumbraEnv {
    /// Environment without Earth-orientation data (UT1 ≈ UTC).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load UT1 − TAI offsets from a JPL `latest_eop2` style file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: location of the EOP file.
    ///
    /// Return
    /// ----------
    /// * The environment, or [`PenumbraError::Ut1ProviderError`] if the file
    ///   cannot be read or parsed.
    pub fn from_eop_file(path: &Utf8Path) -> Result<Self, PenumbraError> {
        let provider = Ut1Provider::from_eop_file(path.as_str())
            .map_err(|e| PenumbraError::Ut1ProviderError(format!("{path}: {e}")))?;
        info!(%path, "UT1 provider loaded");
        Ok(PenumbraEnv {
            ut1_provider: Some(provider),
        })
    }

    pub fn get_ut1_provider(&self) -> Option<&Ut1Provider> {
        self.ut1_provider.as_ref()
    }
}

/// TAI − UT1 at `epoch`, when a provider is available.
pub fn tai_minus_ut1(epoch: Epoch, ut1_provider: Option<&Ut1Provider>) -> Option<Duration> {
    ut1_provider.map(|provider| epoch - epoch.to_ut1(provider))
}

/// Modified Julian date of `epoch` in the UT1 scale.
///
/// `offset` is TAI − UT1 (see [`tai_minus_ut1`]); `None` falls back to UTC.
pub fn mjd_ut1(epoch: Epoch, offset: Option<Duration>) -> MJD {
    match offset {
        Some(offset) => (epoch - offset).to_mjd_tai_days(),
        None => epoch.to_mjd_utc_days(),
    }
}
