//! Named JPL planetary ephemerides distributed by NAIF.
//!
//! A [`NaifVersion`] maps a token such as `"DE421"` to the canonical kernel
//! filename under `generic_kernels/spk/planets/`.
use std::{fmt, str::FromStr};

use crate::penumbra_errors::PenumbraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE421,
    DE430,
    DE432s,
    DE440,
    DE440s,
    DE442,
}

const NAIF_PLANETS_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets";

impl NaifVersion {
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE421 => "de421.bsp",
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE432s => "de432s.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    pub fn url(&self) -> String {
        format!("{NAIF_PLANETS_URL}/{}", self.get_filename())
    }
}

impl FromStr for NaifVersion {
    type Err = PenumbraError;

    /// Case-insensitive: `"DE421"`, `"de421"` and `"De421"` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DE421" => Ok(NaifVersion::DE421),
            "DE430" => Ok(NaifVersion::DE430),
            "DE432S" => Ok(NaifVersion::DE432s),
            "DE440" => Ok(NaifVersion::DE440),
            "DE440S" => Ok(NaifVersion::DE440s),
            "DE442" => Ok(NaifVersion::DE442),
            _ => Err(PenumbraError::InvalidJPLStringFormat(format!(
                "unknown NAIF ephemeris version '{s}'"
            ))),
        }
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.get_filename().trim_end_matches(".bsp");
        write!(f, "{}", name.to_ascii_uppercase().replace('S', "s"))
    }
}
