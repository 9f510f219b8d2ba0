pub mod naif_type;
pub mod planet_bary;

use std::fmt;

use planet_bary::PlanetaryBary;

use crate::penumbra_errors::PenumbraError;

/// NAIF body codes found in the planetary DE kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifIds {
    /// Solar System Barycenter (0).
    SSB,
    /// Sun (10).
    Sun,
    /// Planetary system barycenter (1..=9).
    PB(PlanetaryBary),
    /// Planet mass center (199, 299, ..., 999).
    PMC(PlanetaryBary),
    /// Moon (301).
    Moon,
}

pub const SSB_ID: i32 = 0;
pub const SUN_ID: i32 = 10;
pub const MOON_ID: i32 = 301;

impl NaifIds {
    pub fn from_id(id: i32) -> Result<Self, PenumbraError> {
        match id {
            SSB_ID => Ok(NaifIds::SSB),
            SUN_ID => Ok(NaifIds::Sun),
            MOON_ID => Ok(NaifIds::Moon),
            1..=9 => PlanetaryBary::from_id(id).map(NaifIds::PB),
            199 | 299 | 399 | 499 | 599 | 699 | 799 | 899 | 999 => {
                PlanetaryBary::from_id(id / 100).map(NaifIds::PMC)
            }
            _ => Err(PenumbraError::InvalidNaifId(id)),
        }
    }

    pub fn to_id(self) -> i32 {
        match self {
            NaifIds::SSB => SSB_ID,
            NaifIds::Sun => SUN_ID,
            NaifIds::Moon => MOON_ID,
            NaifIds::PB(bary) => bary.to_id(),
            NaifIds::PMC(bary) => bary.mass_center_id(),
        }
    }
}

impl From<NaifIds> for i32 {
    fn from(naif_id: NaifIds) -> Self {
        naif_id.to_id()
    }
}

impl TryFrom<i32> for NaifIds {
    type Error = PenumbraError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        NaifIds::from_id(id)
    }
}

impl fmt::Display for NaifIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaifIds::SSB => write!(f, "Solar System Barycenter"),
            NaifIds::Sun => write!(f, "Sun"),
            NaifIds::Moon => write!(f, "Moon"),
            NaifIds::PB(bary) => write!(f, "{bary}"),
            NaifIds::PMC(bary) => write!(f, "{}", bary.planet_name()),
        }
    }
}
