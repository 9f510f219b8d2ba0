use std::fmt;

use crate::penumbra_errors::PenumbraError;

/// Planetary system barycenters, NAIF IDs 1 to 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanetaryBary {
    Mercury = 1,
    Venus = 2,
    EarthMoon = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
}

impl PlanetaryBary {
    pub fn from_id(id: i32) -> Result<Self, PenumbraError> {
        use PlanetaryBary::*;
        match id {
            1 => Ok(Mercury),
            2 => Ok(Venus),
            3 => Ok(EarthMoon),
            4 => Ok(Mars),
            5 => Ok(Jupiter),
            6 => Ok(Saturn),
            7 => Ok(Uranus),
            8 => Ok(Neptune),
            9 => Ok(Pluto),
            _ => Err(PenumbraError::InvalidNaifId(id)),
        }
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    /// NAIF ID of the planet's mass center (`100·n + 99`).
    pub fn mass_center_id(self) -> i32 {
        self.to_id() * 100 + 99
    }

    /// Name of the planet itself, as opposed to its system barycenter.
    pub fn planet_name(self) -> &'static str {
        use PlanetaryBary::*;
        match self {
            Mercury => "Mercury",
            Venus => "Venus",
            EarthMoon => "Earth",
            Mars => "Mars",
            Jupiter => "Jupiter",
            Saturn => "Saturn",
            Uranus => "Uranus",
            Neptune => "Neptune",
            Pluto => "Pluto",
        }
    }
}

impl fmt::Display for PlanetaryBary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanetaryBary::EarthMoon => write!(f, "Earth-Moon Barycenter"),
            other => write!(f, "{} Barycenter", other.planet_name()),
        }
    }
}
