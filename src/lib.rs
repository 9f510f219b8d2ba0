pub mod constants;
mod earth_orientation;
pub mod env_state;
pub mod geometry;
pub mod jpl_ephem;
pub mod observers;
pub mod penumbra;
pub mod penumbra_errors;
pub mod phases;
mod ref_system;
pub mod request;
pub mod time;
pub mod time_grid;

pub use geometry::{GeometryEngine, SeparationSeries};
pub use jpl_ephem::{Body, EphemerisProvider, JPLEphem};
pub use observers::GeoLocation;
pub use penumbra::{EclipseReport, Penumbra, PenumbraConfig};
pub use penumbra_errors::PenumbraError;
pub use phases::{detect, ContactRadii, EclipsePhases};
pub use request::{EclipseRequest, EclipseResponse};
pub use time::{CalendarDate, TimeInstant};
pub use time_grid::TimeGrid;
