//! # Request boundary
//!
//! JSON shapes exchanged with callers:
//!
//! ```text
//! request  {"latitude": 32.9, "longitude": "-96.8", "date": "2024-04-08"}
//! success  {"success": true, "phases": {...}, "separation": [...],
//!           "visibility": {...}, "partial_phase_minutes": 158.0}
//! failure  {"success": false, "error": "Invalid date: ..."}
//! ```
//!
//! Coordinates may be JSON numbers or numeric strings. Every malformed request
//! turns into [`PenumbraError::InvalidInput`] or [`PenumbraError::InvalidDate`]
//! before any computation starts.
use serde::{Deserialize, Serialize};

use crate::constants::Degree;
use crate::geometry::SeparationSeries;
use crate::observers::GeoLocation;
use crate::penumbra::EclipseReport;
use crate::penumbra_errors::PenumbraError;
use crate::phases::EclipsePhases;
use crate::time::CalendarDate;

/// A coordinate as sent by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self, name: &str) -> Result<Degree, PenumbraError> {
        match self {
            Coordinate::Number(value) => Ok(*value),
            Coordinate::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                PenumbraError::InvalidInput(format!("{name} '{text}' is not a number"))
            }),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

/// Incoming eclipse query. Every field is optional at the parsing stage so
/// that missing values are reported as input errors, not as JSON errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EclipseRequest {
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    pub date: Option<String>,
}

impl EclipseRequest {
    pub fn new(latitude: Degree, longitude: Degree, date: &str) -> Self {
        EclipseRequest {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            date: Some(date.to_string()),
        }
    }

    /// Parse a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, PenumbraError> {
        serde_json::from_str(body)
            .map_err(|e| PenumbraError::InvalidInput(format!("malformed request: {e}")))
    }

    /// Validated observer location (at sea level).
    pub fn location(&self) -> Result<GeoLocation, PenumbraError> {
        let latitude = required(&self.latitude, "latitude")?.value("latitude")?;
        let longitude = required(&self.longitude, "longitude")?.value("longitude")?;
        GeoLocation::from_degrees(latitude, longitude)
    }

    /// Validated calendar date.
    pub fn date(&self) -> Result<CalendarDate, PenumbraError> {
        CalendarDate::parse(required(&self.date, "date")?)
    }
}

fn required<'a, T>(field: &'a Option<T>, name: &str) -> Result<&'a T, PenumbraError> {
    field
        .as_ref()
        .ok_or_else(|| PenumbraError::InvalidInput(format!("missing field '{name}'")))
}

/// Whether the Sun is up at maximum eclipse. Informational only: contacts are
/// reported even when they happen at night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Visibility {
    pub sun_altitude_at_maximum: Degree,
    pub sun_above_horizon: bool,
}

impl Visibility {
    pub fn from_altitude(sun_altitude_at_maximum: Degree) -> Self {
        Visibility {
            sun_altitude_at_maximum,
            sun_above_horizon: sun_altitude_at_maximum > 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessBody {
    success: bool,
    pub phases: EclipsePhases,
    pub separation: SeparationSeries,
    pub visibility: Visibility,
    pub partial_phase_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureBody {
    success: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EclipseResponse {
    Success(Box<SuccessBody>),
    Failure(FailureBody),
}

impl EclipseResponse {
    pub fn success(report: EclipseReport) -> Self {
        let partial_phase_minutes = report
            .phases
            .partial_phase_duration()
            .map(|duration| duration.to_seconds() / 60.0);

        EclipseResponse::Success(Box::new(SuccessBody {
            success: true,
            phases: report.phases,
            separation: report.separation,
            visibility: Visibility::from_altitude(report.sun_altitude_at_maximum),
            partial_phase_minutes,
        }))
    }

    pub fn failure(error: &PenumbraError) -> Self {
        EclipseResponse::Failure(FailureBody {
            success: false,
            error: error.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EclipseResponse::Success(_))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
