use thiserror::Error;

#[derive(Error, Debug)]
pub enum PenumbraError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error(
        "Ephemeris does not cover {body} at ET {epoch:.1} s (kernel span {start:.1} .. {end:.1})"
    )]
    EphemerisRange {
        body: String,
        epoch: f64,
        start: f64,
        end: f64,
    },

    #[error("Unable to load the ephemeris: {0}")]
    EphemerisLoad(String),

    #[error("Invalid JPL string format: {0}")]
    InvalidJPLStringFormat(String),

    #[error("JPL File not found at: {0}")]
    JPLFileNotFound(String),

    #[error("Base dir creation error for JPL ephemeris file: {0}")]
    UnableToCreateBaseDir(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "jpl-download")]
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to initialise the UT1 provider: {0}")]
    Ut1ProviderError(String),

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("Invalid NAIF ID: {0}")]
    InvalidNaifId(i32),
}

impl PenumbraError {
    /// `true` when the error comes from the caller's request rather than from
    /// the engine or its data files.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PenumbraError::InvalidInput(_)
                | PenumbraError::InvalidDate(_)
                | PenumbraError::EphemerisRange { .. }
        )
    }
}

impl From<ordered_float::FloatIsNan> for PenumbraError {
    fn from(_: ordered_float::FloatIsNan) -> Self {
        PenumbraError::InvalidInput("coordinate is NaN".to_string())
    }
}

impl PartialEq for PenumbraError {
    fn eq(&self, other: &Self) -> bool {
        use PenumbraError::*;
        match (self, other) {
            (InvalidInput(a), InvalidInput(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (
                EphemerisRange {
                    body: b1,
                    epoch: e1,
                    start: s1,
                    end: n1,
                },
                EphemerisRange {
                    body: b2,
                    epoch: e2,
                    start: s2,
                    end: n2,
                },
            ) => b1 == b2 && e1 == e2 && s1 == s2 && n1 == n2,
            (EphemerisLoad(a), EphemerisLoad(b)) => a == b,
            (InvalidJPLStringFormat(a), InvalidJPLStringFormat(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (Ut1ProviderError(a), Ut1ProviderError(b)) => a == b,
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,
            (InvalidNaifId(a), InvalidNaifId(b)) => a == b,

            // not comparable, same variant is enough
            (IoError(_), IoError(_)) => true,
            #[cfg(feature = "jpl-download")]
            (ReqwestError(_), ReqwestError(_)) => true,

            _ => false,
        }
    }
}
