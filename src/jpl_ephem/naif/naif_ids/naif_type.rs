use std::{convert::TryFrom, fmt};

use crate::penumbra_errors::PenumbraError;

/// SPK segment data types. Only [`SpkDataType::ChebyshevPositionOnly`] is
/// evaluated; the others are recognised so they can be reported and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SpkDataType {
    ModifiedDifferenceArray = 1,
    ChebyshevPositionOnly = 2,
    ChebyshevPositionVelocity = 3,
    TwoBodyDiscreteStates = 5,
    EquallySpacedLagrange = 8,
    UnequallySpacedLagrange = 9,
    HermiteUniform = 12,
    HermiteNonUniform = 13,
    ChebyshevNonUniform = 14,
    ExtendedModifiedDifferenceArray = 21,
}

impl TryFrom<i32> for SpkDataType {
    type Error = PenumbraError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        use SpkDataType::*;
        match value {
            1 => Ok(ModifiedDifferenceArray),
            2 => Ok(ChebyshevPositionOnly),
            3 => Ok(ChebyshevPositionVelocity),
            5 => Ok(TwoBodyDiscreteStates),
            8 => Ok(EquallySpacedLagrange),
            9 => Ok(UnequallySpacedLagrange),
            12 => Ok(HermiteUniform),
            13 => Ok(HermiteNonUniform),
            14 => Ok(ChebyshevNonUniform),
            21 => Ok(ExtendedModifiedDifferenceArray),
            _ => Err(PenumbraError::InvalidSpkDataType(value)),
        }
    }
}

impl From<SpkDataType> for i32 {
    fn from(data_type: SpkDataType) -> Self {
        data_type as i32
    }
}

impl fmt::Display for SpkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SpkDataType::*;
        let name = match self {
            ModifiedDifferenceArray => "MDA",
            ChebyshevPositionOnly => "Chebyshev position",
            ChebyshevPositionVelocity => "Chebyshev position/velocity",
            TwoBodyDiscreteStates => "discrete states",
            EquallySpacedLagrange => "Lagrange, equal steps",
            UnequallySpacedLagrange => "Lagrange, unequal steps",
            HermiteUniform => "Hermite, equal steps",
            HermiteNonUniform => "Hermite, unequal steps",
            ChebyshevNonUniform => "Chebyshev, unequal steps",
            ExtendedModifiedDifferenceArray => "extended MDA",
        };
        write!(f, "type {} ({name})", *self as i32)
    }
}
