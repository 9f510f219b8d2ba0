//! Chebyshev records of SPK type 2 segments.
//!
//! Each record holds, as little-endian `f64`:
//! 1. `mid`, the record midpoint (ET seconds past J2000),
//! 2. `radius`, the half-length of the record interval (seconds),
//! 3. `ncoeff` coefficients for X, then Y, then Z (km).
//!
//! With `t = (et - mid) / radius` in `[-1, 1]`, position is `Σ cₙ Tₙ(t)` and
//! velocity is `Σ cₙ T'ₙ(t) / radius`.
use std::io::{Read, Seek, SeekFrom};

use nalgebra::Vector3;
use nom::{multi::count, number::complete::le_f64, IResult};

use crate::penumbra_errors::PenumbraError;

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub mid: f64,
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    fn parse_record(input: &[u8], ncoeff: usize) -> IResult<&[u8], EphemerisRecord> {
        let (input, mid) = le_f64(input)?;
        let (input, radius) = le_f64(input)?;
        let (input, x) = count(le_f64, ncoeff)(input)?;
        let (input, y) = count(le_f64, ncoeff)(input)?;
        let (input, z) = count(le_f64, ncoeff)(input)?;
        Ok((
            input,
            EphemerisRecord {
                mid,
                radius,
                x,
                y,
                z,
            },
        ))
    }

    /// Read `n_records` consecutive records starting at the DP-word address
    /// `segment_start_addr` (1-based).
    pub fn parse<R: Read + Seek>(
        file: &mut R,
        segment_start_addr: usize,
        rsize: usize,
        n_records: usize,
    ) -> Result<Vec<Self>, PenumbraError> {
        if segment_start_addr == 0 {
            return Err(PenumbraError::EphemerisLoad(
                "segment start address must be positive".into(),
            ));
        }
        let record_bytes = rsize * 8;
        let total_bytes = record_bytes.checked_mul(n_records).ok_or_else(|| {
            PenumbraError::EphemerisLoad(format!(
                "{n_records} records of {rsize} words do not fit in memory"
            ))
        })?;
        let mut buf = vec![0u8; total_bytes];
        file.seek(SeekFrom::Start(((segment_start_addr - 1) * 8) as u64))?;
        file.read_exact(&mut buf)
            .map_err(|e| PenumbraError::EphemerisLoad(format!("truncated segment data: {e}")))?;

        let ncoeff = (rsize - 2) / 3;
        buf.chunks_exact(record_bytes)
            .map(|chunk| {
                Self::parse_record(chunk, ncoeff)
                    .map(|(_, record)| record)
                    .map_err(|e| PenumbraError::EphemerisLoad(format!("ephemeris record: {e}")))
            })
            .collect()
    }

    /// Evaluate position (km) and velocity (km/s) at `ephem_time` (ET seconds).
    pub fn interpolate(&self, ephem_time: f64) -> (Vector3<f64>, Vector3<f64>) {
        let t = ((ephem_time - self.mid) / self.radius).clamp(-1.0, 1.0);
        let n = self.x.len();

        // T_0 = 1, T_1 = t, T_n = 2t T_{n-1} - T_{n-2}
        // T'_0 = 0, T'_1 = 1, T'_n = 2t T'_{n-1} + 2 T_{n-1} - T'_{n-2}
        let mut poly = vec![0.0; n];
        let mut deriv = vec![0.0; n];
        if n > 0 {
            poly[0] = 1.0;
        }
        if n > 1 {
            poly[1] = t;
            deriv[1] = 1.0;
        }
        for k in 2..n {
            poly[k] = 2.0 * t * poly[k - 1] - poly[k - 2];
            deriv[k] = 2.0 * t * deriv[k - 1] + 2.0 * poly[k - 1] - deriv[k - 2];
        }

        let dot = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis).map(|(c, b)| c * b).sum()
        };

        let position = Vector3::new(dot(&self.x, &poly), dot(&self.y, &poly), dot(&self.z, &poly));
        let velocity = Vector3::new(
            dot(&self.x, &deriv),
            dot(&self.y, &deriv),
            dot(&self.z, &deriv),
        ) / self.radius;

        (position, velocity)
    }
}
