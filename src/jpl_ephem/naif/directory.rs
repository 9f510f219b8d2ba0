//! Directory footer of an SPK type 2 segment.
//!
//! The last four DP-words of a segment hold `init`, `intlen`, `rsize` and
//! `n_records`. The footer ends at the segment's `final_addr`, so it is read
//! from byte offset `(final_addr - 4) * 8`.
use std::io::{Read, Seek, SeekFrom};

use hifitime::{Duration, Epoch};
use nom::{number::complete::le_f64, IResult};

use crate::penumbra_errors::PenumbraError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    /// ET seconds of the start of the first record.
    pub init: f64,
    /// Seconds covered by each record.
    pub intlen: f64,
    /// Record size in DP-words.
    pub rsize: usize,
    pub n_records: usize,
}

fn parse_footer(input: &[u8]) -> IResult<&[u8], (f64, f64, f64, f64)> {
    let (input, init) = le_f64(input)?;
    let (input, intlen) = le_f64(input)?;
    let (input, rsize) = le_f64(input)?;
    let (input, n_records) = le_f64(input)?;
    Ok((input, (init, intlen, rsize, n_records)))
}

/// A footer count must be a whole number addressable by a DAF (`i32` words).
fn word_count(value: f64) -> Option<usize> {
    let valid = value.is_finite()
        && value >= 0.0
        && value.fract() == 0.0
        && value <= i32::MAX as f64;
    valid.then_some(value as usize)
}

impl DirectoryData {
    pub fn parse<R: Read + Seek>(file: &mut R, end_addr: usize) -> Result<Self, PenumbraError> {
        if end_addr < 4 {
            return Err(PenumbraError::EphemerisLoad(format!(
                "segment end address {end_addr} is too small"
            )));
        }
        let mut dir_buf = [0u8; 32];
        file.seek(SeekFrom::Start(((end_addr - 4) * 8) as u64))?;
        file.read_exact(&mut dir_buf).map_err(|e| {
            PenumbraError::EphemerisLoad(format!("truncated segment directory: {e}"))
        })?;

        let (_, (init, intlen, rsize, n_records)) = parse_footer(&dir_buf)
            .map_err(|e| PenumbraError::EphemerisLoad(format!("segment directory: {e}")))?;

        let inconsistent = || {
            PenumbraError::EphemerisLoad(format!(
                "inconsistent segment directory: init={init}, intlen={intlen}, \
                 rsize={rsize}, n_records={n_records}"
            ))
        };
        let directory = DirectoryData {
            init,
            intlen,
            rsize: word_count(rsize).ok_or_else(inconsistent)?,
            n_records: word_count(n_records).ok_or_else(inconsistent)?,
        };
        if directory.is_valid() {
            Ok(directory)
        } else {
            Err(inconsistent())
        }
    }

    fn is_valid(&self) -> bool {
        self.init.is_finite()
            && self.intlen.is_finite()
            && self.intlen > 0.0
            && self.n_records > 0
            && self.rsize >= 5
            && (self.rsize - 2) % 3 == 0
    }

    /// DP-words spanned by the records, `None` on overflow.
    pub fn data_words(&self) -> Option<usize> {
        self.n_records.checked_mul(self.rsize)
    }

    /// Number of Chebyshev coefficients per axis.
    pub fn n_coeffs(&self) -> usize {
        (self.rsize - 2) / 3
    }

    /// Index of the record covering `et_seconds`, clamped to the segment.
    pub fn record_index(&self, et_seconds: f64) -> usize {
        let idx = ((et_seconds - self.init) / self.intlen).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(self.n_records - 1)
        }
    }
}

impl std::fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "init {} | record length {} | rsize {} | {} records",
            Epoch::from_et_seconds(self.init),
            Duration::from_seconds(self.intlen),
            self.rsize,
            self.n_records
        )
    }
}
