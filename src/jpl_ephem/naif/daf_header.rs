//! DAF (Double Precision Array File) file record.
//!
//! The first 1024-byte record of an SPK kernel describes the layout of the
//! rest of the file:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for ephemerides.
//! * **`nd`** / **`ni`**: number of double and integer components of every
//!   segment summary (`2` and `6` for SPK).
//! * **`fward`** / **`bward`**: 1-based record numbers of the first and last
//!   summary records, which form a doubly linked list.
//! * **`free`**: first free DP-word address.
//! * **`locfmt`**: numeric encoding of the file (`"LTL-IEEE"` or `"BIG-IEEE"`).
//!
//! Only little-endian kernels are supported; [`DAFHeader::check_spk`] rejects
//! anything else before the summaries are decoded.
//!
//! # See also
//! ------------
//! * NAIF DAF and SPK required reading.
use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::penumbra_errors::PenumbraError;

/// Size in bytes of every DAF record.
pub const DAF_RECORD_SIZE: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

impl DAFHeader {
    /// Decode the file record from the first bytes of a kernel.
    ///
    /// The binary format field is read as raw text so that a big-endian file
    /// can still be identified and rejected by [`Self::check_spk`].
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, idword) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        Ok((
            input,
            DAFHeader {
                idword: ascii_field(idword),
                internal_filename: ascii_field(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: ascii_field(locfmt),
            },
        ))
    }

    /// Validate that this header describes a little-endian SPK kernel.
    pub fn check_spk(&self) -> Result<(), PenumbraError> {
        if !self.idword.starts_with("DAF/SPK") {
            return Err(PenumbraError::EphemerisLoad(format!(
                "not an SPK kernel (id word '{}')",
                self.idword
            )));
        }
        if self.locfmt == "BIG-IEEE" {
            return Err(PenumbraError::EphemerisLoad(
                "big-endian (BIG-IEEE) kernels are not supported".into(),
            ));
        }
        if !self.locfmt.is_empty() && self.locfmt != "LTL-IEEE" {
            return Err(PenumbraError::EphemerisLoad(format!(
                "unknown binary format '{}'",
                self.locfmt
            )));
        }
        if self.nd != 2 || self.ni != 6 {
            return Err(PenumbraError::EphemerisLoad(format!(
                "unexpected summary layout ND={} NI={}",
                self.nd, self.ni
            )));
        }
        if self.fward < 2 {
            return Err(PenumbraError::EphemerisLoad(format!(
                "invalid first summary record {}",
                self.fward
            )));
        }
        Ok(())
    }

    /// Size of one segment summary in DP-words: `ND + ceil(NI / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL: usize = 18;
        const VALUE: usize = 50;
        let border = format!("+{:-<l$}+{:-<v$}+", "", "", l = LABEL + 1, v = VALUE + 1);

        let rows = [
            ("ID Word", self.idword.clone()),
            ("Internal Name", self.internal_filename.clone()),
            ("ND / NI", format!("{} doubles, {} integers", self.nd, self.ni)),
            (
                "Summary Records",
                format!("first #{}, last #{}", self.fward, self.bward),
            ),
            ("Free Addr", self.free.to_string()),
            ("Binary Format", self.locfmt.clone()),
        ];

        writeln!(f, "{border}")?;
        writeln!(f, "| {:<LABEL$}| {:<VALUE$}|", "DAF File Header", "")?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(f, "| {label:<LABEL$}| {value:<VALUE$}|")?;
        }
        writeln!(f, "{border}")
    }
}
