use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

use crate::jpl_ephem::naif::naif_ids::{naif_type::SpkDataType, NaifIds};

/// Descriptor of one SPK segment (ND = 2, NI = 6).
///
/// `start_epoch` / `end_epoch` are ET seconds past J2000. Addresses are 1-based
/// DP-word indices into the file.
#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    pub start_epoch: f64,
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub initial_addr: i32,
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;
        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        (self.start_epoch..=self.end_epoch).contains(&et_seconds)
    }
}

/// Parse the control words of a summary record: `(next, previous, nsum)`.
pub fn parse_summary_control(input: &[u8]) -> IResult<&[u8], (f64, f64, f64)> {
    let (input, next) = le_f64(input)?;
    let (input, prev) = le_f64(input)?;
    let (input, nsum) = le_f64(input)?;
    Ok((input, (next, prev, nsum)))
}

fn body_name(id: i32) -> String {
    NaifIds::from_id(id)
        .map(|naif| naif.to_string())
        .unwrap_or_else(|_| format!("NAIF {id}"))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = Epoch::from_et_seconds(self.start_epoch);
        let end = Epoch::from_et_seconds(self.end_epoch);
        let data_type = SpkDataType::try_from(self.data_type)
            .map(|t| t.to_string())
            .unwrap_or_else(|_| format!("type {}", self.data_type));

        writeln!(
            f,
            "| {:<16}| {:<58}|",
            "Target",
            format!("{} ({})", body_name(self.target), self.target)
        )?;
        writeln!(
            f,
            "| {:<16}| {:<58}|",
            "Center",
            format!("{} ({})", body_name(self.center), self.center)
        )?;
        writeln!(f, "| {:<16}| {:<58}|", "Start", start.to_string())?;
        writeln!(f, "| {:<16}| {:<58}|", "End", end.to_string())?;
        writeln!(f, "| {:<16}| {:<58}|", "Frame", self.frame_id)?;
        writeln!(f, "| {:<16}| {:<58}|", "Data type", data_type)?;
        write!(
            f,
            "| {:<16}| {:<58}|",
            "Addresses",
            format!("{} .. {}", self.initial_addr, self.final_addr)
        )
    }
}
