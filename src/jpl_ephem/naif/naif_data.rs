//! High-level loader for NAIF/JPL SPK ephemerides.
//!
//! Ties together the DAF file record, the linked list of summary records, the
//! per-segment directory footers and the Chebyshev records, and exposes
//! barycentric states for any body whose chain of segments reaches the Solar
//! System Barycenter.
//!
//! # Loading pipeline
//! 1. Decode and validate the **DAF header** (little-endian SPK only).
//! 2. Walk every **summary record** through its forward pointer.
//! 3. For each type 2 segment, read its **directory** and all **records**.
//!    Segments of other types are skipped with a warning.
//!
//! # Units & time scales
//! * Times are **ET/TDB seconds past J2000**.
//! * Positions are **kilometres**, velocities **km/s**, axes ICRF.
use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::constants::EphemerisTime;
use crate::jpl_ephem::state_vector::StateVector;
use crate::penumbra_errors::PenumbraError;

use super::{
    daf_header::{DAFHeader, DAF_RECORD_SIZE},
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    naif_ids::{naif_type::SpkDataType, NaifIds, SSB_ID},
    summary_record::{parse_summary_control, Summary},
};

/// Longest chain of segments followed when resolving a body to the barycenter.
const MAX_CHAIN_LENGTH: usize = 8;

/// One decoded SPK type 2 segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SpkSegment {
    pub summary: Summary,
    pub directory: DirectoryData,
    pub records: Vec<EphemerisRecord>,
}

impl SpkSegment {
    /// State of `summary.target` relative to `summary.center` at `et_seconds`.
    ///
    /// The caller checks coverage; out-of-span epochs are evaluated on the
    /// nearest record.
    pub fn interpolate(&self, et_seconds: EphemerisTime) -> StateVector {
        let record = &self.records[self.directory.record_index(et_seconds)];
        let (position, velocity) = record.interpolate(et_seconds);
        StateVector::new(position, velocity)
    }
}

/// In-memory bundle of a loaded SPK kernel, segments indexed by target ID.
#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    pub(crate) segments: HashMap<i32, Vec<SpkSegment>>,
}

fn load_error(what: &str) -> impl Fn(std::io::Error) -> PenumbraError + '_ {
    move |e| PenumbraError::EphemerisLoad(format!("{what}: {e}"))
}

impl NaifData {
    /// Load and decode an SPK file.
    ///
    /// Arguments
    /// -----------------
    /// * `file_path`: filesystem location of the kernel.
    ///
    /// Return
    /// ----------
    /// * The decoded kernel, or [`PenumbraError::EphemerisLoad`] if the file is
    ///   missing, truncated or not a little-endian SPK.
    pub fn read_naif_file(file_path: &Utf8Path) -> Result<Self, PenumbraError> {
        let file = File::open(file_path).map_err(|e| {
            PenumbraError::EphemerisLoad(format!("cannot open {file_path}: {e}"))
        })?;
        info!(path = %file_path, "loading SPK kernel");
        Self::from_reader(&mut BufReader::new(file))
    }

    /// Decode an SPK kernel from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, PenumbraError> {
        let mut buffer = [0u8; DAF_RECORD_SIZE];
        reader
            .read_exact(&mut buffer)
            .map_err(load_error("truncated DAF file record"))?;
        let (_, daf_header) = DAFHeader::parse(&buffer)
            .map_err(|e| PenumbraError::EphemerisLoad(format!("DAF file record: {e}")))?;
        daf_header.check_spk()?;

        let summary_bytes = daf_header.summary_words() * 8;
        let max_summaries = (DAF_RECORD_SIZE - 24) / summary_bytes;

        let mut segments: HashMap<i32, Vec<SpkSegment>> = HashMap::new();
        let mut record_number = daf_header.fward as u64;
        let mut visited = 0usize;

        while record_number > 0 {
            visited += 1;
            if visited > 10_000 {
                return Err(PenumbraError::EphemerisLoad(
                    "summary record chain does not terminate".into(),
                ));
            }

            reader.seek(SeekFrom::Start((record_number - 1) * DAF_RECORD_SIZE as u64))?;
            reader
                .read_exact(&mut buffer)
                .map_err(load_error("truncated summary record"))?;
            let (_, (next, _prev, nsum)) = parse_summary_control(&buffer).map_err(|e| {
                PenumbraError::EphemerisLoad(format!("summary record control words: {e}"))
            })?;

            let nsum = nsum as usize;
            if nsum > max_summaries {
                return Err(PenumbraError::EphemerisLoad(format!(
                    "summary record #{record_number} claims {nsum} summaries"
                )));
            }

            let summaries = (0..nsum)
                .map(|i| {
                    let start = 24 + i * summary_bytes;
                    Summary::parse(&buffer[start..start + summary_bytes])
                        .map(|(_, summary)| summary)
                        .map_err(|e| {
                            PenumbraError::EphemerisLoad(format!("segment summary: {e}"))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            for summary in summaries {
                if let Some(segment) = Self::read_segment(reader, summary)? {
                    segments
                        .entry(segment.summary.target)
                        .or_default()
                        .push(segment);
                }
            }

            record_number = next as u64;
        }

        if segments.is_empty() {
            return Err(PenumbraError::EphemerisLoad(
                "kernel contains no usable segment".into(),
            ));
        }

        info!(
            kernel = %daf_header.internal_filename,
            segments = segments.values().map(Vec::len).sum::<usize>(),
            "SPK kernel loaded"
        );

        Ok(NaifData {
            daf_header,
            segments,
        })
    }

    fn read_segment<R: Read + Seek>(
        reader: &mut R,
        summary: Summary,
    ) -> Result<Option<SpkSegment>, PenumbraError> {
        match SpkDataType::try_from(summary.data_type) {
            Ok(SpkDataType::ChebyshevPositionOnly) => {}
            other => {
                let kind = other.map_or_else(|e| e.to_string(), |t| t.to_string());
                warn!(
                    target_id = summary.target,
                    center_id = summary.center,
                    kind = %kind,
                    "skipping SPK segment that is not type 2"
                );
                return Ok(None);
            }
        }
        if summary.initial_addr < 1 || summary.final_addr < summary.initial_addr {
            return Err(PenumbraError::EphemerisLoad(format!(
                "invalid addresses {}..{} for target {}",
                summary.initial_addr, summary.final_addr, summary.target
            )));
        }

        let final_addr = summary.final_addr as usize;
        let file_words = reader.seek(SeekFrom::End(0))? / 8;
        if final_addr as u64 > file_words {
            return Err(PenumbraError::EphemerisLoad(format!(
                "segment {} -> {} ends at word {final_addr}, past the end of the file",
                summary.target, summary.center
            )));
        }

        let directory = DirectoryData::parse(reader, final_addr)?;
        let expected_end = directory
            .data_words()
            .and_then(|words| words.checked_add(summary.initial_addr as usize))
            .and_then(|end| end.checked_add(3));
        if expected_end != Some(final_addr) {
            return Err(PenumbraError::EphemerisLoad(format!(
                "segment {} -> {}: directory does not match the segment size",
                summary.target, summary.center
            )));
        }

        let records = EphemerisRecord::parse(
            reader,
            summary.initial_addr as usize,
            directory.rsize,
            directory.n_records,
        )?;

        debug!(
            target_id = summary.target,
            center_id = summary.center,
            records = records.len(),
            "SPK segment decoded"
        );

        Ok(Some(SpkSegment {
            summary,
            directory,
            records,
        }))
    }

    pub fn header(&self) -> &DAFHeader {
        &self.daf_header
    }

    /// All segments, ordered by target then start epoch.
    pub fn segments(&self) -> Vec<&SpkSegment> {
        let mut all: Vec<&SpkSegment> = self.segments.values().flatten().collect();
        all.sort_by(|a, b| {
            a.summary
                .target
                .cmp(&b.summary.target)
                .then(a.summary.start_epoch.total_cmp(&b.summary.start_epoch))
        });
        all
    }

    /// The segment of `target` whose span contains `et_seconds`.
    ///
    /// When several overlap, the one loaded last wins, as in SPICE.
    fn segment(&self, target: i32, et_seconds: EphemerisTime) -> Option<&SpkSegment> {
        self.segments
            .get(&target)?
            .iter()
            .rev()
            .find(|segment| segment.summary.covers(et_seconds))
    }

    /// Interpolate the state of `target` relative to `center` from a single
    /// segment.
    pub fn ephemeris(
        &self,
        target: NaifIds,
        center: NaifIds,
        et_seconds: EphemerisTime,
    ) -> Option<StateVector> {
        self.segments
            .get(&target.to_id())?
            .iter()
            .rev()
            .find(|s| s.summary.center == center.to_id() && s.summary.covers(et_seconds))
            .map(|segment| segment.interpolate(et_seconds))
    }

    /// State of `target` relative to the Solar System Barycenter, summing the
    /// segments of its chain (e.g. Moon → Earth-Moon barycenter → SSB).
    ///
    /// Return
    /// ----------
    /// * `None` when some link of the chain is missing at `et_seconds`.
    pub fn state_wrt_ssb(&self, target: i32, et_seconds: EphemerisTime) -> Option<StateVector> {
        let mut body = target;
        let mut state = StateVector::zeros();
        for _ in 0..MAX_CHAIN_LENGTH {
            if body == SSB_ID {
                return Some(state);
            }
            let segment = self.segment(body, et_seconds)?;
            state = state + segment.interpolate(et_seconds);
            body = segment.summary.center;
        }
        None
    }

    /// ET span over which [`Self::state_wrt_ssb`] succeeds for `target`.
    ///
    /// Each link contributes the hull of its segments' spans; the result is the
    /// intersection over the chain, following the first segment of each link.
    pub fn coverage_wrt_ssb(&self, target: i32) -> Option<(EphemerisTime, EphemerisTime)> {
        let mut body = target;
        let mut span = (f64::NEG_INFINITY, f64::INFINITY);
        for _ in 0..MAX_CHAIN_LENGTH {
            if body == SSB_ID {
                return (span.0 <= span.1).then_some(span);
            }
            let link = self.segments.get(&body)?;
            let start = link
                .iter()
                .map(|s| s.summary.start_epoch)
                .fold(f64::INFINITY, f64::min);
            let end = link
                .iter()
                .map(|s| s.summary.end_epoch)
                .fold(f64::NEG_INFINITY, f64::max);
            span = (span.0.max(start), span.1.min(end));
            body = link.first()?.summary.center;
        }
        None
    }
}

impl fmt::Display for NaifData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{:-^78}+", " Ephemeris File Information ")?;
        write!(f, "{}", self.daf_header)?;
        writeln!(f, "+{:-^78}+", " Available Segments ")?;
        for segment in self.segments() {
            writeln!(f, "{}", segment.summary)?;
            writeln!(f, "| {:<76} |", segment.directory.to_string())?;
            writeln!(f, "+{:-^78}+", "")?;
        }
        Ok(())
    }
}
