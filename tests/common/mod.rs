//! Synthetic SPK kernels for the integration tests and the benches.
//!
//! [`SpkWriter`] emits a little-endian DAF/SPK file made of type 2 segments
//! describing bodies in uniform rectilinear motion. Each record holds three
//! Chebyshev coefficients per axis, so the interpolated position is exact.
#![allow(dead_code)]

use std::io::Write;

use camino::Utf8PathBuf;
use hifitime::Epoch;
use tempfile::TempDir;

pub const AU_KM: f64 = 149_597_870.7;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const ECLIPSE_DATE: &str = "2024-04-08";
/// Lateral speed of the synthetic Moon, km/s.
pub const MOON_SPEED: f64 = 96.7;

const RECORD_BYTES: usize = 1024;
const RECORD_WORDS: usize = RECORD_BYTES / 8;
const SUMMARY_WORDS: usize = 5;

/// Noon UTC of [`ECLIPSE_DATE`], in ET seconds.
pub fn eclipse_noon_et() -> f64 {
    Epoch::from_gregorian_utc_at_noon(2024, 4, 8).to_et_seconds()
}

/// One segment: `target` relative to `center`, at `position` (km) at `t0`
/// and moving with constant `velocity` (km/s).
#[derive(Debug, Clone)]
pub struct LinearSegment {
    pub target: i32,
    pub center: i32,
    pub data_type: i32,
    pub t0: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub start: f64,
    pub interval: f64,
    pub n_records: usize,
}

impl LinearSegment {
    pub fn at_rest(target: i32, center: i32, position: [f64; 3], start: f64, days: usize) -> Self {
        LinearSegment {
            target,
            center,
            data_type: 2,
            t0: start,
            position,
            velocity: [0.0; 3],
            start,
            interval: SECONDS_PER_DAY,
            n_records: days,
        }
    }

    fn end(&self) -> f64 {
        self.start + self.interval * self.n_records as f64
    }

    fn rsize(&self) -> usize {
        2 + 3 * 3
    }

    /// Record data followed by the directory footer.
    fn words(&self) -> Vec<f64> {
        let radius = self.interval / 2.0;
        let mut words = Vec::with_capacity(self.n_records * self.rsize() + 4);
        for k in 0..self.n_records {
            let mid = self.start + (k as f64 + 0.5) * self.interval;
            words.push(mid);
            words.push(radius);
            for axis in 0..3 {
                words.push(self.position[axis] + self.velocity[axis] * (mid - self.t0));
                words.push(self.velocity[axis] * radius);
                words.push(0.0);
            }
        }
        words.extend([
            self.start,
            self.interval,
            self.rsize() as f64,
            self.n_records as f64,
        ]);
        words
    }
}

/// Little-endian DAF/SPK writer.
#[derive(Debug, Clone)]
pub struct SpkWriter {
    pub segments: Vec<LinearSegment>,
    pub summaries_per_record: usize,
    pub locfmt: &'static str,
}

impl SpkWriter {
    pub fn new(segments: Vec<LinearSegment>) -> Self {
        SpkWriter {
            segments,
            summaries_per_record: 25,
            locfmt: "LTL-IEEE",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let chunks: Vec<&[LinearSegment]> =
            self.segments.chunks(self.summaries_per_record).collect();
        // file record, then one summary record and one name record per chunk
        let n_header_records = 1 + 2 * chunks.len();
        let mut next_addr = n_header_records * RECORD_WORDS + 1;

        let mut data = Vec::new();
        let mut addresses = Vec::new();
        for segment in &self.segments {
            let words = segment.words();
            addresses.push((next_addr, next_addr + words.len() - 1));
            next_addr += words.len();
            data.extend(words);
        }

        let mut bytes = Vec::with_capacity(n_header_records * RECORD_BYTES + data.len() * 8);
        bytes.extend(self.file_record(chunks.len(), next_addr));

        let mut segment_index = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            let record_number = 2 + 2 * i;
            let next = if i + 1 < chunks.len() { record_number + 2 } else { 0 };
            let prev = if i == 0 { 0 } else { record_number - 2 };

            let mut summary = Vec::with_capacity(RECORD_BYTES);
            for control in [next as f64, prev as f64, chunk.len() as f64] {
                summary.extend(control.to_le_bytes());
            }
            for segment in chunk.iter() {
                let (initial, last) = addresses[segment_index];
                segment_index += 1;
                summary.extend(segment.start.to_le_bytes());
                summary.extend(segment.end().to_le_bytes());
                for int in [
                    segment.target,
                    segment.center,
                    1,
                    segment.data_type,
                    initial as i32,
                    last as i32,
                ] {
                    summary.extend(int.to_le_bytes());
                }
            }
            summary.resize(RECORD_BYTES, 0);
            bytes.extend(summary);
            bytes.extend([b' '; RECORD_BYTES]);
        }

        for word in data {
            bytes.extend(word.to_le_bytes());
        }
        bytes
    }

    fn file_record(&self, n_summary_records: usize, free: usize) -> Vec<u8> {
        let mut record = Vec::with_capacity(RECORD_BYTES);
        record.extend(b"DAF/SPK ");
        record.extend(2i32.to_le_bytes());
        record.extend(6i32.to_le_bytes());
        record.extend(format!("{:<60}", "PENUMBRA SYNTHETIC KERNEL").as_bytes());
        record.extend(2i32.to_le_bytes());
        record.extend((2 * n_summary_records as i32).to_le_bytes());
        record.extend((free as i32).to_le_bytes());
        record.extend(self.locfmt.as_bytes());
        record.resize(RECORD_BYTES, 0);
        record
    }

    /// Write the kernel into a fresh temporary directory.
    pub fn write(&self) -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("synthetic.bsp")).unwrap();
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&self.to_bytes()).unwrap();
        (dir, path)
    }
}

/// Earth at rest at the barycenter, Sun 1 AU along +x, and the Moon halfway,
/// crossing the Sun line along +y at noon UTC on [`ECLIPSE_DATE`].
///
/// `moon_offset_km` lifts the Moon track along +z. The kernel spans from
/// 36 hours before to 84 hours after that noon.
pub fn eclipse_segments(moon_offset_km: f64) -> Vec<LinearSegment> {
    let t0 = eclipse_noon_et();
    let start = t0 - 1.5 * SECONDS_PER_DAY;
    vec![
        LinearSegment::at_rest(3, 0, [0.0; 3], start, 5),
        LinearSegment::at_rest(399, 3, [0.0; 3], start, 5),
        LinearSegment::at_rest(10, 0, [AU_KM, 0.0, 0.0], start, 5),
        LinearSegment {
            target: 301,
            center: 3,
            data_type: 2,
            t0,
            position: [0.5 * AU_KM, 0.0, moon_offset_km],
            velocity: [0.0, MOON_SPEED, 0.0],
            start,
            interval: SECONDS_PER_DAY,
            n_records: 5,
        },
    ]
}

/// Write the eclipse scenario of [`eclipse_segments`] to a temporary file.
pub fn write_eclipse_kernel(moon_offset_km: f64) -> (TempDir, Utf8PathBuf) {
    SpkWriter::new(eclipse_segments(moon_offset_km)).write()
}
