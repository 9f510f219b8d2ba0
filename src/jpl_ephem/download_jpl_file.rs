//! Where the SPK kernel comes from.
//!
//! An [`EphemFileSource`] is parsed from a user string:
//!
//! * `"naif:DE421"` – a named NAIF kernel, looked up in the user cache
//!   directory (`<cache>/penumbra_cache/jpl_ephem/de421.bsp`) and downloaded
//!   there on first use (`jpl-download` feature, on by default);
//! * anything else – a filesystem path to a `.bsp` file.
//!
//! [`EphemFilePath::get_ephemeris_file`] resolves a source to an existing file.
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use super::naif::naif_version::NaifVersion;
use crate::penumbra_errors::PenumbraError;

#[derive(Debug, Clone, PartialEq)]
pub enum EphemFileSource {
    Naif(NaifVersion),
    Path(Utf8PathBuf),
}

impl TryFrom<&str> for EphemFileSource {
    type Error = PenumbraError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(PenumbraError::InvalidJPLStringFormat(
                "empty ephemeris source".into(),
            ));
        }
        match value.split_once(':') {
            Some((prefix, version)) if prefix.eq_ignore_ascii_case("naif") => {
                Ok(EphemFileSource::Naif(version.parse()?))
            }
            _ => Ok(EphemFileSource::Path(Utf8PathBuf::from(value))),
        }
    }
}

impl std::str::FromStr for EphemFileSource {
    type Err = PenumbraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EphemFileSource::try_from(s)
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::Path(path) => write!(f, "{path}"),
        }
    }
}

/// A resolved, existing kernel file.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemFilePath(Utf8PathBuf);

impl EphemFilePath {
    pub fn path(&self) -> &Utf8Path {
        &self.0
    }

    /// Cache directory holding the named kernels.
    pub fn cache_dir() -> Result<Utf8PathBuf, PenumbraError> {
        let base_dir = BaseDirs::new().ok_or_else(|| {
            PenumbraError::UnableToCreateBaseDir("no home directory for the cache".into())
        })?;
        let cache = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
            PenumbraError::UnableToCreateBaseDir(format!(
                "cache path {:?} is not UTF-8",
                base_dir.cache_dir()
            ))
        })?;
        Ok(cache.join("penumbra_cache").join("jpl_ephem"))
    }

    /// Resolve a source to an existing file, downloading named kernels if
    /// allowed.
    ///
    /// Return
    /// ----------
    /// * The kernel location, or [`PenumbraError::JPLFileNotFound`].
    pub fn get_ephemeris_file(source: &EphemFileSource) -> Result<Self, PenumbraError> {
        match source {
            EphemFileSource::Path(_) => Self::resolve_in(source, Utf8Path::new("")),
            EphemFileSource::Naif(_) => Self::resolve_in(source, &Self::cache_dir()?),
        }
    }

    /// Same as [`EphemFilePath::get_ephemeris_file`], named kernels living in `cache`.
    pub fn resolve_in(source: &EphemFileSource, cache: &Utf8Path) -> Result<Self, PenumbraError> {
        match source {
            EphemFileSource::Path(path) => {
                if path.is_file() {
                    Ok(EphemFilePath(path.clone()))
                } else {
                    Err(PenumbraError::JPLFileNotFound(path.to_string()))
                }
            }
            EphemFileSource::Naif(version) => {
                let local_file = cache.join(version.get_filename());
                if local_file.is_file() {
                    return Ok(EphemFilePath(local_file));
                }
                Self::fetch(*version, local_file)
            }
        }
    }

    #[cfg(feature = "jpl-download")]
    fn fetch(version: NaifVersion, local_file: Utf8PathBuf) -> Result<Self, PenumbraError> {
        if let Some(parent) = local_file.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PenumbraError::UnableToCreateBaseDir(e.to_string()))?;
        }
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(download_big_file(&version.url(), &local_file))?;
        Ok(EphemFilePath(local_file))
    }

    #[cfg(not(feature = "jpl-download"))]
    fn fetch(version: NaifVersion, local_file: Utf8PathBuf) -> Result<Self, PenumbraError> {
        Err(PenumbraError::JPLFileNotFound(format!(
            "{local_file} (download {} or enable the jpl-download feature)",
            version.url()
        )))
    }
}

impl fmt::Display for EphemFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stream a large file to disk, writing to a temporary name first so that an
/// interrupted download never leaves a truncated kernel in the cache.
#[cfg(feature = "jpl-download")]
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), PenumbraError> {
    use tokio::{fs::File, io::AsyncWriteExt};
    use tokio_stream::StreamExt;

    let partial = path.with_extension("bsp.part");
    let mut file = File::create(&partial).await?;
    tracing::info!(%url, "downloading JPL ephemeris");

    let response = reqwest::get(url).await?.error_for_status()?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    tokio::fs::rename(&partial, path).await?;

    tracing::info!(%path, "JPL ephemeris downloaded");
    Ok(())
}
