//! Export replication: clones the source tree into the output directory
//! that every later stage mutates. An existing output tree is taken as
//! authoritative and left completely alone (no merging, no diffing, no
//! overwriting), so interrupted or repeated runs never clobber work the
//! user may have done on the copy.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;

/// Copies the source export into the output directory, or does nothing at
/// all if the output directory already exists. Any copy error is fatal.
pub fn copy_export(config: &Config) -> Result<()> {
    if config.output_directory.exists() {
        info!(
            "{} already exists, using existing copy",
            config.output_directory.display()
        );
        return Ok(());
    }

    info!("copying export to {}", config.output_directory.display());
    for entry in WalkDir::new(&config.source_directory) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(&config.source_directory)
            .expect("walked path is under the source directory");
        let target = config.output_directory.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error replicating the export tree.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors walking the source tree.
    Walk(walkdir::Error),

    /// Returned for errors creating or copying output files.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Walk(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Walk(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::Walk(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
