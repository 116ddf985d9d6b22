//! Exports the [`process_export`] function which stitches together the
//! stages of post-processing a journal export: replicating the archive
//! ([`crate::replicate`]), transcoding resource images
//! ([`crate::transcode`]), transforming entry pages ([`crate::entry`]),
//! aggregating the combined trip map onto the index ([`crate::index`]),
//! and the final polish passes.

use std::fmt;

use crate::config::Config;
use crate::entry::{self, Error as EntryError};
use crate::index::{self, Error as IndexError};
use crate::replicate::{self, Error as ReplicateError};
use crate::transcode::{self, Error as TranscodeError};

/// Runs the whole pipeline over one export, strictly in order. Later
/// stages depend on earlier ones: everything mutates the tree replication
/// produced, and index aggregation reads the image references the entry
/// transformation rewrote.
pub fn process_export(config: &Config) -> Result<()> {
    replicate::copy_export(config)?;
    transcode::convert_images(config)?;
    entry::process_entries(config)?;
    index::inject_trip_map(config)?;
    index::beautify_index(config)?;
    index::strip_empty_paragraphs(config)?;
    entry::strip_empty_paragraphs(config)?;
    entry::apply_responsive_styles(config)?;
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for processing an export. Each stage owns its error
/// type; this wraps them for the binary.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors replicating the export tree.
    Replicate(ReplicateError),

    /// Returned for errors transcoding resource images.
    Transcode(TranscodeError),

    /// Returned for errors transforming entry pages.
    Entry(EntryError),

    /// Returned for errors aggregating the index map.
    Index(IndexError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Replicate(err) => write!(f, "Replicating export: {}", err),
            Error::Transcode(err) => write!(f, "Converting images: {}", err),
            Error::Entry(err) => write!(f, "Transforming entries: {}", err),
            Error::Index(err) => write!(f, "Building index map: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Replicate(err) => Some(err),
            Error::Transcode(err) => Some(err),
            Error::Entry(err) => Some(err),
            Error::Index(err) => Some(err),
        }
    }
}

impl From<ReplicateError> for Error {
    /// Converts [`ReplicateError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: ReplicateError) -> Error {
        Error::Replicate(err)
    }
}

impl From<TranscodeError> for Error {
    /// Converts [`TranscodeError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: TranscodeError) -> Error {
        Error::Transcode(err)
    }
}

impl From<EntryError> for Error {
    /// Converts [`EntryError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: EntryError) -> Error {
        Error::Entry(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}
