//! Defines the [`Visit`] type and the sidecar lookup. A resource image may
//! be accompanied by a JSON file of the same basename carrying structured
//! metadata the image format itself cannot express; the only part this
//! pipeline consumes is the `visits` list of geolocation records.
//!
//! Sidecar failures are deliberately soft: a missing, unreadable, or
//! malformed sidecar contributes zero visits so the enclosing page is
//! still processed. Everything else in the pipeline treats I/O problems
//! as fatal.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// A single geolocation record from a sidecar's `visits` list.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Visit {
    pub latitude: f64,
    pub longitude: f64,

    #[serde(default, rename = "placeName")]
    pub place_name: String,

    #[serde(default)]
    pub city: String,
}

/// The sidecar document. Unknown fields are ignored; a missing `visits`
/// key is an empty list.
#[derive(Debug, Default, Deserialize)]
struct Sidecar {
    #[serde(default)]
    visits: Vec<Visit>,
}

/// Resolves the sidecar path for an image reference: the reference's
/// basename with its extension swapped for `.json`, under `resources`.
/// Returns `None` for references with no basename.
pub fn sidecar_path(resources: &Path, reference: &str) -> Option<PathBuf> {
    let stem = Path::new(reference).file_stem()?;
    Some(resources.join(Path::new(stem).with_extension("json")))
}

/// Reads the visits associated with an image reference. A missing sidecar
/// contributes nothing; an unreadable or malformed one is logged with its
/// filename and also contributes nothing.
pub fn visits_for(resources: &Path, reference: &str) -> Vec<Visit> {
    let path = match sidecar_path(resources, reference) {
        Some(path) => path,
        None => return Vec::new(),
    };
    if !path.exists() {
        return Vec::new();
    }
    match read_sidecar(&path) {
        Ok(sidecar) => sidecar.visits,
        Err(err) => {
            warn!("failed to read {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

fn read_sidecar(path: &Path) -> Result<Sidecar> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading a sidecar file. Never fatal: callers log it
/// and carry on with zero visits.
#[derive(Debug)]
pub enum Error {
    /// The sidecar exists but could not be read.
    Io(std::io::Error),

    /// The sidecar is not valid JSON (or not the expected shape).
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Json(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts [`serde_json::Error`]s into [`Error`]. This allows us to
    /// use the `?` operator.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn visit(latitude: f64, longitude: f64, place_name: &str, city: &str) -> Visit {
        Visit {
            latitude,
            longitude,
            place_name: place_name.to_owned(),
            city: city.to_owned(),
        }
    }

    #[test]
    fn test_reads_visits() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("abc.json"),
            r#"{"visits":[{"latitude":10,"longitude":20,"placeName":"Cafe","city":"Rome"}]}"#,
        )?;
        assert_eq!(
            visits_for(dir.path(), "abc.heic"),
            vec![visit(10.0, 20.0, "Cafe", "Rome")],
        );
        Ok(())
    }

    #[test]
    fn test_reference_with_directory_components() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("abc.json"),
            r#"{"visits":[{"latitude":1,"longitude":2}]}"#,
        )?;
        assert_eq!(
            visits_for(dir.path(), "../Resources/abc.png"),
            vec![visit(1.0, 2.0, "", "")],
        );
        Ok(())
    }

    #[test]
    fn test_missing_sidecar_is_empty() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(visits_for(dir.path(), "nope.heic").is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_visits_key_is_empty() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("abc.json"), r#"{"favorite": true}"#)?;
        assert!(visits_for(dir.path(), "abc.heic").is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_fields_ignored() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("abc.json"),
            r#"{"visits":[{"latitude":1,"longitude":2,"altitude":99,"country":"IT"}],"extra":[]}"#,
        )?;
        assert_eq!(visits_for(dir.path(), "abc.heic").len(), 1);
        Ok(())
    }

    #[test]
    fn test_malformed_sidecar_is_empty() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("abc.json"), "{not json")?;
        assert!(visits_for(dir.path(), "abc.heic").is_empty());
        Ok(())
    }

    #[test]
    fn test_sidecar_path_swaps_extension() {
        assert_eq!(
            sidecar_path(Path::new("/res"), "abc.heic"),
            Some(PathBuf::from("/res/abc.json")),
        );
        assert_eq!(
            sidecar_path(Path::new("/res"), "abc.png"),
            Some(PathBuf::from("/res/abc.json")),
        );
    }
}
