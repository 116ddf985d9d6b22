//! Defines the [`Config`] type: the set of paths a single processing run
//! works against. The export layout is fixed: an `Entries/` directory of
//! per-entry pages and a `Resources/` directory of images and sidecars,
//! with an optional top-level `index.html`. The derived paths are
//! computed once here and handed to every stage rather than recomputed
//! from module-level constants.

use std::path::{Path, PathBuf};

const ENTRIES_DIR: &str = "Entries";
const RESOURCES_DIR: &str = "Resources";
const INDEX_FILE: &str = "index.html";
const OUTPUT_SUFFIX: &str = "_png";

/// Paths for one processing run. Everything except `source_directory`
/// points into the output tree, which is the only tree the pipeline
/// mutates.
pub struct Config {
    /// The exported journal to process. Read, never written.
    pub source_directory: PathBuf,

    /// The working copy produced by replication. All later stages mutate
    /// files under this directory.
    pub output_directory: PathBuf,

    /// The per-entry HTML pages inside the output tree.
    pub entries_directory: PathBuf,

    /// The images and JSON sidecars inside the output tree.
    pub resources_directory: PathBuf,
}

impl Config {
    /// Builds a config for a source export and an explicit output
    /// directory.
    pub fn new(source_directory: PathBuf, output_directory: PathBuf) -> Config {
        Config {
            entries_directory: output_directory.join(ENTRIES_DIR),
            resources_directory: output_directory.join(RESOURCES_DIR),
            source_directory,
            output_directory,
        }
    }

    /// Builds a config whose output directory sits next to the source,
    /// named after it with a `_png` suffix. The source path should be
    /// absolute so that the sibling is well-defined.
    pub fn from_source(source_directory: PathBuf) -> Config {
        let name = match source_directory.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => String::from("journal"),
        };
        let output = source_directory
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}{}", name, OUTPUT_SUFFIX));
        Config::new(source_directory, output)
    }

    /// The top-level index page, if the export carries one.
    pub fn index_file(&self) -> PathBuf {
        self.output_directory.join(INDEX_FILE)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_derives_subdirectories() {
        let config = Config::new(PathBuf::from("/export"), PathBuf::from("/out"));
        assert_eq!(config.entries_directory, PathBuf::from("/out/Entries"));
        assert_eq!(config.resources_directory, PathBuf::from("/out/Resources"));
        assert_eq!(config.index_file(), PathBuf::from("/out/index.html"));
    }

    #[test]
    fn test_default_output_is_suffixed_sibling() {
        let config = Config::from_source(PathBuf::from("/home/me/Journal"));
        assert_eq!(config.output_directory, PathBuf::from("/home/me/Journal_png"));
    }
}
