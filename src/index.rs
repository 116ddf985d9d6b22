//! Index aggregation: a second pass over the entry pages that collects
//! every visit across the whole export into one combined map on the
//! index page, colored and filterable by day, followed by the index
//! styling and cleanup passes.
//!
//! Entries are visited in filename order, which the date-prefixed naming
//! convention makes chronological. Each distinct date prefix draws the
//! next palette color on first sight and keeps it for the whole run;
//! once the palette runs out, colors wrap around and unrelated days
//! share one.
//!
//! This pass runs after the entry transformation, so it looks for the
//! rewritten `.png` references and resolves sidecars from those.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use scraper::{Html, Selector};
use tracing::info;

use crate::config::Config;
use crate::dom;
use crate::entry::html_files;
use crate::map::{self, TaggedVisit, DAY_PALETTE};
use crate::sidecar;
use crate::theme;
use crate::util::ends_with_ignore_case;

const PNG_SUFFIX: &str = ".png";

/// Collects every tagged visit across all entries and appends the
/// combined trip map to the index page. Skips quietly when the export
/// has no index page or no entry contributed a visit.
pub fn inject_trip_map(config: &Config) -> Result<()> {
    let index_file = config.index_file();
    if !index_file.exists() {
        info!("index.html not found, skipping full trip map");
        return Ok(());
    }

    let (visits, days) = collect_tagged_visits(config)?;
    if visits.is_empty() {
        info!("no visits found, skipping full trip map");
        return Ok(());
    }

    let mut doc = Html::parse_document(&fs::read_to_string(&index_file)?);
    let body = dom::body(&doc).ok_or_else(|| Error::missing(&index_file, "body"))?;
    dom::append_fragment(&mut doc, body, &map::trip_map(&visits, &days));
    fs::write(&index_file, doc.html())?;
    info!("full trip map updated with auto-zoom for visible markers");
    Ok(())
}

/// Applies the index styling: viewport meta if absent, the index
/// stylesheet, the paragraph/div wrapper, and empty-paragraph removal.
pub fn beautify_index(config: &Config) -> Result<()> {
    let index_file = config.index_file();
    if !index_file.exists() {
        return Ok(());
    }

    let mut doc = Html::parse_document(&fs::read_to_string(&index_file)?);
    let head = dom::head(&doc).ok_or_else(|| Error::missing(&index_file, "head"))?;
    let body = dom::body(&doc).ok_or_else(|| Error::missing(&index_file, "body"))?;

    if !dom::has_viewport(&doc) {
        dom::prepend_fragment(&mut doc, head, theme::VIEWPORT_META);
    }
    dom::append_fragment(&mut doc, head, &theme::style_block(theme::INDEX_STYLE));
    dom::wrap_children(&mut doc, body, theme::INDEX_CONTAINER, |node| {
        node.value()
            .as_element()
            .map(|el| el.name() == "p" || el.name() == "div")
            .unwrap_or(false)
    });
    dom::remove_empty_paragraphs(&mut doc);

    fs::write(&index_file, doc.html())?;
    info!("index beautified and mobile responsive");
    Ok(())
}

/// Strips paragraphs with no text content from the index page.
pub fn strip_empty_paragraphs(config: &Config) -> Result<()> {
    let index_file = config.index_file();
    if !index_file.exists() {
        return Ok(());
    }
    let mut doc = Html::parse_document(&fs::read_to_string(&index_file)?);
    dom::remove_empty_paragraphs(&mut doc);
    fs::write(&index_file, doc.html())?;
    info!("removed empty paragraphs from index page");
    Ok(())
}

/// Walks the entries in filename order, assigns each date prefix its
/// color, and gathers every visit tagged with that color and date.
/// Returns the visits and the distinct days in first-seen order.
fn collect_tagged_visits(
    config: &Config,
) -> std::io::Result<(Vec<TaggedVisit>, Vec<(String, &'static str)>)> {
    let selector = Selector::parse("img").expect("img selector");
    let mut days = DayColors::new();
    let mut visits = Vec::new();

    for path in html_files(&config.entries_directory)? {
        let date = date_prefix(&path);
        let color = days.color_for(&date);
        let doc = Html::parse_document(&fs::read_to_string(&path)?);
        for img in doc.select(&selector) {
            let src = match img.value().attr("src") {
                Some(src) => src,
                None => continue,
            };
            if !ends_with_ignore_case(src, PNG_SUFFIX) {
                continue;
            }
            for visit in sidecar::visits_for(&config.resources_directory, src) {
                visits.push(TaggedVisit {
                    visit,
                    color,
                    date: date.clone(),
                });
            }
        }
    }

    Ok((visits, days.order))
}

/// The text before the first underscore of the filename stem.
fn date_prefix(path: &Path) -> String {
    let stem = match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => String::new(),
    };
    match stem.split('_').next() {
        Some(date) => date.to_owned(),
        None => stem,
    }
}

/// Date-prefix to palette-color assignment, in first-seen order.
struct DayColors {
    by_date: HashMap<String, &'static str>,
    order: Vec<(String, &'static str)>,
}

impl DayColors {
    fn new() -> DayColors {
        DayColors {
            by_date: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Returns the color for `date`, drawing the next palette entry
    /// (wrapping on exhaustion) the first time a date is seen.
    fn color_for(&mut self, date: &str) -> &'static str {
        if let Some(&color) = self.by_date.get(date) {
            return color;
        }
        let color = DAY_PALETTE[self.by_date.len() % DAY_PALETTE.len()];
        self.by_date.insert(date.to_owned(), color);
        self.order.push((date.to_owned(), color));
        color
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error building the index page.
#[derive(Debug)]
pub enum Error {
    /// The index page is missing a structural element.
    MissingStructure {
        path: PathBuf,
        element: &'static str,
    },

    /// Returned for I/O errors reading entries or the index.
    Io(std::io::Error),
}

impl Error {
    fn missing(path: &Path, element: &'static str) -> Error {
        Error::MissingStructure {
            path: path.to_owned(),
            element,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingStructure { path, element } => {
                write!(f, "No <{}> element in '{}'", element, path.display())
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingStructure { .. } => None,
            Error::Io(err) => Some(err),
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_same_date_reuses_color() {
        let mut days = DayColors::new();
        let first = days.color_for("2024-05-01");
        days.color_for("2024-05-02");
        assert_eq!(days.color_for("2024-05-01"), first);
        assert_eq!(days.order.len(), 2);
    }

    #[test]
    fn test_distinct_dates_draw_palette_in_order() {
        let mut days = DayColors::new();
        for (i, date) in ["a", "b", "c", "d"].iter().enumerate() {
            assert_eq!(days.color_for(date), DAY_PALETTE[i]);
        }
    }

    #[test]
    fn test_palette_wraps_on_exhaustion() {
        let mut days = DayColors::new();
        for i in 0..DAY_PALETTE.len() {
            days.color_for(&format!("day-{}", i));
        }
        // the 16th distinct date shares the first color
        assert_eq!(days.color_for("day-extra"), DAY_PALETTE[0]);
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix(Path::new("2024-05-01_trip.html")), "2024-05-01");
        assert_eq!(date_prefix(Path::new("nounderscore.html")), "nounderscore");
    }

    #[test]
    fn test_collect_tags_visits_by_day() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(dir.path().to_owned(), dir.path().to_owned());
        fs::create_dir_all(&config.entries_directory)?;
        fs::create_dir_all(&config.resources_directory)?;

        let page = |img: &str| format!(r#"<html><body><img src="{}"></body></html>"#, img);
        fs::write(
            config.entries_directory.join("2024-05-01_a.html"),
            page("x.png"),
        )?;
        fs::write(
            config.entries_directory.join("2024-05-02_b.html"),
            page("y.png"),
        )?;
        fs::write(
            config.resources_directory.join("x.json"),
            r#"{"visits":[{"latitude":1,"longitude":2}]}"#,
        )?;
        fs::write(
            config.resources_directory.join("y.json"),
            r#"{"visits":[{"latitude":3,"longitude":4}]}"#,
        )?;

        let (visits, days) = collect_tagged_visits(&config)?;
        assert_eq!(visits.len(), 2);
        assert_eq!(
            days,
            vec![
                (String::from("2024-05-01"), DAY_PALETTE[0]),
                (String::from("2024-05-02"), DAY_PALETTE[1]),
            ],
        );
        assert_eq!(visits[0].color, DAY_PALETTE[0]);
        assert_eq!(visits[0].date, "2024-05-01");
        assert_eq!(visits[1].color, DAY_PALETTE[1]);
        Ok(())
    }

    #[test]
    fn test_heic_references_are_not_collected() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(dir.path().to_owned(), dir.path().to_owned());
        fs::create_dir_all(&config.entries_directory)?;
        fs::create_dir_all(&config.resources_directory)?;
        fs::write(
            config.entries_directory.join("2024-05-01_a.html"),
            r#"<html><body><img src="x.heic"></body></html>"#,
        )?;
        fs::write(
            config.resources_directory.join("x.json"),
            r#"{"visits":[{"latitude":1,"longitude":2}]}"#,
        )?;

        let (visits, _) = collect_tagged_visits(&config)?;
        assert!(visits.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_index_skips() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(dir.path().to_owned(), dir.path().to_owned());
        fs::create_dir_all(&config.entries_directory)?;
        fs::create_dir_all(&config.resources_directory)?;
        inject_trip_map(&config).unwrap();
        beautify_index(&config).unwrap();
        strip_empty_paragraphs(&config).unwrap();
        assert!(!config.index_file().exists());
        Ok(())
    }

    #[test]
    fn test_beautify_wraps_and_cleans() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(dir.path().to_owned(), dir.path().to_owned());
        fs::create_dir_all(&config.entries_directory)?;
        fs::write(
            config.index_file(),
            "<html><head></head><body><p>one</p><p> </p><div>two</div></body></html>",
        )?;

        beautify_index(&config).unwrap();

        let html = fs::read_to_string(config.index_file())?;
        assert!(html.contains(r#"class="entry-links""#));
        assert!(html.contains(r#"<meta name="viewport""#));
        assert!(html.contains("<p>one</p>"));
        assert_eq!(html.matches("<p>").count(), 1);
        assert!(html.contains("<div>two</div>"));
        Ok(())
    }
}
