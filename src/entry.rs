//! Entry page transformation. Each page is parsed once, mutated in
//! memory, and written back over itself:
//!
//! * `.heic` image references become `.png`, matching the transcoded
//!   resources;
//! * every rewritten image's sidecar contributes its visits, in image
//!   order and then sidecar order;
//! * a page with any visits gets an embedded map appended to its body;
//! * the shared entry stylesheet is appended to the head and the body's
//!   children are moved into a styled container;
//! * the first asset-grid item gets the hero treatment.
//!
//! This module also owns the end-of-run polish passes over entries:
//! empty-paragraph removal and the responsive stylesheet.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ego_tree::NodeId;
use scraper::{Html, Selector};
use tracing::info;

use crate::config::Config;
use crate::dom;
use crate::map;
use crate::sidecar;
use crate::theme;
use crate::util::ends_with_ignore_case;

const HEIC_SUFFIX: &str = ".heic";
const PNG_SUFFIX: &str = ".png";

const HERO_ITEM_STYLE: &str = "grid-column: span 2; grid-row: span 2; height: 250px;";
const HERO_IMAGE_STYLE: &str = "object-fit: cover; width: 100%; height: 100%;";

/// Rewrites every entry page in place. Sidecar problems are logged and
/// skipped; anything else is fatal.
pub fn process_entries(config: &Config) -> Result<()> {
    for path in html_files(&config.entries_directory)? {
        process_entry(config, &path)?;
    }
    Ok(())
}

/// Lists the `.html` files directly under `dir`, sorted by filename. The
/// date-prefixed naming convention makes this chronological order.
pub fn html_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for result in fs::read_dir(dir)? {
        let entry = result?;
        let path = entry.path();
        let is_html = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("html"))
            .unwrap_or(false);
        if is_html && entry.file_type()?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn process_entry(config: &Config, path: &Path) -> Result<()> {
    let name = file_name(path);
    info!("updating {}", name);

    let mut doc = Html::parse_document(&fs::read_to_string(path)?);
    let body = dom::body(&doc).ok_or_else(|| Error::missing(path, "body"))?;
    let head = dom::head(&doc).ok_or_else(|| Error::missing(path, "head"))?;

    let mut visits = Vec::new();
    for (node, src) in heic_references(&doc) {
        dom::set_attr(&mut doc, node, "src", &png_reference(&src));
        visits.extend(sidecar::visits_for(&config.resources_directory, &src));
    }

    if !visits.is_empty() {
        let map_id = format!("map_{}", file_stem(path));
        dom::append_fragment(&mut doc, body, &map::entry_map(&map_id, &visits));
    }

    dom::append_fragment(&mut doc, head, &theme::style_block(theme::ENTRY_STYLE));
    dom::wrap_children(&mut doc, body, theme::ENTRY_CONTAINER, |_| true);
    apply_hero_treatment(&mut doc);

    fs::write(path, doc.html())?;
    info!("{} styled successfully", name);
    Ok(())
}

/// The image elements whose reference ends in `.heic`, with their
/// references, in document order. Other images are left alone.
fn heic_references(doc: &Html) -> Vec<(NodeId, String)> {
    let selector = Selector::parse("img").expect("img selector");
    doc.select(&selector)
        .filter_map(|img| img.value().attr("src").map(|src| (img.id(), src.to_owned())))
        .filter(|(_, src)| ends_with_ignore_case(src, HEIC_SUFFIX))
        .collect()
}

/// Swaps a `.heic` reference's suffix for `.png`. Only call on references
/// that matched [`heic_references`].
fn png_reference(src: &str) -> String {
    format!("{}{}", &src[..src.len() - HEIC_SUFFIX.len()], PNG_SUFFIX)
}

/// Enlarges the first grid item of the first asset grid to a 2x2 hero
/// cell and makes its image fill the cell.
fn apply_hero_treatment(doc: &mut Html) {
    let grid_selector = Selector::parse("div.assetGrid").expect("asset grid selector");
    let item_selector = Selector::parse("div.gridItem").expect("grid item selector");
    let image_selector = Selector::parse("img").expect("img selector");

    let targets = doc.select(&grid_selector).next().and_then(|grid| {
        grid.select(&item_selector).next().map(|item| {
            (
                item.id(),
                item.select(&image_selector).next().map(|img| img.id()),
            )
        })
    });

    if let Some((item, image)) = targets {
        dom::set_attr(doc, item, "style", HERO_ITEM_STYLE);
        if let Some(image) = image {
            dom::set_attr(doc, image, "style", HERO_IMAGE_STYLE);
        }
    }
}

/// Strips paragraphs with no text content from every entry page.
pub fn strip_empty_paragraphs(config: &Config) -> Result<()> {
    for path in html_files(&config.entries_directory)? {
        let mut doc = Html::parse_document(&fs::read_to_string(&path)?);
        dom::remove_empty_paragraphs(&mut doc);
        fs::write(&path, doc.html())?;
    }
    info!("removed empty paragraphs from all entry pages");
    Ok(())
}

/// Appends the responsive stylesheet to every entry page, inserting the
/// viewport meta first when a page has none. Like the other styling
/// passes this appends; re-running duplicates the stylesheet block.
pub fn apply_responsive_styles(config: &Config) -> Result<()> {
    for path in html_files(&config.entries_directory)? {
        let mut doc = Html::parse_document(&fs::read_to_string(&path)?);
        let head = dom::head(&doc).ok_or_else(|| Error::missing(&path, "head"))?;
        if !dom::has_viewport(&doc) {
            dom::prepend_fragment(&mut doc, head, theme::VIEWPORT_META);
        }
        dom::append_fragment(
            &mut doc,
            head,
            &theme::style_block(theme::ENTRY_RESPONSIVE_STYLE),
        );
        fs::write(&path, doc.html())?;
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::new(),
    }
}

fn file_stem(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => String::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error transforming entry pages.
#[derive(Debug)]
pub enum Error {
    /// A page is missing a structural element the transformation needs.
    MissingStructure {
        path: PathBuf,
        element: &'static str,
    },

    /// Returned for I/O errors reading or writing pages.
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
