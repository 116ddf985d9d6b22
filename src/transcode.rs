//! HEIC to PNG conversion for the resources directory. Decoding goes
//! through libheif (primary image only, interleaved RGB); encoding goes
//! through the `image` crate's PNG writer. The skip check is
//! existence-only: a PNG already on disk is trusted no matter what it
//! contains, so re-runs are cheap and a partially-written PNG from a
//! killed run is invisible to us.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use tracing::info;

use crate::config::Config;

/// Converts every `.heic` file in the resources directory to a
/// same-basename PNG, skipping files whose PNG already exists. Decode and
/// encode failures are fatal.
pub fn convert_images(config: &Config) -> Result<()> {
    for heic in heic_files(&config.resources_directory)? {
        let png = heic.with_extension("png");
        if png.exists() {
            continue;
        }
        info!("converting {}", file_name(&heic));
        convert_image(&heic, &png)?;
    }
    Ok(())
}

/// The `.heic` files (case-insensitive extension) directly under `dir`,
/// sorted by filename.
fn heic_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for result in fs::read_dir(dir)? {
        let path = result?.path();
        let is_heic = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("heic"))
            .unwrap_or(false);
        if is_heic && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decodes the primary image of a HEIC container and writes it to `dst`
/// as a PNG.
fn convert_image(src: &Path, dst: &Path) -> Result<()> {
    let path = src
        .to_str()
        .ok_or_else(|| Error::NonUtf8Path(src.to_owned()))?;
    let context = HeifContext::read_from_file(path)?;
    let handle = context.primary_image_handle()?;
    let decoded = LibHeif::new().decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)?;

    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or(Error::MissingPixelData)?;
    let width = plane.width;
    let height = plane.height;

    // rows in the decode buffer are stride-aligned; repack them tightly
    let row_bytes = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height as usize {
        let start = y * plane.stride;
        pixels.extend_from_slice(&plane.data[start..start + row_bytes]);
    }

    let image = RgbImage::from_raw(width, height, pixels).ok_or(Error::MissingPixelData)?;
    image.save_with_format(dst, ImageFormat::Png)?;
    Ok(())
}

fn file_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error converting resource images.
#[derive(Debug)]
pub enum Error {
    /// libheif only takes UTF-8 paths.
    NonUtf8Path(PathBuf),

    /// The decoded image exposes no interleaved pixel plane.
    MissingPixelData,

    /// Returned for libheif decode errors.
    Heif(libheif_rs::HeifError),

    /// Returned for PNG encode errors.
    Image(image::ImageError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NonUtf8Path(path) => {
                write!(f, "Non-UTF-8 image path '{}'", path.display())
            }
            Error::MissingPixelData => write!(f, "Decoded image has no pixel data"),
            Error::Heif(err) => err.fmt(f),
            Error::Image(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NonUtf8Path(_) => None,
            Error::MissingPixelData => None,
            Error::Heif(err) => Some(err),
            Error::Image(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<libheif_rs::HeifError> for Error {
    /// Converts [`libheif_rs::HeifError`]s into [`Error`]. This allows us
    /// to use the `?` operator.
    fn from(err: libheif_rs::HeifError) -> Error {
        Error::Heif(err)
    }
}

impl From<image::ImageError> for Error {
    /// Converts [`image::ImageError`]s into [`Error`]. This allows us to
    /// use the `?` operator.
    fn from(err: image::ImageError) -> Error {
        Error::Image(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
