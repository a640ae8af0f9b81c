//! Loading decks from disk: a `deck.json` manifest, or a plain directory
//! of images with one slide per image.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::slideshow::SlideshowOptions;
use crate::source::{ElementSource, SlideSource};

pub const MANIFEST_FILE: &str = "deck.json";

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub options: ManifestOptions,
    #[serde(default)]
    pub slides: Vec<SlideSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestOptions {
    pub full_screen: bool,
    pub transition: Option<String>,
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl From<ManifestOptions> for SlideshowOptions {
    fn from(options: ManifestOptions) -> Self {
        SlideshowOptions {
            full_screen: options.full_screen,
            transition: options.transition.map(Into::into),
            looping: options.looping,
        }
    }
}

/// Load a deck from a manifest file, or from a directory holding either a
/// manifest or images.
pub fn load_deck(path: &Path) -> Result<Manifest, Error> {
    if path.is_file() {
        return load_manifest(path);
    }
    let manifest = path.join(MANIFEST_FILE);
    if manifest.is_file() {
        return load_manifest(&manifest);
    }

    let slides: Vec<SlideSource> = load_sorted_image_paths(path)?
        .into_iter()
        .map(|image| {
            let id = image
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            SlideSource::new(id).with_element(ElementSource::Image { src: image })
        })
        .collect();
    debug!("loaded {} image slides from {}", slides.len(), path.display());
    Ok(Manifest {
        options: ManifestOptions::default(),
        slides,
    })
}

pub fn load_manifest(path: &Path) -> Result<Manifest, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut manifest: Manifest = serde_json::from_str(&text).map_err(|source| Error::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    if manifest.slides.is_empty() {
        return Err(Error::NoSlides(path.to_path_buf()));
    }

    // Image paths are relative to the manifest
    let base = path.parent().unwrap_or(Path::new("."));
    for slide in &mut manifest.slides {
        for element in &mut slide.elements {
            if let ElementSource::Image { src } = element {
                if src.is_relative() {
                    *src = base.join(&*src);
                }
            }
        }
    }
    Ok(manifest)
}

/// Image files in `dir`, sorted by file name.
pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let io_error = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if is_image {
            paths.push(path);
        } else {
            warn!("skipping non-image file {}", path.display());
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if paths.is_empty() {
        Err(Error::NoSlides(dir.to_path_buf()))
    } else {
        Ok(paths)
    }
}
