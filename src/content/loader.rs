//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use crate::movement::MovementTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Everything read from assets/data. Missing pieces fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct LoadedContent {
    pub tuning: MovementTuning,
    pub tracks: Vec<TrackDef>,
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse RON text containing a DataFile<T> wrapper.
pub fn parse_data_file<T>(file_name: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })?;

    Ok(data.items)
}

/// Parse a single RON struct (not wrapped in DataFile).
pub fn parse_single_file<T>(file_name: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a RON file containing a DataFile<T> wrapper.
fn load_data_file<T>(path: &Path) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_data_file(&path.display().to_string(), &contents)
}

/// Load a single RON struct (not wrapped in DataFile).
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_single_file(&path.display().to_string(), &contents)
}

/// Load movement.ron and tracks.ron from `base_path`.
/// Files that fail keep their defaults; every failure is returned.
pub fn load_all_content(base_path: &Path) -> (LoadedContent, Vec<ContentLoadError>) {
    let mut content = LoadedContent::default();
    let mut errors = Vec::new();

    match load_single_file::<MovementTuning>(&base_path.join("movement.ron")) {
        Ok(tuning) => content.tuning = tuning,
        Err(e) => errors.push(e),
    }

    match load_data_file::<TrackDef>(&base_path.join("tracks.ron")) {
        Ok(tracks) => content.tracks = tracks,
        Err(e) => errors.push(e),
    }

    (content, errors)
}
