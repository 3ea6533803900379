//! Content domain: RON-driven movement tuning and rail definitions.

mod data;
mod loader;
mod validation;

pub use data::{DataFile, TrackDef};
pub use loader::{
    ContentLoadError, LoadedContent, load_all_content, parse_data_file, parse_single_file,
};
pub use validation::{ValidationError, validate_tracks, validate_tuning};

use std::path::PathBuf;

use bevy::prelude::*;

use crate::track::BezierTrack;

/// Directory holding movement.ron and tracks.ron.
#[derive(Resource, Debug, Clone)]
pub struct ContentPath(pub PathBuf);

impl Default for ContentPath {
    fn default() -> Self {
        Self(PathBuf::from("assets/data"))
    }
}

/// A rail ready to be spawned.
#[derive(Debug, Clone)]
pub struct LoadedRail {
    pub id: String,
    pub track: BezierTrack,
    pub sample_radius: f32,
}

/// Rails built from tracks.ron. Empty when nothing loaded.
#[derive(Resource, Debug, Clone, Default)]
pub struct TrackLibrary {
    pub rails: Vec<LoadedRail>,
}

impl TrackLibrary {
    /// Builds every valid definition, logging and skipping the rest.
    pub fn from_defs(defs: &[TrackDef]) -> Self {
        let rails = defs
            .iter()
            .filter_map(|def| match def.build() {
                Ok(track) => Some(LoadedRail {
                    id: def.id.clone(),
                    track,
                    sample_radius: def.sample_radius,
                }),
                Err(e) => {
                    error!("Track '{}' could not be built: {}", def.id, e);
                    None
                }
            })
            .collect();
        Self { rails }
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPath>()
            .init_resource::<TrackLibrary>()
            .add_systems(PreStartup, load_content);
    }
}

fn load_content(mut commands: Commands, path: Res<ContentPath>) {
    let (content, load_errors) = load_all_content(&path.0);
    for e in &load_errors {
        error!("{}", e);
    }

    let mut validation_errors = validate_tracks(&content.tracks);
    validation_errors.extend(validate_tuning(&content.tuning));
    for e in &validation_errors {
        warn!("Content validation: {}", e);
    }

    let library = TrackLibrary::from_defs(&content.tracks);
    info!(
        "Content loaded from {}: {} rails, {} load errors, {} validation errors",
        path.0.display(),
        library.rails.len(),
        load_errors.len(),
        validation_errors.len()
    );

    commands.insert_resource(content.tuning);
    commands.insert_resource(library);
}
