//! Content domain: data-driven character tuning loaded from RON.

mod data;
mod loader;
mod validation;

pub use data::{
    BodyTuning, CharacterTuning, HookTuning, JumpTuning, RunTuning, SwingTuning, UmbrellaTuning,
    WindApplication, WindTuning,
};
pub use loader::{TuningLoadError, load_tuning, parse_tuning};
pub use validation::Adjustment;

use bevy::prelude::*;
use std::path::{Path, PathBuf};

pub const DEFAULT_TUNING_PATH: &str = "assets/data/character.ron";

pub struct ContentPlugin {
    pub tuning_path: PathBuf,
}

impl Default for ContentPlugin {
    fn default() -> Self {
        Self {
            tuning_path: PathBuf::from(DEFAULT_TUNING_PATH),
        }
    }
}

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CharacterTuning>()
            .insert_resource(load_tuning_or_default(&self.tuning_path));
    }
}

/// Load and sanitize tuning, falling back to defaults when the file is
/// missing or malformed.
pub fn load_tuning_or_default(path: &Path) -> CharacterTuning {
    let authored = match load_tuning(path) {
        Ok(tuning) => {
            info!("Loaded character tuning from {}", path.display());
            tuning
        }
        Err(e) => {
            warn!("{}, using default character tuning", e);
            CharacterTuning::default()
        }
    };

    let (tuning, adjustments) = authored.sanitized();
    for adjustment in &adjustments {
        warn!("Character tuning: {}", adjustment);
    }
    tuning
}
