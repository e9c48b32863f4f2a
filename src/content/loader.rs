//! Loader for the character tuning RON file at startup.

use ron::Options;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::data::CharacterTuning;

/// Error type for tuning loading failures.
#[derive(Debug, Error)]
pub enum TuningLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse tuning from RON text. Missing fields keep their defaults.
pub fn parse_tuning(contents: &str) -> Result<CharacterTuning, ron::error::SpannedError> {
    ron_options().from_str(contents)
}

/// Load a single tuning file.
pub fn load_tuning(path: &Path) -> Result<CharacterTuning, TuningLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| TuningLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_tuning(&contents).map_err(|source| TuningLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
