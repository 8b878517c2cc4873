// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::lighting::error::{ColorError, SceneError};
use crate::mixer::MixerError;

/// Typed error for show file load/parse failures so callers can distinguish
/// e.g. file-not-found from a bad preset without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid duration '{value}' for {field}: {source}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: duration_string::Error,
    },
    #[error("no preset named '{0}'")]
    UnknownPreset(String),
    #[error("preset '{preset}' is missing '{field}'")]
    MissingField {
        preset: String,
        field: &'static str,
    },
    #[error("preset '{preset}' has a bad color: {source}")]
    Color {
        preset: String,
        #[source]
        source: ColorError,
    },
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Mixer(#[from] MixerError),
}
