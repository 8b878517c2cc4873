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

use crate::lighting::error::{PresetError, TransitionError};

use super::output::OutputError;

/// Errors raised while setting up or running the mixer.
#[derive(Debug, thiserror::Error)]
pub enum MixerError {
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f64),
    #[error("the mixer needs at least one preset")]
    EmptyPlaylist,
    #[error("preset '{name}' failed: {source}")]
    Preset {
        name: String,
        #[source]
        source: PresetError,
    },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Output(#[from] OutputError),
}
