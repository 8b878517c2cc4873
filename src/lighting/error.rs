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

//! Error types for the lighting pipeline.

/// A light reference that can't be turned into pixels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("light reference has {0} components, expected 0 to 3")]
    InvalidLength(usize),
    #[error("unknown strand {0}")]
    UnknownStrand(u16),
    #[error("unknown fixture {fixture} on strand {strand}")]
    UnknownFixture { strand: u16, fixture: u16 },
    #[error("pixel {pixel} is out of range for fixture ({strand}, {fixture})")]
    UnknownPixel { strand: u16, fixture: u16, pixel: u16 },
}

/// A color triple that can't be normalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorError {
    #[error("color mixes integer and float channels")]
    MixedChannels,
    #[error("color channel {index} is out of range: {value}")]
    OutOfRange { index: usize, value: f64 },
}

/// Errors raised while a preset runs its tickers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PresetError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("ticker failed: {0}")]
    Ticker(String),
}

/// Errors raised while building a scene from fixture definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene has no fixtures")]
    Empty,
    #[error("fixture ({strand}, {address}) is defined more than once")]
    DuplicateFixture { strand: u16, address: u16 },
    #[error("fixture ({strand}, {address}) has no pixels")]
    NoPixels { strand: u16, address: u16 },
}

/// Errors raised by transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("transition '{0}' was used before setup")]
    NotReady(String),
    #[error("buffer shape {actual:?} does not match the transition's shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}
