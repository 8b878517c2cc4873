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

//! Lighting model: scene geometry, light addressing, colors, presets that
//! emit commands, frame buffers and the transitions that blend them.

pub mod address;
pub mod buffer;
pub mod color;
pub mod command;
pub mod error;
pub mod preset;
pub mod presets;
pub mod scene;
pub mod transition;

pub use address::{Address, LightRef, Lights, PixelAddress};
pub use buffer::{BufferLayout, FrameBuffer};
pub use color::{Color, RawColor};
pub use command::{Command, PackedCommand};
pub use preset::{ticker_fn, Emitter, Preset, Ticker, TickerHandle};
pub use scene::{Fixture, Scene};
pub use transition::{Transition, TransitionKind, WipeMode};
