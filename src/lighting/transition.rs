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

use rand::rngs::StdRng;
use serde::Deserialize;

use super::buffer::{BufferLayout, FrameBuffer};
use super::error::TransitionError;
use super::scene::Scene;

mod fade;
mod wipe;

#[cfg(test)]
mod tests;

pub use fade::{Cut, Fade};
pub use wipe::{Wipe, WipeMode};

/// Blends the outgoing preset's frame into the incoming one.
pub trait Transition: Send {
    fn name(&self) -> &str;

    /// Prepares the transition for one activation. Called every time the
    /// mixer starts a transition.
    fn setup(&mut self, scene: &Scene, layout: &BufferLayout, rng: &mut StdRng);

    /// Blends `start` (outgoing) and `end` (incoming) at `progress` in [0, 1].
    /// Both buffers are consumed and may be modified.
    fn get(
        &mut self,
        start: FrameBuffer,
        end: FrameBuffer,
        progress: f64,
    ) -> Result<FrameBuffer, TransitionError>;
}

/// The transition styles a show can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Wipe,
    Fade,
    Cut,
}

impl TransitionKind {
    pub fn build(self, mode: WipeMode) -> Box<dyn Transition> {
        match self {
            TransitionKind::Wipe => Box::new(Wipe::new(mode)),
            TransitionKind::Fade => Box::new(Fade::new()),
            TransitionKind::Cut => Box::new(Cut::new()),
        }
    }
}

pub(crate) fn check_shape(
    expected: (usize, usize),
    buffer: &FrameBuffer,
) -> Result<(), TransitionError> {
    if buffer.shape() != expected {
        return Err(TransitionError::ShapeMismatch {
            expected,
            actual: buffer.shape(),
        });
    }
    Ok(())
}
