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

use super::{check_shape, Transition};
use crate::lighting::buffer::{BufferLayout, FrameBuffer};
use crate::lighting::error::TransitionError;
use crate::lighting::scene::Scene;

/// Linear cross-fade from the outgoing frame to the incoming one, per 8-bit cell.
pub struct Fade {
    shape: Option<(usize, usize)>,
}

impl Fade {
    pub fn new() -> Fade {
        Fade { shape: None }
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition for Fade {
    fn name(&self) -> &str {
        "Fade"
    }

    fn setup(&mut self, _scene: &Scene, layout: &BufferLayout, _rng: &mut StdRng) {
        self.shape = Some(layout.shape());
    }

    fn get(
        &mut self,
        mut start: FrameBuffer,
        end: FrameBuffer,
        progress: f64,
    ) -> Result<FrameBuffer, TransitionError> {
        let shape = self
            .shape
            .ok_or_else(|| TransitionError::NotReady("Fade".to_string()))?;
        check_shape(shape, &start)?;
        check_shape(shape, &end)?;

        let (strands, pixels) = shape;
        for strand in 0..strands {
            for pixel in 0..pixels {
                let index = (strand, pixel);
                let blended = start.color(index).lerp(&end.color(index), progress);
                start.set_color(index, blended);
            }
        }
        Ok(start)
    }
}

/// Switches straight to the incoming frame.
pub struct Cut {
    shape: Option<(usize, usize)>,
}

impl Cut {
    pub fn new() -> Cut {
        Cut { shape: None }
    }
}

impl Default for Cut {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition for Cut {
    fn name(&self) -> &str {
        "Cut"
    }

    fn setup(&mut self, _scene: &Scene, layout: &BufferLayout, _rng: &mut StdRng) {
        self.shape = Some(layout.shape());
    }

    fn get(
        &mut self,
        start: FrameBuffer,
        end: FrameBuffer,
        _progress: f64,
    ) -> Result<FrameBuffer, TransitionError> {
        let shape = self
            .shape
            .ok_or_else(|| TransitionError::NotReady("Cut".to_string()))?;
        check_shape(shape, &start)?;
        check_shape(shape, &end)?;
        Ok(end)
    }
}
