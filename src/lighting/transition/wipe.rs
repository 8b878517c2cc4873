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

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{check_shape, Transition};
use crate::lighting::address::PixelAddress;
use crate::lighting::buffer::{BufferIndex, BufferLayout, FrameBuffer};
use crate::lighting::error::TransitionError;
use crate::lighting::scene::{Point, Scene};

/// Which axis the wipe edge travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeMode {
    /// A hard edge sweeping along +x across the fixture midpoints' extent.
    #[default]
    Horizontal,
    /// A hard edge sweeping along the randomly chosen direction.
    Angled,
}

/// Geometry captured at setup.
struct Sweep {
    shape: (usize, usize),
    mask: Vec<bool>,
    min_x: f64,
    span_x: f64,
    min_y: f64,
    span_y: f64,
    direction: Point,
    min_projection: f64,
    span_projection: f64,
    locations: Vec<(PixelAddress, BufferIndex, Point)>,
}

/// A hard-edged wipe. Cells the edge has passed show the incoming frame,
/// the rest still show the outgoing one.
///
/// The mask is never reset during one activation: it is the union of every
/// threshold `get` has seen, so calling with decreasing progress does not
/// bring the outgoing frame back.
pub struct Wipe {
    mode: WipeMode,
    sweep: Option<Sweep>,
}

impl Wipe {
    pub fn new(mode: WipeMode) -> Wipe {
        Wipe { mode, sweep: None }
    }

    /// The sweep direction picked at setup, as a unit vector.
    pub fn direction(&self) -> Option<Point> {
        self.sweep.as_ref().map(|sweep| sweep.direction)
    }

    /// Midpoint extents picked up at setup: (min_x, span_x, min_y, span_y).
    pub fn extents(&self) -> Option<(f64, f64, f64, f64)> {
        self.sweep
            .as_ref()
            .map(|s| (s.min_x, s.span_x, s.min_y, s.span_y))
    }

    /// Whether a buffer cell has been wiped.
    pub fn is_masked(&self, (strand, pixel): BufferIndex) -> bool {
        self.sweep
            .as_ref()
            .is_some_and(|s| s.mask[strand * s.shape.1 + pixel])
    }
}

impl Transition for Wipe {
    fn name(&self) -> &str {
        "Wipe"
    }

    fn setup(&mut self, scene: &Scene, layout: &BufferLayout, rng: &mut StdRng) {
        let shape = layout.shape();

        let midpoints: Vec<Point> = scene.fixtures().map(|f| f.midpoint()).collect();
        let (min_x, span_x) = extent(midpoints.iter().map(|p| p[0]));
        let (min_y, span_y) = extent(midpoints.iter().map(|p| p[1]));

        let angle = rng.gen::<f64>() * TAU;
        let direction = [angle.cos(), angle.sin()];

        let mut locations = Vec::with_capacity(scene.pixel_count());
        for (pixel, location) in scene.pixel_locations() {
            match layout.buffer_address(pixel) {
                Ok(index) => locations.push((pixel, index, location)),
                Err(e) => warn!(err = %e, "Pixel has no buffer cell, leaving it out of the wipe"),
            }
        }

        let (min_projection, span_projection) = extent(
            locations
                .iter()
                .map(|(_, _, location)| project(*location, direction)),
        );

        debug!(
            mode = ?self.mode,
            angle,
            min_x,
            span_x,
            pixels = locations.len(),
            "Wipe set up"
        );

        self.sweep = Some(Sweep {
            shape,
            mask: vec![false; shape.0 * shape.1],
            min_x,
            span_x,
            min_y,
            span_y,
            direction,
            min_projection,
            span_projection,
            locations,
        });
    }

    fn get(
        &mut self,
        mut start: FrameBuffer,
        mut end: FrameBuffer,
        progress: f64,
    ) -> Result<FrameBuffer, TransitionError> {
        let sweep = self
            .sweep
            .as_mut()
            .ok_or_else(|| TransitionError::NotReady("Wipe".to_string()))?;
        check_shape(sweep.shape, &start)?;
        check_shape(sweep.shape, &end)?;

        let width = sweep.shape.1;
        match self.mode {
            WipeMode::Horizontal => {
                let threshold = sweep.min_x + progress * sweep.span_x;
                for (_, (strand, pixel), location) in &sweep.locations {
                    if location[0] < threshold {
                        sweep.mask[strand * width + pixel] = true;
                    }
                }
            }
            WipeMode::Angled => {
                let threshold = sweep.min_projection + progress * sweep.span_projection;
                for (_, (strand, pixel), location) in &sweep.locations {
                    if project(*location, sweep.direction) < threshold {
                        sweep.mask[strand * width + pixel] = true;
                    }
                }
            }
        }

        let cells = start.cells_mut().iter_mut().zip(end.cells_mut().iter_mut());
        for ((from, to), masked) in cells.zip(sweep.mask.iter()) {
            if *masked {
                *from = [0.0; 3];
            } else {
                *to = [0.0; 3];
            }
        }

        Ok(start + end)
    }
}

/// (min, max - min) of a set of values; (0, 0) when empty.
fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    if min > max {
        return (0.0, 0.0);
    }
    (min, max - min)
}

fn project(point: Point, direction: Point) -> f64 {
    point[0] * direction[0] + point[1] * direction[1]
}
