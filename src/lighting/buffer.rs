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

use std::collections::HashMap;
use std::ops::Add;

use super::address::{Address, PixelAddress};
use super::color::Color;
use super::command::Command;
use super::error::AddressError;
use super::scene::Scene;

/// A cell in buffer space: a strand row and a pixel column.
pub type BufferIndex = (usize, usize);

/// A rendered frame: one row per strand, `pixels` cells per row, three
/// channels per cell in the 0-255 range.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    strands: usize,
    pixels: usize,
    data: Vec<[f32; 3]>,
}

impl FrameBuffer {
    /// A black buffer of the given shape.
    pub fn new(strands: usize, pixels: usize) -> Self {
        Self {
            strands,
            pixels,
            data: vec![[0.0; 3]; strands * pixels],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.strands, self.pixels)
    }

    pub fn get(&self, (strand, pixel): BufferIndex) -> [f32; 3] {
        self.data[strand * self.pixels + pixel]
    }

    pub fn set(&mut self, (strand, pixel): BufferIndex, value: [f32; 3]) {
        self.data[strand * self.pixels + pixel] = value;
    }

    pub fn set_color(&mut self, index: BufferIndex, color: Color) {
        self.set(
            index,
            [f32::from(color.r), f32::from(color.g), f32::from(color.b)],
        );
    }

    /// The cell rounded and clamped back to an 8-bit color.
    pub fn color(&self, index: BufferIndex) -> Color {
        let [r, g, b] = self.get(index).map(|c| c.round().clamp(0.0, 255.0) as u8);
        Color::new(r, g, b)
    }

    pub fn clear(&mut self) {
        self.data.fill([0.0; 3]);
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[[f32; 3]] {
        &self.data
    }

    pub fn cells_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.data
    }

    /// The whole frame as 8-bit RGB triplets, strand after strand.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|cell| cell.map(|c| c.round().clamp(0.0, 255.0) as u8))
            .collect()
    }

    /// Average brightness of the frame, 0.0 to 1.0.
    pub fn mean_level(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .data
            .iter()
            .flat_map(|cell| cell.iter())
            .map(|c| f64::from(*c))
            .sum();
        sum / (self.data.len() as f64 * 3.0 * 255.0)
    }
}

impl Add for FrameBuffer {
    type Output = FrameBuffer;

    fn add(mut self, rhs: FrameBuffer) -> FrameBuffer {
        for (cell, other) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (c, o) in cell.iter_mut().zip(other.iter()) {
                *c += *o;
            }
        }
        self
    }
}

/// Maps scene addresses onto buffer cells. On each strand, fixtures are
/// packed in address order.
#[derive(Debug, Clone)]
pub struct BufferLayout {
    strands: usize,
    pixels: usize,
    rows: HashMap<u16, usize>,
    offsets: HashMap<(u16, u16), (usize, u16)>,
}

impl BufferLayout {
    pub fn new(scene: &Scene) -> Self {
        let mut rows = HashMap::new();
        let mut offsets = HashMap::new();
        let mut pixels = 0;

        for (row, strand) in scene.strands().enumerate() {
            rows.insert(strand, row);
            let mut offset = 0usize;
            // Every scene strand has at least one fixture.
            for fixture in scene.strand_fixtures(strand).into_iter().flatten() {
                offsets.insert((strand, fixture.address), (offset, fixture.pixels));
                offset += usize::from(fixture.pixels);
            }
            pixels = pixels.max(offset);
        }

        Self {
            strands: rows.len(),
            pixels,
            rows,
            offsets,
        }
    }

    /// (strands, pixels per strand).
    pub fn shape(&self) -> (usize, usize) {
        (self.strands, self.pixels)
    }

    /// A black buffer in this layout.
    pub fn buffer(&self) -> FrameBuffer {
        FrameBuffer::new(self.strands, self.pixels)
    }

    /// The buffer cell of one pixel.
    pub fn buffer_address(&self, pixel: PixelAddress) -> Result<BufferIndex, AddressError> {
        let row = self.row(pixel.strand)?;
        let (offset, count) = self.fixture(pixel.strand, pixel.fixture)?;
        if pixel.pixel >= count {
            return Err(AddressError::UnknownPixel {
                strand: pixel.strand,
                fixture: pixel.fixture,
                pixel: pixel.pixel,
            });
        }
        Ok((row, offset + usize::from(pixel.pixel)))
    }

    /// The buffer cells an address covers.
    pub fn resolve(&self, address: &Address) -> Result<Vec<BufferIndex>, AddressError> {
        match *address {
            Address::All => {
                let mut all: Vec<BufferIndex> = self
                    .offsets
                    .iter()
                    .flat_map(|(&(strand, _), &(offset, count))| {
                        let row = self.rows[&strand];
                        (0..usize::from(count)).map(move |p| (row, offset + p))
                    })
                    .collect();
                all.sort_unstable();
                Ok(all)
            }
            Address::Strand(strand) => {
                let row = self.row(strand)?;
                let mut cells: Vec<BufferIndex> = self
                    .offsets
                    .iter()
                    .filter(|(key, _)| key.0 == strand)
                    .flat_map(|(_, &(offset, count))| {
                        (0..usize::from(count)).map(move |p| (row, offset + p))
                    })
                    .collect();
                cells.sort_unstable();
                Ok(cells)
            }
            Address::Fixture(strand, fixture) => {
                let row = self.row(strand)?;
                let (offset, count) = self.fixture(strand, fixture)?;
                Ok((0..usize::from(count)).map(|p| (row, offset + p)).collect())
            }
            Address::Pixel(strand, fixture, pixel) => Ok(vec![
                self.buffer_address(PixelAddress::new(strand, fixture, pixel))?,
            ]),
        }
    }

    /// Writes a command into a buffer. This is where `SetAll` and friends get
    /// expanded into cells.
    pub fn apply(&self, buffer: &mut FrameBuffer, command: &Command) -> Result<(), AddressError> {
        let color = command.color();
        for index in self.resolve(&command.address())? {
            buffer.set_color(index, color);
        }
        Ok(())
    }

    fn row(&self, strand: u16) -> Result<usize, AddressError> {
        self.rows
            .get(&strand)
            .copied()
            .ok_or(AddressError::UnknownStrand(strand))
    }

    fn fixture(&self, strand: u16, fixture: u16) -> Result<(usize, u16), AddressError> {
        self.row(strand)?;
        self.offsets
            .get(&(strand, fixture))
            .copied()
            .ok_or(AddressError::UnknownFixture { strand, fixture })
    }
}
