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

use std::collections::BTreeMap;
use std::fmt;

use tracing::info;

use super::address::{Address, PixelAddress};
use super::error::{AddressError, SceneError};

/// A point in the installation's 2D plane.
pub type Point = [f64; 2];

/// A fixture: a run of pixels on a strand between two endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub strand: u16,
    pub address: u16,
    pub pixels: u16,
    pub pos1: Point,
    pub pos2: Point,
}

impl Fixture {
    pub fn new(strand: u16, address: u16, pixels: u16, pos1: Point, pos2: Point) -> Self {
        Self {
            strand,
            address,
            pixels,
            pos1,
            pos2,
        }
    }

    pub fn midpoint(&self) -> Point {
        [
            (self.pos1[0] + self.pos2[0]) / 2.0,
            (self.pos1[1] + self.pos2[1]) / 2.0,
        ]
    }

    /// Location of a pixel, interpolated along the fixture. A single pixel
    /// fixture sits at its midpoint.
    pub fn pixel_location(&self, pixel: u16) -> Point {
        if self.pixels <= 1 {
            return self.midpoint();
        }
        let t = f64::from(pixel) / f64::from(self.pixels - 1);
        [
            self.pos1[0] + (self.pos2[0] - self.pos1[0]) * t,
            self.pos1[1] + (self.pos2[1] - self.pos1[1]) * t,
        ]
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}): {} pixels from {:?} to {:?}",
            self.strand, self.address, self.pixels, self.pos1, self.pos2
        )
    }
}

/// The installation's topology. Fixtures are kept ordered by strand and then
/// address, which is also the order the buffer layout packs them in.
#[derive(Debug, Clone)]
pub struct Scene {
    strands: BTreeMap<u16, BTreeMap<u16, Fixture>>,
}

impl Scene {
    pub fn new(fixtures: Vec<Fixture>) -> Result<Scene, SceneError> {
        if fixtures.is_empty() {
            return Err(SceneError::Empty);
        }

        let mut strands: BTreeMap<u16, BTreeMap<u16, Fixture>> = BTreeMap::new();
        for fixture in fixtures {
            if fixture.pixels == 0 {
                return Err(SceneError::NoPixels {
                    strand: fixture.strand,
                    address: fixture.address,
                });
            }
            let strand = strands.entry(fixture.strand).or_default();
            if strand.contains_key(&fixture.address) {
                return Err(SceneError::DuplicateFixture {
                    strand: fixture.strand,
                    address: fixture.address,
                });
            }
            strand.insert(fixture.address, fixture);
        }

        let scene = Scene { strands };
        info!(
            strands = scene.strands.len(),
            fixtures = scene.fixtures().count(),
            pixels = scene.pixel_count(),
            "Loaded scene"
        );
        Ok(scene)
    }

    /// All fixtures, by strand and then address.
    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.strands.values().flat_map(|strand| strand.values())
    }

    /// The strand numbers in use.
    pub fn strands(&self) -> impl Iterator<Item = u16> + '_ {
        self.strands.keys().copied()
    }

    /// Fixtures on one strand, by address.
    pub fn strand_fixtures(
        &self,
        strand: u16,
    ) -> Result<impl Iterator<Item = &Fixture>, AddressError> {
        self.strands
            .get(&strand)
            .map(|fixtures| fixtures.values())
            .ok_or(AddressError::UnknownStrand(strand))
    }

    pub fn fixture(&self, strand: u16, address: u16) -> Result<&Fixture, AddressError> {
        self.strands
            .get(&strand)
            .ok_or(AddressError::UnknownStrand(strand))?
            .get(&address)
            .ok_or(AddressError::UnknownFixture {
                strand,
                fixture: address,
            })
    }

    pub fn pixel_count(&self) -> usize {
        self.fixtures().map(|f| usize::from(f.pixels)).sum()
    }

    pub fn pixel_location(&self, pixel: PixelAddress) -> Result<Point, AddressError> {
        let fixture = self.fixture(pixel.strand, pixel.fixture)?;
        if pixel.pixel >= fixture.pixels {
            return Err(unknown_pixel(pixel));
        }
        Ok(fixture.pixel_location(pixel.pixel))
    }

    /// Every pixel in the scene with its location.
    pub fn pixel_locations(&self) -> Vec<(PixelAddress, Point)> {
        self.fixtures()
            .flat_map(|fixture| {
                (0..fixture.pixels).map(move |p| {
                    (
                        PixelAddress::new(fixture.strand, fixture.address, p),
                        fixture.pixel_location(p),
                    )
                })
            })
            .collect()
    }

    /// Expands an address into the pixels it covers.
    pub fn resolve(&self, address: &Address) -> Result<Vec<PixelAddress>, AddressError> {
        let pixels_of = |fixture: &Fixture| {
            (0..fixture.pixels)
                .map(|p| PixelAddress::new(fixture.strand, fixture.address, p))
                .collect::<Vec<_>>()
        };

        match *address {
            Address::All => Ok(self.fixtures().flat_map(pixels_of).collect()),
            Address::Strand(strand) => {
                Ok(self.strand_fixtures(strand)?.flat_map(pixels_of).collect())
            }
            Address::Fixture(strand, fixture) => Ok(pixels_of(self.fixture(strand, fixture)?)),
            Address::Pixel(strand, fixture, pixel) => {
                let pixel = PixelAddress::new(strand, fixture, pixel);
                if pixel.pixel >= self.fixture(strand, fixture)?.pixels {
                    return Err(unknown_pixel(pixel));
                }
                Ok(vec![pixel])
            }
        }
    }
}

fn unknown_pixel(pixel: PixelAddress) -> AddressError {
    AddressError::UnknownPixel {
        strand: pixel.strand,
        fixture: pixel.fixture,
        pixel: pixel.pixel,
    }
}
