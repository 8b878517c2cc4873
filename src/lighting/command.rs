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

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::color::Color;

/// A color write at one addressing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetAll {
        color: Color,
    },
    SetStrand {
        strand: u16,
        color: Color,
    },
    SetFixture {
        strand: u16,
        fixture: u16,
        color: Color,
    },
    SetPixel {
        strand: u16,
        fixture: u16,
        pixel: u16,
        color: Color,
    },
}

/// How much of the installation a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    All,
    Strand,
    Fixture,
    Pixel,
}

/// The transmittable form of a command: its granularity, the target
/// coordinates (as many as the granularity needs) and the color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedCommand {
    pub granularity: Granularity,
    pub target: Vec<u16>,
    pub color: [u8; 3],
}

impl Command {
    /// Builds the command variant that matches the address granularity.
    pub fn new(address: Address, color: Color) -> Command {
        match address {
            Address::All => Command::SetAll { color },
            Address::Strand(strand) => Command::SetStrand { strand, color },
            Address::Fixture(strand, fixture) => Command::SetFixture {
                strand,
                fixture,
                color,
            },
            Address::Pixel(strand, fixture, pixel) => Command::SetPixel {
                strand,
                fixture,
                pixel,
                color,
            },
        }
    }

    pub fn address(&self) -> Address {
        match *self {
            Command::SetAll { .. } => Address::All,
            Command::SetStrand { strand, .. } => Address::Strand(strand),
            Command::SetFixture {
                strand, fixture, ..
            } => Address::Fixture(strand, fixture),
            Command::SetPixel {
                strand,
                fixture,
                pixel,
                ..
            } => Address::Pixel(strand, fixture, pixel),
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Command::SetAll { color }
            | Command::SetStrand { color, .. }
            | Command::SetFixture { color, .. }
            | Command::SetPixel { color, .. } => color,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Command::SetAll { .. } => Granularity::All,
            Command::SetStrand { .. } => Granularity::Strand,
            Command::SetFixture { .. } => Granularity::Fixture,
            Command::SetPixel { .. } => Granularity::Pixel,
        }
    }

    pub fn pack(&self) -> PackedCommand {
        PackedCommand {
            granularity: self.granularity(),
            target: self.address().components(),
            color: self.color().channels(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn variant_follows_address_depth() {
        let color = Color::new(1, 2, 3);
        assert!(matches!(
            Command::new(Address::All, color),
            Command::SetAll { .. }
        ));
        assert!(matches!(
            Command::new(Address::Strand(1), color),
            Command::SetStrand { strand: 1, .. }
        ));
        assert!(matches!(
            Command::new(Address::Fixture(1, 2), color),
            Command::SetFixture {
                strand: 1,
                fixture: 2,
                ..
            }
        ));
        assert!(matches!(
            Command::new(Address::Pixel(1, 2, 3), color),
            Command::SetPixel {
                strand: 1,
                fixture: 2,
                pixel: 3,
                ..
            }
        ));
    }

    #[test]
    fn pack_fixture_command() {
        let command = Command::new(Address::Fixture(4, 9), Color::new(10, 20, 30));
        assert_eq!(
            command.pack(),
            PackedCommand {
                granularity: Granularity::Fixture,
                target: vec![4, 9],
                color: [10, 20, 30],
            }
        );
    }

    #[test]
    fn packed_json_shape() {
        let packed = Command::new(Address::All, Color::WHITE).pack();
        let json = serde_json::to_string(&packed).unwrap();
        assert_eq!(
            json,
            r#"{"granularity":"all","target":[],"color":[255,255,255]}"#
        );
    }
}
