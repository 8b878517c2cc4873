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

use std::fmt;

use serde::Serialize;

use super::error::AddressError;

/// A resolved light reference, from coarsest to finest granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Address {
    /// Every pixel in the scene.
    All,
    /// Every pixel on a strand.
    Strand(u16),
    /// Every pixel of a fixture, given as (strand, fixture address).
    Fixture(u16, u16),
    /// A single pixel, given as (strand, fixture address, pixel index).
    Pixel(u16, u16, u16),
}

impl Address {
    /// The number of components in the reference this address came from.
    pub fn depth(&self) -> usize {
        match self {
            Address::All => 0,
            Address::Strand(..) => 1,
            Address::Fixture(..) => 2,
            Address::Pixel(..) => 3,
        }
    }

    /// The address components, outermost first.
    pub fn components(&self) -> Vec<u16> {
        match *self {
            Address::All => vec![],
            Address::Strand(s) => vec![s],
            Address::Fixture(s, f) => vec![s, f],
            Address::Pixel(s, f, p) => vec![s, f, p],
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::All => write!(f, "all"),
            Address::Strand(s) => write!(f, "strand {}", s),
            Address::Fixture(s, a) => write!(f, "fixture ({}, {})", s, a),
            Address::Pixel(s, a, p) => write!(f, "pixel ({}, {}, {})", s, a, p),
        }
    }
}

/// A single physical pixel in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelAddress {
    pub strand: u16,
    pub fixture: u16,
    pub pixel: u16,
}

impl PixelAddress {
    pub fn new(strand: u16, fixture: u16, pixel: u16) -> Self {
        Self {
            strand,
            fixture,
            pixel,
        }
    }
}

/// A raw light reference as a ticker emits it: zero to three components.
/// The length is only checked when the reference is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LightRef(Vec<u16>);

impl LightRef {
    pub fn all() -> Self {
        LightRef(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the reference into an [`Address`] by its length.
    pub fn resolve(&self) -> Result<Address, AddressError> {
        match self.0.as_slice() {
            [] => Ok(Address::All),
            [s] => Ok(Address::Strand(*s)),
            [s, f] => Ok(Address::Fixture(*s, *f)),
            [s, f, p] => Ok(Address::Pixel(*s, *f, *p)),
            other => Err(AddressError::InvalidLength(other.len())),
        }
    }
}

impl From<()> for LightRef {
    fn from(_: ()) -> Self {
        LightRef::all()
    }
}

impl From<(u16,)> for LightRef {
    fn from((s,): (u16,)) -> Self {
        LightRef(vec![s])
    }
}

impl From<(u16, u16)> for LightRef {
    fn from((s, f): (u16, u16)) -> Self {
        LightRef(vec![s, f])
    }
}

impl From<(u16, u16, u16)> for LightRef {
    fn from((s, f, p): (u16, u16, u16)) -> Self {
        LightRef(vec![s, f, p])
    }
}

impl From<&[u16]> for LightRef {
    fn from(components: &[u16]) -> Self {
        LightRef(components.to_vec())
    }
}

impl From<Vec<u16>> for LightRef {
    fn from(components: Vec<u16>) -> Self {
        LightRef(components)
    }
}

impl From<Address> for LightRef {
    fn from(address: Address) -> Self {
        LightRef(address.components())
    }
}

impl From<PixelAddress> for LightRef {
    fn from(address: PixelAddress) -> Self {
        LightRef(vec![address.strand, address.fixture, address.pixel])
    }
}

/// The lights half of an emission. A single reference and a list of references
/// both end up as `Refs`; `Skip` emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lights {
    Skip,
    Refs(Vec<LightRef>),
}

macro_rules! single_light {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Lights {
                fn from(light: $ty) -> Self {
                    Lights::Refs(vec![light.into()])
                }
            }
        )*
    };
}

single_light!(
    (),
    (u16,),
    (u16, u16),
    (u16, u16, u16),
    LightRef,
    Address,
    PixelAddress
);

impl From<Vec<Address>> for Lights {
    fn from(addresses: Vec<Address>) -> Self {
        Lights::Refs(addresses.into_iter().map(LightRef::from).collect())
    }
}

impl From<Vec<LightRef>> for Lights {
    fn from(lights: Vec<LightRef>) -> Self {
        Lights::Refs(lights)
    }
}

impl From<Option<LightRef>> for Lights {
    fn from(light: Option<LightRef>) -> Self {
        light.map_or(Lights::Skip, |light| Lights::Refs(vec![light]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_by_length() {
        assert_eq!(LightRef::from(()).resolve(), Ok(Address::All));
        assert_eq!(LightRef::from((2,)).resolve(), Ok(Address::Strand(2)));
        assert_eq!(LightRef::from((2, 3)).resolve(), Ok(Address::Fixture(2, 3)));
        assert_eq!(
            LightRef::from((2, 3, 4)).resolve(),
            Ok(Address::Pixel(2, 3, 4))
        );
    }

    #[test]
    fn resolve_rejects_long_references() {
        let light = LightRef::from(vec![1, 2, 3, 4]);
        assert_eq!(light.resolve(), Err(AddressError::InvalidLength(4)));
    }

    #[test]
    fn depth_matches_reference_length() {
        for components in [vec![], vec![1], vec![1, 2], vec![1, 2, 3]] {
            let light = LightRef::from(components.clone());
            let address = light.resolve().unwrap();
            assert_eq!(address.depth(), components.len());
            assert_eq!(address.components(), components);
        }
    }

    #[test]
    fn single_reference_becomes_one_element_list() {
        assert_eq!(
            Lights::from((1, 2)),
            Lights::Refs(vec![LightRef::from((1, 2))])
        );
        assert_eq!(Lights::from(None::<LightRef>), Lights::Skip);
    }
}
