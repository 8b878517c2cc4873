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

use super::error::ColorError;

/// Normalized color. Every command carries one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The channels as an array, in r, g, b order.
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let h = h.rem_euclid(360.0);
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        // Each sector is 60 degrees, with different RGB component ordering
        let sector = (h / 60.0).floor() as u8 % 6;
        let (r, g, b) = match sector {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x), // sector 5
        };

        Self {
            r: ((r + m) * 255.0) as u8,
            g: ((g + m) * 255.0) as u8,
            b: ((b + m) * 255.0) as u8,
        }
    }

    /// Linearly interpolate between two colors.
    /// `t` should be between 0.0 (returns `self`) and 1.0 (returns `other`).
    pub fn lerp(&self, other: &Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let t_inv = 1.0 - t;

        let lerp_u8 = |a: u8, b: u8| -> u8 { (a as f64 * t_inv + b as f64 * t) as u8 };

        Self {
            r: lerp_u8(self.r, other.r),
            g: lerp_u8(self.g, other.g),
            b: lerp_u8(self.b, other.b),
        }
    }
}

/// A single channel as a ticker emitted it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel {
    Int(i64),
    Float(f64),
}

/// An un-normalized color: three integer channels in [0, 255] or three float
/// channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Channel; 3]")]
pub struct RawColor(pub [Channel; 3]);

impl RawColor {
    /// Converts into a [`Color`]. If any channel is a float, all three are
    /// scaled by 255 and truncated; integer triples pass through unchanged.
    /// Mixed triples and out-of-range channels are rejected.
    pub fn normalize(&self) -> Result<Color, ColorError> {
        let floats = self.0.iter().filter(|c| matches!(c, Channel::Float(_))).count();

        let channels = match floats {
            0 => {
                let mut out = [0u8; 3];
                for (index, channel) in self.0.iter().enumerate() {
                    if let Channel::Int(value) = *channel {
                        out[index] = u8::try_from(value).map_err(|_| ColorError::OutOfRange {
                            index,
                            value: value as f64,
                        })?;
                    }
                }
                out
            }
            3 => {
                let mut out = [0u8; 3];
                for (index, channel) in self.0.iter().enumerate() {
                    if let Channel::Float(value) = *channel {
                        if !(0.0..=1.0).contains(&value) {
                            return Err(ColorError::OutOfRange { index, value });
                        }
                        out[index] = (value * 255.0) as u8;
                    }
                }
                out
            }
            _ => return Err(ColorError::MixedChannels),
        };

        Ok(Color::new(channels[0], channels[1], channels[2]))
    }
}

/// Shorthand for [`RawColor::normalize`].
pub fn normalize(color: impl Into<RawColor>) -> Result<Color, ColorError> {
    color.into().normalize()
}

impl From<(u8, u8, u8)> for RawColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        RawColor([
            Channel::Int(r.into()),
            Channel::Int(g.into()),
            Channel::Int(b.into()),
        ])
    }
}

impl From<(i64, i64, i64)> for RawColor {
    fn from((r, g, b): (i64, i64, i64)) -> Self {
        RawColor([Channel::Int(r), Channel::Int(g), Channel::Int(b)])
    }
}

impl From<(f64, f64, f64)> for RawColor {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        RawColor([Channel::Float(r), Channel::Float(g), Channel::Float(b)])
    }
}

impl From<[Channel; 3]> for RawColor {
    fn from(channels: [Channel; 3]) -> Self {
        RawColor(channels)
    }
}

impl From<Color> for RawColor {
    fn from(color: Color) -> Self {
        (color.r, color.g, color.b).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn float_triples_scale_and_truncate() {
        assert_eq!(normalize((1.0, 0.5, 0.0)), Ok(Color::new(255, 127, 0)));
        assert_eq!(normalize((0.1, 0.2, 0.3)), Ok(Color::new(25, 51, 76)));
    }

    #[test]
    fn integer_triples_pass_through() {
        assert_eq!(normalize((12u8, 200u8, 255u8)), Ok(Color::new(12, 200, 255)));
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            RawColor::from((0u8, 0u8, 0u8)),
            RawColor::from((255u8, 1u8, 128u8)),
            RawColor::from((0.25, 0.75, 1.0)),
        ] {
            let once = raw.normalize().unwrap();
            assert_eq!(normalize(once), Ok(once));
        }
    }

    #[test]
    fn mixed_triples_are_rejected() {
        let raw = RawColor([Channel::Int(255), Channel::Float(0.5), Channel::Int(0)]);
        assert_eq!(raw.normalize(), Err(ColorError::MixedChannels));
    }

    #[test]
    fn out_of_range_channels_are_rejected() {
        assert_eq!(
            normalize((0i64, 256i64, 0i64)),
            Err(ColorError::OutOfRange {
                index: 1,
                value: 256.0
            })
        );
        assert_eq!(
            normalize((0.0, 0.0, 1.5)),
            Err(ColorError::OutOfRange {
                index: 2,
                value: 1.5
            })
        );
        assert!(normalize((f64::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0), Color::new(255, 0, 0));
        assert_eq!(Color::from_hsv(120.0, 1.0, 1.0), Color::new(0, 255, 0));
        assert_eq!(Color::from_hsv(240.0, 1.0, 1.0), Color::new(0, 0, 255));
        assert_eq!(Color::from_hsv(360.0, 1.0, 1.0), Color::new(255, 0, 0));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::BLACK;
        let b = Color::new(200, 100, 50);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Color::new(100, 50, 25));
    }
}
