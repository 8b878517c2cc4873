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

//! Small built-in presets.

use super::address::{Address, LightRef};
use super::color::{Color, RawColor};
use super::preset::{ticker_fn, Preset};
use super::scene::Scene;

/// Sets every light to one color.
pub fn solid(name: &str, tick_rate: f64, color: RawColor) -> Preset {
    let mut preset = Preset::new(name, tick_rate);
    preset.add_ticker(ticker_fn(move |_, _, out| out.emit((), color)), 0);
    preset
}

/// A single lit pixel running along every strand over a background color.
/// `speed` is in pixels per second.
pub fn chase(
    name: &str,
    tick_rate: f64,
    scene: &Scene,
    color: RawColor,
    background: RawColor,
    speed: f64,
) -> Preset {
    let strands: Vec<Vec<LightRef>> = scene
        .strands()
        .map(|strand| {
            scene
                .resolve(&Address::Strand(strand))
                .unwrap_or_default()
                .into_iter()
                .map(LightRef::from)
                .collect()
        })
        .collect();

    let mut preset = Preset::new(name, tick_rate);
    preset.add_ticker(ticker_fn(move |_, _, out| out.emit((), background)), 0);
    preset.add_ticker(
        ticker_fn(move |_, time, out| {
            let step = (time * speed).max(0.0) as usize;
            let heads: Vec<LightRef> = strands
                .iter()
                .filter(|pixels| !pixels.is_empty())
                .map(|pixels| pixels[step % pixels.len()].clone())
                .collect();
            out.emit(heads, color)
        }),
        1,
    );
    preset
}

/// Cycles every fixture through the hue wheel, offset by its position in the
/// scene. `speed` is in full cycles per second.
pub fn rainbow(name: &str, tick_rate: f64, scene: &Scene, speed: f64) -> Preset {
    let fixtures: Vec<(u16, u16)> = scene.fixtures().map(|f| (f.strand, f.address)).collect();
    let spread = 360.0 / fixtures.len().max(1) as f64;

    let mut preset = Preset::new(name, tick_rate);
    preset.add_ticker(
        ticker_fn(move |_, time, out| {
            for (i, fixture) in fixtures.iter().enumerate() {
                let hue = time * speed * 360.0 + i as f64 * spread;
                out.emit(*fixture, unit(Color::from_hsv(hue, 1.0, 1.0)))?;
            }
            Ok(())
        }),
        0,
    );
    preset
}

/// Scales an 8-bit color into float channels.
fn unit(color: Color) -> (f64, f64, f64) {
    (
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lighting::command::Command;
    use crate::lighting::scene::Fixture;

    fn scene() -> Scene {
        Scene::new(vec![
            Fixture::new(0, 0, 2, [0.0, 0.0], [1.0, 0.0]),
            Fixture::new(0, 1, 2, [2.0, 0.0], [3.0, 0.0]),
            Fixture::new(1, 0, 3, [0.0, 1.0], [2.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn solid_sets_all() {
        let mut preset = solid("solid", 10.0, (0.0, 1.0, 0.0).into());
        preset.tick().unwrap();
        assert_eq!(
            preset.commands(),
            &[Command::SetAll {
                color: Color::new(0, 255, 0)
            }]
        );
    }

    #[test]
    fn chase_draws_heads_over_background() {
        let blue: RawColor = (0u8, 0u8, 255u8).into();
        let mut preset = chase("chase", 2.0, &scene(), (1.0, 1.0, 1.0).into(), blue, 2.0);

        // time 0.0, 0.5, 1.0 => steps 0, 1, 2
        for _ in 0..3 {
            preset.tick().unwrap();
        }

        let commands = preset.drain_commands();
        // Each tick: a background command then one head per strand.
        assert_eq!(commands.len(), 9);
        assert_eq!(commands[6].address(), Address::All);
        assert_eq!(commands[7].address(), Address::Pixel(0, 1, 0));
        assert_eq!(commands[8].address(), Address::Pixel(1, 0, 2));
        assert_eq!(commands[8].color(), Color::WHITE);
    }

    #[test]
    fn rainbow_covers_every_fixture() {
        let mut preset = rainbow("rainbow", 40.0, &scene(), 1.0);
        preset.tick().unwrap();
        let commands = preset.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].color(), Color::new(255, 0, 0));
        assert_eq!(commands[2].address(), Address::Fixture(1, 0));
    }
}
