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

use serde::Deserialize;

use crate::lighting::color::{Color, RawColor};
use crate::lighting::preset::Preset;
use crate::lighting::presets;
use crate::lighting::scene::Scene;

use super::error::ConfigError;

/// The default chase speed, in pixels per second.
pub const DEFAULT_CHASE_SPEED: f64 = 4.0;
/// The default rainbow speed, in cycles per second.
pub const DEFAULT_RAINBOW_SPEED: f64 = 0.25;

/// The built-in preset programs.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    Solid,
    Chase,
    Rainbow,
}

/// A YAML representation of a playlist entry.
#[derive(Deserialize, Clone, Debug)]
pub struct PresetDefinition {
    name: String,
    kind: PresetKind,

    /// The main color. Required for solid, white for chase.
    color: Option<RawColor>,

    /// The chase background. Black when unset.
    background: Option<RawColor>,

    /// Chase: pixels per second. Rainbow: cycles per second.
    speed: Option<f64>,
}

impl PresetDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PresetKind {
        self.kind
    }

    /// Builds the preset. Colors are checked here so a bad show file fails on load
    /// rather than on the first tick.
    pub fn to_preset(
        &self,
        scene: &Scene,
        tick_rate: f64,
        isolate_failures: bool,
    ) -> Result<Preset, ConfigError> {
        let preset = match self.kind {
            PresetKind::Solid => {
                let color = self.color.ok_or_else(|| ConfigError::MissingField {
                    preset: self.name.clone(),
                    field: "color",
                })?;
                presets::solid(&self.name, tick_rate, self.checked(color)?)
            }
            PresetKind::Chase => presets::chase(
                &self.name,
                tick_rate,
                scene,
                self.checked(self.color.unwrap_or_else(|| Color::WHITE.into()))?,
                self.checked(self.background.unwrap_or_else(|| Color::BLACK.into()))?,
                self.speed.unwrap_or(DEFAULT_CHASE_SPEED),
            ),
            PresetKind::Rainbow => presets::rainbow(
                &self.name,
                tick_rate,
                scene,
                self.speed.unwrap_or(DEFAULT_RAINBOW_SPEED),
            ),
        };
        Ok(preset.with_failure_isolation(isolate_failures))
    }

    fn checked(&self, color: RawColor) -> Result<RawColor, ConfigError> {
        color.normalize().map_err(|source| ConfigError::Color {
            preset: self.name.clone(),
            source,
        })?;
        Ok(color)
    }
}
