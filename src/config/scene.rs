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

use crate::lighting::scene::{Fixture, Point, Scene};

use super::error::ConfigError;

/// A YAML representation of the scene topology.
#[derive(Deserialize, Clone, Debug)]
pub struct SceneConfig {
    fixtures: Vec<FixtureConfig>,
}

/// A YAML representation of one fixture.
#[derive(Deserialize, Clone, Debug)]
pub struct FixtureConfig {
    strand: u16,
    address: u16,
    pixels: u16,
    pos1: Point,
    pos2: Point,
}

impl SceneConfig {
    /// Builds and validates the scene.
    pub fn to_scene(&self) -> Result<Scene, ConfigError> {
        let fixtures = self
            .fixtures
            .iter()
            .map(|f| Fixture::new(f.strand, f.address, f.pixels, f.pos1, f.pos2))
            .collect();
        Ok(Scene::new(fixtures)?)
    }
}
