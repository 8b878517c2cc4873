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

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::{Config, File, FileFormat};
use duration_string::DurationString;
use serde::Deserialize;
use tracing::info;

use crate::lighting::preset::Preset;
use crate::lighting::scene::Scene;
use crate::lighting::transition::{Transition, TransitionKind, WipeMode};
use crate::mixer::{Mixer, MixerSettings};

mod error;
mod preset;
mod scene;

pub use error::ConfigError;
pub use preset::{PresetDefinition, PresetKind};
pub use scene::{FixtureConfig, SceneConfig};

/// The default number of ticks per second.
pub const DEFAULT_TICK_RATE: f64 = 40.0;
/// The default time a preset plays before the next one comes in.
pub const DEFAULT_PRESET_DURATION: Duration = Duration::from_secs(30);
/// The default transition length.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_secs(2);

/// A YAML representation of a show: the scene, the mixer settings and the playlist.
#[derive(Deserialize, Clone, Debug)]
pub struct Show {
    /// Ticks per second.
    tick_rate: Option<f64>,

    /// How long each preset plays, e.g. 30s.
    preset_duration: Option<String>,

    /// Whether a failing ticker is logged and skipped rather than failing the tick.
    isolate_ticker_failures: Option<bool>,

    /// Seeds the transition RNG.
    seed: Option<u64>,

    transition: Option<TransitionConfig>,

    scene: SceneConfig,

    presets: Vec<PresetDefinition>,
}

/// A YAML representation of the transition settings.
#[derive(Deserialize, Clone, Debug)]
pub struct TransitionConfig {
    kind: TransitionKind,
    duration: Option<String>,
    mode: Option<WipeMode>,
}

impl Show {
    /// Loads a show file. The format is picked from the file extension.
    pub fn load(path: &Path) -> Result<Show, ConfigError> {
        let show: Show = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        info!(
            path = %path.display(),
            presets = show.presets.len(),
            "Loaded show"
        );
        Ok(show)
    }

    /// Parses a show from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Show, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?)
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate.unwrap_or(DEFAULT_TICK_RATE)
    }

    pub fn preset_duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(
            "preset_duration",
            self.preset_duration.as_ref(),
            DEFAULT_PRESET_DURATION,
        )
    }

    pub fn transition_duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(
            "transition.duration",
            self.transition.as_ref().and_then(|t| t.duration.as_ref()),
            DEFAULT_TRANSITION_DURATION,
        )
    }

    pub fn isolate_ticker_failures(&self) -> bool {
        self.isolate_ticker_failures.unwrap_or(true)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn preset_definitions(&self) -> &[PresetDefinition] {
        &self.presets
    }

    pub fn settings(&self) -> Result<MixerSettings, ConfigError> {
        Ok(MixerSettings {
            tick_rate: self.tick_rate(),
            preset_duration: self.preset_duration()?,
            transition_duration: self.transition_duration()?,
            seed: self.seed,
        })
    }

    pub fn scene(&self) -> Result<Scene, ConfigError> {
        self.scene.to_scene()
    }

    /// Builds the transition. Wipe is the default.
    pub fn transition(&self) -> Box<dyn Transition> {
        match &self.transition {
            Some(transition) => transition
                .kind
                .build(transition.mode.unwrap_or_default()),
            None => TransitionKind::Wipe.build(WipeMode::default()),
        }
    }

    /// Builds every preset in playlist order.
    pub fn presets(&self, scene: &Scene) -> Result<Vec<Preset>, ConfigError> {
        self.presets
            .iter()
            .map(|definition| {
                definition.to_preset(scene, self.tick_rate(), self.isolate_ticker_failures())
            })
            .collect()
    }

    /// Builds one preset by name.
    pub fn preset(&self, name: &str, scene: &Scene) -> Result<Preset, ConfigError> {
        self.presets
            .iter()
            .find(|definition| definition.name() == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?
            .to_preset(scene, self.tick_rate(), self.isolate_ticker_failures())
    }

    /// Builds the scene, the presets and the mixer that plays them.
    pub fn mixer(&self) -> Result<Mixer, ConfigError> {
        let scene = Arc::new(self.scene()?);
        let presets = self.presets(&scene)?;
        Ok(Mixer::new(
            scene,
            presets,
            self.transition(),
            self.settings()?,
        )?)
    }
}

fn parse_duration(
    field: &'static str,
    value: Option<&String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    value.map_or(Ok(default), |value| {
        DurationString::from_string(value.clone())
            .map(Into::into)
            .map_err(|source| ConfigError::InvalidDuration {
                field,
                value: value.clone(),
                source,
            })
    })
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::lighting::color::Color;
    use crate::lighting::command::Command;
    use crate::lighting::error::ColorError;

    const SHOW: &str = r#"
        tick_rate: 20
        preset_duration: 10s
        isolate_ticker_failures: false
        seed: 7
        transition:
          kind: fade
          duration: 500ms
        scene:
          fixtures:
            - { strand: 0, address: 0, pixels: 8, pos1: [0, 0], pos2: [10, 0] }
            - { strand: 0, address: 1, pixels: 4, pos1: [10, 0], pos2: [10, 5] }
            - { strand: 1, address: 0, pixels: 6, pos1: [0, 2], pos2: [6.5, 2] }
        presets:
          - { name: Red, kind: solid, color: [255, 0, 0] }
          - { name: Chase, kind: chase, color: [1.0, 1.0, 1.0], background: [0, 0, 32], speed: 4.0 }
          - { name: Rainbow, kind: rainbow, speed: 0.25 }
    "#;

    #[test]
    fn test_load_show_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("show.yaml");
        fs::write(&path, SHOW).unwrap();

        let show = Show::load(&path).unwrap();
        assert_eq!(show.tick_rate(), 20.0);
        assert_eq!(show.preset_duration().unwrap(), Duration::from_secs(10));
        assert_eq!(
            show.transition_duration().unwrap(),
            Duration::from_millis(500)
        );
        assert!(!show.isolate_ticker_failures());
        assert_eq!(show.seed(), Some(7));
        assert_eq!(show.transition().name(), "Fade");

        let scene = show.scene().unwrap();
        assert_eq!(scene.pixel_count(), 18);
        assert_eq!(scene.fixture(1, 0).unwrap().pos2, [6.5, 2.0]);

        let kinds: Vec<PresetKind> = show.preset_definitions().iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![PresetKind::Solid, PresetKind::Chase, PresetKind::Rainbow]
        );

        let mixer = show.mixer().unwrap();
        assert_eq!(mixer.active_preset().name(), "Red");
        assert_eq!(mixer.layout().shape(), (2, 12));
    }

    #[test]
    fn test_defaults() {
        let show = Show::from_yaml(
            r#"
            scene:
              fixtures:
                - { strand: 0, address: 0, pixels: 1, pos1: [0, 0], pos2: [0, 0] }
            presets:
              - { name: Chase, kind: chase }
            "#,
        )
        .unwrap();

        assert_eq!(show.tick_rate(), DEFAULT_TICK_RATE);
        assert_eq!(show.preset_duration().unwrap(), DEFAULT_PRESET_DURATION);
        assert_eq!(
            show.transition_duration().unwrap(),
            DEFAULT_TRANSITION_DURATION
        );
        assert!(show.isolate_ticker_failures());
        assert_eq!(show.transition().name(), "Wipe");

        let scene = show.scene().unwrap();
        let mut chase = show.preset("Chase", &scene).unwrap();
        chase.tick().unwrap();
        assert_eq!(
            chase.commands(),
            &[
                Command::SetAll {
                    color: Color::BLACK
                },
                Command::SetPixel {
                    strand: 0,
                    fixture: 0,
                    pixel: 0,
                    color: Color::WHITE
                },
            ]
        );
    }

    #[test]
    fn test_preset_lookup_and_errors() {
        let show = Show::from_yaml(SHOW).unwrap();
        let scene = show.scene().unwrap();

        assert_eq!(show.preset("Rainbow", &scene).unwrap().name(), "Rainbow");
        assert!(matches!(
            show.preset("Strobe", &scene),
            Err(ConfigError::UnknownPreset(name)) if name == "Strobe"
        ));
    }

    #[test]
    fn test_bad_presets() {
        let yaml = |preset: &str| {
            format!(
                r#"
                scene:
                  fixtures:
                    - {{ strand: 0, address: 0, pixels: 1, pos1: [0, 0], pos2: [0, 0] }}
                presets:
                  - {}
                "#,
                preset
            )
        };

        let show = Show::from_yaml(&yaml("{ name: Mixed, kind: solid, color: [255, 0.5, 0] }"))
            .unwrap();
        let scene = show.scene().unwrap();
        assert!(matches!(
            show.presets(&scene),
            Err(ConfigError::Color {
                source: ColorError::MixedChannels,
                ..
            })
        ));

        let show = Show::from_yaml(&yaml("{ name: Blank, kind: solid }")).unwrap();
        assert!(matches!(
            show.presets(&scene),
            Err(ConfigError::MissingField { field: "color", .. })
        ));

        let show =
            Show::from_yaml(&yaml("{ name: Hot, kind: solid, color: [300, 0, 0] }")).unwrap();
        assert!(matches!(
            show.presets(&scene),
            Err(ConfigError::Color {
                source: ColorError::OutOfRange { index: 0, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_bad_show_files() {
        let show = Show::from_yaml(
            r#"
            preset_duration: soon
            scene:
              fixtures:
                - { strand: 0, address: 0, pixels: 1, pos1: [0, 0], pos2: [0, 0] }
            presets: []
            "#,
        )
        .unwrap();
        assert!(matches!(
            show.preset_duration(),
            Err(ConfigError::InvalidDuration {
                field: "preset_duration",
                ..
            })
        ));

        let show = Show::from_yaml(
            r#"
            scene:
              fixtures:
                - { strand: 0, address: 0, pixels: 1, pos1: [0, 0], pos2: [0, 0] }
                - { strand: 0, address: 0, pixels: 2, pos1: [0, 0], pos2: [1, 0] }
            presets: []
            "#,
        )
        .unwrap();
        assert!(matches!(show.scene(), Err(ConfigError::Scene(_))));

        assert!(matches!(
            Show::load(Path::new("/nonexistent/show.yaml")),
            Err(ConfigError::Load(_))
        ));
    }
}
