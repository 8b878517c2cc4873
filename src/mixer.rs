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

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, span, warn, Level};

use crate::lighting::buffer::{BufferLayout, FrameBuffer};
use crate::lighting::preset::Preset;
use crate::lighting::scene::Scene;
use crate::lighting::transition::Transition;
use crate::playsync::CancelHandle;

mod error;
mod output;


pub use error::MixerError;
pub use output::{LogOutput, Output, OutputError, WriterOutput};

/// Timing and randomness settings for a mixer.
#[derive(Debug, Clone)]
pub struct MixerSettings {
    /// Ticks per second.
    pub tick_rate: f64,
    /// How long a preset plays before the mixer moves on.
    pub preset_duration: Duration,
    /// How long a transition between two presets takes.
    pub transition_duration: Duration,
    /// Seeds the transition RNG. Entropy is used when unset.
    pub seed: Option<u64>,
}

impl Default for MixerSettings {
    fn default() -> Self {
        MixerSettings {
            tick_rate: 40.0,
            preset_duration: Duration::from_secs(30),
            transition_duration: Duration::from_secs(2),
            seed: None,
        }
    }
}

/// A preset with the frame buffer its commands are rendered into.
struct Slot {
    preset: Preset,
    buffer: FrameBuffer,
}

/// A transition in progress.
#[derive(Debug, Clone, Copy)]
struct Running {
    /// The incoming slot.
    next: usize,
    /// Ticks spent in the transition so far.
    ticks: u64,
}

/// Ticks a playlist of presets, renders their commands into frame buffers and
/// blends between them when the playlist moves on.
pub struct Mixer {
    scene: Arc<Scene>,
    layout: BufferLayout,
    tick_rate: f64,
    preset_ticks: u64,
    transition_ticks: u64,
    slots: Vec<Slot>,
    active: usize,
    transition: Box<dyn Transition>,
    running: Option<Running>,
    rng: StdRng,
    ticks: u64,
}

impl Mixer {
    pub fn new(
        scene: Arc<Scene>,
        presets: Vec<Preset>,
        transition: Box<dyn Transition>,
        settings: MixerSettings,
    ) -> Result<Mixer, MixerError> {
        if !(settings.tick_rate > 0.0 && settings.tick_rate.is_finite()) {
            return Err(MixerError::InvalidTickRate(settings.tick_rate));
        }
        if presets.is_empty() {
            return Err(MixerError::EmptyPlaylist);
        }

        let layout = BufferLayout::new(&scene);
        let slots = presets
            .into_iter()
            .map(|mut preset| {
                if preset.tick_rate() != settings.tick_rate {
                    debug!(
                        preset = preset.name(),
                        from = preset.tick_rate(),
                        to = settings.tick_rate,
                        "Running preset at the mixer's tick rate"
                    );
                    preset.set_tick_rate(settings.tick_rate);
                }
                Slot {
                    preset,
                    buffer: layout.buffer(),
                }
            })
            .collect::<Vec<_>>();

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let preset_ticks = to_ticks(settings.preset_duration, settings.tick_rate);
        let transition_ticks = to_ticks(settings.transition_duration, settings.tick_rate).max(1);

        info!(
            presets = slots.len(),
            tick_rate = settings.tick_rate,
            preset_ticks,
            transition = transition.name(),
            transition_ticks,
            "Created mixer"
        );

        Ok(Mixer {
            scene,
            layout,
            tick_rate: settings.tick_rate,
            preset_ticks,
            transition_ticks,
            slots,
            active: 0,
            transition,
            running: None,
            rng,
            ticks: 0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Frames produced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The preset currently on stage. During a transition this is the outgoing one.
    pub fn active_preset(&self) -> &Preset {
        &self.slots[self.active].preset
    }

    /// The incoming preset, if a transition is running.
    pub fn incoming_preset(&self) -> Option<&Preset> {
        self.running.map(|running| &self.slots[running.next].preset)
    }

    /// Transition progress in [0, 1), if a transition is running.
    pub fn progress(&self) -> Option<f64> {
        self.running
            .map(|running| running.ticks as f64 / self.transition_ticks as f64)
    }

    /// Produces the next frame.
    pub fn tick(&mut self) -> Result<FrameBuffer, MixerError> {
        if self.running.is_none() && self.should_move_on() {
            self.start_transition();
        }

        self.render(self.active)?;

        let frame = match self.running {
            None => self.slots[self.active].buffer.clone(),
            Some(running) => {
                self.render(running.next)?;

                let progress = running.ticks as f64 / self.transition_ticks as f64;
                if progress >= 1.0 {
                    self.finish_transition(running.next);
                    self.slots[self.active].buffer.clone()
                } else {
                    self.running = Some(Running {
                        ticks: running.ticks + 1,
                        ..running
                    });
                    self.transition.get(
                        self.slots[self.active].buffer.clone(),
                        self.slots[running.next].buffer.clone(),
                        progress,
                    )?
                }
            }
        };

        self.ticks += 1;
        Ok(frame)
    }

    /// Moves on to the next preset right away. A transition in progress is
    /// completed first.
    pub fn next_preset(&mut self) {
        if self.slots.len() < 2 {
            info!("Only one preset, nothing to move on to");
            return;
        }
        if let Some(running) = self.running.take() {
            self.finish_transition(running.next);
        }
        self.start_transition();
    }

    /// Ticks at the mixer's rate and writes every frame to the output until
    /// cancelled or until `limit` has elapsed. Returns the number of frames written.
    pub fn run(
        &mut self,
        output: &mut dyn Output,
        cancel: &CancelHandle,
        limit: Option<Duration>,
    ) -> Result<u64, MixerError> {
        let span = span!(Level::INFO, "mixer run");
        let _enter = span.enter();

        let tick_duration = Duration::from_secs(1).div_f64(self.tick_rate);
        let started = Instant::now();
        let mut last_time = started;
        let mut frames = 0;

        info!(
            tick_rate = self.tick_rate,
            limit = ?limit,
            preset = self.active_preset().name(),
            "Starting mixer"
        );

        loop {
            if cancel.is_cancelled() {
                info!(frames, "Mixer cancelled");
                break;
            }
            if limit.is_some_and(|limit| last_time.duration_since(started) >= limit) {
                info!(frames, "Mixer reached its time limit");
                break;
            }

            let frame = self.tick()?;
            output.write(&frame)?;
            frames += 1;

            last_time += tick_duration;
            spin_sleep::sleep(last_time.saturating_duration_since(Instant::now()));
        }

        Ok(frames)
    }

    fn should_move_on(&self) -> bool {
        self.slots.len() > 1
            && self.active_preset().ticks() >= self.preset_ticks
            && self.active_preset().can_transition()
    }

    fn start_transition(&mut self) {
        let next = (self.active + 1) % self.slots.len();
        let incoming = &mut self.slots[next];
        incoming.preset.reset();
        incoming.buffer.clear();

        self.transition
            .setup(&self.scene, &self.layout, &mut self.rng);
        self.running = Some(Running { next, ticks: 0 });

        info!(
            from = self.slots[self.active].preset.name(),
            to = self.slots[next].preset.name(),
            transition = self.transition.name(),
            "Starting transition"
        );
    }

    fn finish_transition(&mut self, next: usize) {
        self.active = next;
        self.running = None;
        info!(preset = self.active_preset().name(), "Transition finished");
    }

    /// Ticks one preset and applies its commands to its buffer.
    fn render(&mut self, index: usize) -> Result<(), MixerError> {
        let slot = &mut self.slots[index];
        slot.preset.tick().map_err(|source| MixerError::Preset {
            name: slot.preset.name().to_string(),
            source,
        })?;

        for command in slot.preset.drain_commands() {
            if let Err(e) = self.layout.apply(&mut slot.buffer, &command) {
                warn!(
                    preset = slot.preset.name(),
                    command = ?command,
                    err = %e,
                    "Skipping command for an unknown address"
                );
            }
        }
        Ok(())
    }
}

fn to_ticks(duration: Duration, tick_rate: f64) -> u64 {
    (duration.as_secs_f64() * tick_rate).round() as u64
}
