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

use tracing::{debug, error};

use super::address::Lights;
use super::color::RawColor;
use super::command::{Command, PackedCommand};
use super::error::PresetError;


/// A per-tick callback. Tickers receive the number of ticks since the preset
/// started, the approximate running time in seconds, and an emitter to write
/// (lights, color) pairs into.
pub trait Ticker: Send {
    fn tick(&mut self, ticks: u64, time: f64, out: &mut Emitter<'_>) -> Result<(), PresetError>;
}

impl<F> Ticker for F
where
    F: FnMut(u64, f64, &mut Emitter<'_>) -> Result<(), PresetError> + Send,
{
    fn tick(&mut self, ticks: u64, time: f64, out: &mut Emitter<'_>) -> Result<(), PresetError> {
        self(ticks, time, out)
    }
}

/// Pins a closure to the ticker signature so its argument types are inferred.
pub fn ticker_fn<F>(f: F) -> F
where
    F: FnMut(u64, f64, &mut Emitter<'_>) -> Result<(), PresetError> + Send,
{
    f
}

/// Identifies one ticker registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerHandle(u64);

struct Registration {
    handle: TickerHandle,
    priority: i32,
    ticker: Box<dyn Ticker>,
}

/// Collects a single ticker's emissions into the preset's command buffer.
pub struct Emitter<'a> {
    commands: &'a mut Vec<Command>,
}

impl Emitter<'_> {
    /// Emits a color for one or more lights. `Lights::Skip` emits nothing and
    /// leaves the color alone. Otherwise the color is normalized once and a
    /// command is appended for each reference, in order.
    pub fn emit(
        &mut self,
        lights: impl Into<Lights>,
        color: impl Into<RawColor>,
    ) -> Result<(), PresetError> {
        let refs = match lights.into() {
            Lights::Skip => return Ok(()),
            Lights::Refs(refs) => refs,
        };

        let color = color.into().normalize()?;
        for light in refs {
            self.commands.push(Command::new(light.resolve()?, color));
        }
        Ok(())
    }
}

/// An animation program: a set of prioritized tickers and the commands they
/// produced during the current tick.
pub struct Preset {
    name: String,
    tick_rate: f64,
    ticks: u64,
    tickers: Vec<Registration>,
    next_handle: u64,
    commands: Vec<Command>,
    isolate_failures: bool,
    can_transition: bool,
}

impl Preset {
    pub fn new(name: impl Into<String>, tick_rate: f64) -> Preset {
        Preset {
            name: name.into(),
            tick_rate,
            ticks: 0,
            tickers: Vec::new(),
            next_handle: 0,
            commands: Vec::new(),
            isolate_failures: true,
            can_transition: true,
        }
    }

    /// Sets whether a failing ticker is logged and skipped (the default) or
    /// aborts the whole tick.
    pub fn with_failure_isolation(mut self, isolate: bool) -> Preset {
        self.isolate_failures = isolate;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Changes the rate used to turn ticks into running time. The mixer sets
    /// this to its own rate when it takes the preset.
    pub fn set_tick_rate(&mut self, tick_rate: f64) {
        self.tick_rate = tick_rate;
    }

    /// Ticks run since the preset started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Approximate running time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 / self.tick_rate
    }

    /// Registers a ticker. Lower priorities run first, so higher priorities
    /// override them. Every call creates a new registration.
    pub fn add_ticker(&mut self, ticker: impl Ticker + 'static, priority: i32) -> TickerHandle {
        let handle = TickerHandle(self.next_handle);
        self.next_handle += 1;
        self.tickers.push(Registration {
            handle,
            priority,
            ticker: Box::new(ticker),
        });
        handle
    }

    /// Removes a registration. Unknown handles are ignored.
    pub fn remove_ticker(&mut self, handle: TickerHandle) {
        if let Some(index) = self.tickers.iter().position(|r| r.handle == handle) {
            self.tickers.remove(index);
        }
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    /// Runs every ticker once, in ascending priority order (ties keep
    /// registration order), then advances the tick counter.
    pub fn tick(&mut self) -> Result<(), PresetError> {
        let ticks = self.ticks;
        let time = self.elapsed();

        let mut order: Vec<usize> = (0..self.tickers.len()).collect();
        order.sort_by_key(|&index| self.tickers[index].priority);

        let Preset {
            name,
            tickers,
            commands,
            isolate_failures,
            ..
        } = self;

        for index in order {
            let registration = &mut tickers[index];
            let mut emitter = Emitter {
                commands: &mut *commands,
            };
            if let Err(e) = registration.ticker.tick(ticks, time, &mut emitter) {
                if !*isolate_failures {
                    return Err(e);
                }
                error!(
                    preset = name.as_str(),
                    ticker = registration.handle.0,
                    priority = registration.priority,
                    err = %e,
                    "Ticker failed, skipping the rest of its emissions"
                );
            }
        }

        debug!(
            preset = name.as_str(),
            ticks,
            commands = commands.len(),
            "Ticked preset"
        );
        self.ticks += 1;
        Ok(())
    }

    /// The commands emitted so far, in emission order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The command buffer in its transmittable form.
    pub fn get_cmd_packed(&self) -> Vec<PackedCommand> {
        self.commands.iter().map(Command::pack).collect()
    }

    pub fn clr_cmd(&mut self) {
        self.commands.clear();
    }

    /// Reads and clears the command buffer in one go.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Whether the mixer may transition away from (or into) this preset now.
    pub fn can_transition(&self) -> bool {
        self.can_transition
    }

    pub fn set_can_transition(&mut self, can_transition: bool) {
        self.can_transition = can_transition;
    }

    /// Restarts the tick counter and drops any pending commands.
    pub fn reset(&mut self) {
        self.ticks = 0;
        self.commands.clear();
    }
}

impl fmt::Debug for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preset")
            .field("name", &self.name)
            .field("tick_rate", &self.tick_rate)
            .field("ticks", &self.ticks)
            .field("tickers", &self.tickers.len())
            .field("commands", &self.commands.len())
            .finish()
    }
}
