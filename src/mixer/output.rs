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

use std::io::{self, Write};

use tracing::{debug, info};

use crate::lighting::buffer::FrameBuffer;

/// Errors raised by output sinks.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("output I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Receives every frame the mixer produces.
pub trait Output {
    fn write(&mut self, frame: &FrameBuffer) -> Result<(), OutputError>;
}

/// An output that only reports frame statistics through tracing.
pub struct LogOutput {
    frames: u64,
    /// An info line is written every this many frames.
    report_every: u64,
}

impl LogOutput {
    pub fn new(report_every: u64) -> LogOutput {
        LogOutput {
            frames: 0,
            report_every: report_every.max(1),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Output for LogOutput {
    fn write(&mut self, frame: &FrameBuffer) -> Result<(), OutputError> {
        let (strands, pixels) = frame.shape();
        let level = frame.mean_level();
        debug!(frame = self.frames, level, "Frame");
        if self.frames % self.report_every == 0 {
            info!(frame = self.frames, strands, pixels, level, "Frame");
        }
        self.frames += 1;
        Ok(())
    }
}

/// Writes every frame as raw 8-bit RGB, strand after strand, to any writer.
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> WriterOutput<W> {
        WriterOutput { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for WriterOutput<W> {
    fn write(&mut self, frame: &FrameBuffer) -> Result<(), OutputError> {
        self.writer.write_all(&frame.to_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
