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

use std::sync::{Arc, Mutex};

/// Represents the current cancel state.
#[derive(PartialEq)]
enum CancelState {
    Running,
    Cancelled,
}

/// A cancel handle is passed to the mixer's run loop. The loop checks it once per tick
/// and stops cleanly when it has been cancelled.
#[derive(Clone)]
pub struct CancelHandle {
    /// Set to cancelled when the loop should stop.
    cancelled: Arc<Mutex<CancelState>>,
}

impl CancelHandle {
    /// Creates a new cancel handle.
    pub fn new() -> CancelHandle {
        CancelHandle {
            cancelled: Arc::new(Mutex::new(CancelState::Running)),
        }
    }

    /// Returns true if the run has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().expect("Error getting lock") == CancelState::Cancelled
    }

    /// Cancels the run. Cancelling twice is a no-op.
    pub fn cancel(&self) {
        *self.cancelled.lock().expect("Error getting lock") = CancelState::Cancelled;
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
