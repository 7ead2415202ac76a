// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use std::collections::VecDeque;
use std::sync::Mutex;

use tryverb_common::EntityId;

/// The wider command layer. Some verbs (`examine`, `view`, `puppet`) are only a translation into
/// one of its commands, run on the actor's behalf.
pub trait CommandInterpreter: Send + Sync {
    fn execute(&self, actor: EntityId, command_line: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedCommand {
    pub actor: EntityId,
    pub command_line: String,
}

/// Queues commands for the host to run once the current command has finished.
#[derive(Default)]
pub struct CommandQueue {
    queued: Mutex<VecDeque<QueuedCommand>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&self) -> Option<QueuedCommand> {
        self.queued.lock().ok()?.pop_front()
    }

    pub fn drain(&self) -> Vec<QueuedCommand> {
        self.queued
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }
}

impl CommandInterpreter for CommandQueue {
    fn execute(&self, actor: EntityId, command_line: &str) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(QueuedCommand {
                actor,
                command_line: command_line.to_string(),
            });
        }
    }
}
