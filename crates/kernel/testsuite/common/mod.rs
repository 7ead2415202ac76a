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

use tryverb_common::EntityId;
use tryverb_kernel::config::Config;
use tryverb_kernel::{BufferedMessenger, CommandEngine, CommandOutcome, CommandQueue, World};

/// A room with one actor in it, and the plumbing to run commands as that actor.
pub struct Harness {
    pub world: World,
    pub engine: CommandEngine,
    pub messenger: BufferedMessenger,
    pub queue: CommandQueue,
    pub room: EntityId,
    pub actor: EntityId,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("Alice", Some(room)).unwrap();
        Self {
            world,
            engine: CommandEngine::new(config),
            messenger: BufferedMessenger::new(),
            queue: CommandQueue::new(),
            room,
            actor,
        }
    }

    /// Create something in the room declaring `locks`.
    pub fn thing(&mut self, name: &str, locks: &str) -> EntityId {
        let id = self.world.create_entity(name, Some(self.room)).unwrap();
        self.world.set_locks(id, locks).unwrap();
        id
    }

    pub fn run_as(&mut self, actor: EntityId, input: &str) -> CommandOutcome {
        self.engine
            .execute(
                &mut self.world,
                &self.messenger,
                &self.queue,
                actor,
                input,
            )
            .unwrap()
    }

    pub fn run(&mut self, input: &str) -> CommandOutcome {
        self.run_as(self.actor, input)
    }

    pub fn seen_by(&self, who: EntityId) -> Vec<String> {
        self.messenger.seen_by(&self.world, who)
    }

    /// What `who` has seen, after which the buffer is cleared for everyone.
    pub fn take_seen_by(&self, who: EntityId) -> Vec<String> {
        let seen = self.messenger.seen_by(&self.world, who);
        self.messenger.take();
        seen
    }
}
