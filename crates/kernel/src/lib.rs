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

pub use crate::access::{AccessEvaluator, LockAccessEvaluator};
pub use crate::actions::{ActionRecord, ActionRegistry, ActionResult};
pub use crate::engine::{CommandEngine, CommandOutcome};
pub use crate::interpreter::{CommandInterpreter, CommandQueue, QueuedCommand};
pub use crate::messaging::{BufferedMessenger, Delivery, Messenger, MessengerError};
pub use crate::world::{Entity, World};

pub mod access;
pub mod actions;
pub mod config;
pub mod disambiguate;
pub mod engine;
pub mod interpreter;
pub mod messaging;
pub mod scan;
pub mod world;
