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

use crate::locks::LockParseError;
use crate::model::EntityId;

/// Errors related to the world state and operations on it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WorldStateError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),
    #[error("Entity already exists: {0}")]
    EntityAlreadyExists(EntityId),
    #[error("Recursive move detected: {0} -> {1}")]
    RecursiveMove(EntityId, EntityId),
    #[error("No entity ids left to allocate")]
    IdSpaceExhausted,
    #[error("Invalid lock on {0}: {1}")]
    InvalidLock(EntityId, LockParseError),

    #[error("Failed entity match: {0}")]
    FailedMatch(String),
}
