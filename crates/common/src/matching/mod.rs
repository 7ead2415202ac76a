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

use crate::model::{EntityId, WorldStateError};

mod input_parse;
pub mod match_env;
#[doc(hidden)]
pub mod mock_matching_env;
mod prepositions;
pub mod suggest;

pub use input_parse::parse_input;
pub use match_env::DefaultObjectNameMatcher;
pub use prepositions::Preposition;
pub use suggest::{DEFAULT_CUTOFF, DEFAULT_MAX_SUGGESTIONS, similarity, suggest};

/// Output from splitting raw input, which is then matched against the verbs and entities present
/// around the actor.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ParsedInput {
    pub verb: String,
    /// Everything after the verb, trimmed. Empty if no noun was given.
    pub noun: String,

    pub dobjstr: Option<String>,
    pub prep: Option<Preposition>,
    pub prepstr: Option<String>,
    pub iobjstr: Option<String>,
}

/// This is the interface that the matching code needs to be able to call into the world state.
/// Separated out so can be more easily mocked.
pub trait MatchEnvironment {
    // Test whether a given entity is valid in this environment.
    fn entity_valid(&self, oid: EntityId) -> Result<bool, WorldStateError>;

    // Return all match names & aliases for an entity.
    fn get_names(&self, oid: EntityId) -> Result<Vec<String>, WorldStateError>;

    // The actor's location, that location's contents, then the actor's own contents, in order.
    fn get_surroundings(&self, actor: EntityId) -> Result<Vec<EntityId>, WorldStateError>;

    // Return the location of a given entity, if it has one.
    fn location_of(&self, oid: EntityId) -> Result<Option<EntityId>, WorldStateError>;
}

/// Trait for matching names in the environment. Used to find entities that match the noun phrases
/// given in a command.
pub trait ObjectNameMatcher {
    fn match_object(&self, name: &str) -> Result<Option<EntityId>, WorldStateError>;
}
