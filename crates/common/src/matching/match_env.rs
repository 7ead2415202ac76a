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

use crate::matching::{MatchEnvironment, ObjectNameMatcher};
use crate::model::{EntityId, WorldStateError};

const ME: &str = "me";
const HERE: &str = "here";

#[derive(Clone, Eq, PartialEq, Debug, Default)]
struct MatchData {
    exact: Vec<EntityId>,
    partial: Vec<EntityId>,
}

fn do_match_object_names(
    oid: EntityId,
    match_data: &mut MatchData,
    names: Vec<String>,
    match_name: &str,
) {
    let match_name = match_name.to_lowercase();

    for object_name in names {
        let object_name = object_name.to_lowercase();
        if !object_name.starts_with(&match_name) {
            continue;
        }
        let bucket = if object_name == match_name {
            &mut match_data.exact
        } else {
            &mut match_data.partial
        };
        if !bucket.contains(&oid) {
            bucket.push(oid);
        }
    }
}

fn match_contents<M: MatchEnvironment>(
    env: &M,
    actor: EntityId,
    object_name: &str,
) -> Result<Option<EntityId>, WorldStateError> {
    let mut match_data = MatchData::default();

    for oid in env.get_surroundings(actor)? {
        if !env.entity_valid(oid)? {
            continue;
        }
        let names = env.get_names(oid)?;
        do_match_object_names(oid, &mut match_data, names, object_name);
    }

    // First entity of the best tier wins; ambiguity is not an error at this layer.
    Ok(match_data
        .exact
        .first()
        .or(match_data.partial.first())
        .copied())
}

/// Matches a noun phrase against the names and aliases of everything around an actor. Exact
/// matches beat prefix matches; `me`, `here` and `#N` are understood.
pub struct DefaultObjectNameMatcher<'a, M: MatchEnvironment> {
    pub env: &'a M,
    pub actor: EntityId,
}

impl<M: MatchEnvironment> ObjectNameMatcher for DefaultObjectNameMatcher<'_, M> {
    fn match_object(&self, object_name: &str) -> Result<Option<EntityId>, WorldStateError> {
        let object_name = object_name.trim();
        if object_name.is_empty() {
            return Ok(None);
        }

        if !self.env.entity_valid(self.actor)? {
            return Err(WorldStateError::FailedMatch(
                "Invalid current actor when performing object match".to_string(),
            ));
        }

        if object_name.eq_ignore_ascii_case(ME) {
            return Ok(Some(self.actor));
        }
        if object_name.eq_ignore_ascii_case(HERE) {
            return self.env.location_of(self.actor);
        }

        // Literal references only resolve to things actually in reach.
        if object_name.starts_with('#')
            && let Ok(oid) = object_name.parse::<EntityId>()
        {
            let surroundings = self.env.get_surroundings(self.actor)?;
            return Ok(surroundings.contains(&oid).then_some(oid));
        }

        match_contents(self.env, self.actor, object_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::mock_matching_env::{
        MOCK_PLAYER, MOCK_ROOM1, MOCK_THING1, MOCK_THING2, MOCK_THING3, setup_mock_environment,
    };

    #[test]
    fn test_match_object_names_exact_and_partial() {
        let mut match_data = MatchData::default();
        do_match_object_names(
            EntityId::mk_id(2),
            &mut match_data,
            vec!["Lamp".to_string(), "lampshade".to_string()],
            "lamp",
        );
        assert_eq!(match_data.exact, vec![EntityId::mk_id(2)]);
        assert_eq!(match_data.partial, vec![EntityId::mk_id(2)]);
    }

    #[test]
    fn test_match_object_names_fail() {
        let mut match_data = MatchData::default();
        do_match_object_names(
            EntityId::mk_id(2),
            &mut match_data,
            vec!["apple".to_string(), "banana".to_string()],
            "durian",
        );
        assert_eq!(match_data, MatchData::default());
    }

    #[test]
    fn test_match_me_and_here() {
        let env = setup_mock_environment();
        let matcher = DefaultObjectNameMatcher {
            env: &env,
            actor: MOCK_PLAYER,
        };
        assert_eq!(matcher.match_object("me").unwrap(), Some(MOCK_PLAYER));
        assert_eq!(matcher.match_object("HERE").unwrap(), Some(MOCK_ROOM1));
    }

    #[test]
    fn test_exact_beats_partial() {
        let env = setup_mock_environment();
        let matcher = DefaultObjectNameMatcher {
            env: &env,
            actor: MOCK_PLAYER,
        };
        // "thing1" is exact for thing1, and a prefix of nothing else.
        assert_eq!(matcher.match_object("thing1").unwrap(), Some(MOCK_THING1));
        // "t2" is an alias.
        assert_eq!(matcher.match_object("T2").unwrap(), Some(MOCK_THING2));
        // "thing" is a prefix of both; the first in surroundings order wins.
        assert_eq!(matcher.match_object("thing").unwrap(), Some(MOCK_THING1));
    }

    #[test]
    fn test_out_of_reach_is_not_matched() {
        let env = setup_mock_environment();
        let matcher = DefaultObjectNameMatcher {
            env: &env,
            actor: MOCK_PLAYER,
        };
        assert_eq!(matcher.match_object("thing3").unwrap(), None);
        assert_eq!(matcher.match_object(&MOCK_THING3.to_string()).unwrap(), None);
        assert_eq!(
            matcher.match_object(&MOCK_THING2.to_string()).unwrap(),
            Some(MOCK_THING2)
        );
    }

    #[test]
    fn test_empty_name() {
        let env = setup_mock_environment();
        let matcher = DefaultObjectNameMatcher {
            env: &env,
            actor: MOCK_PLAYER,
        };
        assert_eq!(matcher.match_object("  ").unwrap(), None);
    }
}
