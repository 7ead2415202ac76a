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

use std::collections::HashMap;

use crate::matching::MatchEnvironment;
use crate::model::{EntityId, WorldStateError};

pub const MOCK_ROOM1: EntityId = EntityId::mk_id(1);
pub const MOCK_ROOM2: EntityId = EntityId::mk_id(2);
pub const MOCK_PLAYER: EntityId = EntityId::mk_id(3);
pub const MOCK_THING1: EntityId = EntityId::mk_id(4);
pub const MOCK_THING2: EntityId = EntityId::mk_id(5);
pub const MOCK_THING3: EntityId = EntityId::mk_id(6);

pub struct MockObject {
    pub location: Option<EntityId>,
    pub contents: Vec<EntityId>,
    pub names: Vec<String>,
}

#[derive(Default)]
pub struct MockMatchEnv {
    objects: HashMap<EntityId, MockObject>,
}

impl MatchEnvironment for MockMatchEnv {
    fn entity_valid(&self, oid: EntityId) -> Result<bool, WorldStateError> {
        Ok(self.objects.contains_key(&oid))
    }

    fn get_names(&self, oid: EntityId) -> Result<Vec<String>, WorldStateError> {
        Ok(self
            .objects
            .get(&oid)
            .map_or_else(Vec::new, |o| o.names.clone()))
    }

    fn get_surroundings(&self, actor: EntityId) -> Result<Vec<EntityId>, WorldStateError> {
        let mut result = Vec::new();
        let Some(actor_obj) = self.objects.get(&actor) else {
            return Ok(result);
        };
        if let Some(location) = actor_obj.location {
            result.push(location);
            if let Some(location_obj) = self.objects.get(&location) {
                result.extend(location_obj.contents.iter().copied());
            }
        }
        result.extend(actor_obj.contents.iter().copied());
        Ok(result)
    }

    fn location_of(&self, oid: EntityId) -> Result<Option<EntityId>, WorldStateError> {
        self.objects
            .get(&oid)
            .map(|o| o.location)
            .ok_or(WorldStateError::EntityNotFound(oid))
    }
}

fn create_mock_object(
    env: &mut MockMatchEnv,
    oid: EntityId,
    location: Option<EntityId>,
    contents: &[EntityId],
    names: &[&str],
) {
    env.objects.insert(
        oid,
        MockObject {
            location,
            contents: contents.to_vec(),
            names: names.iter().map(|n| n.to_string()).collect(),
        },
    );
}

/// Two rooms; the player stands in the first with thing1 and thing2, thing3 is next door.
pub fn setup_mock_environment() -> MockMatchEnv {
    let mut env = MockMatchEnv::default();

    create_mock_object(&mut env, MOCK_PLAYER, Some(MOCK_ROOM1), &[], &["porcupine"]);
    create_mock_object(
        &mut env,
        MOCK_ROOM1,
        None,
        &[MOCK_PLAYER, MOCK_THING1, MOCK_THING2],
        &["room1", "r1"],
    );
    create_mock_object(&mut env, MOCK_ROOM2, None, &[MOCK_THING3], &["room2"]);
    create_mock_object(
        &mut env,
        MOCK_THING1,
        Some(MOCK_ROOM1),
        &[],
        &["thing1", "t1"],
    );
    create_mock_object(
        &mut env,
        MOCK_THING2,
        Some(MOCK_ROOM1),
        &[],
        &["thing2", "t2"],
    );
    create_mock_object(
        &mut env,
        MOCK_THING3,
        Some(MOCK_ROOM2),
        &[],
        &["thing3", "t3"],
    );

    env
}
