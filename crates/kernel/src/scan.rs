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

//! Finding which verbs an actor can use, and on what.

use std::collections::BTreeSet;

use tracing::trace;
use tryverb_common::{EntityId, WorldStateError};

use crate::access::AccessEvaluator;
use crate::world::World;

/// Every verb name declared by something in the actor's neighborhood and granted to the actor.
/// Access is checked against the access type as written (`v-read`), the result holds the stripped
/// name (`read`).
pub fn available_verbs(
    world: &World,
    evaluator: &dyn AccessEvaluator,
    actor: EntityId,
) -> Result<BTreeSet<String>, WorldStateError> {
    let mut verbs = BTreeSet::new();
    for oid in world.neighborhood(actor)? {
        for element in world.entity(oid)?.locks().elements() {
            if verbs.contains(element.name()) {
                continue;
            }
            if evaluator.grant(world, actor, oid, element.access_type()) {
                verbs.insert(element.name().to_string());
            }
        }
    }
    trace!(?actor, ?verbs, "available verbs");
    Ok(verbs)
}

/// The entities in the actor's neighborhood that declare `verb` and grant it to the actor, in
/// neighborhood order.
pub fn candidates_for(
    world: &World,
    evaluator: &dyn AccessEvaluator,
    actor: EntityId,
    verb: &str,
) -> Result<Vec<EntityId>, WorldStateError> {
    let mut candidates = vec![];
    for oid in world.neighborhood(actor)? {
        let granted = world
            .entity(oid)?
            .locks()
            .elements()
            .iter()
            .filter(|e| e.name() == verb)
            .any(|e| evaluator.grant(world, actor, oid, e.access_type()));
        if granted {
            candidates.push(oid);
        }
    }
    trace!(?actor, verb, ?candidates, "candidates");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::LockAccessEvaluator;

    fn evaluator() -> LockAccessEvaluator {
        LockAccessEvaluator::new(vec![])
    }

    #[test]
    fn test_verbs_collected_from_all_three_neighborhoods() {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("alice", Some(room)).unwrap();
        let statue = world.create_entity("statue", Some(room)).unwrap();
        let book = world.create_entity("book", Some(actor)).unwrap();
        let page = world.create_entity("page", Some(book)).unwrap();
        world.set_locks(room, "v-shout:true()").unwrap();
        world.set_locks(statue, "v-wave:true();v-kick:false()").unwrap();
        world.set_locks(book, "v-read:true();get:true()").unwrap();
        world.set_locks(page, "v-tear:true()").unwrap();

        let verbs = available_verbs(&world, &evaluator(), actor).unwrap();
        let verbs: Vec<_> = verbs.iter().map(String::as_str).collect();
        // Non-verb access types are still names; nested contents are out of reach.
        assert_eq!(verbs, vec!["get", "read", "shout", "wave"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("alice", Some(room)).unwrap();
        let a = world.create_entity("a", Some(room)).unwrap();
        let b = world.create_entity("b", Some(room)).unwrap();
        world.set_locks(a, "v-wave:true();v-wave:true()").unwrap();
        world.set_locks(b, "v-wave:true()").unwrap();

        let verbs = available_verbs(&world, &evaluator(), actor).unwrap();
        assert_eq!(verbs.len(), 1);
        assert_eq!(
            candidates_for(&world, &evaluator(), actor, "wave").unwrap(),
            vec![a, b]
        );
    }

    #[test]
    fn test_candidates_exact_name_and_granted() {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("alice", Some(room)).unwrap();
        let a = world.create_entity("a", Some(room)).unwrap();
        let b = world.create_entity("b", Some(room)).unwrap();
        let elsewhere = world.create_entity("c", None).unwrap();
        world.set_locks(a, "v-wave:true()").unwrap();
        world.set_locks(b, "v-wave:false();v-waves:true()").unwrap();
        world.set_locks(elsewhere, "v-wave:true()").unwrap();

        assert_eq!(
            candidates_for(&world, &evaluator(), actor, "wave").unwrap(),
            vec![a]
        );
        assert!(
            candidates_for(&world, &evaluator(), actor, "wav")
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_bare_prefix_never_becomes_a_verb() {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("alice", Some(room)).unwrap();
        let odd = world.create_entity("odd", Some(room)).unwrap();
        assert!(matches!(
            world.set_locks(odd, "v-:true()"),
            Err(WorldStateError::InvalidLock(id, _)) if id == odd
        ));

        assert!(available_verbs(&world, &evaluator(), actor).unwrap().is_empty());
        assert!(
            candidates_for(&world, &evaluator(), actor, "")
                .unwrap()
                .is_empty()
        );
    }
}
