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

//! The in-memory world graph: entities, containment, and the follow / ride relations.
//!
//! `World` is the only place containment and relations are mutated. It is not internally
//! synchronized; callers serialize commands that touch overlapping neighborhoods (holding a
//! `&mut World` is the serialization).

mod relations;

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use tracing::trace;
use tryverb_common::locks::LockExpr;
use tryverb_common::matching::MatchEnvironment;
use tryverb_common::{EntityId, WorldStateError};

pub use relations::RelationTable;

/// Anything in the world: rooms, items, actors.
#[derive(Clone, Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    location: Option<EntityId>,
    contents: Vec<EntityId>,
    locks: LockExpr,

    pub aliases: Vec<String>,
    /// Lower-cased tags, e.g. `pool` for protected entities.
    pub tags: BTreeSet<String>,
    /// Permission names consulted by `perm()` locks.
    pub permissions: BTreeSet<String>,
    /// Passes every lock.
    pub superuser: bool,

    pub covered_by: Option<EntityId>,
    pub worn: bool,
    pub readable_text: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,

    // Transient; never persisted.
    pending_pose: Option<String>,
}

impl Entity {
    fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            location: None,
            contents: vec![],
            locks: LockExpr::default(),
            aliases: vec![],
            tags: BTreeSet::new(),
            permissions: BTreeSet::new(),
            superuser: false,
            covered_by: None,
            worn: false,
            readable_text: None,
            short_description: None,
            description: None,
            pending_pose: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<EntityId> {
        self.location
    }

    pub fn contents(&self) -> &[EntityId] {
        &self.contents
    }

    pub fn locks(&self) -> &LockExpr {
        &self.locks
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_lowercase())
    }

    pub fn add_tag(&mut self, tag: &str) {
        self.tags.insert(tag.to_lowercase());
    }

    /// Name and aliases, for matching.
    pub fn names(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.aliases.iter().cloned())
            .collect()
    }

    pub fn pending_pose(&self) -> Option<&str> {
        self.pending_pose.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct World {
    entities: HashMap<EntityId, Entity>,
    /// Widened so that an entity at `i32::MAX` leaves it one past the end.
    next_id: i64,
    followers: RelationTable,
    riders: RelationTable,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with the next free id, placed in `location`.
    pub fn create_entity(
        &mut self,
        name: &str,
        location: Option<EntityId>,
    ) -> Result<EntityId, WorldStateError> {
        loop {
            let raw =
                i32::try_from(self.next_id).map_err(|_| WorldStateError::IdSpaceExhausted)?;
            let id = EntityId::mk_id(raw);
            if !self.entities.contains_key(&id) {
                self.insert_entity(id, name, location)?;
                return Ok(id);
            }
            self.next_id += 1;
        }
    }

    /// Create an entity with a caller-chosen id.
    pub fn insert_entity(
        &mut self,
        id: EntityId,
        name: &str,
        location: Option<EntityId>,
    ) -> Result<(), WorldStateError> {
        if self.entities.contains_key(&id) {
            return Err(WorldStateError::EntityAlreadyExists(id));
        }
        if let Some(location) = location {
            self.entity(location)?;
        }
        self.entities.insert(id, Entity::new(id, name));
        if location.is_some() {
            self.move_to(id, location)?;
        }
        self.next_id = self.next_id.max(i64::from(id.id()) + 1);
        Ok(())
    }

    /// Remove an entity. Its contents are left nowhere and it is dropped from every relation.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<(), WorldStateError> {
        self.move_to(id, None)?;
        let contents = self.entity(id)?.contents.clone();
        for item in contents {
            self.move_to(item, None)?;
        }
        self.followers.remove_everywhere(id);
        self.riders.remove_everywhere(id);
        self.entities.remove(&id);
        Ok(())
    }

    pub fn valid(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, WorldStateError> {
        self.entities
            .get(&id)
            .ok_or(WorldStateError::EntityNotFound(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, WorldStateError> {
        self.entities
            .get_mut(&id)
            .ok_or(WorldStateError::EntityNotFound(id))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().sorted_by_key(|e| e.id)
    }

    /// Display name, falling back to the `#N` form for entities that no longer exist.
    pub fn name(&self, id: EntityId) -> String {
        self.entities
            .get(&id)
            .map_or_else(|| id.to_string(), |e| e.name.clone())
    }

    /// First entity (lowest id) whose name or alias matches, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities()
            .find(|e| e.names().iter().any(|n| n.eq_ignore_ascii_case(name)))
            .map(|e| e.id)
    }

    pub fn location_of(&self, id: EntityId) -> Result<Option<EntityId>, WorldStateError> {
        Ok(self.entity(id)?.location)
    }

    pub fn contents_of(&self, id: EntityId) -> Result<&[EntityId], WorldStateError> {
        Ok(&self.entity(id)?.contents)
    }

    pub fn is_holding(&self, holder: EntityId, item: EntityId) -> Result<bool, WorldStateError> {
        Ok(self.location_of(item)? == Some(holder))
    }

    /// Move `id` into `destination` (or out of everything, for `None`). The old container's
    /// content list and the new one are kept in step. Moving something into itself or into
    /// anything it contains is refused.
    pub fn move_to(
        &mut self,
        id: EntityId,
        destination: Option<EntityId>,
    ) -> Result<(), WorldStateError> {
        let previous = self.entity(id)?.location;
        if let Some(destination) = destination {
            self.entity(destination)?;
            let mut cursor = Some(destination);
            while let Some(container) = cursor {
                if container == id {
                    return Err(WorldStateError::RecursiveMove(id, destination));
                }
                cursor = self.entity(container)?.location;
            }
        }
        if previous == destination {
            return Ok(());
        }

        if let Some(previous) = previous {
            self.entity_mut(previous)?.contents.retain(|c| *c != id);
        }
        if let Some(destination) = destination {
            self.entity_mut(destination)?.contents.push(id);
        }
        self.entity_mut(id)?.location = destination;
        trace!(?id, ?previous, ?destination, "moved");
        Ok(())
    }

    /// Replace an entity's lock expression. The expression is parsed here, once; a malformed one
    /// is rejected and the previous expression stays in force.
    pub fn set_locks(&mut self, id: EntityId, source: &str) -> Result<(), WorldStateError> {
        let locks =
            LockExpr::parse(source).map_err(|e| WorldStateError::InvalidLock(id, e))?;
        self.entity_mut(id)?.locks = locks;
        Ok(())
    }

    /// The entities an actor can act on: its location, that location's direct contents, and the
    /// actor's own contents, in that order, without duplicates. Nothing nested deeper is included.
    pub fn neighborhood(&self, actor: EntityId) -> Result<Vec<EntityId>, WorldStateError> {
        let actor = self.entity(actor)?;
        let mut result = vec![];
        if let Some(location) = actor.location {
            result.push(location);
            result.extend(self.entity(location)?.contents.iter().copied());
        }
        result.extend(actor.contents.iter().copied());
        Ok(result.into_iter().unique().collect())
    }

    pub fn followers(&self) -> &RelationTable {
        &self.followers
    }

    pub fn followers_mut(&mut self) -> &mut RelationTable {
        &mut self.followers
    }

    pub fn riders(&self) -> &RelationTable {
        &self.riders
    }

    pub fn riders_mut(&mut self) -> &mut RelationTable {
        &mut self.riders
    }

    /// Stage a pose to replace the generic broadcast of the actor's next action.
    pub fn stage_pose(&mut self, actor: EntityId, pose: &str) -> Result<(), WorldStateError> {
        self.entity_mut(actor)?.pending_pose = Some(pose.to_string());
        Ok(())
    }

    /// Read and clear the actor's staged pose.
    pub fn take_pose(&mut self, actor: EntityId) -> Result<Option<String>, WorldStateError> {
        Ok(self.entity_mut(actor)?.pending_pose.take())
    }
}

impl MatchEnvironment for World {
    fn entity_valid(&self, oid: EntityId) -> Result<bool, WorldStateError> {
        Ok(self.valid(oid))
    }

    fn get_names(&self, oid: EntityId) -> Result<Vec<String>, WorldStateError> {
        Ok(self.entity(oid)?.names())
    }

    fn get_surroundings(&self, actor: EntityId) -> Result<Vec<EntityId>, WorldStateError> {
        self.neighborhood(actor)
    }

    fn location_of(&self, oid: EntityId) -> Result<Option<EntityId>, WorldStateError> {
        World::location_of(self, oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> (World, EntityId, EntityId, EntityId, EntityId) {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("alice", Some(room)).unwrap();
        let bag = world.create_entity("bag", Some(actor)).unwrap();
        let coin = world.create_entity("coin", Some(bag)).unwrap();
        (world, room, actor, bag, coin)
    }

    #[test]
    fn test_move_keeps_contents_consistent() {
        let (mut world, room, actor, bag, _) = small_world();
        world.move_to(bag, Some(room)).unwrap();
        assert_eq!(world.location_of(bag).unwrap(), Some(room));
        assert!(world.contents_of(room).unwrap().contains(&bag));
        assert!(!world.contents_of(actor).unwrap().contains(&bag));

        world.move_to(bag, None).unwrap();
        assert_eq!(world.location_of(bag).unwrap(), None);
        assert!(!world.contents_of(room).unwrap().contains(&bag));
    }

    #[test]
    fn test_highest_id_does_not_overflow() {
        let mut world = World::new();
        let edge = EntityId::mk_id(i32::MAX);
        world.insert_entity(edge, "edge", None).unwrap();
        assert!(world.valid(edge));
        assert_eq!(
            world.create_entity("overflow", None),
            Err(WorldStateError::IdSpaceExhausted)
        );
        assert_eq!(world.entities().count(), 1);

        // Lower ids are still free for callers that choose them.
        world.insert_entity(EntityId::mk_id(7), "low", None).unwrap();
        assert!(world.valid(EntityId::mk_id(7)));
    }

    #[test]
    fn test_recursive_move_refused() {
        let (mut world, _, actor, bag, coin) = small_world();
        assert_eq!(
            world.move_to(bag, Some(coin)),
            Err(WorldStateError::RecursiveMove(bag, coin))
        );
        assert_eq!(
            world.move_to(actor, Some(actor)),
            Err(WorldStateError::RecursiveMove(actor, actor))
        );
        assert_eq!(world.location_of(bag).unwrap(), Some(actor));
    }

    #[test]
    fn test_neighborhood_is_not_recursive() {
        let (world, room, actor, bag, coin) = small_world();
        let hood = world.neighborhood(actor).unwrap();
        assert_eq!(hood, vec![room, actor, bag]);
        assert!(!hood.contains(&coin));
    }

    #[test]
    fn test_neighborhood_without_location() {
        let mut world = World::new();
        let actor = world.create_entity("ghost", None).unwrap();
        let orb = world.create_entity("orb", Some(actor)).unwrap();
        assert_eq!(world.neighborhood(actor).unwrap(), vec![orb]);
    }

    #[test]
    fn test_set_locks_keeps_previous_on_error() {
        let (mut world, _, _, bag, _) = small_world();
        world.set_locks(bag, "v-open:true()").unwrap();
        assert!(matches!(
            world.set_locks(bag, "v-open"),
            Err(WorldStateError::InvalidLock(id, _)) if id == bag
        ));
        assert_eq!(world.entity(bag).unwrap().locks().source(), "v-open:true()");
    }

    #[test]
    fn test_pose_is_taken_once() {
        let (mut world, _, actor, _, _) = small_world();
        world.stage_pose(actor, "grins").unwrap();
        assert_eq!(world.take_pose(actor).unwrap().as_deref(), Some("grins"));
        assert_eq!(world.take_pose(actor).unwrap(), None);
    }

    #[test]
    fn test_remove_entity_forgets_relations() {
        let (mut world, room, actor, bag, coin) = small_world();
        let horse = world.create_entity("horse", Some(room)).unwrap();
        world.riders_mut().add(horse, actor);
        world.followers_mut().add(actor, horse);
        world.remove_entity(horse).unwrap();
        assert!(!world.valid(horse));
        assert!(world.riders().targets_of(actor).is_empty());
        assert_eq!(world.followers().members(actor).count(), 0);

        world.remove_entity(bag).unwrap();
        assert_eq!(world.location_of(coin).unwrap(), None);
    }

    #[test]
    fn test_insert_duplicate_id() {
        let (mut world, room, ..) = small_world();
        assert_eq!(
            world.insert_entity(room, "again", None),
            Err(WorldStateError::EntityAlreadyExists(room))
        );
        let next = world.create_entity("next", None).unwrap();
        assert!(next.id() > room.id());
    }
}
