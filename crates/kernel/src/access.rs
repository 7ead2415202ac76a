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

use tracing::warn;
use tryverb_common::EntityId;

use crate::world::{Entity, World};

/// Decides whether `actor` passes the lock element named `access_type` on `entity`.
///
/// Implementations must not mutate anything and must answer the same way for the same world
/// snapshot; a verb scan calls this many times per command.
pub trait AccessEvaluator: Send + Sync {
    fn grant(&self, world: &World, actor: EntityId, entity: EntityId, access_type: &str) -> bool;
}

/// Evaluates the entity's own lock expression, resolving lock functions against the world.
/// A missing element denies. Superusers pass everything.
pub struct LockAccessEvaluator {
    hierarchy: Vec<String>,
}

impl LockAccessEvaluator {
    pub fn new(hierarchy: Vec<String>) -> Self {
        Self { hierarchy }
    }

    fn rank(&self, permission: &str) -> Option<usize> {
        self.hierarchy
            .iter()
            .position(|p| p.eq_ignore_ascii_case(permission))
    }

    /// Whether the actor holds `required`, or (when `strictly_above`) something ranked above it.
    fn has_perm(&self, actor: &Entity, required: &str, strictly_above: bool) -> bool {
        if !strictly_above
            && actor
                .permissions
                .iter()
                .any(|p| p.eq_ignore_ascii_case(required))
        {
            return true;
        }
        let Some(required_rank) = self.rank(required) else {
            return false;
        };
        actor
            .permissions
            .iter()
            .filter_map(|p| self.rank(p))
            .any(|rank| {
                if strictly_above {
                    rank > required_rank
                } else {
                    rank >= required_rank
                }
            })
    }

    fn lock_func(
        &self,
        world: &World,
        actor: &Entity,
        entity: &Entity,
        func: &str,
        args: &[String],
    ) -> bool {
        let arg = args.first().map(String::as_str);
        match (func, arg) {
            ("true" | "all", _) => true,
            ("false" | "none", _) => false,
            ("self", _) => actor.id() == entity.id(),
            ("id" | "dbref", Some(id)) => id.parse::<EntityId>().is_ok_and(|id| id == actor.id()),
            ("perm", Some(perm)) => self.has_perm(actor, perm, false),
            ("perm_above", Some(perm)) => self.has_perm(actor, perm, true),
            ("tag", Some(tag)) => actor.has_tag(tag),
            ("objtag", Some(tag)) => entity.has_tag(tag),
            ("holds", None) => entity.location() == Some(actor.id()),
            ("holds", Some(what)) => actor.contents().iter().any(|held| {
                what.parse::<EntityId>().is_ok_and(|id| id == *held)
                    || world.entity(*held).is_ok_and(|e| {
                        e.names().iter().any(|n| n.eq_ignore_ascii_case(what))
                    })
            }),
            ("inside", _) => actor.location() == Some(entity.id()),
            _ => {
                warn!(func, ?args, entity = ?entity.id(), "unknown or malformed lock function");
                false
            }
        }
    }
}

impl AccessEvaluator for LockAccessEvaluator {
    fn grant(&self, world: &World, actor: EntityId, entity: EntityId, access_type: &str) -> bool {
        let (Ok(actor), Ok(target)) = (world.entity(actor), world.entity(entity)) else {
            return false;
        };
        if actor.superuser {
            return true;
        }
        let Some(element) = target.locks().get(access_type) else {
            return false;
        };
        element
            .predicate()
            .evaluate(&mut |func: &str, args: &[String]| {
                self.lock_func(world, actor, target, func, args)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    struct Fixture {
        world: World,
        evaluator: LockAccessEvaluator,
        actor: EntityId,
        thing: EntityId,
    }

    fn fixture(lock: &str) -> Fixture {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let actor = world.create_entity("alice", Some(room)).unwrap();
        let thing = world.create_entity("thing", Some(room)).unwrap();
        world.set_locks(thing, lock).unwrap();
        Fixture {
            world,
            evaluator: LockAccessEvaluator::new(Config::default().permission_hierarchy),
            actor,
            thing,
        }
    }

    impl Fixture {
        fn grant(&self, access_type: &str) -> bool {
            self.evaluator
                .grant(&self.world, self.actor, self.thing, access_type)
        }
    }

    #[test]
    fn test_constant_locks() {
        let f = fixture("v-a:true();v-b:all();v-c:false();v-d:none()");
        assert!(f.grant("v-a"));
        assert!(f.grant("v-b"));
        assert!(!f.grant("v-c"));
        assert!(!f.grant("v-d"));
        assert!(!f.grant("v-missing"));
        // The stripped name is not an access type.
        assert!(!f.grant("a"));
    }

    #[test]
    fn test_perm_hierarchy() {
        let mut f = fixture("v-build:perm(Builder);v-boss:perm_above(Builder)");
        assert!(!f.grant("v-build"));
        f.world
            .entity_mut(f.actor)
            .unwrap()
            .permissions
            .insert("Builder".to_string());
        assert!(f.grant("v-build"));
        assert!(!f.grant("v-boss"));
        f.world
            .entity_mut(f.actor)
            .unwrap()
            .permissions
            .insert("wizard".to_string());
        assert!(f.grant("v-boss"));
    }

    #[test]
    fn test_id_self_and_tags() {
        let mut f = fixture("v-mine:id(#1);v-me:self();v-vip:tag(VIP);v-shiny:objtag(shiny)");
        assert!(f.grant("v-mine"));
        assert!(!f.grant("v-me"));
        assert!(!f.grant("v-vip"));
        f.world.entity_mut(f.actor).unwrap().add_tag("vip");
        assert!(f.grant("v-vip"));
        f.world.entity_mut(f.thing).unwrap().add_tag("Shiny");
        assert!(f.grant("v-shiny"));
    }

    #[test]
    fn test_holds_and_inside() {
        let mut f = fixture("v-use:holds();v-key:holds(key);v-exit:inside()");
        assert!(!f.grant("v-use"));
        assert!(!f.grant("v-key"));
        f.world.move_to(f.thing, Some(f.actor)).unwrap();
        assert!(f.grant("v-use"));
        let key = f.world.create_entity("brass key", Some(f.actor)).unwrap();
        f.world.entity_mut(key).unwrap().aliases.push("key".to_string());
        assert!(f.grant("v-key"));
        assert!(!f.grant("v-exit"));
    }

    #[test]
    fn test_boolean_composition_and_unknown() {
        let f = fixture("v-x:not false() and (frobnicate() or true());v-y:frobnicate()");
        assert!(f.grant("v-x"));
        assert!(!f.grant("v-y"));
    }

    #[test]
    fn test_superuser_passes() {
        let mut f = fixture("v-x:false()");
        f.world.entity_mut(f.actor).unwrap().superuser = true;
        assert!(f.grant("v-x"));
    }
}
