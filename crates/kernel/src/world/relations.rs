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

use std::collections::{BTreeSet, HashMap};
use tryverb_common::EntityId;

/// A membership relation keyed by target: `followers[leader]`, `riders[mount]`.
#[derive(Clone, Debug, Default)]
pub struct RelationTable {
    members: HashMap<EntityId, BTreeSet<EntityId>>,
}

impl RelationTable {
    /// Returns true if `member` was not already related to `target`.
    pub fn add(&mut self, target: EntityId, member: EntityId) -> bool {
        self.members.entry(target).or_default().insert(member)
    }

    /// Returns true if `member` was related to `target`.
    pub fn remove(&mut self, target: EntityId, member: EntityId) -> bool {
        let Some(members) = self.members.get_mut(&target) else {
            return false;
        };
        let removed = members.remove(&member);
        if members.is_empty() {
            self.members.remove(&target);
        }
        removed
    }

    /// Flip membership. Returns true if `member` is related to `target` afterwards.
    pub fn toggle(&mut self, target: EntityId, member: EntityId) -> bool {
        if self.remove(target, member) {
            false
        } else {
            self.add(target, member)
        }
    }

    pub fn contains(&self, target: EntityId, member: EntityId) -> bool {
        self.members
            .get(&target)
            .is_some_and(|members| members.contains(&member))
    }

    pub fn members(&self, target: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.members.get(&target).into_iter().flatten().copied()
    }

    /// Every target `member` is related to.
    pub fn targets_of(&self, member: EntityId) -> Vec<EntityId> {
        let mut targets: Vec<_> = self
            .members
            .iter()
            .filter(|(_, members)| members.contains(&member))
            .map(|(target, _)| *target)
            .collect();
        targets.sort();
        targets
    }

    /// Drop `entity` from the table entirely, as target and as member.
    pub fn remove_everywhere(&mut self, entity: EntityId) {
        self.members.remove(&entity);
        self.members.retain(|_, members| {
            members.remove(&entity);
            !members.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EntityId = EntityId::mk_id(1);
    const B: EntityId = EntityId::mk_id(2);
    const C: EntityId = EntityId::mk_id(3);

    #[test]
    fn test_toggle_is_involutive() {
        let mut table = RelationTable::default();
        assert!(table.toggle(B, A));
        assert!(table.contains(B, A));
        assert!(!table.toggle(B, A));
        assert!(!table.contains(B, A));
        assert_eq!(table.members(B).count(), 0);
    }

    #[test]
    fn test_targets_of_and_remove_everywhere() {
        let mut table = RelationTable::default();
        table.add(B, A);
        table.add(C, A);
        table.add(C, B);
        assert_eq!(table.targets_of(A), vec![B, C]);

        table.remove_everywhere(A);
        assert!(table.targets_of(A).is_empty());
        assert_eq!(table.members(C).collect::<Vec<_>>(), vec![B]);

        table.remove_everywhere(C);
        assert_eq!(table.members(C).count(), 0);
    }

    #[test]
    fn test_remove_missing() {
        let mut table = RelationTable::default();
        assert!(!table.remove(A, B));
        table.add(A, B);
        assert!(!table.add(A, B));
        assert!(table.remove(A, B));
    }
}
