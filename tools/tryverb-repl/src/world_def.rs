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

//! World definitions: a flat list of entities, read from YAML.

use std::path::Path;

use eyre::{WrapErr, eyre};
use figment::Figment;
use figment::providers::{Format, Yaml};
use serde::{Deserialize, Serialize};
use tracing::info;
use tryverb_common::EntityId;
use tryverb_kernel::World;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDef {
    /// Name of the entity to act as, unless overridden on the command line.
    pub actor: Option<String>,
    pub entities: Vec<EntityDef>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDef {
    pub id: i32,
    pub name: String,
    pub aliases: Vec<String>,
    pub location: Option<i32>,
    pub locks: String,
    pub tags: Vec<String>,
    pub permissions: Vec<String>,
    pub superuser: bool,
    pub worn: bool,
    pub covered_by: Option<i32>,
    pub readable_text: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
}

impl WorldDef {
    pub fn load(path: &Path) -> Result<Self, eyre::Report> {
        Figment::new()
            .merge(Yaml::file(path))
            .extract()
            .map_err(|e| eyre!("Failed to read world definition from {path:?}: {e}"))
    }

    /// Build the world. Entities are created first and placed afterwards, so locations may be
    /// listed in any order.
    pub fn build(&self) -> Result<World, eyre::Report> {
        let mut world = World::new();
        for def in &self.entities {
            world
                .insert_entity(EntityId::mk_id(def.id), &def.name, None)
                .wrap_err_with(|| format!("creating {}", def.name))?;
        }
        for def in &self.entities {
            let id = EntityId::mk_id(def.id);
            world
                .move_to(id, def.location.map(EntityId::mk_id))
                .wrap_err_with(|| format!("placing {} (#{})", def.name, def.id))?;
            world
                .set_locks(id, &def.locks)
                .wrap_err_with(|| format!("locks of {} (#{})", def.name, def.id))?;
            if let Some(cover) = def.covered_by {
                world.entity(EntityId::mk_id(cover))?;
            }

            let entity = world.entity_mut(id)?;
            entity.aliases = def.aliases.clone();
            for tag in &def.tags {
                entity.add_tag(tag);
            }
            entity.permissions = def.permissions.iter().cloned().collect();
            entity.superuser = def.superuser;
            entity.worn = def.worn;
            entity.covered_by = def.covered_by.map(EntityId::mk_id);
            entity.readable_text = def.readable_text.clone();
            entity.short_description = def.short_description.clone();
            entity.description = def.description.clone();
        }
        info!(entities = self.entities.len(), "world loaded");
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WORLD: &str = r#"
actor: Alice
entities:
  - id: 3
    name: brass lamp
    aliases: [lamp]
    location: 2
    locks: "v-read:true()"
    readable_text: Property of the inn.
  - id: 1
    name: Inn
  - id: 2
    name: Alice
    location: 1
    permissions: [Builder]
    tags: [Regular]
"#;

    fn parse(yaml: &str) -> WorldDef {
        Figment::new().merge(Yaml::string(yaml)).extract().unwrap()
    }

    #[test]
    fn test_build_places_entities_in_any_order() {
        let def = parse(WORLD);
        assert_eq!(def.actor.as_deref(), Some("Alice"));
        let world = def.build().unwrap();
        let (inn, alice, lamp) = (EntityId::mk_id(1), EntityId::mk_id(2), EntityId::mk_id(3));
        assert_eq!(world.location_of(alice).unwrap(), Some(inn));
        assert_eq!(world.contents_of(alice).unwrap(), &[lamp]);
        assert_eq!(world.find_by_name("lamp"), Some(lamp));
        assert!(world.entity(alice).unwrap().has_tag("regular"));
        assert_eq!(world.entity(lamp).unwrap().locks().elements().len(), 1);
    }

    #[test]
    fn test_bad_lock_is_reported() {
        let def = parse(
            r#"
entities:
  - id: 1
    name: box
    locks: "v-open"
"#,
        );
        let err = def.build().unwrap_err();
        assert!(format!("{err:#}").contains("box"));
    }

    #[test]
    fn test_highest_id_is_accepted() {
        let def = parse(
            r#"
entities:
  - id: 2147483647
    name: edge
"#,
        );
        let world = def.build().unwrap();
        assert!(world.valid(EntityId::mk_id(i32::MAX)));
    }
}
