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

use std::sync::RwLock;

use thiserror::Error;
use tryverb_common::EntityId;

use crate::world::World;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessengerError {
    #[error("No connection for entity {0}")]
    NoConnectionForEntity(EntityId),
    #[error("Could not deliver message")]
    DeliveryError,
}

/// Output side of the engine. Delivery is fire-and-forget from the engine's point of view:
/// failures are logged and otherwise ignored.
///
/// Broadcast templates carry `{name}` placeholders bound to entities by `mapping`; resolving those
/// into display text (and any styling) is the implementation's business. `{{` and `}}` are
/// literal braces.
pub trait Messenger: Send + Sync {
    fn send_to(&self, entity: EntityId, text: &str) -> Result<(), MessengerError>;

    fn broadcast(
        &self,
        location: EntityId,
        template: &str,
        exclude: &[EntityId],
        mapping: &[(&str, EntityId)],
    ) -> Result<(), MessengerError>;
}

/// A message as handed to a `Messenger`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Direct {
        to: EntityId,
        text: String,
    },
    Broadcast {
        location: EntityId,
        template: String,
        exclude: Vec<EntityId>,
        mapping: Vec<(String, EntityId)>,
    },
}

impl Delivery {
    /// Whether `observer` would receive this, given where things are in `world` now.
    pub fn reaches(&self, world: &World, observer: EntityId) -> bool {
        match self {
            Delivery::Direct { to, .. } => *to == observer,
            Delivery::Broadcast {
                location, exclude, ..
            } => {
                !exclude.contains(&observer)
                    && world.location_of(observer).ok().flatten() == Some(*location)
            }
        }
    }

    /// Plain text with placeholders replaced by entity names.
    pub fn render(&self, world: &World) -> String {
        match self {
            Delivery::Direct { text, .. } => text.clone(),
            Delivery::Broadcast {
                template, mapping, ..
            } => render_template(world, template, mapping),
        }
    }
}

/// Substitute `{key}` with the name of the entity mapped to `key`. Unknown keys are left as
/// written.
pub fn render_template(world: &World, template: &str, mapping: &[(String, EntityId)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let key: String = chars.by_ref().take_while(|c| *c != '}').collect();
                match mapping.iter().find(|(k, _)| *k == key) {
                    Some((_, id)) => out.push_str(&world.name(*id)),
                    None => {
                        out.push('{');
                        out.push_str(&key);
                        out.push('}');
                    }
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Make arbitrary text safe to use as a broadcast template.
pub fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

/// Buffers everything it is handed. Hosts drain it after each command; tests inspect it.
#[derive(Default)]
pub struct BufferedMessenger {
    deliveries: RwLock<Vec<Delivery>>,
}

impl BufferedMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Delivery> {
        self.deliveries
            .read()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<Delivery> {
        self.deliveries
            .write()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    /// Rendered text of everything `observer` would have seen, in order.
    pub fn seen_by(&self, world: &World, observer: EntityId) -> Vec<String> {
        self.received()
            .iter()
            .filter(|d| d.reaches(world, observer))
            .map(|d| d.render(world))
            .collect()
    }

    fn push(&self, delivery: Delivery) -> Result<(), MessengerError> {
        self.deliveries
            .write()
            .map_err(|_| MessengerError::DeliveryError)?
            .push(delivery);
        Ok(())
    }
}

impl Messenger for BufferedMessenger {
    fn send_to(&self, entity: EntityId, text: &str) -> Result<(), MessengerError> {
        self.push(Delivery::Direct {
            to: entity,
            text: text.to_string(),
        })
    }

    fn broadcast(
        &self,
        location: EntityId,
        template: &str,
        exclude: &[EntityId],
        mapping: &[(&str, EntityId)],
    ) -> Result<(), MessengerError> {
        self.push(Delivery::Broadcast {
            location,
            template: template.to_string(),
            exclude: exclude.to_vec(),
            mapping: mapping.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        })
    }
}
