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

//! Verb handlers, and the registry that maps verb names onto them.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};
use tryverb_common::{EntityId, WorldStateError};

use crate::config::Config;
use crate::interpreter::CommandInterpreter;
use crate::messaging::{Messenger, MessengerError, escape_braces};
use crate::world::World;

mod handlers;

/// One attempt by `subject` to perform `verb`, built once per dispatched command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRecord {
    pub subject: EntityId,
    pub verb: String,
    pub object: Option<EntityId>,
    pub preposition: Option<String>,
    pub indirect: Option<EntityId>,
}

/// Ways a handler can stop short. None of them leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// The action doesn't apply; the message goes to the subject and nobody else.
    #[error("{0}")]
    Precondition(String),
    /// The action doesn't apply and there is nothing to say about it.
    #[error("declined")]
    Declined,
    #[error("{0} needs an object")]
    MissingObject(String),
    #[error(transparent)]
    WorldState(#[from] WorldStateError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionResult {
    Completed,
    /// Refused with the given message to the subject.
    Refused(String),
    /// Refused silently.
    Declined,
}

/// Everything a handler gets to work with.
pub struct ActionContext<'a> {
    pub record: &'a ActionRecord,
    pub world: &'a mut World,
    pub messenger: &'a dyn Messenger,
    pub interpreter: &'a dyn CommandInterpreter,
    pub config: &'a Config,
    /// The subject's staged pose, already taken from the world. Whatever is left here when the
    /// handler returns successfully is broadcast as is.
    pose: Option<String>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        record: &'a ActionRecord,
        world: &'a mut World,
        messenger: &'a dyn Messenger,
        interpreter: &'a dyn CommandInterpreter,
        config: &'a Config,
        pose: Option<String>,
    ) -> Self {
        Self {
            record,
            world,
            messenger,
            interpreter,
            config,
            pose,
        }
    }

    pub fn subject(&self) -> EntityId {
        self.record.subject
    }

    pub fn object(&self) -> Result<EntityId, ActionError> {
        self.record
            .object
            .ok_or_else(|| ActionError::MissingObject(self.record.verb.clone()))
    }

    pub fn name(&self, id: EntityId) -> String {
        self.world.name(id)
    }

    pub fn tell(&self, to: EntityId, text: &str) {
        log_failure(self.messenger.send_to(to, text));
    }

    /// Broadcast to the subject's location. Does nothing if the subject is nowhere.
    pub fn announce(&self, template: &str, exclude: &[EntityId], mapping: &[(&str, EntityId)]) {
        let Ok(Some(location)) = self.world.location_of(self.subject()) else {
            return;
        };
        log_failure(
            self.messenger
                .broadcast(location, template, exclude, mapping),
        );
    }

    /// Broadcast the witness line for this action, or the staged pose in its place. A pose is
    /// seen by everyone present.
    pub fn announce_witness(
        &mut self,
        template: &str,
        exclude: &[EntityId],
        mapping: &[(&str, EntityId)],
    ) {
        match self.pose.take() {
            Some(pose) => self.announce(&pose_line(&pose), &[], &[]),
            None => self.announce(template, exclude, mapping),
        }
    }
}

fn pose_line(pose: &str) -> String {
    format!("* {}", escape_braces(pose))
}

pub(crate) fn log_failure(result: Result<(), MessengerError>) {
    if let Err(e) = result {
        warn!(error = ?e, "message delivery failed");
    }
}

pub type ActionHandler = fn(&mut ActionContext<'_>) -> Result<(), ActionError>;

/// Verb name to handler. Verbs without an entry go to the default handler.
#[derive(Clone)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
    default: ActionHandler,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// A registry with the built-in verbs.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        handlers::register_builtin_actions(&mut registry);
        registry
    }

    /// A registry where everything goes to the default handler.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            default: handlers::default_action,
        }
    }

    pub fn register(&mut self, verb: &str, handler: ActionHandler) {
        self.handlers.insert(verb.to_string(), handler);
    }

    pub fn set_default(&mut self, handler: ActionHandler) {
        self.default = handler;
    }

    pub fn handler_for(&self, verb: &str) -> ActionHandler {
        self.handlers.get(verb).copied().unwrap_or(self.default)
    }

    pub fn is_builtin(&self, verb: &str) -> bool {
        self.handlers.contains_key(verb)
    }

    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }

    /// Run the handler for `record.verb`.
    ///
    /// On success, a pose the handler didn't use is broadcast. On a precondition failure the
    /// pose is dropped and only the subject hears about it. Structural faults are returned.
    pub fn dispatch(
        &self,
        record: &ActionRecord,
        world: &mut World,
        messenger: &dyn Messenger,
        interpreter: &dyn CommandInterpreter,
        config: &Config,
        pose: Option<String>,
    ) -> Result<ActionResult, WorldStateError> {
        debug!(
            subject = ?record.subject,
            verb = %record.verb,
            object = ?record.object,
            "{} tries to {} {}",
            world.name(record.subject),
            record.verb,
            record.object.map(|o| world.name(o)).unwrap_or_default(),
        );
        let handler = self.handler_for(&record.verb);
        let mut ctx = ActionContext::new(record, world, messenger, interpreter, config, pose);
        match handler(&mut ctx) {
            Ok(()) => {
                if let Some(pose) = ctx.pose.take() {
                    ctx.announce(&pose_line(&pose), &[], &[]);
                }
                Ok(ActionResult::Completed)
            }
            Err(ActionError::Precondition(message)) => {
                ctx.tell(record.subject, &message);
                Ok(ActionResult::Refused(message))
            }
            Err(ActionError::Declined) => Ok(ActionResult::Declined),
            Err(ActionError::MissingObject(verb)) => {
                let message = format!("What do you want to {verb}?");
                ctx.tell(record.subject, &message);
                Ok(ActionResult::Refused(message))
            }
            Err(ActionError::WorldState(e)) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::CommandQueue;
    use crate::messaging::BufferedMessenger;

    fn noop(_ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        Ok(())
    }

    fn refuse(_ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
        Err(ActionError::Precondition("Not today.".to_string()))
    }

    #[test]
    fn test_builtin_table() {
        let registry = ActionRegistry::new();
        assert_eq!(
            registry.verbs(),
            vec![
                "destroy", "drop", "examine", "follow", "get", "puppet", "read", "ride", "view"
            ]
        );
        assert!(!registry.is_builtin("wave"));
    }

    #[test]
    fn test_unused_pose_broadcast_after_success() {
        let mut world = World::new();
        let room = world.create_entity("room", None).unwrap();
        let alice = world.create_entity("Alice", Some(room)).unwrap();
        let bob = world.create_entity("Bob", Some(room)).unwrap();
        let messenger = BufferedMessenger::new();
        let queue = CommandQueue::new();
        let config = Config::default();

        let mut registry = ActionRegistry::empty();
        registry.register("nod", noop);
        registry.register("sulk", refuse);

        let record = ActionRecord {
            subject: alice,
            verb: "nod".to_string(),
            object: Some(bob),
            preposition: None,
            indirect: None,
        };
        let result = registry
            .dispatch(
                &record,
                &mut world,
                &messenger,
                &queue,
                &config,
                Some("nods {slowly}".to_string()),
            )
            .unwrap();
        assert_eq!(result, ActionResult::Completed);
        assert_eq!(messenger.seen_by(&world, bob), vec!["* nods {slowly}"]);

        messenger.take();
        let record = ActionRecord {
            verb: "sulk".to_string(),
            ..record
        };
        let result = registry
            .dispatch(
                &record,
                &mut world,
                &messenger,
                &queue,
                &config,
                Some("sulks".to_string()),
            )
            .unwrap();
        assert_eq!(result, ActionResult::Refused("Not today.".to_string()));
        assert_eq!(messenger.seen_by(&world, alice), vec!["Not today."]);
        assert!(messenger.seen_by(&world, bob).is_empty());
    }
}
