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

//! The top of the command flow: raw text in, state changes and messages out.
//!
//! One call to `CommandEngine::execute` is one run-to-completion transaction over the world. The
//! engine holds no locks of its own; hosts running several actors must serialize commands that
//! touch the same neighborhood.

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, trace};
use tryverb_common::matching::{parse_input, suggest};
use tryverb_common::{EntityId, WorldStateError};

use crate::access::{AccessEvaluator, LockAccessEvaluator};
use crate::actions::{ActionRecord, ActionRegistry, ActionResult, log_failure};
use crate::config::Config;
use crate::disambiguate::{resolve, resolve_indirect};
use crate::interpreter::CommandInterpreter;
use crate::messaging::{Messenger, escape_braces};
use crate::scan::{available_verbs, candidates_for};
use crate::world::World;

/// What a command came to. Every variant has already been reported to the actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Empty input; the actor was shown what they could try.
    ListedVerbs(Vec<String>),
    /// The verb isn't available here.
    UnknownVerb { suggestions: Vec<String> },
    /// The verb isn't available here, and the actor's staged pose was shown instead.
    PosedInstead,
    Dispatched {
        record: ActionRecord,
        result: ActionResult,
    },
    /// The noun named something, but not something the verb applies to.
    InvalidTarget { candidates: Vec<EntityId> },
    /// Several things take the verb and nothing picked one out.
    Ambiguous { candidates: Vec<EntityId> },
    NoCandidates,
}

pub struct CommandEngine {
    config: Config,
    registry: ActionRegistry,
    evaluator: Box<dyn AccessEvaluator>,
}

impl CommandEngine {
    /// An engine with the built-in verbs, checking access with entities' own lock expressions.
    pub fn new(config: Config) -> Self {
        let evaluator = LockAccessEvaluator::new(config.permission_hierarchy.clone());
        Self::with_evaluator(config, Box::new(evaluator))
    }

    pub fn with_evaluator(config: Config, evaluator: Box<dyn AccessEvaluator>) -> Self {
        Self {
            config,
            registry: ActionRegistry::new(),
            evaluator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn available_verbs(
        &self,
        world: &World,
        actor: EntityId,
    ) -> Result<BTreeSet<String>, WorldStateError> {
        available_verbs(world, self.evaluator.as_ref(), actor)
    }

    pub fn execute(
        &self,
        world: &mut World,
        messenger: &dyn Messenger,
        interpreter: &dyn CommandInterpreter,
        actor: EntityId,
        raw: &str,
    ) -> Result<CommandOutcome, WorldStateError> {
        world.entity(actor)?;
        let tell = |text: &str| log_failure(messenger.send_to(actor, text));

        let parsed = parse_input(raw, &self.config.try_keyword);
        trace!(?actor, ?parsed, "parsed");
        let verbs = self.available_verbs(world, actor)?;

        if parsed.verb.is_empty() {
            tell(&format!("Verbs to try: {}.", verbs.iter().join(", ")));
            return Ok(CommandOutcome::ListedVerbs(verbs.into_iter().collect()));
        }

        if !verbs.contains(&parsed.verb) {
            if let Some(pose) = world.take_pose(actor)? {
                if let Some(here) = world.location_of(actor)? {
                    let line = escape_braces(&format!("{pose} = {}", raw.trim()));
                    log_failure(messenger.broadcast(here, &line, &[], &[]));
                }
                return Ok(CommandOutcome::PosedInstead);
            }
            let suggestions = suggest(
                raw.trim(),
                &self.config.command_names,
                self.config.suggestions.cutoff,
                self.config.suggestions.max_suggestions,
            );
            tell(&unavailable_message(raw.trim(), &suggestions));
            return Ok(CommandOutcome::UnknownVerb { suggestions });
        }

        let candidates = candidates_for(world, self.evaluator.as_ref(), actor, &parsed.verb)?;
        let resolution = resolve(world, actor, &parsed, &candidates)?;
        let verb = &parsed.verb;

        match resolution.target {
            Some(target) if candidates.contains(&target) => {
                let record = ActionRecord {
                    subject: actor,
                    verb: verb.clone(),
                    object: Some(target),
                    preposition: parsed.prepstr.clone(),
                    indirect: resolve_indirect(world, actor, &parsed)?,
                };
                let pose = world.take_pose(actor)?;
                let result =
                    self.registry
                        .dispatch(&record, world, messenger, interpreter, &self.config, pose)?;
                Ok(CommandOutcome::Dispatched { record, result })
            }
            _ if candidates.is_empty() => {
                let what = resolution
                    .target
                    .map_or_else(|| "that".to_string(), |t| world.name(t));
                tell(&format!("You can not {verb} {what}."));
                Ok(CommandOutcome::NoCandidates)
            }
            target => {
                let list = candidates.iter().map(|c| world.name(*c)).join(", ");
                if target.is_some() {
                    debug!(?actor, %verb, ?target, "target does not take verb");
                    tell(&format!("You can only {verb} {list}."));
                    Ok(CommandOutcome::InvalidTarget { candidates })
                } else {
                    tell(&format!("You can {verb} {list}."));
                    Ok(CommandOutcome::Ambiguous { candidates })
                }
            }
        }
    }
}

fn unavailable_message(raw: &str, suggestions: &[String]) -> String {
    let mut message = format!("Command '{raw}' is not available.");
    match suggestions {
        [] => message.push_str(" Type \"help\" for help."),
        [only] => message.push_str(&format!(" Maybe you meant \"{only}\"?")),
        [rest @ .., last] => {
            let rest = rest.iter().map(|s| format!("\"{s}\"")).join(", ");
            message.push_str(&format!(" Maybe you meant {rest} or \"{last}\"?"));
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[], "Command 'xyzzy' is not available. Type \"help\" for help."; "none")]
    #[test_case(&["look"], "Command 'xyzzy' is not available. Maybe you meant \"look\"?"; "one")]
    #[test_case(&["look", "lock"], "Command 'xyzzy' is not available. Maybe you meant \"look\" or \"lock\"?"; "two")]
    #[test_case(
        &["look", "lock", "loot"],
        "Command 'xyzzy' is not available. Maybe you meant \"look\", \"lock\" or \"loot\"?";
        "three"
    )]
    fn test_unavailable_message(suggestions: &[&str], expected: &str) {
        let suggestions: Vec<String> = suggestions.iter().map(|s| s.to_string()).collect();
        assert_eq!(unavailable_message("xyzzy", &suggestions), expected);
    }
}
