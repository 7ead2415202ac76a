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

use pretty_assertions::assert_eq;
use test_case::test_case;
use tryverb_common::matching::{similarity, suggest};
use tryverb_common::{EntityId, WorldStateError};
use tryverb_kernel::actions::{ActionContext, ActionError};
use tryverb_kernel::config::Config;
use tryverb_kernel::{ActionRecord, ActionResult, CommandOutcome, QueuedCommand};

use common::Harness;

mod common;

#[test]
fn test_nothing_to_read() {
    let mut h = Harness::new();
    let lamp = h.thing("lamp", "v-read:true()");
    let outcome = h.run("read lamp");
    assert_eq!(
        outcome,
        CommandOutcome::Dispatched {
            record: ActionRecord {
                subject: h.actor,
                verb: "read".to_string(),
                object: Some(lamp),
                preposition: None,
                indirect: None,
            },
            result: ActionResult::Refused("There is nothing to read on lamp.".to_string()),
        }
    );
    assert_eq!(
        h.take_seen_by(h.actor),
        vec!["There is nothing to read on lamp."]
    );
}

#[test]
fn test_two_candidates_no_noun() {
    let mut h = Harness::new();
    let statue = h.thing("statue", "v-wave:true()");
    let flag = h.thing("flag", "v-wave:true()");
    assert!(
        h.engine
            .available_verbs(&h.world, h.actor)
            .unwrap()
            .contains("wave")
    );
    assert_eq!(
        h.run("wave"),
        CommandOutcome::Ambiguous {
            candidates: vec![statue, flag]
        }
    );
    assert_eq!(h.take_seen_by(h.actor), vec!["You can wave statue, flag."]);
}

#[test]
fn test_unknown_verb_suggests_command() {
    let mut config = Config::default();
    config.command_names.push("chance".to_string());
    let mut h = Harness::with_config(config);
    h.thing("statue", "v-wave:true()");
    assert_eq!(
        h.run("dance"),
        CommandOutcome::UnknownVerb {
            suggestions: vec!["chance".to_string()]
        }
    );
    assert_eq!(
        h.take_seen_by(h.actor),
        vec!["Command 'dance' is not available. Maybe you meant \"chance\"?"]
    );
}

#[test]
fn test_unknown_verb_without_suggestions() {
    let mut h = Harness::new();
    h.run("xyzzy");
    assert_eq!(
        h.take_seen_by(h.actor),
        vec!["Command 'xyzzy' is not available. Type \"help\" for help."]
    );
}

#[test_case(""; "empty")]
#[test_case("   "; "blank")]
#[test_case("try"; "bare keyword")]
fn test_empty_verb_lists_verbs(input: &str) {
    let mut h = Harness::new();
    h.thing("statue", "v-wave:true();v-kick:false()");
    h.thing("lamp", "v-read:true()");
    assert_eq!(
        h.run(input),
        CommandOutcome::ListedVerbs(vec!["read".to_string(), "wave".to_string()])
    );
    assert_eq!(h.take_seen_by(h.actor), vec!["Verbs to try: read, wave."]);
}

#[test_case("read lamp"; "bare")]
#[test_case("try read lamp"; "keyword")]
#[test_case("TRY   read lamp"; "keyword any case")]
fn test_try_keyword_is_noise(input: &str) {
    let mut h = Harness::new();
    let lamp = h.thing("lamp", "v-read:true()");
    h.world.entity_mut(lamp).unwrap().readable_text = Some("Made in Ur.".to_string());
    let CommandOutcome::Dispatched { record, result } = h.run(input) else {
        panic!("expected dispatch for {input:?}");
    };
    assert_eq!(record.object, Some(lamp));
    assert_eq!(result, ActionResult::Completed);
    assert_eq!(
        h.take_seen_by(h.actor),
        vec!["Alice reads lamp.", "Made in Ur."]
    );
}

#[test]
fn test_matched_noun_not_a_candidate() {
    let mut h = Harness::new();
    h.thing("lamp", "v-read:true()");
    h.thing("table", "");
    assert!(matches!(
        h.run("read table"),
        CommandOutcome::InvalidTarget { .. }
    ));
    assert_eq!(h.take_seen_by(h.actor), vec!["You can only read lamp."]);
}

#[test]
fn test_unmatched_noun_with_single_candidate() {
    let mut h = Harness::new();
    let lamp = h.thing("lamp", "v-read:true()");
    let CommandOutcome::Dispatched { record, .. } = h.run("read unicorn") else {
        panic!("expected the lone candidate to be chosen");
    };
    assert_eq!(record.object, Some(lamp));
}

#[test]
fn test_power_pose_is_single_use() {
    let mut h = Harness::new();
    let bob = h.world.create_entity("Bob", Some(h.room)).unwrap();
    h.thing("statue", "v-wave:true()");
    h.world.stage_pose(h.actor, "waves {grandly}").unwrap();

    h.run("wave statue");
    assert_eq!(h.take_seen_by(bob), vec!["* waves {grandly}"]);
    h.run("wave statue");
    assert_eq!(h.take_seen_by(bob), vec!["Alice tries to wave statue."]);
    assert_eq!(h.world.entity(h.actor).unwrap().pending_pose(), None);
}

#[test]
fn test_pose_with_unknown_verb_becomes_plain_pose() {
    let mut h = Harness::new();
    let bob = h.world.create_entity("Bob", Some(h.room)).unwrap();
    h.world.stage_pose(h.actor, "grins").unwrap();

    assert_eq!(h.run("dance wildly"), CommandOutcome::PosedInstead);
    assert_eq!(h.take_seen_by(bob), vec!["grins = dance wildly"]);
    assert!(matches!(
        h.run("dance wildly"),
        CommandOutcome::UnknownVerb { .. }
    ));
}

#[test]
fn test_pose_dropped_on_precondition_failure() {
    let mut h = Harness::new();
    let bob = h.world.create_entity("Bob", Some(h.room)).unwrap();
    h.thing("lamp", "v-drop:true()");
    h.world.stage_pose(h.actor, "drops it with a flourish").unwrap();

    h.run("drop lamp");
    assert!(h.seen_by(bob).is_empty());
    assert_eq!(h.take_seen_by(h.actor), vec!["You do not have lamp."]);
    assert_eq!(h.world.entity(h.actor).unwrap().pending_pose(), None);
}

#[test]
fn test_get_then_drop() {
    let mut h = Harness::new();
    let lamp = h.thing("lamp", "v-get:not holds();v-drop:holds()");

    // Only the verb that applies right now is offered.
    assert!(matches!(
        h.run("drop lamp"),
        CommandOutcome::UnknownVerb { .. }
    ));
    h.run("get lamp");
    assert!(h.world.is_holding(h.actor, lamp).unwrap());
    h.run("drop lamp");
    assert_eq!(h.world.location_of(lamp).unwrap(), Some(h.room));
    let seen = h.take_seen_by(h.actor);
    assert_eq!(&seen[1..], &["Alice takes lamp.", "Alice drops lamp."]);
}

#[test]
fn test_ride_exclusivity() {
    let mut h = Harness::new();
    let horse = h.thing("horse", "v-ride:true()");
    let pony = h.thing("pony", "v-ride:true()");

    h.run("ride horse");
    assert!(h.world.riders().contains(horse, h.actor));
    h.run("ride pony");
    assert!(h.world.riders().contains(pony, h.actor));
    assert!(!h.world.riders().contains(horse, h.actor));
    h.run("ride pony");
    assert!(!h.world.riders().contains(pony, h.actor));
    assert_eq!(
        h.take_seen_by(h.actor),
        vec![
            "Alice decides to ride horse.",
            "Alice decides to ride pony.",
            "Alice decides to stop riding pony."
        ]
    );
}

#[test]
fn test_follow_is_involutive() {
    let mut h = Harness::new();
    let bob = h.thing("Bob", "v-follow:not self()");
    let before = h.world.followers().contains(bob, h.actor);
    h.run("follow bob");
    assert_ne!(h.world.followers().contains(bob, h.actor), before);
    h.run("follow bob");
    assert_eq!(h.world.followers().contains(bob, h.actor), before);

    // Bob can't follow himself: the lock hides the verb from him.
    assert!(matches!(
        h.run_as(bob, "follow bob"),
        CommandOutcome::UnknownVerb { .. }
    ));
}

#[test]
fn test_carried_things_are_in_reach() {
    let mut h = Harness::new();
    let note = h.world.create_entity("note", Some(h.actor)).unwrap();
    h.world.set_locks(note, "v-read:holds()").unwrap();
    h.world.entity_mut(note).unwrap().short_description = Some("Back soon.".to_string());
    let chest = h.thing("chest", "");
    let letter = h.world.create_entity("letter", Some(chest)).unwrap();
    h.world.set_locks(letter, "v-burn:true()").unwrap();

    let verbs = h.engine.available_verbs(&h.world, h.actor).unwrap();
    assert_eq!(verbs.into_iter().collect::<Vec<_>>(), vec!["read"]);
    h.run("read note");
    assert_eq!(
        h.take_seen_by(h.actor),
        vec!["Alice reads note.", "Back soon."]
    );
}

#[test]
fn test_pass_through_verbs_queue_commands() {
    let mut h = Harness::new();
    h.thing("portrait", "v-examine:true();v-view:true()");
    let golem = h.thing("golem", "v-puppet:perm(Builder)");

    h.run("examine portrait");
    h.run("view portrait");
    assert!(matches!(
        h.run("puppet golem"),
        CommandOutcome::UnknownVerb { .. }
    ));
    h.world
        .entity_mut(h.actor)
        .unwrap()
        .permissions
        .insert("Wizard".to_string());
    h.run("puppet golem");

    assert_eq!(
        h.queue.drain(),
        vec![
            QueuedCommand {
                actor: h.actor,
                command_line: "examine portrait".to_string()
            },
            QueuedCommand {
                actor: h.actor,
                command_line: "look portrait".to_string()
            },
            QueuedCommand {
                actor: h.actor,
                command_line: "@ic golem".to_string()
            },
        ]
    );
    assert!(h.world.valid(golem));
}

#[test]
fn test_default_handler_with_preposition() {
    let mut h = Harness::new();
    let bob = h.world.create_entity("Bob", Some(h.room)).unwrap();
    let lamp = h.thing("lamp", "v-polish:true()");
    let rag = h.world.create_entity("rag", Some(h.actor)).unwrap();

    let CommandOutcome::Dispatched { record, .. } = h.run("polish lamp with rag") else {
        panic!("expected dispatch");
    };
    assert_eq!(record.object, Some(lamp));
    assert_eq!(record.preposition.as_deref(), Some("with"));
    assert_eq!(record.indirect, Some(rag));
    assert_eq!(h.seen_by(h.actor), vec!["You polish lamp."]);
    assert_eq!(h.take_seen_by(bob), vec!["Alice tries to polish lamp."]);
}

#[test]
fn test_destroy_protected() {
    let mut h = Harness::new();
    let well = h.thing("well", "v-destroy:true()");
    let vase = h.thing("vase", "v-destroy:true()");
    h.world.entity_mut(well).unwrap().add_tag("pool");

    h.run("destroy well");
    h.run("destroy vase");
    assert_eq!(h.world.location_of(well).unwrap(), Some(h.room));
    assert_eq!(h.world.location_of(vase).unwrap(), None);
}

#[test]
fn test_superuser_sees_everything() {
    let mut h = Harness::new();
    h.thing("statue", "v-kick:false()");
    assert!(matches!(h.run("kick statue"), CommandOutcome::UnknownVerb { .. }));
    h.world.entity_mut(h.actor).unwrap().superuser = true;
    assert!(matches!(
        h.run("kick statue"),
        CommandOutcome::Dispatched { .. }
    ));
}

#[test]
fn test_missing_actor_is_an_error() {
    let mut h = Harness::new();
    let ghost = EntityId::mk_id(999);
    let result = h
        .engine
        .execute(&mut h.world, &h.messenger, &h.queue, ghost, "wave");
    assert_eq!(result, Err(WorldStateError::EntityNotFound(ghost)));
}

#[test]
fn test_suggestion_bounds() {
    let config = Config::default();
    for input in ["lok", "inventroy", "hepl", "qit", "whisp", "pagee", "xyzzy"] {
        let suggestions = suggest(
            input,
            &config.command_names,
            config.suggestions.cutoff,
            config.suggestions.max_suggestions,
        );
        assert!(suggestions.len() <= config.suggestions.max_suggestions);
        for s in &suggestions {
            assert!(similarity(input, s) >= config.suggestions.cutoff, "{input} -> {s}");
        }
    }
}

fn act_wave(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let object = ctx.object()?;
    ctx.tell(ctx.subject(), &format!("You wave grandly at {}.", ctx.name(object)));
    Ok(())
}

fn act_shrug(_ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    Err(ActionError::Declined)
}

#[test]
fn test_registered_handlers_and_default() {
    let mut h = Harness::new();
    h.thing("statue", "v-wave:true();v-kick:true()");
    h.engine.registry_mut().register("wave", act_wave);
    h.engine.registry_mut().set_default(act_shrug);

    h.run("wave statue");
    assert_eq!(h.take_seen_by(h.actor), vec!["You wave grandly at statue."]);
    let CommandOutcome::Dispatched { result, .. } = h.run("kick statue") else {
        panic!("expected dispatch");
    };
    assert_eq!(result, ActionResult::Declined);
    assert!(h.take_seen_by(h.actor).is_empty());
}
