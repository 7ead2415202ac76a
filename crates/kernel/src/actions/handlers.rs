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

use tracing::{debug, trace};
use tryverb_common::{EntityId, WorldStateError};

use crate::actions::{ActionContext, ActionError, ActionRegistry};
use crate::messaging::escape_braces;

pub(crate) fn register_builtin_actions(registry: &mut ActionRegistry) {
    registry.register("destroy", act_destroy);
    registry.register("drop", act_drop);
    registry.register("examine", act_examine);
    registry.register("follow", act_follow);
    registry.register("get", act_get);
    registry.register("puppet", act_puppet);
    registry.register("read", act_read);
    registry.register("ride", act_ride);
    registry.register("view", act_view);
}

/// Anything without its own handler: the subject is told they did it, the object that it was
/// tried on them, and everyone else present sees the attempt.
pub(crate) fn default_action(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let record = ctx.record;
    let (s, o) = (ctx.subject(), ctx.object()?);
    ctx.tell(s, &format!("You {} {}.", record.verb, ctx.name(o)));
    ctx.tell(o, &format!("{} tries to {} you.", ctx.name(s), record.verb));
    let witness = format!(
        "{{subject}} tries to {} {{object}}.",
        escape_braces(&record.verb)
    );
    ctx.announce_witness(&witness, &[s, o], &[("subject", s), ("object", o)]);
    Ok(())
}

fn act_destroy(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let o = ctx.object()?;
    if ctx.world.entity(o)?.has_tag(&ctx.config.protected_tag) {
        debug!(object = ?o, "protected from destruction");
        return Ok(());
    }
    ctx.world.move_to(o, None)?;
    Ok(())
}

fn act_drop(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let (s, o) = (ctx.subject(), ctx.object()?);
    if !ctx.world.is_holding(s, o)? {
        return Err(ActionError::Precondition(format!(
            "You do not have {}.",
            ctx.name(o)
        )));
    }
    if let Some(cover) = ctx.world.entity(o)?.covered_by {
        return Err(ActionError::Precondition(format!(
            "You can't drop that because it's covered by {}.",
            ctx.name(cover)
        )));
    }
    let Some(here) = ctx.world.location_of(s)? else {
        return Err(ActionError::Precondition(
            "You have nowhere to drop that.".to_string(),
        ));
    };

    ctx.world.entity_mut(o)?.worn = false;
    ctx.world.move_to(o, Some(here))?;
    ctx.announce_witness("{actor} drops {it}.", &[], &[("actor", s), ("it", o)]);
    Ok(())
}

fn act_get(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let (s, o) = (ctx.subject(), ctx.object()?);
    if s == o {
        return Err(ActionError::Precondition(
            "You can't get yourself.".to_string(),
        ));
    }
    if ctx.world.is_holding(s, o)? {
        return Err(ActionError::Precondition(format!(
            "You already have {}.",
            ctx.name(o)
        )));
    }
    match ctx.world.move_to(o, Some(s)) {
        Ok(()) => {}
        Err(WorldStateError::RecursiveMove(..)) => {
            return Err(ActionError::Precondition(format!(
                "You can't get {}.",
                ctx.name(o)
            )));
        }
        Err(e) => return Err(e.into()),
    }
    ctx.announce_witness("{actor} takes {it}.", &[], &[("actor", s), ("it", o)]);
    Ok(())
}

fn act_follow(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let (s, o) = (ctx.subject(), ctx.object()?);
    if s == o {
        return Err(ActionError::Precondition(
            "You decide to follow your heart.".to_string(),
        ));
    }
    let action = if ctx.world.followers_mut().toggle(o, s) {
        "follow"
    } else {
        "stop following"
    };
    ctx.announce(
        &format!("{{actor}} decides to {action} {{leader}}."),
        &[],
        &[("actor", s), ("leader", o)],
    );
    Ok(())
}

fn act_ride(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let (s, o) = (ctx.subject(), ctx.object()?);
    if s == o {
        return Err(ActionError::Declined);
    }
    let action = if ctx.world.riders_mut().toggle(o, s) {
        "ride"
    } else {
        "stop riding"
    };

    // Whatever happened above, the subject now rides nothing else here.
    if let Some(here) = ctx.world.location_of(s)? {
        let others: Vec<EntityId> = ctx
            .world
            .contents_of(here)?
            .iter()
            .copied()
            .filter(|e| *e != s && *e != o)
            .collect();
        for other in others {
            if ctx.world.riders_mut().remove(other, s) {
                trace!(rider = ?s, mount = ?other, "dismounted");
            }
        }
    }

    ctx.announce(
        &format!("{{actor}} decides to {action} {{mount}}."),
        &[],
        &[("actor", s), ("mount", o)],
    );
    Ok(())
}

fn act_read(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    let (s, o) = (ctx.subject(), ctx.object()?);
    let entity = ctx.world.entity(o)?;
    let text = [
        &entity.readable_text,
        &entity.short_description,
        &entity.description,
    ]
    .into_iter()
    .flatten()
    .find(|t| !t.trim().is_empty())
    .cloned();

    let Some(text) = text else {
        return Err(ActionError::Precondition(format!(
            "There is nothing to read on {}.",
            ctx.name(o)
        )));
    };
    ctx.announce_witness("{actor} reads {it}.", &[], &[("actor", s), ("it", o)]);
    ctx.tell(s, &text);
    Ok(())
}

fn pass_through(ctx: &mut ActionContext<'_>, command: &str) -> Result<(), ActionError> {
    let o = ctx.object()?;
    let line = format!("{command} {}", ctx.name(o));
    ctx.interpreter.execute(ctx.subject(), &line);
    Ok(())
}

fn act_examine(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    pass_through(ctx, "examine")
}

fn act_puppet(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    pass_through(ctx, "@ic")
}

fn act_view(ctx: &mut ActionContext<'_>) -> Result<(), ActionError> {
    pass_through(ctx, "look")
}
