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

use tryverb_common::matching::{DefaultObjectNameMatcher, ObjectNameMatcher, ParsedInput};
use tryverb_common::{EntityId, WorldStateError};

use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub target: Option<EntityId>,
    /// True if `target` came from the noun rather than from auto-selection.
    pub matched_noun: bool,
}

/// Pick the target of a command.
///
/// A non-empty noun is matched against everything in reach, whether or not it is a candidate for
/// the verb; the caller checks candidacy. The whole noun is tried first, then the part before any
/// preposition. Failing a match, a lone candidate is chosen.
pub fn resolve(
    world: &World,
    actor: EntityId,
    parsed: &ParsedInput,
    candidates: &[EntityId],
) -> Result<Resolution, WorldStateError> {
    let matcher = DefaultObjectNameMatcher { env: world, actor };

    let mut target = None;
    if !parsed.noun.is_empty() {
        target = matcher.match_object(&parsed.noun)?;
        if target.is_none()
            && let Some(dobjstr) = &parsed.dobjstr
            && *dobjstr != parsed.noun
        {
            target = matcher.match_object(dobjstr)?;
        }
    }
    if target.is_some() {
        return Ok(Resolution {
            target,
            matched_noun: true,
        });
    }

    Ok(Resolution {
        target: match candidates {
            [only] => Some(*only),
            _ => None,
        },
        matched_noun: false,
    })
}

/// Resolve the indirect object phrase, if there is one.
pub fn resolve_indirect(
    world: &World,
    actor: EntityId,
    parsed: &ParsedInput,
) -> Result<Option<EntityId>, WorldStateError> {
    let Some(iobjstr) = &parsed.iobjstr else {
        return Ok(None);
    };
    DefaultObjectNameMatcher { env: world, actor }.match_object(iobjstr)
}
