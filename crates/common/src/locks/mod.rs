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

//! Lock (permission) expressions attached to entities.
//!
//! An expression is a `;` separated list of `access_type:predicate` elements, e.g.
//! `v-read:all();v-ride:perm(Citizen);get:not tag(nailed)`. Access types carrying the `v-` prefix
//! declare verbs; the prefix is stripped to obtain the verb name, but access is always checked
//! against the unstripped access type.
//!
//! Expressions are parsed once, when set, and the parsed form is kept alongside the source.

mod predicate;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use predicate::Predicate;

/// Marks an access type as a verb declaration.
pub const VERB_PREFIX: &str = "v-";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LockParseError {
    #[error("Lock element '{0}' has no ':' separator")]
    MissingSeparator(String),
    #[error("Lock element '{0}' has an empty access type")]
    EmptyAccessType(String),
    #[error("Invalid predicate for '{access_type}': {message}")]
    InvalidPredicate {
        access_type: String,
        message: String,
    },
}

/// One `access_type:predicate` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockElement {
    access_type: String,
    name: String,
    predicate: Predicate,
}

impl LockElement {
    pub(crate) fn new(access_type: &str, predicate: Predicate) -> Self {
        Self {
            access_type: access_type.to_string(),
            name: strip_verb_prefix(access_type).to_string(),
            predicate,
        }
    }

    /// The access type exactly as written, prefix included.
    pub fn access_type(&self) -> &str {
        &self.access_type
    }

    /// The access type with any verb prefix removed; the name verbs are compared by.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_verb(&self) -> bool {
        self.access_type.starts_with(VERB_PREFIX)
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

/// Strip the verb prefix, if present.
pub fn strip_verb_prefix(access_type: &str) -> &str {
    access_type.strip_prefix(VERB_PREFIX).unwrap_or(access_type)
}

/// A parsed lock expression, with its source retained for display and re-serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LockExpr {
    source: String,
    elements: Vec<LockElement>,
}

impl LockExpr {
    pub fn parse(source: &str) -> Result<Self, LockParseError> {
        let mut elements = vec![];
        for raw in source.split(';') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let Some((access_type, predicate)) = raw.split_once(':') else {
                return Err(LockParseError::MissingSeparator(raw.to_string()));
            };
            let access_type = access_type.trim();
            if strip_verb_prefix(access_type).is_empty() {
                return Err(LockParseError::EmptyAccessType(raw.to_string()));
            }
            let predicate =
                Predicate::parse(predicate).map_err(|message| LockParseError::InvalidPredicate {
                    access_type: access_type.to_string(),
                    message,
                })?;
            elements.push(LockElement::new(access_type, predicate));
        }
        Ok(Self {
            source: source.to_string(),
            elements,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All elements, in declaration order. Duplicated access types are preserved here.
    pub fn elements(&self) -> &[LockElement] {
        &self.elements
    }

    /// The element governing `access_type`. A later declaration overrides an earlier one.
    pub fn get(&self, access_type: &str) -> Option<&LockElement> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.access_type == access_type)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromStr for LockExpr {
    type Err = LockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for LockExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verb_elements() {
        let lock = LockExpr::parse("v-read:true();v-ride:perm(Citizen);get:all()").unwrap();
        let names: Vec<_> = lock.elements().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["read", "ride", "get"]);
        let access: Vec<_> = lock.elements().iter().map(|e| e.access_type()).collect();
        assert_eq!(access, vec!["v-read", "v-ride", "get"]);
        assert!(lock.elements()[0].is_verb());
        assert!(!lock.elements()[2].is_verb());
    }

    #[test]
    fn test_empty_and_trailing_separators() {
        assert!(LockExpr::parse("").unwrap().is_empty());
        let lock = LockExpr::parse(" v-wave:true() ; ").unwrap();
        assert_eq!(lock.elements().len(), 1);
        assert_eq!(lock.elements()[0].name(), "wave");
    }

    #[test]
    fn test_later_duplicate_overrides() {
        let lock = LockExpr::parse("v-wave:false();v-wave:true()").unwrap();
        assert_eq!(lock.elements().len(), 2);
        assert_eq!(
            lock.get("v-wave").unwrap().predicate(),
            &Predicate::Call {
                func: "true".to_string(),
                args: vec![]
            }
        );
        assert!(lock.get("wave").is_none());
    }

    #[test]
    fn test_prefix_only_stripped_once_and_at_start() {
        assert_eq!(strip_verb_prefix("v-v-x"), "v-x");
        assert_eq!(strip_verb_prefix("xv-"), "xv-");
        assert_eq!(strip_verb_prefix("v-"), "");
    }

    #[test]
    fn test_malformed_elements() {
        assert_eq!(
            LockExpr::parse("v-read"),
            Err(LockParseError::MissingSeparator("v-read".to_string()))
        );
        assert_eq!(
            LockExpr::parse(":true()"),
            Err(LockParseError::EmptyAccessType(":true()".to_string()))
        );
        // A bare prefix names no verb.
        assert_eq!(
            LockExpr::parse("v-read:true(); v- :true()"),
            Err(LockParseError::EmptyAccessType("v- :true()".to_string()))
        );
        assert!(matches!(
            LockExpr::parse("v-read:true("),
            Err(LockParseError::InvalidPredicate { access_type, .. }) if access_type == "v-read"
        ));
    }

    #[test]
    fn test_source_is_preserved() {
        let source = "v-read:true();get:all()";
        assert_eq!(LockExpr::parse(source).unwrap().to_string(), source);
    }
}
