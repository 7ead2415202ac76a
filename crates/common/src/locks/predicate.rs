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

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "src/locks/lock.pest"]
struct LockPredicateParser;

/// A parsed lock predicate. Leaves are lock function calls (`perm(Builder)`); the evaluation of
/// those is left to whoever holds the world state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Call { func: String, args: Vec<String> },
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut pairs =
            LockPredicateParser::parse(Rule::predicate, input).map_err(|e| e.to_string())?;
        let Some(predicate) = pairs.next() else {
            return Err("empty predicate".to_string());
        };
        for pair in predicate.into_inner() {
            if pair.as_rule() == Rule::or_expr {
                return Ok(build_or(pair));
            }
        }
        Err("empty predicate".to_string())
    }

    /// Evaluate the predicate, resolving each lock function through `call`. `and` / `or`
    /// short-circuit left to right.
    pub fn evaluate<F>(&self, call: &mut F) -> bool
    where
        F: FnMut(&str, &[String]) -> bool,
    {
        match self {
            Predicate::Call { func, args } => call(func, args),
            Predicate::Not(inner) => !inner.evaluate(call),
            Predicate::And(terms) => terms.iter().all(|t| t.evaluate(call)),
            Predicate::Or(terms) => terms.iter().any(|t| t.evaluate(call)),
        }
    }
}

fn collapse(mut terms: Vec<Predicate>, join: fn(Vec<Predicate>) -> Predicate) -> Predicate {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        join(terms)
    }
}

fn build_or(pair: Pair<Rule>) -> Predicate {
    let terms = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::and_expr)
        .map(build_and)
        .collect();
    collapse(terms, Predicate::Or)
}

fn build_and(pair: Pair<Rule>) -> Predicate {
    let terms = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::term)
        .map(build_term)
        .collect();
    collapse(terms, Predicate::And)
}

fn build_term(pair: Pair<Rule>) -> Predicate {
    let mut negations = 0;
    let mut inner = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::not_op => negations += 1,
            Rule::call => inner = Some(build_call(part)),
            Rule::or_expr => inner = Some(build_or(part)),
            r => unreachable!("{:?}", r),
        }
    }
    // The grammar guarantees exactly one primary per term.
    let mut predicate = inner.unwrap_or(Predicate::Or(vec![]));
    for _ in 0..negations {
        predicate = Predicate::Not(Box::new(predicate));
    }
    predicate
}

fn build_call(pair: Pair<Rule>) -> Predicate {
    let mut func = String::new();
    let mut args = vec![];
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::ident => func = part.as_str().to_lowercase(),
            Rule::arg => args.push(part.as_str().trim().to_string()),
            r => unreachable!("{:?}", r),
        }
    }
    Predicate::Call { func, args }
}
