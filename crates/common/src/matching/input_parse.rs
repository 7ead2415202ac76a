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

use crate::matching::{ParsedInput, Preposition};

/// Split raw input into a verb and a noun phrase.
///
/// A leading `try_keyword` (the explicit command word, which aliases may re-inject) is noise and
/// is removed before splitting. The verb is everything up to the first whitespace; the noun is
/// the trimmed remainder and may be empty. Nothing here checks that the verb exists.
pub fn parse_input(raw: &str, try_keyword: &str) -> ParsedInput {
    let input = strip_keyword(raw.trim(), try_keyword);

    let (verb, noun) = match input.split_once(char::is_whitespace) {
        Some((verb, noun)) => (verb, noun.trim()),
        None => (input, ""),
    };

    let words: Vec<&str> = noun.split_whitespace().collect();
    let prep_at = words
        .iter()
        .position(|w| Preposition::parse(w).is_some());

    let (dobjstr, prep, prepstr, iobjstr) = match prep_at {
        Some(j) => {
            let dobjstr = (j > 0).then(|| words[..j].join(" "));
            let iobjstr = (j + 1 < words.len()).then(|| words[j + 1..].join(" "));
            (
                dobjstr,
                Preposition::parse(words[j]),
                Some(words[j].to_string()),
                iobjstr,
            )
        }
        None => ((!words.is_empty()).then(|| words.join(" ")), None, None, None),
    };

    ParsedInput {
        verb: verb.to_string(),
        noun: noun.to_string(),
        dobjstr,
        prep,
        prepstr,
        iobjstr,
    }
}

fn strip_keyword<'a>(input: &'a str, keyword: &str) -> &'a str {
    if keyword.is_empty() {
        return input;
    }
    match input.split_once(char::is_whitespace) {
        Some((first, rest)) if first.eq_ignore_ascii_case(keyword) => rest.trim_start(),
        None if input.eq_ignore_ascii_case(keyword) => "",
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_only() {
        let parsed = parse_input("wave", "try");
        assert_eq!(parsed.verb, "wave");
        assert_eq!(parsed.noun, "");
        assert_eq!(parsed.dobjstr, None);
        assert_eq!(parsed.prep, None);
    }

    #[test]
    fn test_verb_and_noun_split_on_first_space() {
        let parsed = parse_input("  read   the old lamp ", "try");
        assert_eq!(parsed.verb, "read");
        assert_eq!(parsed.noun, "the old lamp");
        assert_eq!(parsed.dobjstr.as_deref(), Some("the old lamp"));
    }

    #[test]
    fn test_try_keyword_is_stripped() {
        let parsed = parse_input("try read lamp", "try");
        assert_eq!(parsed.verb, "read");
        assert_eq!(parsed.noun, "lamp");

        let parsed = parse_input("TRY", "try");
        assert_eq!(parsed.verb, "");
        assert_eq!(parsed.noun, "");

        // Only a whole leading word counts.
        let parsed = parse_input("tryst lamp", "try");
        assert_eq!(parsed.verb, "tryst");
    }

    #[test]
    fn test_preposition_split() {
        let parsed = parse_input("put red ball into the box", "try");
        assert_eq!(parsed.verb, "put");
        assert_eq!(parsed.noun, "red ball into the box");
        assert_eq!(parsed.dobjstr.as_deref(), Some("red ball"));
        assert_eq!(parsed.prep, Some(Preposition::IntoIn));
        assert_eq!(parsed.prepstr.as_deref(), Some("into"));
        assert_eq!(parsed.iobjstr.as_deref(), Some("the box"));
    }

    #[test]
    fn test_leading_preposition_has_no_dobj() {
        let parsed = parse_input("look at painting", "try");
        assert_eq!(parsed.dobjstr, None);
        assert_eq!(parsed.prep, Some(Preposition::AtTo));
        assert_eq!(parsed.iobjstr.as_deref(), Some("painting"));
    }
}
