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

use serde::{Deserialize, Serialize};

/// Single-word prepositions recognized when splitting a noun phrase into direct and indirect
/// objects. Synonyms collapse onto one variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Preposition {
    WithUsing,
    AtTo,
    IntoIn,
    OnTopOfOn,
    OutOf,
    Over,
    Through,
    Under,
    Behind,
    Beside,
    ForAbout,
    OffOf,
}

impl Preposition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "with" | "using" => Some(Self::WithUsing),
            "at" | "to" => Some(Self::AtTo),
            "in" | "inside" | "into" => Some(Self::IntoIn),
            "on" | "onto" | "upon" => Some(Self::OnTopOfOn),
            "from" => Some(Self::OutOf),
            "over" => Some(Self::Over),
            "through" => Some(Self::Through),
            "under" | "underneath" | "beneath" => Some(Self::Under),
            "behind" => Some(Self::Behind),
            "beside" => Some(Self::Beside),
            "for" | "about" => Some(Self::ForAbout),
            "off" => Some(Self::OffOf),
            _ => None,
        }
    }

    /// Canonical single-word form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithUsing => "with",
            Self::AtTo => "at",
            Self::IntoIn => "in",
            Self::OnTopOfOn => "on",
            Self::OutOf => "from",
            Self::Over => "over",
            Self::Through => "through",
            Self::Under => "under",
            Self::Behind => "behind",
            Self::Beside => "beside",
            Self::ForAbout => "for",
            Self::OffOf => "off",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_collapse() {
        assert_eq!(Preposition::parse("using"), Some(Preposition::WithUsing));
        assert_eq!(Preposition::parse("ONTO"), Some(Preposition::OnTopOfOn));
        assert_eq!(Preposition::parse("beneath").unwrap().as_str(), "under");
        assert_eq!(Preposition::parse("lamp"), None);
    }
}
