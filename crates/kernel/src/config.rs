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

//! Config is created by the host, and passed into the command engine, whereupon it is available
//! to all components. Used to hold things typically configured by CLI flags or a config file.

use serde::{Deserialize, Serialize};
use tryverb_common::matching::{DEFAULT_CUTOFF, DEFAULT_MAX_SUGGESTIONS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub suggestions: SuggestionConfig,
    /// Every command name and alias the wider command layer knows; the vocabulary for "did you
    /// mean" suggestions.
    pub command_names: Vec<String>,
    /// Entities carrying this tag cannot be destroyed.
    pub protected_tag: String,
    /// Permission names from lowest to highest. `perm(X)` passes for X or anything above it.
    pub permission_hierarchy: Vec<String>,
    /// The explicit command word, stripped from the front of input.
    pub try_keyword: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Minimum similarity (0.0 - 1.0) for a command name to be suggested.
    pub cutoff: f64,
    pub max_suggestions: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suggestions: SuggestionConfig::default(),
            command_names: strings(&[
                "look", "say", "pose", "emote", "whisper", "page", "inventory", "help", "who",
                "home", "quit", "try", "access", "hierarchy",
            ]),
            protected_tag: "pool".to_string(),
            permission_hierarchy: strings(&[
                "Guest",
                "Denizen",
                "Citizen",
                "Helper",
                "Crafter",
                "Builder",
                "Helpstaff",
                "Mage",
                "Wizard",
                "Immortal",
            ]),
            try_keyword: "try".to_string(),
        }
    }
}
