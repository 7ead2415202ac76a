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

mod world_def;

use std::path::PathBuf;

use clap::Parser;
use clap_derive::Parser;
use eyre::{Result, eyre};
use figment::Figment;
use figment::providers::{Data, Format, Serialized, Yaml};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info, warn};
use tryverb_common::EntityId;
use tryverb_common::matching::{DefaultObjectNameMatcher, ObjectNameMatcher};
use tryverb_common::tracing::init_tracing;
use tryverb_kernel::config::Config;
use tryverb_kernel::{
    BufferedMessenger, CommandEngine, CommandQueue, Messenger, QueuedCommand, World,
};

use crate::world_def::WorldDef;

#[derive(Parser, Debug)]
#[command(name = "tryverb-repl")]
#[command(about = "Try verbs on things in a world loaded from YAML")]
#[command(version)]
struct Args {
    /// YAML world definition to load
    #[arg(long)]
    world: PathBuf,

    /// Name of the entity to act as (defaults to the world file's `actor`)
    #[arg(long)]
    actor: Option<String>,

    /// YAML config file layered over the default engine configuration
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    debug: bool,
}

fn load_config(config_file: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = config_file else {
        return Ok(Config::default());
    };
    layered_config(Yaml::file(path))
        .map_err(|e| eyre!("Failed to parse configuration from {path:?}: {e}"))
}

/// `yaml` over the default configuration. Keys it leaves out keep their defaults.
fn layered_config(yaml: Data<Yaml>) -> Result<Config, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(yaml)
        .extract::<Config>()
}

#[derive(Debug, PartialEq)]
enum LineResult {
    /// Keep reading; these lines are what the current actor saw.
    Continue(Vec<String>),
    Quit,
}

struct Console {
    world: World,
    engine: CommandEngine,
    messenger: BufferedMessenger,
    queue: CommandQueue,
    actor: EntityId,
}

impl Console {
    fn new(world: World, config: Config, actor: EntityId) -> Self {
        Self {
            world,
            engine: CommandEngine::new(config),
            messenger: BufferedMessenger::new(),
            queue: CommandQueue::new(),
            actor,
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<LineResult> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("@quit") {
            return Ok(LineResult::Quit);
        }

        let command = match line
            .strip_prefix("pose ")
            .and_then(|rest| rest.split_once('='))
        {
            Some((pose, command)) => {
                self.world.stage_pose(self.actor, pose.trim())?;
                command.trim()
            }
            None => line,
        };

        let outcome = self.engine.execute(
            &mut self.world,
            &self.messenger,
            &self.queue,
            self.actor,
            command,
        )?;
        debug!(?outcome, "command finished");

        while let Some(queued) = self.queue.pop() {
            self.run_host_command(queued)?;
        }
        Ok(LineResult::Continue(self.take_output()))
    }

    /// The few commands verbs hand back to the host.
    fn run_host_command(&mut self, queued: QueuedCommand) -> Result<()> {
        let QueuedCommand {
            actor,
            command_line,
        } = queued;
        let (command, arg) = command_line
            .split_once(' ')
            .unwrap_or((command_line.as_str(), ""));
        let matcher = DefaultObjectNameMatcher {
            env: &self.world,
            actor,
        };
        let Some(target) = matcher.match_object(arg)? else {
            self.tell(actor, &format!("I don't see \"{arg}\" here."));
            return Ok(());
        };
        let entity = self.world.entity(target)?;

        match command {
            "look" => {
                let text = entity
                    .description
                    .clone()
                    .or_else(|| entity.short_description.clone())
                    .unwrap_or_else(|| "You see nothing special.".to_string());
                self.tell(actor, &format!("{}\n{text}", entity.name()));
            }
            "examine" => {
                let location = entity
                    .location()
                    .map_or_else(|| "nowhere".to_string(), |l| self.world.name(l));
                let tags = entity.tags.iter().cloned().collect::<Vec<_>>().join(", ");
                let text = format!(
                    "{} ({})\nLocation: {location}\nLocks: {}\nTags: {tags}",
                    entity.name(),
                    entity.id(),
                    entity.locks()
                );
                self.tell(actor, &text);
            }
            "@ic" => {
                info!(from = ?self.actor, to = ?target, "switching actor");
                self.actor = target;
                self.tell(target, &format!("You become {}.", self.world.name(target)));
            }
            _ => warn!(command_line, "no host command for this"),
        }
        Ok(())
    }

    fn tell(&self, to: EntityId, text: &str) {
        if let Err(e) = self.messenger.send_to(to, text) {
            warn!(error = ?e, "message delivery failed");
        }
    }

    /// Everything the current actor would have seen since the last call.
    fn take_output(&self) -> Vec<String> {
        self.messenger
            .take()
            .into_iter()
            .filter(|delivery| delivery.reaches(&self.world, self.actor))
            .map(|delivery| delivery.render(&self.world))
            .collect()
    }

    fn prompt(&self) -> String {
        format!("{} > ", self.world.name(self.actor))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.debug)?;

    let config = load_config(args.config_file.as_ref())?;
    let world_def = WorldDef::load(&args.world)?;
    let world = world_def.build()?;

    let actor_name = args
        .actor
        .or(world_def.actor)
        .ok_or_else(|| eyre!("No actor given, and the world file names none"))?;
    let actor = world
        .find_by_name(&actor_name)
        .ok_or_else(|| eyre!("No entity named {actor_name:?} in the world"))?;

    let mut console = Console::new(world, config, actor);
    info!(actor = ?actor, "ready; `@quit` to leave");

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(&console.prompt()) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match console.handle_line(&line) {
                    Ok(LineResult::Continue(output)) => {
                        for line in output {
                            println!("{line}");
                        }
                    }
                    Ok(LineResult::Quit) => break,
                    Err(e) => println!("Error: {e}"),
                }
            }
            Err(ReadlineError::Eof) => {
                println!("<EOF>");
                break;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(e) => {
                println!("Error: {e:?}");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    const WORLD: &str = r#"
actor: Alice
entities:
  - id: 1
    name: Inn
  - id: 2
    name: Alice
    location: 1
    permissions: [Wizard]
  - id: 3
    name: Bob
    location: 1
    locks: "v-puppet:perm(Wizard)"
  - id: 4
    name: pony
    location: 1
    description: A shaggy pony.
    locks: "v-pat:true();v-view:true()"
"#;

    fn console() -> Console {
        let def: WorldDef = Figment::new().merge(Yaml::string(WORLD)).extract().unwrap();
        let world = def.build().unwrap();
        let alice = world.find_by_name("Alice").unwrap();
        Console::new(world, Config::default(), alice)
    }

    fn output(result: LineResult) -> Vec<String> {
        match result {
            LineResult::Continue(lines) => lines,
            LineResult::Quit => panic!("console quit"),
        }
    }

    #[test]
    fn test_quit() {
        let mut console = console();
        assert_eq!(console.handle_line("  @QUIT ").unwrap(), LineResult::Quit);
    }

    #[test]
    fn test_pose_line_is_staged_and_consumed() {
        let mut console = console();
        let lines = output(console.handle_line("pose waves hello = pat pony").unwrap());
        assert_eq!(lines, vec!["You pat pony.", "* waves hello"]);
        assert_eq!(
            console.world.entity(console.actor).unwrap().pending_pose(),
            None
        );

        // Without a pose the ordinary witness line goes to the others, not the actor.
        let lines = output(console.handle_line("pat pony").unwrap());
        assert_eq!(lines, vec!["You pat pony."]);
    }

    #[test]
    fn test_pose_with_unknown_verb_shows_the_pose() {
        let mut console = console();
        let lines = output(console.handle_line("pose grins = xyzzy").unwrap());
        assert_eq!(lines, vec!["grins = xyzzy"]);
    }

    #[test]
    fn test_view_runs_host_look() {
        let mut console = console();
        let lines = output(console.handle_line("view pony").unwrap());
        assert_eq!(lines, vec!["pony\nA shaggy pony."]);
    }

    #[test]
    fn test_puppet_switches_actor() {
        let mut console = console();
        let bob = console.world.find_by_name("Bob").unwrap();
        let lines = output(console.handle_line("puppet bob").unwrap());
        assert_eq!(console.actor, bob);
        assert_eq!(lines, vec!["You become Bob."]);
        assert_eq!(console.prompt(), "Bob > ");
    }

    #[test]
    fn test_config_layers_over_defaults() {
        let config = layered_config(Yaml::string(
            r#"
try_keyword: attempt
suggestions:
  cutoff: 0.5
"#,
        ))
        .unwrap();
        let defaults = Config::default();
        assert_eq!(config.try_keyword, "attempt");
        assert_eq!(config.suggestions.cutoff, 0.5);
        assert_eq!(
            config.suggestions.max_suggestions,
            defaults.suggestions.max_suggestions
        );
        assert_eq!(config.command_names, defaults.command_names);
        assert_eq!(config.protected_tag, "pool");
    }

    #[test]
    fn test_load_config_from_file() {
        assert_eq!(load_config(None).unwrap(), Config::default());

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "protected_tag: sacred").unwrap();
        let path = file.path().to_path_buf();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.protected_tag, "sacred");
        assert_eq!(config.try_keyword, "try");

        let mut bad = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(bad, "suggestions: [not, a, table]").unwrap();
        let path = bad.path().to_path_buf();
        assert!(load_config(Some(&path)).is_err());
    }
}
