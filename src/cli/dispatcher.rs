// src/cli/dispatcher.rs

use anyhow::{Result, anyhow};

use crate::{cli::handlers, state::BasicInfoSession};

/// Defines a command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut BasicInfoSession) -> Result<()>,
}

/// Every command ctapgen understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "generate",
        aliases: &["gen"],
        handler: handlers::generate::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &["validate"],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "preview",
        aliases: &["show"],
        handler: handlers::preview::handle,
    },
    CommandDefinition {
        name: "init",
        aliases: &["new"],
        handler: handlers::init::handle,
    },
    CommandDefinition {
        name: "basic",
        aliases: &[],
        handler: handlers::basic::handle,
    },
    CommandDefinition {
        name: "funcs",
        aliases: &["catalog"],
        handler: handlers::funcs::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `ctapgen <command> [args...]` to its handler.
pub fn dispatch(all_args: Vec<String>, session: &mut BasicInfoSession) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        println!("{}", t!("cli.no_command"));
        return Ok(());
    };

    let command = find_command(&name).ok_or_else(|| {
        anyhow!(format!(t!("cli.error.unknown_command"), name = name))
    })?;
    (command.handler)(args.collect(), session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("generate").map(|c| c.name), Some("generate"));
        assert_eq!(find_command("gen").map(|c| c.name), Some("generate"));
        assert_eq!(find_command("validate").map(|c| c.name), Some("check"));
        assert_eq!(find_command("catalog").map(|c| c.name), Some("funcs"));
        assert!(find_command("run").is_none());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut all: Vec<&str> = COMMAND_REGISTRY
            .iter()
            .flat_map(|c| std::iter::once(c.name).chain(c.aliases.iter().copied()))
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = BasicInfoSession::open(dir.path().join("basicInfoInput.json"));
        let err = dispatch(vec!["frobnicate".to_string()], &mut session).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }
}
