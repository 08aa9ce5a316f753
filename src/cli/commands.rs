use std::collections::HashMap;

use once_cell::sync::Lazy;
use strsim::levenshtein;

use crate::{
    checkout::PayerDetails,
    config::Config,
    schedule::{PlanField, SystemClock},
};

use super::errors::CommandError;
use super::output;
use super::state::ShellContext;

pub type CommandResult = Result<(), CommandError>;
pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

static DEFINITIONS: Lazy<Vec<CommandDefinition>> = Lazy::new(|| {
    vec![
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new(
            "set",
            "Change a plan field and regenerate the schedule",
            "set <total|deposit|installments|interval|frequency|start> <value>",
            cmd_set,
        ),
        CommandDefinition::new("show", "Print the current schedule", "show [--json]", cmd_show),
        CommandDefinition::new("reset", "Clear the plan and payer details", "reset", cmd_reset),
        CommandDefinition::new(
            "payer",
            "Record payer name and email",
            "payer <first-name> <last-name> <email>",
            cmd_payer,
        ),
        CommandDefinition::new(
            "status",
            "Report whether the order can be submitted",
            "status",
            cmd_status,
        ),
        CommandDefinition::new(
            "config",
            "Show or change settings",
            "config [key [value]]",
            cmd_config,
        ),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
});

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    DEFINITIONS.clone()
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Closest registered name within two edits of `input`.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        self.names()
            .map(|name| (levenshtein(name, input), name))
            .filter(|(distance, _)| *distance <= 2)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

impl ShellContext {
    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let command = match command {
            "quit" => "exit",
            "?" => "help",
            other => other,
        };
        let handler = match self.registry.get(command) {
            Some(definition) => definition.handler,
            None => {
                if let Some(suggestion) = self.registry.suggest(command) {
                    output::info(format!("Did you mean `{}`?", suggestion));
                }
                return Err(CommandError::UnknownCommand(command.to_string()));
            }
        };
        handler(self, args)?;
        if self.running {
            Ok(LoopControl::Continue)
        } else {
            Ok(LoopControl::Exit)
        }
    }
}

fn usage_error(context: &ShellContext, name: &str) -> CommandError {
    let usage = context
        .registry
        .get(name)
        .map(|definition| definition.usage)
        .unwrap_or(name);
    CommandError::InvalidArguments(format!("Usage: {}", usage))
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let definition = context
            .registry
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        output::section(format!("Help: {}", definition.name));
        output::info(format!("  Description: {}", definition.description));
        output::info(format!("  Usage: {}", definition.usage));
        return Ok(());
    }
    output::section("Available commands");
    for definition in context.registry.iter() {
        output::info(format!("  {:<10} {}", definition.name, definition.description));
    }
    output::info("Use `help <command>` for details.");
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [field, value @ ..] = args else {
        return Err(usage_error(context, "set"));
    };
    let field: PlanField = field.parse()?;
    // Amounts may be cleared with an empty value; everything else needs one.
    if value.is_empty() && !matches!(field, PlanField::Total | PlanField::Deposit) {
        return Err(usage_error(context, "set"));
    }
    let request = context.request.apply(field, &value.join(" "))?;
    context.update_request(request);
    context.print_plan();
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            context.print_plan();
            Ok(())
        }
        ["--json"] => {
            println!("{}", serde_json::to_string_pretty(&context.plan)?);
            Ok(())
        }
        _ => Err(usage_error(context, "show")),
    }
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.reset(&SystemClock);
    output::success("Plan cleared.");
    Ok(())
}

fn cmd_payer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [first, last, email] = args else {
        return Err(usage_error(context, "payer"));
    };
    context.payer = PayerDetails::new(*first, *last, *email);
    output::success(format!("Payer set to {} <{}>.", context.payer.full_name(), email));
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.submission_enabled() {
        output::success("Submission enabled.");
        return Ok(());
    }
    let mut reasons: Vec<String> = context
        .payer
        .missing_fields()
        .into_iter()
        .map(|field| format!("missing {}", field))
        .collect();
    if context.plan.is_empty() {
        reasons.push("no charges scheduled".into());
    }
    output::warning(format!("Submission disabled: {}.", reasons.join(", ")));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            output::info(format!("  {:<24} {}", "file", context.config_manager.path().display()));
            for key in Config::KEYS {
                output::info(format!("  {:<24} {}", key, context.config.get(key)?));
            }
            Ok(())
        }
        [key] => {
            output::info(format!("{} = {}", key, context.config.get(key)?));
            Ok(())
        }
        [key, value @ ..] => {
            context.config.set(key, &value.join(" "))?;
            context.persist_config()?;
            let request = context.request.clone();
            context.update_request(request);
            output::success(format!("Updated {}.", key));
            Ok(())
        }
    }
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.running = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_names_only() {
        let registry = CommandRegistry::new(all_definitions());
        assert_eq!(registry.suggest("shwo"), Some("show"));
        assert_eq!(registry.suggest("stauts"), Some("status"));
        assert_eq!(registry.suggest("frobnicate"), None);
    }

    #[test]
    fn keeps_registration_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names.first(), Some(&"help"));
        assert_eq!(names.last(), Some(&"exit"));
    }
}
